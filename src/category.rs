//! Extension-based file classification used by the file tree.

use backend_api::FileEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    Python,
    TypeScript,
    JavaScript,
    Rust,
    Markdown,
    Config,
    Other,
}

impl FileCategory {
    /// Classifies an extension such as `.py` or `TSX`. Never fails.
    pub fn classify(extension: &str) -> Self {
        let extension = extension.trim();
        let extension = extension.strip_prefix('.').unwrap_or(extension);
        match extension.to_ascii_lowercase().as_str() {
            "py" => Self::Python,
            "ts" | "tsx" => Self::TypeScript,
            "js" | "jsx" => Self::JavaScript,
            "rs" => Self::Rust,
            "md" => Self::Markdown,
            "json" | "toml" | "yaml" | "yml" => Self::Config,
            _ => Self::Other,
        }
    }

    /// Uses the entry's extension, falling back to the file name suffix.
    pub fn of(entry: &FileEntry) -> Self {
        if !entry.extension.trim().is_empty() {
            return Self::classify(&entry.extension);
        }
        match entry.name.rsplit_once('.') {
            Some((stem, extension)) if !stem.is_empty() => Self::classify(extension),
            _ => Self::Other,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Python => "🐍",
            Self::TypeScript => "📘",
            Self::JavaScript => "📒",
            Self::Rust => "🦀",
            Self::Markdown => "📝",
            Self::Config => "⚙️",
            Self::Other => "📄",
        }
    }

    /// Syntax highlighting hint for the content viewer.
    pub fn language(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::TypeScript => "typescript",
            Self::JavaScript => "javascript",
            Self::Rust => "rust",
            Self::Markdown => "markdown",
            Self::Config => "config",
            Self::Other => "text",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FileCategory;
    use backend_api::FileEntry;

    #[test]
    fn classify_ignores_case_and_leading_dot() {
        assert_eq!(FileCategory::classify(".py"), FileCategory::Python);
        assert_eq!(FileCategory::classify("PY"), FileCategory::Python);
        assert_eq!(FileCategory::classify(".Tsx"), FileCategory::TypeScript);
        assert_eq!(FileCategory::classify("jsx"), FileCategory::JavaScript);
        assert_eq!(FileCategory::classify(".yml"), FileCategory::Config);
    }

    #[test]
    fn unknown_and_empty_extensions_fall_back_to_other() {
        for extension in ["", ".", ".exe", "tar.gz", "  "] {
            assert_eq!(FileCategory::classify(extension), FileCategory::Other, "{extension:?}");
        }
        assert_eq!(FileCategory::Other.icon(), "📄");
    }

    #[test]
    fn entry_without_extension_uses_name_suffix() {
        let entry = FileEntry {
            path: "src/main.rs".to_string(),
            name: "main.rs".to_string(),
            extension: String::new(),
            size: 10,
        };
        assert_eq!(FileCategory::of(&entry), FileCategory::Rust);

        let dotfile = FileEntry {
            name: ".env".to_string(),
            ..entry
        };
        assert_eq!(FileCategory::of(&dotfile), FileCategory::Other);
    }
}
