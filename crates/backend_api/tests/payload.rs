use pretty_assertions::assert_eq;
use serde_json::json;

use backend_api::{
    ChatRequest, ChatResponse, ContextUsage, DebugRequest, FileContent, FileListing, IndexStats,
    IndexTriggerResponse, PlanRequest,
};

#[test]
fn chat_request_defaults_to_non_streaming() {
    let value = serde_json::to_value(ChatRequest::new("what does main.py do?")).expect("json");
    assert_eq!(value, json!({"question": "what does main.py do?", "stream": false}));
}

#[test]
fn optional_request_fields_are_omitted_when_absent() {
    let debug = serde_json::to_value(DebugRequest::new("app.py", "KeyError: 'x'")).expect("json");
    assert_eq!(debug, json!({"file_path": "app.py", "error_message": "KeyError: 'x'"}));

    let plan = serde_json::to_value(PlanRequest::new("add caching").with_scope("api/")).expect("json");
    assert_eq!(plan, json!({"goal": "add caching", "scope": "api/"}));
}

#[test]
fn normalized_requests_drop_blank_optionals() {
    let debug = DebugRequest::new(" app.py ", " boom ").with_context("   ").normalized();
    assert_eq!(debug, DebugRequest::new("app.py", "boom"));

    let plan = PlanRequest::new(" goal ").with_scope("\n").normalized();
    assert_eq!(plan, PlanRequest::new("goal"));
}

#[test]
fn chat_response_decodes_context_stats() {
    let body = json!({
        "answer": "It parses input.",
        "context_stats": {
            "total_chunks": 20,
            "packed_chunks": 12,
            "context_tokens": 3100,
            "system_tokens": 40,
            "total_tokens": 3140,
            "utilization": 0.0157,
            "available_tokens": 196000,
            "used_tokens": 3100
        }
    });

    let response: ChatResponse = serde_json::from_value(body).expect("decode");
    assert_eq!(response.answer, "It parses input.");
    assert_eq!(response.context_stats.packed_chunks, 12);
    assert_eq!(response.context_stats.utilization, 0.0157);
    assert_eq!(response.context_stats.used_tokens, Some(3100));
}

#[test]
fn partial_context_stats_default_missing_fields() {
    let response: ChatResponse =
        serde_json::from_value(json!({"answer": "ok", "context_stats": {"total_chunks": 3}}))
            .expect("decode");
    assert_eq!(
        response.context_stats,
        ContextUsage {
            total_chunks: 3,
            ..ContextUsage::default()
        }
    );
}

#[test]
fn listing_and_content_shapes_decode() {
    let listing: FileListing = serde_json::from_value(json!({
        "files": [{"path": "a.py", "name": "a.py", "extension": ".py", "size": 120}],
        "total": 1
    }))
    .expect("listing");
    assert_eq!(listing.files[0].path, "a.py");
    assert_eq!(listing.files[0].size, 120);

    let content: FileContent =
        serde_json::from_value(json!({"path": "a.py", "content": "print(1)", "lines": 1}))
            .expect("content");
    assert_eq!(content.content, "print(1)");
}

#[test]
fn index_payloads_pass_through_verbatim() {
    let stats_json = json!({
        "metrics": {"files_total": 10, "files_indexed": 9},
        "vector_store": {"total_embeddings": 120, "dimension": 768},
        "graph_store": {"code_nodes": 50, "cfg_nodes": 80, "relationships": 200}
    });
    let stats: IndexStats = serde_json::from_value(stats_json.clone()).expect("stats");
    assert_eq!(stats.section("graph_store"), stats_json.get("graph_store"));
    assert_eq!(serde_json::to_value(&stats).expect("json"), stats_json);

    let trigger: IndexTriggerResponse =
        serde_json::from_value(json!({"status": "success", "stats": {"files": 3}})).expect("trigger");
    assert_eq!(trigger.status, "success");
    assert_eq!(trigger.stats["files"], 3);
}
