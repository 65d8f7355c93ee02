use std::io;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use vibe_assistant::{http_gateway_from_env, AssistantRuntime};
use vibe_cli::{logging, parse_command, run_command, Command, ShellConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> io::Result<()> {
    logging::init();

    let config = ShellConfig::from_env();
    let gateway = http_gateway_from_env().map_err(io::Error::other)?;
    info!(base_url = gateway.base_url(), "vibe starting");
    println!("Connected to {}. Type /help for commands.", gateway.base_url());

    let mut runtime = AssistantRuntime::new(Arc::new(gateway));
    let mut stdout = tokio::io::stdout();

    let initial = run_command(&mut runtime, &config, Command::Files(None)).await;
    write_block(&mut stdout, &initial.output).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let Some(command) = parse_command(&line) else {
            continue;
        };

        let step = run_command(&mut runtime, &config, command).await;
        write_block(&mut stdout, &step.output).await?;
        if step.quit {
            break;
        }
    }

    Ok(())
}

async fn write_block(stdout: &mut tokio::io::Stdout, text: &str) -> io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    stdout.write_all(text.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}
