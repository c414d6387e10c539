// ABOUTME: Interactive console agent with calculator and weather tools.
// ABOUTME: Reads queries line by line and prints the agent's answers.

use std::sync::Arc;

use anyhow::Result;
use rustyline::DefaultEditor;

use toolloop::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // Missing credential is fatal before any query is processed.
    let client = Arc::new(GeminiClient::from_env()?);

    let tools = Registry::builder()
        .tool(CalculatorTool)
        .tool(WeatherTool)
        .build();

    let agent = ToolAgent::new(client, tools);

    let mut rl = DefaultEditor::new()?;
    println!("Tool-Enabled Agent Console");
    println!("Type 'exit' or 'quit' to leave.\n");

    loop {
        let line = match rl.readline("You: ") {
            Ok(line) => line,
            Err(_) => break,
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            println!("Agent: Bye");
            break;
        }

        let _ = rl.add_history_entry(line);

        // One bad query must not take down the read loop.
        match agent.run(line).await {
            Ok(result) => println!("Agent: {}", result.answer),
            Err(e) => eprintln!("Error while calling agent: {}", e),
        }
    }

    Ok(())
}
