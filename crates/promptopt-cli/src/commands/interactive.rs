//! Interactive command - a query per line until the user quits

use super::{connect, load_config};
use crate::app::{InteractiveArgs, OutputFormat};
use crate::output::{json, TerminalDisplay};
use anyhow::Result;
use promptopt_core::{exit_codes, PipelineOutcome, PipelineRunner};
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

/// Inputs that end the session
const QUIT_WORDS: [&str; 3] = ["quit", "exit", "종료"];

pub async fn run(
    args: InteractiveArgs,
    config_path: Option<&Path>,
    format: OutputFormat,
) -> Result<i32> {
    let config = load_config(config_path, &args.llm)?;
    let mut display = TerminalDisplay::new(&config.display);
    let json_output = format == OutputFormat::Json;

    let client = if json_output {
        match connect(&config, None).await {
            Ok(client) => client,
            Err(e) => {
                print!("{}", json::format_error(&e.to_string()));
                return Ok(e.exit_code());
            }
        }
    } else {
        display.header();
        let client = connect(&config, Some(&mut display)).await?;
        display.provider_info(&client.provider_info());
        display.info("Enter a query, or 'quit' to exit.");
        client
    };

    let mut runner = PipelineRunner::new(Arc::new(client));
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let mut processed = 0usize;

    loop {
        if !json_output {
            display.blank();
            display.prompt("Query> ");
        }

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let query = line.trim();

        if is_quit(query) {
            break;
        }
        if query.is_empty() {
            if !json_output {
                display.warning("Empty query, please enter some text.");
            }
            continue;
        }

        if json_output {
            let state = runner.run(query).await;
            print!("{}", json::format_outcome_line(&PipelineOutcome::from(&state)));
        } else {
            let state = runner.run_observed(query, &mut display).await;
            display.summary(&state);
        }
        processed += 1;
    }

    tracing::debug!(
        "Interactive session ended after {} queries ({} snapshots)",
        processed,
        runner.history().len()
    );
    if !json_output {
        display.blank();
        display.info("Goodbye!");
    }

    Ok(exit_codes::SUCCESS)
}

fn is_quit(input: &str) -> bool {
    QUIT_WORDS
        .iter()
        .any(|word| input.eq_ignore_ascii_case(word))
}
