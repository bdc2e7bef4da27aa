// Basic pipeline example using promptopt as a library
//
// Needs a running Ollama (or LM Studio, with PROMPTOPT_LLM_PROVIDER=lmstudio)
// server. Run with:
//   cargo run -p promptopt-core --example basic_pipeline -- "your query"

use promptopt_core::{is_well_formed, Config, LLMClient, PipelineOutcome, PipelineRunner};
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> promptopt_core::Result<()> {
    let query = std::env::args()
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ");
    let query = if query.trim().is_empty() {
        "machine learning basics".to_string()
    } else {
        query
    };

    println!("promptopt Basic Pipeline Example\n");

    let mut config = Config::load_or_default(None);
    config.apply_env();
    println!(
        "Connecting to {} at {} (model: {})...",
        config.llm.provider.display_name(),
        config.llm.base_url,
        config.llm.model
    );

    let client = LLMClient::from_config(&config).await?;
    let mut runner = PipelineRunner::new(Arc::new(client));

    println!("Query: {}", query);
    println!("Well-formed: {}\n", is_well_formed(&query));

    let state = runner.run(&query).await;

    if let Some(analysis) = &state.analysis {
        println!("Analysis:\n{}\n", analysis.render());
    }
    if let Some(rewritten) = &state.rewritten_prompt {
        println!("Rewritten prompt:\n{}\n", rewritten);
    }
    match (&state.response, &state.error) {
        (Some(response), _) => println!("Response:\n{}\n", response),
        (None, Some(error)) => println!("Failed: {}\n", error),
        (None, None) => {}
    }

    println!("Optimization steps:");
    for step in runner
        .analyzer()
        .steps()
        .iter()
        .chain(runner.rewriter().steps())
    {
        println!("  [{}] {}", step.timestamp.format("%H:%M:%S"), step.name);
    }

    println!("\nHistory snapshots: {}", runner.history().len());
    println!(
        "\nResult:\n{}",
        serde_json::to_string_pretty(&PipelineOutcome::from(&state))?
    );

    Ok(())
}
