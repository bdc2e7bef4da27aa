//! Run command - one query through the pipeline

use super::{connect, load_config};
use crate::app::{OutputFormat, RunArgs};
use crate::output::{json, TerminalDisplay};
use anyhow::Result;
use promptopt_core::{PipelineOutcome, PipelineRunner};
use std::path::Path;
use std::sync::Arc;

pub async fn run(args: RunArgs, config_path: Option<&Path>, format: OutputFormat) -> Result<i32> {
    let query = args.query.join(" ");
    let config = load_config(config_path, &args.llm)?;

    match format {
        OutputFormat::Json => {
            let client = match connect(&config, None).await {
                Ok(client) => client,
                Err(e) => {
                    print!("{}", json::format_error(&e.to_string()));
                    return Ok(e.exit_code());
                }
            };

            let mut runner = PipelineRunner::new(Arc::new(client));
            let state = runner.run(&query).await;
            print!("{}", json::format_outcome(&PipelineOutcome::from(&state)));
            Ok(state.exit_code())
        }
        OutputFormat::Cli => {
            let mut display = TerminalDisplay::new(&config.display);
            display.header();
            display.info(&format!(
                "Connecting to {} at {}...",
                config.llm.provider.display_name(),
                config.llm.base_url
            ));

            let client = connect(&config, Some(&mut display)).await?;
            display.success("Connected");
            display.provider_info(&client.provider_info());

            let mut runner = PipelineRunner::new(Arc::new(client));
            let state = runner.run_observed(&query, &mut display).await;
            display.summary(&state);
            if state.connection_failure {
                display.connection_help(
                    config.llm.provider,
                    &config.llm.model,
                    &config.llm.base_url,
                );
            }
            Ok(state.exit_code())
        }
    }
}
