//! promptopt CLI
//!
//! Analyze, rewrite and answer queries with a locally hosted LLM.

use anyhow::Result;
use clap::Parser;
use promptopt_core::{exit_codes, PromptOptError};
use std::process::ExitCode;

mod app;
mod commands;
mod output;

use app::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for --format json
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match dispatch(cli).await {
        Ok(code) => exit_status(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_status(error_exit_code(&e))
        }
    }
}

async fn dispatch(cli: Cli) -> Result<i32> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Run(args) => commands::run::run(args, config_path, cli.format).await,
        Commands::Interactive(args) => {
            commands::interactive::run(args, config_path, cli.format).await
        }
        Commands::Lint(args) => commands::lint::run(args, cli.format),
        Commands::Config(args) => commands::config::run(args, config_path, cli.format),
    }
}

fn error_exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<PromptOptError>()
        .map(PromptOptError::exit_code)
        .unwrap_or(exit_codes::GENERAL_ERROR)
}

fn exit_status(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
