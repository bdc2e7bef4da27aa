//! Config command

use crate::app::{ConfigAction, ConfigArgs, OutputFormat};
use anyhow::Result;
use promptopt_core::{exit_codes, Config, PromptOptError};
use std::path::Path;

pub fn run(args: ConfigArgs, config_path: Option<&Path>, format: OutputFormat) -> Result<i32> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::default_path);

    match args.action {
        ConfigAction::Show => {
            let mut config = Config::load_or_default(Some(path.as_path()));
            config.apply_env();

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
                OutputFormat::Cli => {
                    let source = if path.exists() { "" } else { " (not found, using defaults)" };
                    println!("# Config file: {}{}", path.display(), source);
                    print!("{}", config.to_yaml()?);
                }
            }
        }
        ConfigAction::Init { provider, force } => {
            if path.exists() && !force {
                return Err(PromptOptError::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                ))
                .into());
            }

            Config::for_provider(provider).save_to(&path)?;
            println!(
                "Wrote {} config to {}",
                provider.display_name(),
                path.display()
            );
        }
    }

    Ok(exit_codes::SUCCESS)
}
