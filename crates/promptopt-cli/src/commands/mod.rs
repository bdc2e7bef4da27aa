//! CLI command handlers

pub mod config;
pub mod interactive;
pub mod lint;
pub mod run;

use crate::app::LlmOverrides;
use crate::output::TerminalDisplay;
use promptopt_core::{Config, LLMClient};
use std::path::Path;

/// Effective config: file (or defaults), then environment, then flags
pub fn load_config(path: Option<&Path>, overrides: &LlmOverrides) -> anyhow::Result<Config> {
    let mut config = Config::load_or_default(path);
    config.apply_env();
    overrides.apply(&mut config);
    Ok(config.checked()?)
}

/// Connect to the configured server, printing troubleshooting hints on failure
pub async fn connect(
    config: &Config,
    display: Option<&mut TerminalDisplay>,
) -> promptopt_core::Result<LLMClient> {
    let llm = &config.llm;

    match LLMClient::from_config(config).await {
        Ok(client) => Ok(client),
        Err(e) => {
            if let Some(display) = display {
                display.error(&format!(
                    "Cannot connect to {} at {}",
                    llm.provider.display_name(),
                    llm.base_url
                ));
                if e.is_connection() {
                    display.connection_help(llm.provider, &llm.model, &llm.base_url);
                }
            }
            Err(e)
        }
    }
}
