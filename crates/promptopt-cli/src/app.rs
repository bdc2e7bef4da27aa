//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use promptopt_core::{Config, ProviderKind};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "promptopt")]
#[command(
    author,
    version,
    about = "Analyze, rewrite and answer queries with a locally hosted LLM"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "PROMPTOPT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Optimize and answer a single query
    Run(RunArgs),

    /// Read queries from stdin until quit
    #[command(alias = "i")]
    Interactive(InteractiveArgs),

    /// Check the shape of a query without calling a model
    Lint(LintArgs),

    /// Show or create the config file
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Query text
    #[arg(required = true)]
    pub query: Vec<String>,

    #[command(flatten)]
    pub llm: LlmOverrides,
}

#[derive(Args)]
pub struct InteractiveArgs {
    #[command(flatten)]
    pub llm: LlmOverrides,
}

/// Per-invocation overrides, applied on top of the config file and environment
#[derive(Args, Default)]
pub struct LlmOverrides {
    /// Model server kind (ollama, lmstudio)
    #[arg(long, value_parser = parse_provider)]
    pub provider: Option<ProviderKind>,

    /// Model name
    #[arg(long)]
    pub model: Option<String>,

    /// Model server base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Sampling temperature (0.0-1.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Attempts per model call
    #[arg(long)]
    pub retries: Option<u32>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Hide [HH:MM:SS] prefixes
    #[arg(long)]
    pub no_timestamps: bool,
}

impl LlmOverrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(kind) = self.provider {
            config.set_provider(kind);
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(url) = &self.base_url {
            config.llm.base_url = url.clone();
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }
        if let Some(retries) = self.retries {
            config.pipeline.retries = retries;
        }
        if self.no_color {
            config.display.color_output = false;
        }
        if self.no_timestamps {
            config.display.show_timestamps = false;
        }
    }
}

#[derive(Args)]
pub struct LintArgs {
    /// Query text
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Rewritten prompt to compare against the query
    #[arg(long)]
    pub against: Option<String>,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default config file
    Init {
        /// Provider whose defaults to write
        #[arg(long, value_parser = parse_provider, default_value = "ollama")]
        provider: ProviderKind,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
}

fn parse_provider(value: &str) -> Result<ProviderKind, String> {
    value.parse::<ProviderKind>().map_err(|e| e.to_string())
}
