//! Terminal output - colored progress rendering for the pipeline

use promptopt_core::{
    DisplayConfig, PipelineObserver, PipelineStage, PipelineState, PromptOptError, ProviderInfo,
    ProviderKind, QueryAnalysis,
};
use std::io::{IsTerminal, Write};
use std::time::Duration;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

const RULE_WIDTH: usize = 60;

/// Renders pipeline progress to stdout
pub struct TerminalDisplay {
    out: StandardStream,
    show_timestamps: bool,
}

impl TerminalDisplay {
    pub fn new(display: &DisplayConfig) -> Self {
        let choice = color_choice(display.color_output, std::io::stdout().is_terminal());
        Self {
            out: StandardStream::stdout(choice),
            show_timestamps: display.show_timestamps,
        }
    }

    pub fn header(&mut self) {
        let rule = "=".repeat(RULE_WIDTH);
        self.colored(&rule, Color::Cyan, true);
        self.colored("  promptopt - query optimizer for local LLMs", Color::Cyan, true);
        self.colored(&rule, Color::Cyan, true);
        self.blank();
    }

    pub fn provider_info(&mut self, info: &ProviderInfo) {
        self.colored("Model server", Color::Blue, true);
        self.plain(&format!("  Provider:    {}", info.provider.display_name()));
        self.plain(&format!("  Model:       {}", info.model));
        self.plain(&format!("  URL:         {}", info.base_url));
        self.plain(&format!("  Temperature: {}", info.temperature));
        self.plain(&format!("  Max tokens:  {}", info.max_tokens));
        self.blank();
    }

    pub fn info(&mut self, message: &str) {
        let line = self.stamped(message);
        self.plain(&line);
    }

    pub fn success(&mut self, message: &str) {
        let line = self.stamped(&format!("✓ {}", message));
        self.colored(&line, Color::Green, true);
    }

    pub fn warning(&mut self, message: &str) {
        let line = self.stamped(&format!("⚠ {}", message));
        self.colored(&line, Color::Yellow, false);
    }

    pub fn error(&mut self, message: &str) {
        let line = self.stamped(&format!("✗ {}", message));
        self.colored(&line, Color::Red, true);
    }

    /// Stage heading such as `[2/3] Rewriting prompt`
    pub fn section(&mut self, stage: PipelineStage) {
        self.blank();
        self.colored(&"-".repeat(RULE_WIDTH), Color::Magenta, false);
        let title = format!(
            "[{}/{}] {}",
            stage.number(),
            PipelineStage::ALL.len(),
            stage_title(stage)
        );
        self.colored(&title, Color::Magenta, true);
    }

    /// Closing line with total elapsed time or the failure reason
    pub fn summary(&mut self, state: &PipelineState) {
        self.blank();
        match &state.error {
            Some(error) => self.error(&format!("Pipeline failed: {}", error)),
            None => {
                let seconds = state
                    .elapsed()
                    .and_then(|d| d.to_std().ok())
                    .map(|d| d.as_secs_f64())
                    .unwrap_or_default();
                self.success(&format!("Pipeline completed in {:.2}s", seconds));
            }
        }
    }

    /// Troubleshooting hints for a server that could not be reached
    pub fn connection_help(&mut self, provider: ProviderKind, model: &str, base_url: &str) {
        self.blank();
        self.colored("Troubleshooting:", Color::Yellow, true);
        for hint in connection_hints(provider, model, base_url) {
            self.plain(&format!("  - {}", hint));
        }
    }

    pub fn prompt(&mut self, text: &str) {
        self.out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true)).ok();
        write!(self.out, "{}", text).ok();
        self.out.reset().ok();
        self.out.flush().ok();
    }

    pub fn blank(&mut self) {
        writeln!(self.out).ok();
    }

    fn stamped(&self, message: &str) -> String {
        if self.show_timestamps {
            format!("[{}] {}", chrono::Local::now().format("%H:%M:%S"), message)
        } else {
            message.to_string()
        }
    }

    fn plain(&mut self, text: &str) {
        writeln!(self.out, "{}", text).ok();
    }

    fn colored(&mut self, text: &str, color: Color, bold: bool) {
        self.out
            .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(bold))
            .ok();
        writeln!(self.out, "{}", text).ok();
        self.out.reset().ok();
    }
}

impl PipelineObserver for TerminalDisplay {
    fn on_query(&mut self, query: &str) {
        self.info(&format!("Query: {}", query));
    }

    fn on_stage_start(&mut self, stage: PipelineStage) {
        self.section(stage);
    }

    fn on_analysis(&mut self, analysis: &QueryAnalysis) {
        for (key, value) in analysis.entries() {
            self.plain(&format!("  • {}: {}", key, value));
        }
        self.success("Analysis complete");
    }

    fn on_rewrite(&mut self, rewritten: &str) {
        self.colored("Rewritten prompt:", Color::Blue, true);
        for line in rewritten.lines() {
            self.plain(&format!("  {}", line));
        }
        self.success("Rewrite complete");
    }

    fn on_response(&mut self, response: &str, elapsed: Duration) {
        self.colored(
            &format!("Response ({:.2}s):", elapsed.as_secs_f64()),
            Color::Blue,
            true,
        );
        self.plain(response.trim());
    }

    fn on_warning(&mut self, message: &str) {
        self.warning(message);
    }

    fn on_stage_error(&mut self, stage: PipelineStage, error: &PromptOptError) {
        self.error(&format!("{} failed: {}", stage_title(stage), error));
    }
}

/// `Auto` only looks at `TERM` and `NO_COLOR`, so piped output is forced plain
fn color_choice(enabled: bool, stdout_is_terminal: bool) -> ColorChoice {
    if enabled && stdout_is_terminal {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

fn stage_title(stage: PipelineStage) -> &'static str {
    match stage {
        PipelineStage::Analyze => "Analyzing query",
        PipelineStage::Rewrite => "Rewriting prompt",
        PipelineStage::Respond => "Generating response",
    }
}

fn connection_hints(provider: ProviderKind, model: &str, base_url: &str) -> Vec<String> {
    match provider {
        ProviderKind::Ollama => vec![
            "Start the server: ollama serve".to_string(),
            format!("Pull the model: ollama pull {}", model),
            format!("Check the server URL: {}", base_url),
        ],
        ProviderKind::LmStudio => vec![
            "Start LM Studio and load a model".to_string(),
            "Enable the local server (Developer tab, Start Server)".to_string(),
            format!("Check the server URL: {}", base_url),
        ],
    }
}
