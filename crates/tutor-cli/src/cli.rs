//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use tutor_core::LogFormat;
use tutor_settings::TutorSettings;

/// Console English tutor backed by Gemini.
#[derive(Parser, Debug)]
#[command(name = "tutor", about = "Console English tutor backed by Gemini")]
pub struct Cli {
    /// Settings file (defaults to `~/.tutor/settings.json`).
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Model identifier (overrides settings and `MODEL_ID`).
    #[arg(long)]
    pub model: Option<String>,

    /// Exchange pairs sent as context (at least 2).
    #[arg(long)]
    pub max_pairs: Option<usize>,

    /// Log filter directive, e.g. `info` or `tutor_llm=debug`.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    /// Settings file to load.
    pub fn settings_path(&self) -> PathBuf {
        self.settings
            .clone()
            .unwrap_or_else(tutor_settings::settings_path)
    }

    /// Apply flag overrides on top of loaded settings.
    pub fn apply(&self, settings: &mut TutorSettings) {
        if let Some(ref model) = self.model {
            settings.api.model.clone_from(model);
        }
        if let Some(max_pairs) = self.max_pairs {
            settings.conversation.max_pairs = max_pairs;
        }
        if let Some(ref level) = self.log_level {
            settings.logging.level.clone_from(level);
        }
        if self.json_logs {
            settings.logging.format = LogFormat::Json;
        }
    }
}
