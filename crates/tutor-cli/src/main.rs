//! # tutor
//!
//! Console English tutor binary. Loads settings, starts logging, builds the
//! Gemini client and conversation service, and runs the chat loop on
//! stdin/stdout. Ctrl-C cancels any in-flight request and ends the session.

#![deny(unsafe_code)]

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tutor_cli::{cli::Cli, console};

fn main() -> Result<()> {
    let args = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let result = runtime.block_on(run(args));
    // A pending stdin read holds a blocking thread; don't wait for it.
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}

async fn run(args: Cli) -> Result<()> {
    let settings_path = args.settings_path();
    let mut settings = tutor_settings::load_settings_from_path(&settings_path)
        .with_context(|| format!("Failed to load settings: {}", settings_path.display()))?;
    args.apply(&mut settings);

    tutor_core::logging::init_subscriber(&settings.logging.level, settings.logging.format);
    settings.validate();

    let cancel = CancellationToken::new();
    let service = tutor_cli::build_service(&settings, cancel.clone())?;

    let signal_token = cancel.clone();
    let _signal = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received");
            signal_token.cancel();
        }
    });

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let history = console::run(&service, stdin, &mut stdout, &cancel)
        .await
        .context("Console I/O failed")?;

    tracing::info!(entries = history.len(), "session ended");
    Ok(())
}
