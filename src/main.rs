//! 28-day mortality risk predictor.
//!
//! Main entry point for the terminal application.

use anyhow::Result;
use std::fs::{File, OpenOptions};
use std::io::IsTerminal;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mortality_risk::adapters::sanitize::SanitizingMakeWriter;
use mortality_risk::tui::App;

/// Open the log file for appending, creating its directory if needed.
///
/// Runs before the subscriber exists, so a failure surfaces as the open error.
fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            // Best-effort: a missing directory is reported by the open below.
            let _ = std::fs::create_dir_all(parent);
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

fn main() -> Result<()> {
    // Writing logs to the terminal would corrupt the alternate screen, so
    // `auto` logs to a file when stdout is a TTY and to stdout otherwise.
    let log_mode = std::env::var("MORTALITY_LOG_MODE").unwrap_or_else(|_| "auto".to_string());

    let interactive = std::io::stdout().is_terminal();
    let use_file = match log_mode.as_str() {
        "file" => true,
        "stdout" => false,
        _ => interactive,
    };

    let (writer, _guard) = if use_file {
        let log_file = std::env::var("MORTALITY_LOG_FILE")
            .unwrap_or_else(|_| "mortality-risk.log".to_string());
        tracing_appender::non_blocking(open_log_file(Path::new(&log_file))?)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(!use_file)
                .with_writer(SanitizingMakeWriter::new(writer)),
        )
        .init();

    tracing::info!("Starting mortality risk predictor...");

    // Fail fast: without the model no prediction can be served.
    let mut app = match App::new() {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("Startup failed: {:#}", e);
            return Err(e);
        }
    };
    app.run()?;

    tracing::info!("Shutdown complete.");
    Ok(())
}
