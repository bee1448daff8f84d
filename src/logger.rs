//! Tracing subscriber setup
//!
//! Logs go to `--log-file` when given. Without one, batch mode logs
//! warnings to stderr and interactive mode stays silent, since the
//! terminal belongs to the view.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

use crate::constants::{APP_NAME, APP_VERSION};

/// `RUST_LOG` if set, otherwise `default`
fn env_filter(default: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy()
}

/// Installs the global subscriber.
///
/// # Arguments
/// * `log_file` - Append logs to this file
/// * `batch` - Whether stderr is free for warnings
pub fn init(log_file: Option<&Path>, batch: bool) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            let layer = fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .with_filter(env_filter(LevelFilter::INFO));
            tracing_subscriber::registry()
                .with(layer)
                .try_init()
                .map_err(|e| anyhow!("cannot install logger: {}", e))?;
        }
        None if batch => {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(env_filter(LevelFilter::WARN));
            tracing_subscriber::registry()
                .with(layer)
                .try_init()
                .map_err(|e| anyhow!("cannot install logger: {}", e))?;
        }
        None => return Ok(()),
    }

    info!("{} {} starting", APP_NAME, APP_VERSION);
    Ok(())
}
