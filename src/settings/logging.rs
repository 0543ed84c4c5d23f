use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use std::{
    fs,
    io::{stderr, IsTerminal},
    path::PathBuf,
};
use tracing_appender::rolling;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, registry, EnvFilter};

use crate::settings::consts::{
    APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, DEFAULT_LOG_LEVEL, LOG_FILE,
};

/// Logs go to stderr, filtered by `RUST_LOG` (info by default), and every
/// event down to TRACE is appended as JSON to the log file in the platform
/// data directory.
pub fn init_logger() -> Result<()> {
    let directory = log_directory()?;
    fs::create_dir_all(&directory)
        .with_context(|| format!("Failed to create log directory: {}", directory.display()))?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let console_layer = fmt::layer()
        .with_writer(stderr)
        .with_ansi(stderr().is_terminal())
        .with_target(false)
        .with_level(true)
        .without_time()
        .compact()
        .with_filter(env_filter);

    let json_layer = fmt::layer()
        .json()
        .with_writer(rolling::never(&directory, LOG_FILE))
        .with_target(true)
        .with_level(true)
        .flatten_event(true)
        .with_filter(LevelFilter::TRACE);

    registry()
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .context("Failed to install the global logger")?;

    Ok(())
}

fn log_directory() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
        .ok_or_else(|| anyhow!("Could not determine project directories"))?;

    Ok(project_dirs.data_dir().to_path_buf())
}
