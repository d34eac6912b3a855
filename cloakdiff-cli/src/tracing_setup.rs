//! Tracing setup for the cloakdiff CLI
//!
//! Usage:
//!   cloakdiff --debug ...                 # Debug logging
//!   RUST_LOG=cloakdiff_core=debug ...     # Fine-grained log control
//!
//! Non-interactive commands log to stderr. The TUI owns the terminal, so it
//! logs to a file instead (`~/.cloakdiff/logs/cloakdiff.log` unless
//! `[logging] file` says otherwise).

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (sets RUST_LOG=debug if not already set)
    pub debug: bool,
    /// Level from the config file, used when neither RUST_LOG nor --debug is set
    pub level: Option<String>,
    /// Write to this file instead of stderr
    pub log_file: Option<PathBuf>,
}

impl TracingConfig {
    fn filter(&self) -> EnvFilter {
        let fallback = if self.debug {
            "debug".to_string()
        } else {
            self.level.clone().unwrap_or_else(|| "info".to_string())
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    }
}

/// Initialize tracing based on configuration
pub fn init(config: &TracingConfig) -> Result<()> {
    match &config.log_file {
        Some(path) => init_file(config, path.clone()),
        None => init_stderr(config),
    }
}

fn init_stderr(config: &TracingConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_target(config.debug) // Show targets in debug mode
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

fn init_file(config: &TracingConfig, path: PathBuf) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
