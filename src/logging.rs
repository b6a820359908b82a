//! File-based logging.
//!
//! The terminal belongs to the TUI while it runs, so log records go to a
//! rotating file next to the data file instead of stderr.

use anyhow::{Context, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use std::path::Path;

const LOG_FILE_BASENAME: &str = "tasktimer";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

/// Levels accepted by `--log-level`
const SUPPORTED_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Start logging into `log_dir`. Keep the returned handle alive for the process lifetime.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<LoggerHandle> {
    let level = normalize_level(level)?;

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let handle = Logger::try_with_str(level)
        .context("Invalid log level")?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME)
                .suppress_timestamp(),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .append()
        .write_mode(WriteMode::Direct)
        .format(flexi_logger::detailed_format)
        .start()
        .context("Failed to start logger")?;

    log::info!("logging initialized (level={}, dir={})", level, log_dir.display());
    Ok(handle)
}

fn normalize_level(level: &str) -> Result<&'static str> {
    let lowered = level.trim().to_ascii_lowercase();
    SUPPORTED_LEVELS
        .iter()
        .copied()
        .find(|l| *l == lowered)
        .with_context(|| {
            format!(
                "Unsupported log level `{}` (expected one of: {})",
                level,
                SUPPORTED_LEVELS.join(", ")
            )
        })
}
