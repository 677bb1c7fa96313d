//! Tracing setup shared by the `parkvoice` binaries.
//!
//! Events go to stderr and to one log file per run under `<app root>/logs`.
//! Stdout is left alone for JSON output.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
    time::SystemTime,
};

use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{InitError, RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::app_dirs::{self, AppDirError};

/// Run logs kept in the logs directory after pruning.
const KEPT_RUN_LOGS: usize = 10;
const LOG_FILE_PREFIX: &str = "parkvoice";

static FILE_WRITER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Reasons logging could not be installed.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error(transparent)]
    AppDir(#[from] AppDirError),
    #[error("Failed to format log file name: {0}")]
    FileName(#[from] time::error::Format),
    #[error("Failed to open run log: {0}")]
    Appender(#[from] InitError),
    #[error("A global tracing subscriber is already installed")]
    AlreadySet(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Install the global subscriber.
///
/// `default_filter` applies when `RUST_LOG` is unset. Only the first call
/// does anything.
pub fn init(default_filter: &str) -> Result<(), LoggingError> {
    if FILE_WRITER_GUARD.get().is_some() {
        return Ok(());
    }

    let log_dir = app_dirs::logs_dir()?;
    let stem = run_log_stem(now_local_or_utc())?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(&stem)
        .filename_suffix("log")
        .build(&log_dir)?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let timer = local_timer();
    let subscriber = Registry::default()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with(
            fmt::layer()
                .with_timer(timer.clone())
                .with_writer(std::io::stderr),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_timer(timer)
                .with_writer(file_writer),
        );
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = FILE_WRITER_GUARD.set(guard);

    match prune_run_logs(&log_dir, KEPT_RUN_LOGS) {
        Ok(0) => {}
        Ok(removed) => tracing::debug!("Pruned {removed} old run logs"),
        Err(err) => tracing::warn!("Could not prune {}: {err}", log_dir.display()),
    }
    tracing::debug!("Run log at {}", log_dir.join(format!("{stem}.log")).display());
    Ok(())
}

/// Delete the oldest `parkvoice_*.log` files beyond `keep`; returns how many went.
fn prune_run_logs(dir: &Path, keep: usize) -> std::io::Result<usize> {
    let mut logs: Vec<(SystemTime, PathBuf)> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_run_log(path))
        .map(|path| {
            let modified = fs::metadata(&path)
                .and_then(|meta| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, path)
        })
        .collect();
    logs.sort();
    let excess = logs.len().saturating_sub(keep);
    for (_, path) in &logs[..excess] {
        fs::remove_file(path)?;
    }
    Ok(excess)
}

fn is_run_log(path: &Path) -> bool {
    path.is_file()
        && path.extension().is_some_and(|ext| ext == "log")
        && path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(LOG_FILE_PREFIX))
}

fn run_log_stem(now: OffsetDateTime) -> Result<String, time::error::Format> {
    const STAMP: &[FormatItem<'_>] =
        format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    Ok(format!("{LOG_FILE_PREFIX}_{}", now.format(STAMP)?))
}

fn local_timer() -> fmt::time::OffsetTime<time::format_description::BorrowedFormatItem<'static>> {
    const STAMP: &[FormatItem<'static>] =
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    fmt::time::OffsetTime::new(offset, STAMP.into())
}

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
