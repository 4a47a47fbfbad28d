// src/logging.rs

use crate::cli::LogLevel;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILE: &str = "swa-price-drop.log";

/// Target the fare parser traces every scraped price under.
pub const FARE_TARGET: &str = "fares";

pub struct LogOptions {
    pub log_file: PathBuf,
    pub level: LogLevel,
    pub fare_log: Option<PathBuf>,
}

pub fn default_log_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_LOG_FILE)
}

fn open_append(path: &Path) -> Result<File, String> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| format!("open {}: {e}", path.display()))
}

/// `RUST_LOG` wins; otherwise this crate at `level` and everything else at warn.
fn app_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,swa_price_drop={}", level.as_str())))
}

/// Log to the file and stderr, plus the optional fare log.
pub fn init_logging(options: &LogOptions) -> Result<(), String> {
    let log_file = open_append(&options.log_file)?;

    let fare_layer = match &options.fare_log {
        Some(path) => Some(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(open_append(path)?))
                .with_ansi(false)
                .with_filter(EnvFilter::new(format!("{FARE_TARGET}=debug"))),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(log_file))
                .with_ansi(false)
                .with_filter(app_filter(options.level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(app_filter(options.level)),
        )
        .with(fare_layer)
        .try_init()
        .map_err(|e| e.to_string())
}
