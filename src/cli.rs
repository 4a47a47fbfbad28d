// src/cli.rs

use crate::domain::watch::parse_date;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "swa-price-drop",
    version,
    about = "Checks Southwest fares for watched flights and texts you when a price drops"
)]
pub struct Cli {
    /// Path to the YAML watch list (rewritten when a price drops)
    #[arg(long, value_name = "PATH")]
    pub config: PathBuf,

    /// Log file (defaults to $HOME/swa-price-drop.log)
    #[arg(long, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Log level (defaults to info; RUST_LOG overrides it)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub loglevel: LogLevel,

    /// Second log file that receives every scraped fare
    #[arg(long = "fare-log", value_name = "PATH")]
    pub fare_log: Option<PathBuf>,

    /// Search these dates for every watch instead of the configured ones
    #[arg(long, num_args = 2, value_names = ["OUTBOUND", "RETURN"], value_parser = parse_date)]
    pub dates: Option<Vec<NaiveDate>>,

    /// Evaluate and notify, but never rewrite the config
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// The `--dates` pair, if given.
    pub fn date_override(&self) -> Option<(NaiveDate, NaiveDate)> {
        match self.dates.as_deref() {
            Some([outbound, inbound]) => Some((*outbound, *inbound)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
