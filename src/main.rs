use crate::cli::Cli;
use crate::domain::coordinator::{self, RunOutcome};
use crate::domain::watch::WatchEntry;
use crate::errors::AppError;
use crate::logging::{default_log_file, init_logging, LogOptions};
use crate::notify::{deliver, LogNotifier, Notifier, TwilioNotifier};
use crate::search::{SearchProvider, SouthwestProvider};
use crate::store::ConfigFile;
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};

mod cli;
mod domain;
mod errors;
mod logging;
mod notify;
mod search;
mod store;

#[cfg(test)]
mod tests;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // 1️⃣ Logging first, so everything after it lands in the log file
    let log_options = LogOptions {
        log_file: cli.log.clone().unwrap_or_else(default_log_file),
        level: cli.loglevel,
        fare_log: cli.fare_log.clone(),
    };
    if let Err(e) = init_logging(&log_options).map_err(AppError::Logging) {
        eprintln!("❌ {e}");
        return ExitCode::from(e.exit_code());
    }

    // 2️⃣ One pass over the watch list
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let mut config = ConfigFile::load(&cli.config)?;
    let mut entries = config.entries()?;
    info!(
        "Loaded {} watch(es) from {}",
        entries.len(),
        config.path().display()
    );

    if let Some((outbound, inbound)) = cli.date_override() {
        info!("Overriding travel dates for this run");
        for entry in &mut entries {
            entry.override_dates(outbound, inbound);
        }
    }

    let provider = SouthwestProvider::new(config.search()?).map_err(AppError::Search)?;
    let notifier = build_notifier(&config);

    let today = Local::now().date_naive();
    check_watches(
        &mut config,
        &entries,
        &provider,
        notifier.as_ref(),
        today,
        cli.dry_run,
    )?;

    info!("All done checking flight prices");
    Ok(())
}

/// Search, notify and persist. Search and notification failures are logged
/// and counted here; only a failed save comes back as an error.
fn check_watches(
    config: &mut ConfigFile,
    entries: &[WatchEntry],
    provider: &dyn SearchProvider,
    notifier: &dyn Notifier,
    today: NaiveDate,
    dry_run: bool,
) -> Result<RunOutcome, AppError> {
    let outcome = coordinator::run(entries, provider, today);

    let report = deliver(notifier, &outcome.notifications);
    if report.failed > 0 {
        warn!("{} of {} notification(s) failed", report.failed, outcome.notifications.len());
    }

    if !outcome.needs_persist() {
        info!("No price changes or expired watches; config left as is");
    } else if dry_run {
        info!("Dry run: not rewriting {}", config.path().display());
    } else {
        config
            .save(&outcome.kept)
            .map_err(AppError::Persistence)?;
    }

    Ok(outcome)
}

fn build_notifier(config: &ConfigFile) -> Box<dyn Notifier> {
    match config.twilio() {
        Ok(Some(settings)) => match TwilioNotifier::new(settings) {
            Ok(notifier) => Box::new(notifier),
            Err(e) => {
                error!("❌ Twilio client setup failed, drops will only be logged: {e}");
                Box::new(LogNotifier)
            }
        },
        Ok(None) => {
            info!("No twilio section configured; drops will only be logged");
            Box::new(LogNotifier)
        }
        Err(e) => {
            error!("❌ {e}; drops will only be logged");
            Box::new(LogNotifier)
        }
    }
}
