// src/domain/coordinator.rs

use crate::domain::evaluator::{evaluate, LegTables};
use crate::domain::fares::FareTable;
use crate::domain::watch::WatchEntry;
use crate::search::{SearchProvider, SearchQuery};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

/// What one pass over the watch list produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    /// Drop messages, in entry order, outbound before return.
    pub notifications: Vec<String>,
    /// Surviving entries in input order, with lowered thresholds applied.
    pub kept: Vec<WatchEntry>,
    /// Entries removed because their outbound date has passed.
    pub dropped: usize,
    /// Entries whose search failed and were judged on empty tables.
    pub failed_searches: usize,
    changed: bool,
}

impl RunOutcome {
    /// True when the stored list no longer matches what was loaded.
    pub fn needs_persist(&self) -> bool {
        self.changed || self.dropped > 0
    }
}

/// Search and evaluate every entry, one at a time, in input order.
///
/// A failed search only affects its own entry: both legs are treated as
/// having no fares and the run moves on. Expired entries are never searched.
pub fn run(entries: &[WatchEntry], provider: &dyn SearchProvider, today: NaiveDate) -> RunOutcome {
    let mut outcome = RunOutcome::default();

    for entry in entries {
        let tables = if entry.is_expired(today) {
            LegTables::default()
        } else {
            fetch_tables(entry, provider, &mut outcome.failed_searches)
        };

        let decision = evaluate(entry, &tables, today);
        if decision.expired {
            outcome.dropped += 1;
            continue;
        }

        outcome
            .notifications
            .extend(decision.drops().map(|d| d.message.clone()));
        if decision.updated_entry != *entry {
            outcome.changed = true;
        }
        outcome.kept.push(decision.updated_entry);
    }

    info!(
        "Checked {} watch(es): {} price drop(s), {} expired, {} failed search(es)",
        entries.len(),
        outcome.notifications.len(),
        outcome.dropped,
        outcome.failed_searches
    );

    outcome
}

fn fetch_tables(
    entry: &WatchEntry,
    provider: &dyn SearchProvider,
    failures: &mut usize,
) -> LegTables {
    match provider.search(&SearchQuery::for_entry(entry)) {
        Ok(results) => {
            let tables = LegTables {
                outbound: FareTable::from_rows(&results.outbound),
                inbound: if entry.is_round_trip() {
                    FareTable::from_rows(&results.inbound)
                } else {
                    FareTable::default()
                },
            };
            debug!(
                "{}: {} outbound fare(s), {} return fare(s)",
                entry.describe(),
                tables.outbound.len(),
                tables.inbound.len()
            );
            tables
        }
        Err(e) => {
            *failures += 1;
            warn!("⚠️ Search failed for {}: {e}", entry.describe());
            LegTables::default()
        }
    }
}
