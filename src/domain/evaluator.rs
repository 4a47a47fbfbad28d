// src/domain/evaluator.rs

use crate::domain::fares::{FareRow, FareTable};
use crate::domain::selector::select;
use crate::domain::watch::{format_date, Leg, SelectionMode, WatchEntry};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

/// Fare tables for both legs of one search. `inbound` stays empty for one-way trips.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegTables {
    pub outbound: FareTable,
    pub inbound: FareTable,
}

impl LegTables {
    pub fn table(&self, leg: Leg) -> &FareTable {
        match leg {
            Leg::Outbound => &self.outbound,
            Leg::Return => &self.inbound,
        }
    }
}

/// A leg whose selected fare came in strictly under its threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceDrop {
    pub leg: Leg,
    pub new_price: u32,
    pub old_price: u32,
    /// Flight the new price was seen on.
    pub flight_number: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegOutcome {
    /// Not evaluated: entry expired, one-way trip, or no threshold for the leg.
    Skipped,
    /// The search returned nothing usable for this leg.
    NoFare,
    /// A fare was found but it is not under the threshold.
    Unchanged { fare: u32, threshold: u32 },
    Dropped(PriceDrop),
}

impl LegOutcome {
    pub fn price_drop(&self) -> Option<&PriceDrop> {
        match self {
            LegOutcome::Dropped(drop) => Some(drop),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationDecision {
    pub expired: bool,
    pub outbound: LegOutcome,
    pub inbound: LegOutcome,
    /// Input entry with any lowered thresholds applied.
    pub updated_entry: WatchEntry,
}

impl EvaluationDecision {
    pub fn outbound_drop(&self) -> Option<&PriceDrop> {
        self.outbound.price_drop()
    }

    pub fn return_drop(&self) -> Option<&PriceDrop> {
        self.inbound.price_drop()
    }

    /// Drops in notification order: outbound, then return.
    pub fn drops(&self) -> impl Iterator<Item = &PriceDrop> {
        self.outbound_drop().into_iter().chain(self.return_drop())
    }
}

/// Decide what a fresh search means for one watch entry.
///
/// Expired entries short-circuit before any fare is looked at. Otherwise each
/// leg is judged on its own, and a leg only changes when its selected fare is
/// strictly below the stored threshold.
pub fn evaluate(entry: &WatchEntry, tables: &LegTables, today: NaiveDate) -> EvaluationDecision {
    if entry.is_expired(today) {
        info!(
            "Removing {} from future checks because it is past {}",
            entry.describe(),
            format_date(entry.outbound_date)
        );
        return EvaluationDecision {
            expired: true,
            outbound: LegOutcome::Skipped,
            inbound: LegOutcome::Skipped,
            updated_entry: entry.clone(),
        };
    }

    let mut updated = entry.clone();
    let outbound = evaluate_leg(entry, Leg::Outbound, tables.table(Leg::Outbound));
    let inbound = if entry.is_round_trip() {
        evaluate_leg(entry, Leg::Return, tables.table(Leg::Return))
    } else {
        LegOutcome::Skipped
    };

    for found in [&outbound, &inbound].into_iter().filter_map(LegOutcome::price_drop) {
        updated.set_threshold(found.leg, found.new_price);
    }

    EvaluationDecision {
        expired: false,
        outbound,
        inbound,
        updated_entry: updated,
    }
}

fn evaluate_leg(entry: &WatchEntry, leg: Leg, table: &FareTable) -> LegOutcome {
    let Some(threshold) = entry.threshold(leg) else {
        warn!(
            "No {} price configured for {}, skipping that leg",
            leg.label().to_lowercase(),
            entry.describe()
        );
        return LegOutcome::Skipped;
    };

    let mode = entry.selection(leg);
    if table.is_empty() {
        info!(
            "No {} fares listed for {}, threshold stays at ${threshold}",
            leg.label().to_lowercase(),
            entry.describe()
        );
        return LegOutcome::NoFare;
    }
    let Some(fare) = select(table, &mode) else {
        info!(
            "No {} fares found for {} ({}), threshold stays at ${threshold}",
            leg.label().to_lowercase(),
            mode_label(&mode),
            entry.describe()
        );
        return LegOutcome::NoFare;
    };

    debug!(
        "Lowest {} price for {} is ${} on flight #{} (threshold ${threshold})",
        leg.label().to_lowercase(),
        mode_label(&mode),
        fare.price,
        fare.flight_number
    );

    if fare.price < threshold {
        let message = drop_message(entry, leg, &mode, &fare, threshold);
        LegOutcome::Dropped(PriceDrop {
            leg,
            new_price: fare.price,
            old_price: threshold,
            flight_number: fare.flight_number,
            message,
        })
    } else {
        LegOutcome::Unchanged {
            fare: fare.price,
            threshold,
        }
    }
}

fn mode_label(mode: &SelectionMode) -> String {
    match mode {
        SelectionMode::ExactFlight(number) => format!("flight #{number}"),
        SelectionMode::CheapestAny => "cheapest available".to_string(),
    }
}

/// Text sent to the owner for a drop, e.g.
/// `Price Drop: Outbound flight #1234 DAL->HOU on 05-01-2027 is now $199 (was $250)`.
pub fn drop_message(
    entry: &WatchEntry,
    leg: Leg,
    mode: &SelectionMode,
    fare: &FareRow,
    old_price: u32,
) -> String {
    let (from, to) = entry.route(leg);
    let flight = match mode {
        SelectionMode::ExactFlight(number) => format!("flight #{number}"),
        SelectionMode::CheapestAny => {
            format!("cheapest available (flight #{})", fare.flight_number)
        }
    };
    let date = entry
        .date(leg)
        .map(format_date)
        .unwrap_or_default();

    format!(
        "Price Drop: {} {flight} {from}->{to} on {date} is now ${} (was ${old_price})",
        leg.label(),
        fare.price
    )
}
