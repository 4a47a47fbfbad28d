// src/domain/selector.rs

use crate::domain::fares::{first_digit_run, FareRow, FareTable};
use crate::domain::watch::SelectionMode;

/// Canonical form for comparing flight numbers: the digits only, without
/// leading zeros. "0123", " 123 " and "#123" all become "123".
pub fn normalize_flight_number(raw: &str) -> String {
    let digits = first_digit_run(raw).unwrap_or_else(|| raw.trim());
    let stripped = digits.trim_start_matches('0');
    if stripped.is_empty() && !digits.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    }
}

/// Pick the fare to compare against a threshold.
///
/// Returns the cheapest matching row. When several rows tie on price, the
/// first one in page order is returned. `None` means the leg can't be judged
/// this run, which is not the same as a price of zero.
pub fn select(table: &FareTable, mode: &SelectionMode) -> Option<FareRow> {
    match mode {
        SelectionMode::ExactFlight(target) => {
            let target = normalize_flight_number(target);
            table
                .iter()
                .filter(|row| normalize_flight_number(&row.flight_number) == target)
                .min_by_key(|row| row.price)
                .cloned()
        }
        SelectionMode::CheapestAny => table.iter().min_by_key(|row| row.price).cloned(),
    }
}
