// src/domain/fares.rs

use crate::logging::FARE_TARGET;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// One result row as the search page renders it, before any parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// Text of the flight-identifier cell, e.g. "# 1234 Nonstop".
    pub flight_text: String,
    /// Text of each fare-class price cell, e.g. "$249".
    pub price_tokens: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FareRow {
    pub flight_number: String,
    /// Whole dollars.
    pub price: u32,
}

/// Parsed fares for one leg of one search, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FareTable {
    rows: Vec<FareRow>,
}

impl FareTable {
    pub fn from_rows(raw: &[RawRow]) -> Self {
        let rows = raw.iter().flat_map(parse_row).collect();
        Self { rows }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FareRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<FareRow>> for FareTable {
    fn from(rows: Vec<FareRow>) -> Self {
        Self { rows }
    }
}

fn digit_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("valid digit regex"))
}

fn dollar_amount() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$(\d{1,3}(?:,\d{3})+|\d+)").expect("valid dollar regex")
    })
}

/// First run of ASCII digits in `text`.
pub fn first_digit_run(text: &str) -> Option<&str> {
    digit_run().find(text).map(|m| m.as_str())
}

/// Every `$<digits>` amount in `text`, in order. Thousands separators are dropped.
pub fn dollar_amounts(text: &str) -> Vec<u32> {
    dollar_amount()
        .captures_iter(text)
        .filter_map(|caps| match caps[1].replace(',', "").parse::<u32>() {
            Ok(amount) => Some(amount),
            Err(e) => {
                debug!(target: FARE_TARGET, "Skipping price {:?}: {e}", &caps[0]);
                None
            }
        })
        .collect()
}

/// Turn one result row into one `FareRow` per price on it.
///
/// An empty result means the row didn't parse: there was no flight number,
/// or no dollar amount anywhere in its price cells.
pub fn parse_row(row: &RawRow) -> Vec<FareRow> {
    let Some(flight_number) = first_digit_run(&row.flight_text) else {
        return Vec::new();
    };

    row.price_tokens
        .iter()
        .flat_map(|token| dollar_amounts(token))
        .map(|price| {
            debug!(target: FARE_TARGET, "Found price ${price} for flight #{flight_number}");
            FareRow {
                flight_number: flight_number.to_string(),
                price,
            }
        })
        .collect()
}
