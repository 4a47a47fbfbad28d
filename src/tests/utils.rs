use crate::domain::fares::{FareRow, FareTable, RawRow};
use crate::domain::selector::select;
use crate::domain::watch::{SelectionMode, WatchEntry};
use crate::notify::{Notifier, NotifyError};
use crate::search::{SearchError, SearchProvider, SearchQuery, SearchResults};
use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::VecDeque;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// Fixed "today" for evaluation tests.
pub fn today() -> NaiveDate {
    date(2027, 3, 1)
}

pub fn one_way(origin: &str, destination: &str, outbound: NaiveDate, price: u32) -> WatchEntry {
    WatchEntry {
        origin_airport: origin.to_string(),
        destination_airport: destination.to_string(),
        outbound_date: outbound,
        return_date: None,
        adult_passenger_count: 1,
        outbound_flight_number: None,
        return_flight_number: None,
        outbound_price: price,
        return_price: None,
        slot: None,
    }
}

pub fn round_trip(
    origin: &str,
    destination: &str,
    outbound: NaiveDate,
    inbound: NaiveDate,
    outbound_price: u32,
    return_price: u32,
) -> WatchEntry {
    WatchEntry {
        return_date: Some(inbound),
        return_price: Some(return_price),
        ..one_way(origin, destination, outbound, outbound_price)
    }
}

pub fn with_flights(mut entry: WatchEntry, outbound: &str, inbound: Option<&str>) -> WatchEntry {
    entry.outbound_flight_number = Some(outbound.to_string());
    entry.return_flight_number = inbound.map(str::to_string);
    entry
}

pub fn fare(flight: &str, price: u32) -> FareRow {
    FareRow {
        flight_number: flight.to_string(),
        price,
    }
}

pub fn table(rows: &[(&str, u32)]) -> FareTable {
    FareTable::from(
        rows.iter()
            .map(|(flight, price)| fare(flight, *price))
            .collect::<Vec<_>>(),
    )
}

pub fn raw(flight_text: &str, prices: &[&str]) -> RawRow {
    RawRow {
        flight_text: flight_text.to_string(),
        price_tokens: prices.iter().map(|p| p.to_string()).collect(),
    }
}

/// Price of the selected fare, for tests that don't care which flight won.
pub fn select_price(table: &FareTable, mode: &SelectionMode) -> Option<u32> {
    select(table, mode).map(|row| row.price)
}

/// Hands out canned search results in call order and remembers every query.
#[derive(Default)]
pub struct StubProvider {
    responses: RefCell<VecDeque<Result<SearchResults, SearchError>>>,
    pub queries: RefCell<Vec<SearchQuery>>,
}

impl StubProvider {
    pub fn new(responses: Vec<Result<SearchResults, SearchError>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            queries: RefCell::new(Vec::new()),
        }
    }
}

impl SearchProvider for StubProvider {
    fn search(&self, query: &SearchQuery) -> Result<SearchResults, SearchError> {
        self.queries.borrow_mut().push(query.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(SearchResults::default()))
    }
}

pub fn results(outbound: Vec<RawRow>, inbound: Vec<RawRow>) -> Result<SearchResults, SearchError> {
    Ok(SearchResults { outbound, inbound })
}

/// Records every message; optionally fails the ones containing `fail_on`.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: RefCell<Vec<String>>,
    pub fail_on: Option<String>,
}

impl Notifier for RecordingNotifier {
    fn send(&self, body: &str) -> Result<(), NotifyError> {
        if let Some(pattern) = &self.fail_on {
            if body.contains(pattern.as_str()) {
                return Err(NotifyError::ApiError("simulated failure".into()));
            }
        }
        self.sent.borrow_mut().push(body.to_string());
        Ok(())
    }
}
