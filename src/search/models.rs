use crate::domain::fares::RawRow;
use crate::domain::watch::WatchEntry;
use chrono::NaiveDate;

/// Parameters of one fare search. A missing `return_date` means one-way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub origin: String,
    pub destination: String,
    pub outbound_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub adult_passengers: u32,
}

impl SearchQuery {
    pub fn for_entry(entry: &WatchEntry) -> Self {
        Self {
            origin: entry.origin_airport.clone(),
            destination: entry.destination_airport.clone(),
            outbound_date: entry.outbound_date,
            return_date: entry.return_date,
            adult_passengers: entry.adult_passenger_count,
        }
    }

    pub fn is_round_trip(&self) -> bool {
        self.return_date.is_some()
    }
}

/// Unparsed result rows per leg. `inbound` is empty for one-way searches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub outbound: Vec<RawRow>,
    pub inbound: Vec<RawRow>,
}
