// src/domain/watch.rs

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Date format the search form takes, and the one written back to the config.
pub const DATE_FORMAT: &str = "%m-%d-%Y";
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// One monitored trip, as stored in the `flights` list of the config file.
///
/// The two price fields are the notification thresholds: the lowest fare seen
/// so far, or the price the owner originally configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchEntry {
    pub origin_airport: String,
    pub destination_airport: String,

    #[serde(with = "date_field")]
    pub outbound_date: NaiveDate,
    #[serde(
        default,
        with = "optional_date_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub return_date: Option<NaiveDate>,

    #[serde(default = "default_passengers")]
    pub adult_passenger_count: u32,

    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub outbound_flight_number: Option<String>,
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub return_flight_number: Option<String>,

    #[serde(deserialize_with = "whole_dollars")]
    pub outbound_price: u32,
    #[serde(
        default,
        deserialize_with = "optional_whole_dollars",
        skip_serializing_if = "Option::is_none"
    )]
    pub return_price: Option<u32>,

    /// Position in the config file's `flights` list, when loaded from one.
    #[serde(skip)]
    pub slot: Option<usize>,
}

fn default_passengers() -> u32 {
    1
}

/// One direction of travel within a watch entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Leg {
    Outbound,
    Return,
}

impl Leg {
    pub fn label(self) -> &'static str {
        match self {
            Leg::Outbound => "Outbound",
            Leg::Return => "Return",
        }
    }
}

/// How the comparison fare for a leg is picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionMode {
    /// Cheapest fare among rows for this flight number.
    ExactFlight(String),
    /// Cheapest fare on any flight.
    CheapestAny,
}

impl WatchEntry {
    pub fn is_round_trip(&self) -> bool {
        self.return_date.is_some()
    }

    /// True once the outbound date is strictly before `today`. Calendar dates
    /// only; the departure day itself is still watched.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.outbound_date < today
    }

    pub fn flight_number(&self, leg: Leg) -> Option<&str> {
        let number = match leg {
            Leg::Outbound => self.outbound_flight_number.as_deref(),
            Leg::Return => self.return_flight_number.as_deref(),
        };
        number.map(str::trim).filter(|n| !n.is_empty())
    }

    pub fn selection(&self, leg: Leg) -> SelectionMode {
        match self.flight_number(leg) {
            Some(number) => SelectionMode::ExactFlight(number.to_string()),
            None => SelectionMode::CheapestAny,
        }
    }

    pub fn threshold(&self, leg: Leg) -> Option<u32> {
        match leg {
            Leg::Outbound => Some(self.outbound_price),
            Leg::Return => self.return_price,
        }
    }

    pub fn set_threshold(&mut self, leg: Leg, price: u32) {
        match leg {
            Leg::Outbound => self.outbound_price = price,
            Leg::Return => self.return_price = Some(price),
        }
    }

    /// Travel date of a leg. `None` for the return leg of a one-way trip.
    pub fn date(&self, leg: Leg) -> Option<NaiveDate> {
        match leg {
            Leg::Outbound => Some(self.outbound_date),
            Leg::Return => self.return_date,
        }
    }

    /// (from, to) airports for a leg; the return leg flies the route backwards.
    pub fn route(&self, leg: Leg) -> (&str, &str) {
        match leg {
            Leg::Outbound => (&self.origin_airport, &self.destination_airport),
            Leg::Return => (&self.destination_airport, &self.origin_airport),
        }
    }

    /// Replace the travel dates for a one-off run (`--dates`).
    pub fn override_dates(&mut self, outbound: NaiveDate, inbound: NaiveDate) {
        self.outbound_date = outbound;
        self.return_date = Some(inbound);
    }

    /// Normalize airport codes and check the fields serde can't.
    pub fn validate(&mut self) -> Result<(), String> {
        self.origin_airport = normalize_airport(&self.origin_airport)
            .ok_or_else(|| format!("invalid originAirport {:?}", self.origin_airport))?;
        self.destination_airport = normalize_airport(&self.destination_airport).ok_or_else(
            || format!("invalid destinationAirport {:?}", self.destination_airport),
        )?;

        if self.adult_passenger_count == 0 {
            return Err("adultPassengerCount must be at least 1".to_string());
        }

        if let Some(inbound) = self.return_date {
            if inbound < self.outbound_date {
                return Err(format!(
                    "returnDate {} is before outboundDate {}",
                    format_date(inbound),
                    format_date(self.outbound_date)
                ));
            }
        }

        Ok(())
    }

    pub fn describe(&self) -> String {
        match self.return_date {
            Some(inbound) => format!(
                "{}<->{} {} / {}",
                self.origin_airport,
                self.destination_airport,
                format_date(self.outbound_date),
                format_date(inbound)
            ),
            None => format!(
                "{}->{} {}",
                self.origin_airport,
                self.destination_airport,
                format_date(self.outbound_date)
            ),
        }
    }
}

fn normalize_airport(code: &str) -> Option<String> {
    let code = code.trim().to_ascii_uppercase();
    (code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())).then_some(code)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Accepts `MM-DD-YYYY` (the stored format) or ISO `YYYY-MM-DD`.
pub fn parse_date(text: &str) -> Result<NaiveDate, String> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(text, ISO_DATE_FORMAT))
        .map_err(|_| format!("expected a MM-DD-YYYY date, got {text:?}"))
}

// YAML lets flight numbers and prices show up as either numbers or strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(u64),
    Text(String),
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Number(n)) => Some(n.to_string()),
        Some(Scalar::Text(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    })
}

fn dollars_from(scalar: Scalar) -> Result<u32, String> {
    match scalar {
        Scalar::Number(n) => u32::try_from(n).map_err(|_| format!("price {n} out of range")),
        Scalar::Text(s) => {
            let digits = s.trim().trim_start_matches('$').replace(',', "");
            digits
                .parse::<u32>()
                .map_err(|_| format!("expected a whole-dollar price, got {s:?}"))
        }
    }
}

fn whole_dollars<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    dollars_from(Scalar::deserialize(deserializer)?).map_err(serde::de::Error::custom)
}

fn optional_whole_dollars<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Scalar>::deserialize(deserializer)?
        .map(dollars_from)
        .transpose()
        .map_err(serde::de::Error::custom)
}

mod date_field {
    use super::*;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_date(&text).map_err(serde::de::Error::custom)
    }
}

mod optional_date_field {
    use super::*;

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&format_date(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) if !text.trim().is_empty() => {
                parse_date(&text).map(Some).map_err(serde::de::Error::custom)
            }
            _ => Ok(None),
        }
    }
}
