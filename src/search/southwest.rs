// southwest.rs
use crate::domain::fares::RawRow;
use crate::domain::watch::format_date;
use crate::search::{SearchError, SearchProvider, SearchQuery, SearchResults};
use crate::store::SearchSettings;
use rand::Rng;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use scraper::{ElementRef, Html, Selector};
use std::cell::Cell;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

const BOOKING_FORM: &str = ".booking-form--form";
const OUTBOUND_TABLE: &str = "faresOutbound";
const RETURN_TABLE: &str = "faresReturn";
const FLIGHT_CELL: &str = ".js-flight-performance";
const PRICE_CELL: &str = ".product_price";

/// Fare search against southwest.com: load the landing page, submit its
/// booking form, and read the fare tables out of the result page.
pub struct SouthwestProvider {
    client: Client,
    settings: SearchSettings,
    last_search: Cell<Option<Instant>>,
}

impl SouthwestProvider {
    pub fn new(settings: SearchSettings) -> Result<Self, SearchError> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .cookie_store(true)
            .build()
            .map_err(|e| SearchError::Network(e.to_string()))?;

        Ok(Self {
            client,
            settings,
            last_search: Cell::new(None),
        })
    }

    /// Keep consecutive searches apart; the site throttles bursts.
    fn pace(&self) {
        if let Some(previous) = self.last_search.get() {
            let jitter = if self.settings.jitter_secs > 0 {
                rand::thread_rng().gen_range(0..=self.settings.jitter_secs)
            } else {
                0
            };
            let gap = Duration::from_secs(self.settings.pause_secs + jitter);
            let elapsed = previous.elapsed();
            if elapsed < gap {
                std::thread::sleep(gap - elapsed);
            }
        }
        self.last_search.set(Some(Instant::now()));
    }

    fn fetch_text(&self, request: reqwest::blocking::RequestBuilder) -> Result<String, SearchError> {
        let resp = request.send()?;
        let status = resp.status();
        let text = resp.text()?;

        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SearchError::Blocked(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(SearchError::Network(format!("HTTP {status}")));
        }
        Ok(text)
    }

    /// Where the booking form posts to, plus the hidden fields it carries.
    fn booking_form(&self) -> Result<(Url, Vec<(String, String)>), SearchError> {
        let base = Url::parse(&self.settings.base_url)
            .map_err(|e| SearchError::Network(format!("bad base url: {e}")))?;
        let html = self.fetch_text(self.client.get(base.clone()))?;

        let form = parse_booking_form(&html, &base)?;
        match form {
            Some(form) => Ok(form),
            None => {
                debug!(
                    "No booking form on {}, posting to {}",
                    base, self.settings.search_path
                );
                let action = base
                    .join(&self.settings.search_path)
                    .map_err(|e| SearchError::Network(format!("bad search path: {e}")))?;
                Ok((action, Vec::new()))
            }
        }
    }
}

impl SearchProvider for SouthwestProvider {
    fn search(&self, query: &SearchQuery) -> Result<SearchResults, SearchError> {
        self.pace();

        info!(
            "Checking southwest.com for {}->{} out {} back {} ({} adult(s))",
            query.origin,
            query.destination,
            format_date(query.outbound_date),
            query.return_date.map(format_date).unwrap_or_else(|| "-".into()),
            query.adult_passengers
        );

        let start = Instant::now();
        let (action, mut fields) = self.booking_form()?;
        for (name, value) in form_fields(query) {
            fields.retain(|(existing, _)| existing != name);
            fields.push((name.to_string(), value));
        }

        let html = self.fetch_text(self.client.post(action).form(&fields))?;
        let results = parse_results(&html, query.is_round_trip())?;

        debug!(
            "Search finished in {:?}: {} outbound row(s), {} return row(s)",
            start.elapsed(),
            results.outbound.len(),
            results.inbound.len()
        );
        Ok(results)
    }
}

/// Booking form field values for a query, as the site's own form sends them.
pub fn form_fields(query: &SearchQuery) -> Vec<(&'static str, String)> {
    let (two_way, return_airport, return_date) = match query.return_date {
        Some(date) => ("true", "RoundTrip", format_date(date)),
        None => ("false", "", String::new()),
    };

    vec![
        ("twoWayTrip", two_way.to_string()),
        ("airTranRedirect", String::new()),
        ("returnAirport", return_airport.to_string()),
        ("outboundTimeOfDay", "ANYTIME".to_string()),
        ("returnTimeOfDay", "ANYTIME".to_string()),
        ("seniorPassengerCount", "0".to_string()),
        ("fareType", "DOLLARS".to_string()),
        ("originAirport", query.origin.clone()),
        ("destinationAirport", query.destination.clone()),
        ("outboundDateString", format_date(query.outbound_date)),
        ("returnDateString", return_date),
        ("adultPassengerCount", query.adult_passengers.to_string()),
    ]
}

fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::HtmlParse(e.to_string()))
}

/// Text of a cell with markup stripped and whitespace collapsed, so
/// `$<span>249</span>` reads as `$249`.
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Action URL and hidden inputs of the booking form, if the page has one.
pub fn parse_booking_form(
    html: &str,
    page_url: &Url,
) -> Result<Option<(Url, Vec<(String, String)>)>, SearchError> {
    let document = Html::parse_document(html);
    let form_sel = selector(BOOKING_FORM)?;
    let hidden_sel = selector(r#"input[type="hidden"]"#)?;

    let Some(form) = document.select(&form_sel).next() else {
        return Ok(None);
    };
    let Some(action) = form.value().attr("action") else {
        return Ok(None);
    };
    let action = page_url
        .join(action)
        .map_err(|e| SearchError::HtmlParse(format!("bad form action {action:?}: {e}")))?;

    let hidden = form
        .select(&hidden_sel)
        .filter_map(|input| {
            let name = input.value().attr("name")?;
            let value = input.value().attr("value").unwrap_or_default();
            Some((name.to_string(), value.to_string()))
        })
        .collect();

    Ok(Some((action, hidden)))
}

/// Rows of the fare table with the given element id. A missing table yields
/// no rows.
pub fn extract_rows(html: &Html, table_id: &str) -> Result<Vec<RawRow>, SearchError> {
    let row_sel = selector(&format!("table#{table_id} tbody tr"))?;
    let flight_sel = selector(FLIGHT_CELL)?;
    let price_sel = selector(PRICE_CELL)?;

    let rows = html
        .select(&row_sel)
        .map(|row| RawRow {
            flight_text: row.select(&flight_sel).map(cell_text).collect::<Vec<_>>().join(" "),
            price_tokens: row.select(&price_sel).map(cell_text).collect(),
        })
        .collect();

    Ok(rows)
}

pub fn parse_results(html: &str, round_trip: bool) -> Result<SearchResults, SearchError> {
    let document = Html::parse_document(html);
    let outbound = extract_rows(&document, OUTBOUND_TABLE)?;
    let inbound = if round_trip {
        extract_rows(&document, RETURN_TABLE)?
    } else {
        Vec::new()
    };

    Ok(SearchResults { outbound, inbound })
}
