// src/store/config_file.rs

use crate::domain::watch::{format_date, WatchEntry};
use crate::store::{ConfigError, SearchSettings, TwilioSettings};
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const FLIGHTS: &str = "flights";
const TWILIO: &str = "twilio";
const SEARCH: &str = "search";

/// The YAML config file: watch list plus channel and search settings.
///
/// The parsed document is kept as-is so a rewrite only touches the `flights`
/// list, and within it only the fields a run can change.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    document: Mapping,
}

impl ConfigFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("read {}: {e}", path.display())))?;
        Self::parse(path, &text)
    }

    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Result<Self, ConfigError> {
        let document = match serde_yaml::from_str::<Value>(text)? {
            Value::Mapping(map) => map,
            _ => return Err(ConfigError::Invalid("top level must be a mapping".into())),
        };

        match document.get(FLIGHTS) {
            Some(Value::Sequence(_)) => {}
            Some(_) => return Err(ConfigError::Invalid("`flights` must be a list".into())),
            None => return Err(ConfigError::Invalid("missing `flights` list".into())),
        }

        Ok(Self {
            path: path.into(),
            document,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flights(&self) -> &[Value] {
        match self.document.get(FLIGHTS) {
            Some(Value::Sequence(seq)) => seq.as_slice(),
            _ => &[],
        }
    }

    fn section<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        match self.document.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_yaml::from_value(value.clone())
                .map(Some)
                .map_err(|e| ConfigError::Invalid(format!("`{key}`: {e}"))),
        }
    }

    /// Parsed, validated watch entries in file order.
    pub fn entries(&self) -> Result<Vec<WatchEntry>, ConfigError> {
        self.flights()
            .iter()
            .enumerate()
            .map(|(slot, raw)| {
                let mut entry: WatchEntry = serde_yaml::from_value(raw.clone())
                    .map_err(|e| ConfigError::Invalid(format!("flight #{}: {e}", slot + 1)))?;
                entry
                    .validate()
                    .map_err(|e| ConfigError::Invalid(format!("flight #{}: {e}", slot + 1)))?;
                entry.slot = Some(slot);
                Ok(entry)
            })
            .collect()
    }

    pub fn twilio(&self) -> Result<Option<TwilioSettings>, ConfigError> {
        self.section(TWILIO)
    }

    pub fn search(&self) -> Result<SearchSettings, ConfigError> {
        Ok(self.section(SEARCH)?.unwrap_or_default())
    }

    /// Replace the watch list with `kept` and write the file.
    ///
    /// Entries loaded from this file are patched in their original mapping,
    /// so key order, formatting of untouched values and unknown keys survive.
    pub fn save(&mut self, kept: &[WatchEntry]) -> Result<(), ConfigError> {
        let originals = self.flights().to_vec();

        let flights = kept
            .iter()
            .map(|entry| match entry.slot.and_then(|slot| originals.get(slot)) {
                Some(Value::Mapping(raw)) => Ok(patch_entry(raw.clone(), entry)),
                _ => serde_yaml::to_value(entry).map_err(ConfigError::from),
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.document
            .insert(Value::from(FLIGHTS), Value::Sequence(flights));
        let text = serde_yaml::to_string(&self.document)?;
        write_atomic(&self.path, &text)?;

        info!(
            "✅ Rewrote {} with {} watch(es)",
            self.path.display(),
            kept.len()
        );
        Ok(())
    }
}

fn price_value(price: u32) -> Value {
    Value::Number(u64::from(price).into())
}

/// Write back only the fields that differ from what the mapping already says.
fn patch_entry(mut raw: Mapping, entry: &WatchEntry) -> Value {
    let stored: Option<WatchEntry> = serde_yaml::from_value(Value::Mapping(raw.clone())).ok();
    let stored = stored.as_ref();

    if stored.map(|s| s.outbound_date) != Some(entry.outbound_date) {
        raw.insert(
            Value::from("outboundDate"),
            Value::from(format_date(entry.outbound_date)),
        );
    }
    if let Some(date) = entry.return_date {
        if stored.and_then(|s| s.return_date) != Some(date) {
            raw.insert(Value::from("returnDate"), Value::from(format_date(date)));
        }
    }
    if stored.map(|s| s.outbound_price) != Some(entry.outbound_price) {
        raw.insert(Value::from("outboundPrice"), price_value(entry.outbound_price));
    }
    if let Some(price) = entry.return_price {
        if stored.and_then(|s| s.return_price) != Some(price) {
            raw.insert(Value::from("returnPrice"), price_value(price));
        }
    }

    Value::Mapping(raw)
}

/// Write next to the target, then rename over it.
fn write_atomic(path: &Path, text: &str) -> Result<(), ConfigError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, text)
        .map_err(|e| ConfigError::Io(format!("write {}: {e}", tmp.display())))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        ConfigError::Io(format!("replace {}: {e}", path.display()))
    })
}
