use crate::store::{ConfigError, ConfigFile, SearchSettings};
use crate::tests::utils::date;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SAMPLE: &str = r#"
twilio:
  account_sid: AC123
  auth_token: secret
  from: "+15550001111"
  to: "+15550002222"
flights:
  - originAirport: dal
    destinationAirport: HOU
    outboundDate: 05-01-2027
    returnDate: 05-08-2027
    adultPassengerCount: 2
    outboundFlightNumber: 1234
    returnFlightNumber: "0567"
    outboundPrice: 300
    returnPrice: "200"
    note: anniversary
  - originAirport: AUS
    destinationAirport: DEN
    outboundDate: 2027-06-01
    outboundPrice: 150
"#;

fn write_config(text: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("swa-price-drop.yml");
    fs::write(&path, text).expect("write config");
    (dir, path)
}

#[test]
fn loads_entries_with_mixed_scalar_types() {
    let (_dir, path) = write_config(SAMPLE);
    let config = ConfigFile::load(&path).expect("load");
    let entries = config.entries().expect("entries");

    assert_eq!(entries.len(), 2);

    let first = &entries[0];
    assert_eq!(first.origin_airport, "DAL");
    assert_eq!(first.outbound_date, date(2027, 5, 1));
    assert_eq!(first.return_date, Some(date(2027, 5, 8)));
    assert_eq!(first.adult_passenger_count, 2);
    assert_eq!(first.outbound_flight_number.as_deref(), Some("1234"));
    assert_eq!(first.return_flight_number.as_deref(), Some("0567"));
    assert_eq!(first.outbound_price, 300);
    assert_eq!(first.return_price, Some(200));
    assert_eq!(first.slot, Some(0));

    let second = &entries[1];
    assert_eq!(second.outbound_date, date(2027, 6, 1));
    assert_eq!(second.return_date, None);
    assert_eq!(second.adult_passenger_count, 1);
    assert_eq!(second.outbound_flight_number, None);
    assert_eq!(second.slot, Some(1));
}

#[test]
fn reads_twilio_and_search_sections() {
    let config = ConfigFile::parse("mem.yml", SAMPLE).expect("parse");
    let twilio = config.twilio().expect("twilio").expect("present");
    assert_eq!(twilio.account_sid, "AC123");
    assert_eq!(twilio.to, "+15550002222");
    assert_eq!(config.search().expect("search"), SearchSettings::default());

    let tuned = format!("{SAMPLE}search:\n  pauseSecs: 0\n  timeoutSecs: 15\n");
    let search = ConfigFile::parse("mem.yml", &tuned)
        .expect("parse")
        .search()
        .expect("search");
    assert_eq!(search.pause_secs, 0);
    assert_eq!(search.timeout_secs, 15);
    assert_eq!(search.base_url, SearchSettings::default().base_url);
}

#[test]
fn save_patches_prices_and_drops_removed_entries() {
    let (_dir, path) = write_config(SAMPLE);
    let mut config = ConfigFile::load(&path).expect("load");
    let mut entries = config.entries().expect("entries");

    entries[0].outbound_price = 250;
    entries.truncate(1);
    config.save(&entries).expect("save");

    let text = fs::read_to_string(&path).expect("read back");
    assert!(text.contains("note: anniversary"));
    assert!(text.contains("originAirport: dal"));
    assert!(text.contains("outboundPrice: 250"));
    assert!(!text.contains("AUS"));
    assert!(text.find("originAirport").unwrap() < text.find("outboundPrice").unwrap());

    let reloaded = ConfigFile::load(&path).expect("reload");
    let kept = reloaded.entries().expect("entries");
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].outbound_price, 250);
    assert_eq!(kept[0].return_price, Some(200));
    assert!(reloaded.twilio().expect("twilio").is_some());
}

#[test]
fn save_writes_overridden_dates() {
    let (_dir, path) = write_config(SAMPLE);
    let mut config = ConfigFile::load(&path).expect("load");
    let mut entries = config.entries().expect("entries");

    entries[1].override_dates(date(2027, 7, 1), date(2027, 7, 9));
    config.save(&entries).expect("save");

    let kept = ConfigFile::load(&path).expect("reload").entries().expect("entries");
    assert_eq!(kept[1].outbound_date, date(2027, 7, 1));
    assert_eq!(kept[1].return_date, Some(date(2027, 7, 9)));
    assert_eq!(kept[0].outbound_date, date(2027, 5, 1));
}

#[test]
fn save_serializes_entries_not_loaded_from_file() {
    let (_dir, path) = write_config("flights: []\n");
    let mut config = ConfigFile::load(&path).expect("load");
    let entry = crate::tests::utils::one_way("LAS", "OAK", date(2027, 9, 3), 120);

    config.save(&[entry]).expect("save");

    let text = fs::read_to_string(&path).expect("read back");
    assert!(text.contains("09-03-2027"));
    let kept = ConfigFile::load(&path).expect("reload").entries().expect("entries");
    assert_eq!(kept[0].origin_airport, "LAS");
    assert_eq!(kept[0].outbound_price, 120);
}

#[test]
fn missing_config_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = ConfigFile::load(dir.path().join("nope.yml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn save_into_missing_directory_fails() {
    let mut config = ConfigFile::parse("/definitely/not/here/watch.yml", SAMPLE).expect("parse");
    let entries = config.entries().expect("entries");
    assert!(matches!(config.save(&entries), Err(ConfigError::Io(_))));
}

#[test]
fn rejects_bad_entries() {
    let cases = [
        "flights:\n  - {originAirport: DALLAS, destinationAirport: HOU, outboundDate: 05-01-2027, outboundPrice: 1}\n",
        "flights:\n  - {originAirport: DAL, destinationAirport: HOU, outboundDate: 05-01-2027, outboundPrice: 1, adultPassengerCount: 0}\n",
        "flights:\n  - {originAirport: DAL, destinationAirport: HOU, outboundDate: May 1, outboundPrice: 1}\n",
        "flights:\n  - {originAirport: DAL, destinationAirport: HOU, outboundDate: 05-01-2027, outboundPrice: cheap}\n",
        "flights:\n  - {originAirport: DAL, destinationAirport: HOU, outboundDate: 05-08-2027, returnDate: 05-01-2027, outboundPrice: 1}\n",
    ];

    for text in cases {
        let config = ConfigFile::parse("mem.yml", text).expect("parse");
        assert!(
            matches!(config.entries(), Err(ConfigError::Invalid(_))),
            "should reject {text}"
        );
    }
}

#[test]
fn rejects_documents_without_a_flight_list() {
    assert!(matches!(
        ConfigFile::parse("mem.yml", "twilio: {}\n"),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        ConfigFile::parse("mem.yml", "flights: nope\n"),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        ConfigFile::parse("mem.yml", "- just\n- a list\n"),
        Err(ConfigError::Invalid(_))
    ));
}
