use crate::check_watches;
use crate::errors::AppError;
use crate::search::SearchError;
use crate::store::{ConfigError, ConfigFile};
use crate::tests::utils::{raw, results, today, RecordingNotifier, StubProvider};
use std::fs;

const WATCH_LIST: &str = r#"
flights:
  - originAirport: DAL
    destinationAirport: HOU
    outboundDate: 05-01-2027
    outboundFlightNumber: 1234
    outboundPrice: 300
"#;

#[test]
fn only_a_failed_save_maps_to_exit_code_two() {
    assert_eq!(AppError::Persistence(ConfigError::Io("disk full".into())).exit_code(), 2);

    assert_eq!(AppError::Config(ConfigError::Invalid("no flights".into())).exit_code(), 1);
    assert_eq!(AppError::Search(SearchError::Network("no route".into())).exit_code(), 1);
    assert_eq!(AppError::Logging("read-only dir".into()).exit_code(), 1);
}

#[test]
fn drop_is_still_sent_when_the_config_cannot_be_saved() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("swa-price-drop.yml");
    let mut config = ConfigFile::parse(&path, WATCH_LIST).expect("parse");
    let entries = config.entries().expect("entries");
    drop(dir);

    let provider = StubProvider::new(vec![results(vec![raw("# 1234", &["$250"])], vec![])]);
    let notifier = RecordingNotifier::default();

    let result = check_watches(&mut config, &entries, &provider, &notifier, today(), false);

    assert_eq!(notifier.sent.borrow().len(), 1);
    assert!(notifier.sent.borrow()[0].contains("is now $250 (was $300)"));
    let err = result.expect_err("save into a removed directory must fail");
    assert!(matches!(err, AppError::Persistence(ConfigError::Io(_))), "got {err:?}");
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn search_and_notification_failures_do_not_fail_the_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("swa-price-drop.yml");
    fs::write(&path, WATCH_LIST).expect("write config");
    let mut config = ConfigFile::load(&path).expect("load");
    let entries = config.entries().expect("entries");

    let provider = StubProvider::new(vec![Err(SearchError::Blocked("HTTP 403".into()))]);
    let outcome = check_watches(
        &mut config,
        &entries,
        &provider,
        &RecordingNotifier::default(),
        today(),
        false,
    )
    .expect("a failed search is not fatal");
    assert_eq!(outcome.failed_searches, 1);

    let provider = StubProvider::new(vec![results(vec![raw("# 1234", &["$250"])], vec![])]);
    let notifier = RecordingNotifier {
        fail_on: Some("Price Drop".into()),
        ..Default::default()
    };
    let outcome = check_watches(&mut config, &entries, &provider, &notifier, today(), false)
        .expect("a failed SMS is not fatal");
    assert_eq!(outcome.notifications.len(), 1);
    assert!(notifier.sent.borrow().is_empty());

    let saved = fs::read_to_string(&path).expect("read config");
    assert!(saved.contains("outboundPrice: 250"), "got {saved}");
}

#[test]
fn dry_run_leaves_the_config_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("swa-price-drop.yml");
    fs::write(&path, WATCH_LIST).expect("write config");
    let mut config = ConfigFile::load(&path).expect("load");
    let entries = config.entries().expect("entries");

    let provider = StubProvider::new(vec![results(vec![raw("# 1234", &["$250"])], vec![])]);
    let outcome = check_watches(
        &mut config,
        &entries,
        &provider,
        &RecordingNotifier::default(),
        today(),
        true,
    )
    .expect("dry run");

    assert!(outcome.needs_persist());
    assert_eq!(fs::read_to_string(&path).expect("read config"), WATCH_LIST);
}
