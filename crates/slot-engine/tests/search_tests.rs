//! End-to-end tests for the build → subtract → render pipeline.

use std::cell::Cell;

use chrono::NaiveDate;
use slot_engine::freebusy::{BusyMap, FreeBusyQuery, FreeBusySource, PersonBusy};
use slot_engine::{find_free_slots, run, BusyInterval, Result, SearchConfig, SlotError};

// ── Helpers ─────────────────────────────────────────────────────────────────

/// A source that answers with canned data and counts how often it was asked.
struct Canned {
    busy: BusyMap,
    calls: Cell<usize>,
    last_query: Cell<Option<usize>>,
}

impl Canned {
    fn new(busy: BusyMap) -> Self {
        Self {
            busy,
            calls: Cell::new(0),
            last_query: Cell::new(None),
        }
    }
}

impl FreeBusySource for Canned {
    fn query(&self, query: &FreeBusyQuery) -> Result<BusyMap> {
        self.calls.set(self.calls.get() + 1);
        self.last_query.set(Some(query.items.len()));
        Ok(self.busy.clone())
    }
}

struct Failing;

impl FreeBusySource for Failing {
    fn query(&self, _query: &FreeBusyQuery) -> Result<BusyMap> {
        Err(SlotError::QueryFailure("connection reset".to_string()))
    }
}

fn monday_config() -> SearchConfig {
    let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
    SearchConfig {
        start_date: monday,
        end_date: monday,
        viewer: "+1".parse().unwrap(),
        people: vec!["alice".to_string(), "bob".to_string()],
        domain: Some("example.com".to_string()),
        ..SearchConfig::default()
    }
}

fn alice_busy_nine_to_ten() -> BusyMap {
    vec![PersonBusy {
        person: "alice@example.com".to_string(),
        busy: vec![BusyInterval::parse("2024-01-08T09:00:00+01:00", "2024-01-08T10:00:00+01:00").unwrap()],
    }]
}

// ── Pipeline ────────────────────────────────────────────────────────────────

#[test]
fn monday_scenario_end_to_end() {
    let source = Canned::new(alice_busy_nine_to_ten());
    let free = find_free_slots(&monday_config(), &source).unwrap();

    assert_eq!(free.len(), 24);
    assert_eq!(source.calls.get(), 1);
    assert_eq!(source.last_query.get(), Some(2));

    let report = run(&monday_config(), &source).unwrap();
    let slot_lines: Vec<&str> = report.lines().filter(|l| l.ends_with("(Monday)")).collect();
    assert_eq!(slot_lines.len(), 18);
    assert!(slot_lines[0].starts_with("2024-01-08   08:00 UTC+1"));
    assert!(slot_lines[2].contains("10:00 UTC+1"));
}

#[test]
fn extra_offset_does_not_change_survivors() {
    let source = Canned::new(alice_busy_nine_to_ten());
    let plain = run(&monday_config(), &source).unwrap();

    let config = SearchConfig {
        extra: vec!["+5".parse().unwrap()],
        ..monday_config()
    };
    let with_extra = run(&config, &source).unwrap();

    assert_eq!(plain.lines().count(), with_extra.lines().count());
    assert!(with_extra.contains("2024-01-08   08:00 UTC+1   12:00 UTC+5 (Monday)"));
    assert!(with_extra.contains("             16:30 UTC+1   20:30 UTC+5 (Monday)"));
}

#[test]
fn no_busy_data_renders_whole_filtered_grid() {
    let source = Canned::new(vec![]);
    let report = run(&monday_config(), &source).unwrap();
    assert_eq!(report.lines().filter(|l| l.ends_with("(Monday)")).count(), 18);
}

// ── Errors ──────────────────────────────────────────────────────────────────

#[test]
fn bad_config_fails_before_querying() {
    let source = Canned::new(vec![]);
    let config = SearchConfig {
        end_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        ..monday_config()
    };

    let err = find_free_slots(&config, &source).unwrap_err();
    assert!(matches!(err, SlotError::InvalidDateRange { .. }));
    assert_eq!(source.calls.get(), 0);

    let config = SearchConfig {
        no_earlier: 30,
        ..monday_config()
    };
    assert!(matches!(
        find_free_slots(&config, &source),
        Err(SlotError::InvalidHourFilter(_))
    ));
    assert_eq!(source.calls.get(), 0);
}

#[test]
fn invalid_granularity_in_config_document_is_rejected() {
    let json = r#"{"start_date": "2024-01-08", "end_date": "2024-01-08", "granularity_hours": 0.7}"#;
    assert!(serde_json::from_str::<SearchConfig>(json).is_err());

    let json = r#"{"start_date": "2024-01-08", "end_date": "2024-01-08",
        "granularity_hours": 0.25, "viewer_utc_offset": "-3", "extra_utc_offsets": ["+9"]}"#;
    let config: SearchConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.granularity.minutes(), 15);
    assert_eq!(config.viewer.hours(), -3);
    assert_eq!(config.extra.len(), 1);
    assert_eq!(config.no_later, 17);
}

#[test]
fn query_failure_aborts_run() {
    let err = run(&monday_config(), &Failing).unwrap_err();
    assert!(matches!(err, SlotError::QueryFailure(_)));
    assert!(err.to_string().contains("connection reset"));
}
