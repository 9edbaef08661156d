//! Tests for free-slot rendering: filters, date de-duplication, extra offsets.

use chrono::NaiveDate;
use slot_engine::grid::{build_grid, FreeList, GridSpec, WorkingHours};
use slot_engine::render::{render_lines, render_report, RenderOptions};
use slot_engine::subtract::subtract_interval;
use slot_engine::{BusyInterval, Granularity, SlotError, UtcOffset};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn grid(start: (i32, u32, u32), end: (i32, u32, u32)) -> FreeList {
    build_grid(&GridSpec {
        start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
        end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        hours: WorkingHours::default(),
        granularity: Granularity::HALF_HOUR,
        anchor: offset("+1"),
    })
    .unwrap()
}

fn offset(raw: &str) -> UtcOffset {
    raw.parse().unwrap()
}

fn options() -> RenderOptions {
    RenderOptions {
        viewer: offset("+1"),
        extra: vec![],
        no_earlier: 8,
        no_later: 17,
        show_weekend: false,
    }
}

fn scenario_free_list() -> FreeList {
    let mut free = grid((2024, 1, 8), (2024, 1, 8));
    subtract_interval(
        &mut free,
        &BusyInterval::parse("2024-01-08T09:00:00+01:00", "2024-01-08T10:00:00+01:00").unwrap(),
    );
    free
}

fn clock_column(line: &str) -> &str {
    &line[13..18]
}

// ── Filtering ───────────────────────────────────────────────────────────────

#[test]
fn monday_scenario_renders_18_lines() {
    let lines = render_lines(&scenario_free_list(), &options());

    assert_eq!(lines.len(), 18);
    let clocks: Vec<&str> = lines.iter().map(|l| clock_column(l)).collect();
    assert_eq!(&clocks[..3], &["08:00", "08:30", "10:00"]);
    assert_eq!(clocks.last(), Some(&"16:30"));
    assert!(!clocks.contains(&"09:00"));
    assert!(!clocks.contains(&"09:30"));
    assert!(lines.iter().all(|l| l.ends_with("(Monday)")));
}

#[test]
fn line_layout_matches_report_format() {
    let lines = render_lines(&scenario_free_list(), &options());

    assert_eq!(lines[0], "2024-01-08   08:00 UTC+1 (Monday)");
    // Date printed once per day.
    assert_eq!(lines[1], "             08:30 UTC+1 (Monday)");
}

#[test]
fn no_later_is_exclusive_and_no_earlier_inclusive() {
    let opts = RenderOptions {
        no_earlier: 10,
        no_later: 11,
        ..options()
    };
    let lines = render_lines(&grid((2024, 1, 8), (2024, 1, 8)), &opts);

    let clocks: Vec<&str> = lines.iter().map(|l| clock_column(l)).collect();
    assert_eq!(clocks, vec!["10:00", "10:30"]);
}

#[test]
fn weekend_hidden_unless_requested() {
    // Friday 2024-01-12 through Monday 2024-01-15.
    let free = grid((2024, 1, 12), (2024, 1, 15));

    let hidden = render_lines(&free, &options());
    assert_eq!(hidden.len(), 2 * 18);
    assert!(!hidden.iter().any(|l| l.contains("Saturday") || l.contains("Sunday")));

    let shown = render_lines(
        &free,
        &RenderOptions {
            show_weekend: true,
            ..options()
        },
    );
    assert_eq!(shown.len(), 4 * 18);
    assert!(shown.iter().any(|l| l.starts_with("2024-01-13") && l.ends_with("(Saturday)")));
}

#[test]
fn each_new_date_is_labelled_once() {
    let lines = render_lines(&grid((2024, 1, 8), (2024, 1, 9)), &options());

    let labelled: Vec<&String> = lines.iter().filter(|l| !l.starts_with(' ')).collect();
    assert_eq!(labelled.len(), 2);
    assert!(labelled[0].starts_with("2024-01-08"));
    assert!(labelled[1].starts_with("2024-01-09"));
    assert!(lines[18].starts_with("2024-01-09   08:00"));
}

#[test]
fn empty_grid_renders_full_day_when_nothing_is_busy() {
    let lines = render_lines(&grid((2024, 1, 8), (2024, 1, 8)), &options());
    assert_eq!(lines.len(), 18);
}

// ── Viewer offset ───────────────────────────────────────────────────────────

#[test]
fn viewer_offset_reprojects_clock_of_grid_anchored_elsewhere() {
    // Grid anchored at UTC+1; 08:00+01:00 is 07:00Z, i.e. 02:00 at UTC-5.
    let opts = RenderOptions {
        viewer: offset("-5"),
        no_earlier: 0,
        no_later: 24,
        show_weekend: true,
        ..options()
    };
    let lines = render_lines(&grid((2024, 1, 8), (2024, 1, 8)), &opts);

    assert_eq!(lines.len(), 26);
    assert_eq!(lines[0], "2024-01-08   02:00 UTC-5 (Monday)");
    assert_eq!(clock_column(lines.last().unwrap()), "14:30");
}

#[test]
fn hour_filter_applies_at_viewer_offset() {
    let opts = RenderOptions {
        viewer: offset("-5"),
        ..options()
    };
    let lines = render_lines(&grid((2024, 1, 8), (2024, 1, 8)), &opts);

    // 08:00..20:30 at UTC+1 is 02:00..14:30 at UTC-5; 8..17 keeps 08:00..14:30.
    let clocks: Vec<&str> = lines.iter().map(|l| clock_column(l)).collect();
    assert_eq!(clocks.len(), 14);
    assert_eq!(clocks[0], "08:00");
    assert_eq!(clocks.last(), Some(&"14:30"));
}

#[test]
fn viewer_offset_moves_date_and_weekday_across_midnight() {
    let opts = RenderOptions {
        viewer: offset("+14"),
        no_earlier: 0,
        no_later: 24,
        show_weekend: true,
        ..options()
    };
    let lines = render_lines(&grid((2024, 1, 8), (2024, 1, 8)), &opts);

    // 11:00+01:00 is midnight at UTC+14 on Tuesday.
    assert_eq!(lines[0], "2024-01-08   21:00 UTC+14 (Monday)");
    assert_eq!(lines[6], "2024-01-09   00:00 UTC+14 (Tuesday)");
}

// ── Extra offsets ───────────────────────────────────────────────────────────

#[test]
fn extra_offset_adds_shifted_column() {
    let opts = RenderOptions {
        extra: vec![offset("+5")],
        ..options()
    };
    let plain = render_lines(&scenario_free_list(), &options());
    let lines = render_lines(&scenario_free_list(), &opts);

    assert_eq!(lines.len(), plain.len());
    assert_eq!(lines[0], "2024-01-08   08:00 UTC+1   12:00 UTC+5 (Monday)");
    assert_eq!(lines[2], "             10:00 UTC+1   14:00 UTC+5 (Monday)");
}

#[test]
fn extra_offsets_follow_configured_order() {
    let opts = RenderOptions {
        extra: vec![offset("-8"), offset("0"), offset("+9")],
        ..options()
    };
    let lines = render_lines(&scenario_free_list(), &opts);

    assert_eq!(
        lines[0],
        "2024-01-08   08:00 UTC+1   23:00 UTC-8   07:00 UTC+0   16:00 UTC+9 (Monday)"
    );
}

// ── Report ──────────────────────────────────────────────────────────────────

#[test]
fn report_has_header_and_footer() {
    let report = render_report(&scenario_free_list(), &options());
    let lines: Vec<&str> = report.lines().collect();

    assert_eq!(lines[0], "Here are the free (30 min) slots working for me/us");
    assert_eq!(lines[1], "-".repeat(50));
    assert_eq!(lines[2], "2024-01-08   08:00 UTC+1 (Monday)");
    assert_eq!(lines[lines.len() - 2], "");
    assert!(lines[lines.len() - 1].contains("everytimezone.com"));
    assert_eq!(lines.len(), 2 + 18 + 2);
}

#[test]
fn reversed_hour_filter_is_rejected() {
    let opts = RenderOptions {
        no_earlier: 18,
        no_later: 9,
        ..options()
    };
    assert!(matches!(opts.validate(), Err(SlotError::InvalidHourFilter(_))));
    assert!(options().validate().is_ok());
}
