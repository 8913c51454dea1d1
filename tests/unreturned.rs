#![forbid(unsafe_code)]
use chrono::{DateTime, FixedOffset, TimeZone};
use std::collections::BTreeSet;
use swiftpass::{
    unreturned, Alert, AlertPolicy, DayWindow, Direction, EntryId, FixedClock, Gate, LogEntry,
    MemoryStore,
};

fn at(day: u32, hour: u32, min: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(5 * 3600 + 1800)
        .unwrap()
        .with_ymd_and_hms(2026, 10, day, hour, min, 0)
        .unwrap()
}

fn entry(student: &str, direction: Direction, ts: DateTime<FixedOffset>) -> LogEntry {
    LogEntry {
        id: EntryId::new(format!("{}-{student}", ts.timestamp_millis())),
        student_id: student.to_string(),
        direction,
        timestamp: ts,
        alert: Alert::None,
    }
}

fn set(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

#[test]
fn scenario_c_visible_only_after_curfew() {
    let policy = AlertPolicy::default();
    let ledger = vec![entry("S3", Direction::Exit, at(16, 20, 0))];

    assert_eq!(unreturned(&ledger, &at(16, 23, 0), false, &policy), set(&["S3"]));
    assert!(unreturned(&ledger, &at(16, 19, 0), false, &policy).is_empty());
    assert!(unreturned(&ledger, &at(16, 21, 59), false, &policy).is_empty());
}

#[test]
fn scenario_d_holiday_mode_forces_visibility() {
    let store = MemoryStore::new();
    let clock = FixedClock::new(at(16, 3, 0));
    let mut gate = Gate::open(&store, &clock).unwrap();
    gate.set_holiday_mode(true).unwrap();

    let exit = gate.record("S4", Direction::Exit).unwrap();
    assert_eq!(exit.alert, Alert::None);

    clock.set(at(16, 3, 5));
    assert_eq!(gate.unreturned(), set(&["S4"]));
}

#[test]
fn latest_event_of_the_day_wins() {
    let policy = AlertPolicy::default();
    // ordre du registre volontairement mélangé : seul l'horodatage compte
    let ledger = vec![
        entry("back", Direction::Exit, at(16, 8, 0)),
        entry("out", Direction::Exit, at(16, 21, 0)),
        entry("back", Direction::Entry, at(16, 18, 0)),
        entry("out", Direction::Entry, at(16, 7, 0)),
    ];
    assert_eq!(unreturned(&ledger, &at(16, 22, 30), false, &policy), set(&["out"]));
}

#[test]
fn yesterday_exits_are_ignored() {
    let policy = AlertPolicy::default();
    let ledger = vec![
        entry("night", Direction::Exit, at(15, 23, 59)),
        entry("today", Direction::Exit, at(16, 0, 0)),
    ];
    assert_eq!(unreturned(&ledger, &at(16, 22, 0), false, &policy), set(&["today"]));
}

#[test]
fn derivation_is_idempotent() {
    let store = MemoryStore::new();
    let clock = FixedClock::new(at(16, 19, 0));
    let mut gate = Gate::open(&store, &clock).unwrap();
    gate.record("A", Direction::Exit).unwrap();
    gate.record("B", Direction::Exit).unwrap();
    gate.record("B", Direction::Entry).unwrap();

    clock.set(at(16, 22, 15));
    let first = gate.unreturned();
    let second = gate.unreturned();
    assert_eq!(first, second);
    assert_eq!(first, set(&["A"]));
}

#[test]
fn timestamps_in_other_offsets_use_the_query_day() {
    let policy = AlertPolicy::default();
    // 16/10 19:00 UTC = 17/10 00:30 à +05:30
    let utc_exit = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2026, 10, 16, 19, 0, 0)
        .unwrap();
    let ledger = vec![entry("S7", Direction::Exit, utc_exit)];
    assert!(unreturned(&ledger, &at(16, 23, 0), false, &policy).is_empty());
    assert_eq!(unreturned(&ledger, &at(17, 23, 0), false, &policy), set(&["S7"]));
}

#[test]
fn day_window_bounds_are_local_midnights() {
    let today = DayWindow::today(&at(16, 0, 30));
    assert_eq!(today.start, at(16, 0, 0));
    assert_eq!(today.end, at(17, 0, 0));
    assert!(today.contains(&at(16, 23, 59)));
    assert!(!today.contains(&at(17, 0, 0)));

    let week = DayWindow::last_days(&at(16, 15, 0), 7);
    assert_eq!(week.start, at(9, 0, 0));
    assert!(week.contains(&at(9, 0, 0)));
    assert!(!week.contains(&at(8, 23, 59)));
}
