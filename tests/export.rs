#![forbid(unsafe_code)]
use chrono::{DateTime, FixedOffset, TimeZone};
use std::io::Write;
use swiftpass::{io, Direction, ExportRange, FixedClock, Gate, MemoryStore};
use tempfile::tempdir;

fn at(day: u32, hour: u32, min: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(5 * 3600 + 1800)
        .unwrap()
        .with_ymd_and_hms(2026, 10, day, hour, min, 0)
        .unwrap()
}

fn render(gate: &Gate<&MemoryStore, &FixedClock>, range: ExportRange) -> String {
    let mut out = Vec::new();
    gate.export_csv(range, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn scenario_e_today_starts_at_local_midnight() {
    let store = MemoryStore::new();
    let clock = FixedClock::new(at(15, 23, 0));
    let mut gate = Gate::open(&store, &clock).unwrap();
    gate.record("S1", Direction::Entry).unwrap();
    clock.set(at(16, 0, 30));
    gate.record("S2", Direction::Exit).unwrap();
    clock.set(at(16, 10, 0));

    let today = render(&gate, ExportRange::Today);
    insta::assert_snapshot!(today.trim_end(), @r"
    Student ID,Action,Timestamp,Alert Type
    S2,EXIT,2026-10-16 00:30:00,EARLY_EXIT
    ");

    let week = render(&gate, ExportRange::LastSevenDays);
    insta::assert_snapshot!(week.trim_end(), @r"
    Student ID,Action,Timestamp,Alert Type
    S2,EXIT,2026-10-16 00:30:00,EARLY_EXIT
    S1,ENTRY,2026-10-15 23:00:00,LATE_ENTRY
    ");
}

#[test]
fn export_uses_the_unwindowed_ledger() {
    let store = MemoryStore::new();
    let clock = FixedClock::new(at(16, 9, 0));
    let mut gate = Gate::open(&store, &clock).unwrap().with_display_limit(5);
    for i in 0..12 {
        gate.record(&format!("S{i}"), Direction::Entry).unwrap();
    }
    assert_eq!(gate.visible_logs().len(), 5);
    assert_eq!(gate.export_entries(ExportRange::Today).len(), 12);
}

#[test]
fn week_drops_entries_older_than_seven_days() {
    let store = MemoryStore::new();
    let clock = FixedClock::new(at(8, 23, 59));
    let mut gate = Gate::open(&store, &clock).unwrap();
    gate.record("old", Direction::Exit).unwrap();
    clock.set(at(9, 0, 0));
    gate.record("edge", Direction::Exit).unwrap();
    clock.set(at(16, 12, 0));

    let students: Vec<_> = gate
        .export_entries(ExportRange::LastSevenDays)
        .iter()
        .map(|e| e.student_id.clone())
        .collect();
    assert_eq!(students, ["edge"]);
}

#[test]
fn fields_with_commas_are_quoted() {
    let store = MemoryStore::new();
    let clock = FixedClock::new(at(16, 14, 5));
    let mut gate = Gate::open(&store, &clock).unwrap();
    gate.record("Doe, Jane", Direction::Entry).unwrap();

    let mut out = Vec::new();
    io::write_logs_csv(&mut out, gate.ledger()).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text,
        "Student ID,Action,Timestamp,Alert Type\n\"Doe, Jane\",ENTRY,2026-10-16 14:05:00,NONE\n"
    );
}

#[test]
fn default_file_names() {
    assert_eq!(ExportRange::Today.file_name(&at(16, 1, 0)), "hostel_logs_2026-10-16.csv");
    assert_eq!(
        ExportRange::LastSevenDays.file_name(&at(16, 1, 0)),
        "hostel_logs_last_7_days.csv"
    );
}

#[test]
fn export_to_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.csv");
    let store = MemoryStore::new();
    let clock = FixedClock::new(at(16, 11, 0));
    let mut gate = Gate::open(&store, &clock).unwrap();
    gate.record("S1", Direction::Exit).unwrap();

    io::export_logs_csv(&path, gate.export_entries(ExportRange::Today)).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("Student ID,Action,Timestamp,Alert Type\n"));
    assert!(text.contains("S1,EXIT,2026-10-16 11:00:00,NONE"));
}

#[test]
fn failed_export_leaves_no_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.csv");

    let err = io::write_file_atomically::<_, (), _>(&path, |file| {
        file.write_all(b"Student ID,Action")?;
        anyhow::bail!("disk full")
    })
    .unwrap_err();
    assert!(format!("{err:#}").contains("disk full"));
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn failed_export_keeps_the_previous_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.csv");
    std::fs::write(&path, "old").unwrap();

    let res: anyhow::Result<()> = io::write_file_atomically(&path, |_| anyhow::bail!("interrupted"));
    assert!(res.is_err());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "old");
}
