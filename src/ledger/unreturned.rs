use super::{AlertPolicy, DayWindow};
use crate::model::{Direction, LogEntry};
use chrono::{DateTime, TimeZone, Timelike};
use std::collections::{BTreeSet, HashMap};

/// Élèves dont le dernier passage du jour est une sortie.
///
/// Rien n'est calculé avant le couvre-feu, sauf en mode vacances.
pub fn unreturned<Tz: TimeZone>(
    entries: &[LogEntry],
    now: &DateTime<Tz>,
    holiday_mode: bool,
    policy: &AlertPolicy,
) -> BTreeSet<String> {
    let after_curfew = now.hour() >= policy.late_entry_hour;
    if !after_curfew && !holiday_mode {
        return BTreeSet::new();
    }

    let today = DayWindow::today(now);
    let mut latest: HashMap<&str, &LogEntry> = HashMap::new();
    for entry in entries.iter().filter(|e| today.contains(&e.timestamp)) {
        latest
            .entry(entry.student_id.as_str())
            .and_modify(|seen| {
                if entry.timestamp > seen.timestamp {
                    *seen = entry;
                }
            })
            .or_insert(entry);
    }

    latest
        .into_iter()
        .filter(|(_, entry)| entry.direction == Direction::Exit)
        .map(|(student, _)| student.to_owned())
        .collect()
}
