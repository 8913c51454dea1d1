use super::AlertPolicy;
use crate::model::{Alert, Direction};

/// Classe un passage selon son sens, l'heure locale (0..=23) et le mode vacances.
///
/// Le mode vacances supprime toute alerte.
pub fn classify(direction: Direction, hour: u32, holiday_mode: bool, policy: &AlertPolicy) -> Alert {
    if holiday_mode {
        return Alert::None;
    }
    match direction {
        Direction::Entry if hour >= policy.late_entry_hour => Alert::LateEntry,
        Direction::Exit if hour < policy.early_exit_hour => Alert::EarlyExit,
        _ => Alert::None,
    }
}
