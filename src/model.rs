use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifiant fort pour une entrée du registre
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(String);

impl EntryId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sens du passage au portail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Entry,
    Exit,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Entry => "ENTRY",
            Direction::Exit => "EXIT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alerte figée sur une entrée au moment de sa création
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Alert {
    #[default]
    None,
    LateEntry,
    EarlyExit,
}

impl Alert {
    pub fn as_str(self) -> &'static str {
        match self {
            Alert::None => "NONE",
            Alert::LateEntry => "LATE_ENTRY",
            Alert::EarlyExit => "EARLY_EXIT",
        }
    }

    /// Libellé court pour l'affichage ("" si aucune alerte).
    pub fn label(self) -> &'static str {
        match self {
            Alert::None => "",
            Alert::LateEntry => "Late Entry",
            Alert::EarlyExit => "Early Exit",
        }
    }

    pub fn is_alert(self) -> bool {
        self != Alert::None
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vue sélectionnée (gardien ou surveillant) ; ne donne aucun droit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Guard,
    Warden,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Guard => f.write_str("GUARD"),
            Role::Warden => f.write_str("WARDEN"),
        }
    }
}

/// Passage enregistré. Immuable une fois créé.
///
/// Les noms de champs sérialisés (`studentId`, `logType`, `alertType`) sont
/// ceux du registre historique, pour relire un export existant tel quel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: EntryId,
    pub student_id: String,
    #[serde(rename = "logType")]
    pub direction: Direction,
    /// Heure murale locale avec son décalage, précision sub-seconde.
    pub timestamp: DateTime<FixedOffset>,
    #[serde(rename = "alertType")]
    pub alert: Alert,
}
