use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Nombre d'entrées exposées à l'affichage.
pub const DISPLAY_LIMIT: usize = 50;

/// Heure à partir de laquelle une entrée est en retard (22h).
pub const LATE_ENTRY_HOUR: u32 = 22;

/// Heure avant laquelle une sortie est trop matinale (6h).
pub const EARLY_EXIT_HOUR: u32 = 6;

/// Politique d'alertes (seuils horaires, heure locale).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertPolicy {
    /// Entrée à partir de cette heure ⇒ `LateEntry` ; c'est aussi l'heure du couvre-feu.
    pub late_entry_hour: u32,
    /// Sortie avant cette heure ⇒ `EarlyExit`.
    pub early_exit_hour: u32,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            late_entry_hour: LATE_ENTRY_HOUR,
            early_exit_hour: EARLY_EXIT_HOUR,
        }
    }
}

#[derive(Error, Debug)]
pub enum GateError {
    #[error("student id cannot be empty")]
    EmptyStudentId,
    #[error("persisting {key} failed")]
    Persist {
        key: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("loading {key} failed")]
    Load {
        key: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("export failed")]
    Export(#[source] anyhow::Error),
}

/// Nettoie un identifiant saisi ou scanné ; refuse une saisie vide.
pub fn normalize_student_id(raw: &str) -> Result<String, GateError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(GateError::EmptyStudentId);
    }
    Ok(trimmed.to_owned())
}
