#![forbid(unsafe_code)]
//! Swiftpass — registre local des entrées/sorties d'un internat (sans BD).
//!
//! - Stockage fichiers (JSON par clé, réécriture atomique).
//! - Alertes figées à l'écriture (retour tardif, sortie matinale).
//! - Liste des élèves non rentrés recalculée à chaque lecture.
//! - Exports CSV ; QR codes des élèves (feature `qr`).
//! - Heure murale locale partout ; bornes de jour aux minuits locaux.

pub mod clock;
pub mod config;
pub mod io;
pub mod ledger;
pub mod model;
#[cfg(feature = "qr")]
pub mod qr;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{load_config_from_file, GateConfig};
pub use ledger::{
    classify, normalize_student_id, unreturned, AlertPolicy, DayWindow, ExportRange, Gate,
    GateError, DISPLAY_LIMIT,
};
pub use model::{Alert, Direction, EntryId, LogEntry, Role};
pub use storage::{JsonDirStore, MemoryStore, Store};
