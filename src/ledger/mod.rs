mod classify;
mod types;
mod unreturned;
mod window;

pub use classify::classify;
pub use types::{
    normalize_student_id, AlertPolicy, GateError, DISPLAY_LIMIT, EARLY_EXIT_HOUR, LATE_ENTRY_HOUR,
};
pub use unreturned::unreturned;
pub use window::{local_midnight, DayWindow, ExportRange};

use crate::clock::Clock;
use crate::io;
use crate::model::{Direction, EntryId, LogEntry, Role};
use crate::storage::{Store, HOLIDAY_MODE_KEY, LOGS_KEY, ROLE_KEY};
use chrono::{DateTime, FixedOffset, Offset, Timelike};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::Write;
use tracing::{debug, info, warn};

/// Gate : état de session (rôle, registre, mode vacances) et ses points de mutation.
///
/// Chaque mutation réécrit sa clé dans le `Store` avant de devenir visible ;
/// si l'écriture échoue, l'état précédent est conservé.
#[derive(Debug)]
pub struct Gate<S: Store, C: Clock> {
    store: S,
    clock: C,
    policy: AlertPolicy,
    display_limit: usize,
    role: Role,
    ledger: Vec<LogEntry>,
    holiday_mode: bool,
}

impl<S: Store, C: Clock> Gate<S, C> {
    /// Charge les trois clés persistées ; une clé absente prend sa valeur par défaut.
    pub fn open(store: S, clock: C) -> Result<Self, GateError> {
        let role: Role = load_key(&store, ROLE_KEY)?.unwrap_or_default();
        let ledger: Vec<LogEntry> = load_key(&store, LOGS_KEY)?.unwrap_or_default();
        let holiday_mode: bool = load_key(&store, HOLIDAY_MODE_KEY)?.unwrap_or_default();
        debug!(%role, entries = ledger.len(), holiday_mode, "gate state loaded");
        Ok(Self {
            store,
            clock,
            policy: AlertPolicy::default(),
            display_limit: DISPLAY_LIMIT,
            role,
            ledger,
            holiday_mode,
        })
    }

    pub fn with_policy(mut self, policy: AlertPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_display_limit(mut self, limit: usize) -> Self {
        self.display_limit = limit;
        self
    }

    pub fn policy(&self) -> &AlertPolicy {
        &self.policy
    }
    pub fn role(&self) -> Role {
        self.role
    }
    pub fn holiday_mode(&self) -> bool {
        self.holiday_mode
    }
    pub fn now(&self) -> DateTime<C::Tz> {
        self.clock.now()
    }

    /// Registre complet, du plus récent au plus ancien.
    pub fn ledger(&self) -> &[LogEntry] {
        &self.ledger
    }

    /// Les premières entrées du registre, bornées pour l'affichage.
    pub fn visible_logs(&self) -> &[LogEntry] {
        let end = self.ledger.len().min(self.display_limit);
        &self.ledger[..end]
    }

    /// Enregistre un passage ; `student_id` doit déjà être nettoyé
    /// (voir [`normalize_student_id`]).
    pub fn record(&mut self, student_id: &str, direction: Direction) -> Result<LogEntry, GateError> {
        let local = self.clock.now();
        let alert = classify(direction, local.hour(), self.holiday_mode, &self.policy);
        // l'entrée garde le décalage en vigueur à cet instant
        let now = local.with_timezone(&local.offset().fix());
        let entry = LogEntry {
            id: self.next_id(student_id, &now),
            student_id: student_id.to_owned(),
            direction,
            timestamp: now,
            alert,
        };

        self.ledger.insert(0, entry.clone());
        if let Err(err) = self.persist(LOGS_KEY, &self.ledger) {
            self.ledger.remove(0);
            return Err(err);
        }

        info!(id = %entry.id, student = %entry.student_id, %direction, "gate event recorded");
        if alert.is_alert() {
            warn!(student = %entry.student_id, %alert, at = %entry.timestamp, "gate alert");
        }
        Ok(entry)
    }

    pub fn set_holiday_mode(&mut self, on: bool) -> Result<(), GateError> {
        self.persist(HOLIDAY_MODE_KEY, &on)?;
        self.holiday_mode = on;
        info!(holiday_mode = on, "holiday mode updated");
        Ok(())
    }

    /// Bascule le mode vacances et renvoie la nouvelle valeur.
    pub fn toggle_holiday_mode(&mut self) -> Result<bool, GateError> {
        let next = !self.holiday_mode;
        self.set_holiday_mode(next)?;
        Ok(next)
    }

    pub fn set_role(&mut self, role: Role) -> Result<(), GateError> {
        self.persist(ROLE_KEY, &role)?;
        self.role = role;
        info!(%role, "role updated");
        Ok(())
    }

    /// Élèves sortis et pas encore revenus aujourd'hui (recalculé à chaque appel).
    ///
    /// Le jour est borné dans le fuseau de l'horloge, pas dans le décalage courant.
    pub fn unreturned(&self) -> BTreeSet<String> {
        unreturned(&self.ledger, &self.clock.now(), self.holiday_mode, &self.policy)
    }

    /// Entrées du registre complet (non fenêtré) tombant dans la période.
    pub fn export_entries(&self, range: ExportRange) -> Vec<&LogEntry> {
        let window = range.window(&self.clock.now());
        self.ledger
            .iter()
            .filter(|e| window.contains(&e.timestamp))
            .collect()
    }

    /// Écrit le rapport CSV de la période ; renvoie le nombre de lignes exportées.
    pub fn export_csv<W: Write>(&self, range: ExportRange, writer: W) -> Result<usize, GateError> {
        let entries = self.export_entries(range);
        io::write_logs_csv(writer, entries.iter().copied()).map_err(GateError::Export)?;
        info!(?range, rows = entries.len(), "report exported");
        Ok(entries.len())
    }

    /// `<ms epoch>-<élève>`, suffixé `-N` si un double scan tombe sur la même milliseconde.
    fn next_id(&self, student_id: &str, now: &DateTime<FixedOffset>) -> EntryId {
        let millis = now.timestamp_millis();
        let base = format!("{millis}-{student_id}");
        let taken = |candidate: &str| {
            self.ledger
                .iter()
                .filter(|e| e.timestamp.timestamp_millis() == millis)
                .any(|e| e.id.as_str() == candidate)
        };
        if !taken(&base) {
            return EntryId::new(base);
        }
        let mut n = 1u32;
        loop {
            let candidate = format!("{base}-{n}");
            if !taken(&candidate) {
                return EntryId::new(candidate);
            }
            n += 1;
        }
    }

    fn persist<T: Serialize + ?Sized>(&self, key: &'static str, value: &T) -> Result<(), GateError> {
        let bytes = serde_json::to_vec(value)
            .map_err(|err| GateError::Persist { key, source: err.into() })?;
        self.store
            .set(key, &bytes)
            .map_err(|source| GateError::Persist { key, source })?;
        debug!(key, bytes = bytes.len(), "state persisted");
        Ok(())
    }
}

fn load_key<S: Store, T: DeserializeOwned>(store: &S, key: &'static str) -> Result<Option<T>, GateError> {
    let Some(raw) = store.get(key).map_err(|source| GateError::Load { key, source })? else {
        return Ok(None);
    };
    let value = serde_json::from_slice(&raw).map_err(|err| GateError::Load {
        key,
        source: anyhow::Error::new(err).context(format!("parsing {key}")),
    })?;
    Ok(Some(value))
}
