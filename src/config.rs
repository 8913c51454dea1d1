use crate::ledger::{AlertPolicy, DISPLAY_LIMIT, EARLY_EXIT_HOUR, LATE_ENTRY_HOUR};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Réglages optionnels lus depuis un fichier JSON ; toute clé absente garde sa valeur par défaut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub late_entry_hour: u32,
    pub early_exit_hour: u32,
    pub display_limit: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            late_entry_hour: LATE_ENTRY_HOUR,
            early_exit_hour: EARLY_EXIT_HOUR,
            display_limit: DISPLAY_LIMIT,
        }
    }
}

impl GateConfig {
    pub fn validate(&self) -> Result<()> {
        if self.late_entry_hour > 23 {
            bail!("late_entry_hour must be within 0..=23");
        }
        if self.early_exit_hour > 24 {
            bail!("early_exit_hour must be within 0..=24");
        }
        if self.display_limit == 0 {
            bail!("display_limit must be > 0");
        }
        Ok(())
    }

    pub fn policy(&self) -> AlertPolicy {
        AlertPolicy {
            late_entry_hour: self.late_entry_hour,
            early_exit_hour: self.early_exit_hour,
        }
    }
}

pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> Result<GateConfig> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
    let config: GateConfig = serde_json::from_slice(&data)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}
