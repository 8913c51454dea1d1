use crate::io::write_file_atomically;
use anyhow::Context;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub const ROLE_KEY: &str = "swift-pass-role";
pub const LOGS_KEY: &str = "swift-pass-logs";
pub const HOLIDAY_MODE_KEY: &str = "swift-pass-holiday-mode";

/// Stockage clé/valeur : lecture au démarrage, réécriture complète à chaque changement.
pub trait Store {
    /// Valeur brute (JSON) d'une clé, `None` si jamais écrite.
    fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>>;
    /// Remplace la valeur de manière atomique.
    fn set(&self, key: &str, value: &[u8]) -> anyhow::Result<()>;
}

impl<S: Store + ?Sized> Store for &S {
    fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &[u8]) -> anyhow::Result<()> {
        (**self).set(key, value)
    }
}

/// Un fichier `<clé>.json` par clé dans un répertoire d'état.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    pub fn open<P: AsRef<Path>>(dir: P) -> anyhow::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating state directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Store for JsonDirStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("reading {}", path.display())),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> anyhow::Result<()> {
        write_file_atomically(self.path_for(key), |file| {
            file.write_all(value)?;
            Ok(())
        })
    }
}

/// Stockage en mémoire (tests, sessions éphémères).
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, Vec<u8>>>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toute écriture échoue ; sert à vérifier qu'un échec de persistance ne laisse rien derrière lui.
    pub fn read_only() -> Self {
        Self {
            values: RefCell::default(),
            read_only: true,
        }
    }

    pub fn with_value<V: Into<Vec<u8>>>(self, key: &str, value: V) -> Self {
        self.values.borrow_mut().insert(key.to_owned(), value.into());
        self
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> anyhow::Result<()> {
        if self.read_only {
            anyhow::bail!("store is read-only, cannot write {key}");
        }
        self.values
            .borrow_mut()
            .insert(key.to_owned(), value.to_vec());
        Ok(())
    }
}
