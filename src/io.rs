use crate::model::LogEntry;
use anyhow::Context;
use chrono::{DateTime, FixedOffset};
use csv::WriterBuilder;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub const CSV_HEADER: [&str; 4] = ["Student ID", "Action", "Timestamp", "Alert Type"];

/// Heure murale telle qu'elle était au portail lors du passage.
pub fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Export CSV des passages: header `Student ID,Action,Timestamp,Alert Type`
pub fn write_logs_csv<'a, W, I>(writer: W, entries: I) -> anyhow::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a LogEntry>,
{
    let mut w = WriterBuilder::new().has_headers(true).from_writer(writer);
    w.write_record(CSV_HEADER)?;
    for e in entries {
        let ts = format_timestamp(&e.timestamp);
        w.write_record([
            e.student_id.as_str(),
            e.direction.as_str(),
            ts.as_str(),
            e.alert.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Même chose vers un fichier (rien n'est créé si l'écriture échoue).
pub fn export_logs_csv<'a, P, I>(path: P, entries: I) -> anyhow::Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a LogEntry>,
{
    write_file_atomically(path, |file| write_logs_csv(file, entries))
}

/// Écrit dans un fichier temporaire voisin puis renomme sur `path`.
///
/// Si `write` échoue, le temporaire est supprimé et `path` reste intact.
pub fn write_file_atomically<P, T, F>(path: P, write: F) -> anyhow::Result<T>
where
    P: AsRef<Path>,
    F: FnOnce(&mut dyn Write) -> anyhow::Result<T>,
{
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    let out = write(tmp.as_file_mut()).with_context(|| format!("writing {}", path.display()))?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("atomic rename to {}", path.display()))?;
    Ok(out)
}
