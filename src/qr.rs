//! QR codes des élèves, générés par un service HTTP externe.

use crate::io::write_file_atomically;
use crate::ledger::normalize_student_id;
use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use reqwest::Url;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const QR_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/";
pub const QR_SIZE: &str = "200x200";

/// URL de l'image PNG encodant `student_id`.
pub fn qr_code_url(student_id: &str) -> Result<Url> {
    let student_id = normalize_student_id(student_id)?;
    let url = Url::parse_with_params(
        QR_ENDPOINT,
        &[
            ("data", student_id.as_str()),
            ("size", QR_SIZE),
            ("format", "png"),
        ],
    )?;
    Ok(url)
}

/// `<id>_qr_code.png` ; tout caractère hors `[A-Za-z0-9._-]` devient `_`,
/// le nom reste donc un simple composant de chemin.
pub fn qr_file_name(student_id: &str) -> String {
    let stem: String = student_id
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}_qr_code.png")
}

/// Télécharge le QR code dans `dir` et renvoie le chemin écrit.
///
/// Aucun fichier n'est créé si la requête échoue.
pub fn download_qr<P: AsRef<Path>>(student_id: &str, dir: P) -> Result<PathBuf> {
    let url = qr_code_url(student_id)?;
    let path = dir.as_ref().join(qr_file_name(student_id));
    debug!(%url, "fetching qr code");

    let response = Client::new()
        .get(url.clone())
        .send()
        .with_context(|| format!("Could not download QR code from {url}. Please check your network connection and try again."))?;
    if !response.status().is_success() {
        bail!("Could not download QR code: {} returned {}", url, response.status());
    }
    let bytes = response.bytes().context("reading qr code body")?;

    write_file_atomically(&path, |file| {
        file.write_all(&bytes)?;
        Ok(())
    })?;
    info!(path = %path.display(), bytes = bytes.len(), "qr code saved");
    Ok(path)
}
