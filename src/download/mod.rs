#![warn(clippy::all, clippy::pedantic)]

//! One-shot download of the WordNet Japan database archive.

use std::{fs, io, path::Path};

use anyhow::{Context, Result, bail};
use colored::Colorize;
use flate2::read::GzDecoder;
use log::debug;

/// The canonical WordNet Japan distribution archive.
pub const WNJ_ARCHIVE_URL: &str = "https://compling.hss.ntu.edu.sg/wnja/data/1.1/wnjpn.db.gz";

/// Fetch and gunzip the archive to `target`, skipping when the file is
/// already present.
///
/// # Errors
///
/// Returns an error when the HTTP request fails, the response is not 200, or
/// the decompressed database cannot be written.
pub fn ensure_wnj_db(target: &Path) -> Result<()> {
    if target.is_file() {
        println!(
            "{}",
            format!("WordNet Japan database already exists at {}.", target.display()).green()
        );
        return Ok(());
    }

    println!("Downloading the WordNet Japan database (this can take a while)...");
    debug!("fetching {WNJ_ARCHIVE_URL}");
    let response = reqwest::blocking::get(WNJ_ARCHIVE_URL)
        .with_context(|| format!("failed to request {WNJ_ARCHIVE_URL}"))?;
    if !response.status().is_success() {
        bail!("archive server answered {}", response.status());
    }

    // Decompress into a sibling temp file, then rename into place so a
    // killed download never leaves a truncated database behind.
    let temp_path = target.with_extension("db.tmp");
    let result = (|| -> Result<()> {
        let mut decoder = GzDecoder::new(response);
        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("failed to create {}", temp_path.display()))?;
        io::copy(&mut decoder, &mut file)
            .with_context(|| format!("failed to unpack into {}", temp_path.display()))?;
        fs::rename(&temp_path, target)
            .with_context(|| format!("failed to move the database to {}", target.display()))?;
        Ok(())
    })();
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result?;

    println!(
        "{}",
        format!("Downloaded the WordNet Japan database to {}.", target.display()).green()
    );
    Ok(())
}
