use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use crate::cleanup::remove_directory;
use crate::config::RunConfig;
use crate::download::{download_chunks, DownloadReport};
use crate::error::Recovered;
use crate::manifest::{write_manifest, ManifestRecord};
use crate::partition::split_into_chunks;
use crate::tree::{enumerate_files, Fetch};

#[derive(Debug)]
pub struct RunSummary {
    pub files_listed: usize,
    pub chunks: usize,
    pub download: DownloadReport,
    pub manifest_path: PathBuf,
    pub records: Vec<ManifestRecord>,
    pub cleanup: Option<Recovered>,
}

/// Enumerate, download, hash and clean up. Manifest lines are echoed to `progress`.
///
/// Returns `Err` only for fatal problems: a bad repository URL, a failed or
/// malformed listing, or a manifest that cannot be produced.
pub fn run<F: Fetch + ?Sized, W: Write>(
    cfg: &RunConfig,
    fetcher: &F,
    progress: &mut W,
) -> Result<RunSummary> {
    let repo = cfg.repo()?;
    info!(repo = %repo, "listing repository");
    let files = enumerate_files(&repo, fetcher)?;
    let files_listed = files.len();

    let chunks = split_into_chunks(files);
    let chunk_count = chunks.len();
    info!(
        files = files_listed,
        workers = chunk_count,
        dest = %cfg.destination.display(),
        "downloading"
    );
    fs::create_dir_all(&cfg.destination)
        .with_context(|| format!("create {}", cfg.destination.display()))?;
    let download = download_chunks(chunks, &cfg.destination, fetcher)?;
    info!(written = download.written(), skipped = download.skipped(), "download finished");

    let manifest_path = cfg.manifest_path().context("resolve manifest path")?;
    let records = write_manifest(&cfg.destination, &manifest_path, progress)?;
    info!(records = records.len(), path = %manifest_path.display(), "manifest written");

    let cleanup = if cfg.keep_destination { None } else { remove_directory(&cfg.destination) };

    Ok(RunSummary { files_listed, chunks: chunk_count, download, manifest_path, records, cleanup })
}
