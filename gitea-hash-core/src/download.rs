use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::thread;
use tracing::{error, info, warn};

use crate::error::Recovered;
use crate::path_safety::destination_path;
use crate::tree::{Fetch, FileEntry};

/// What happened to one file of a chunk.
#[derive(Debug)]
pub struct FileReport {
    pub rel_path: String,
    /// Bytes written, or `None` when the file was skipped.
    pub written: Option<u64>,
    /// Everything that went wrong along the way, in order.
    pub recovered: Vec<Recovered>,
}

#[derive(Debug, Default)]
pub struct DownloadReport {
    pub files: Vec<FileReport>,
    /// Files of chunks whose worker died before reporting.
    pub lost: Vec<String>,
}

impl DownloadReport {
    pub fn written(&self) -> usize {
        self.files.iter().filter(|f| f.written.is_some()).count()
    }
    pub fn skipped(&self) -> usize {
        self.files.len() - self.written() + self.lost.len()
    }
    pub fn recovered(&self) -> impl Iterator<Item = &Recovered> {
        self.files.iter().flat_map(|f| f.recovered.iter())
    }
}

/// Download every chunk under `root`, one OS thread per chunk, and wait for all of them.
///
/// Per-file failures never surface as `Err`; they are logged and recorded in
/// the report. The only error is failing to start a worker thread.
pub fn download_chunks<F: Fetch + ?Sized>(
    chunks: Vec<Vec<FileEntry>>,
    root: &Path,
    fetcher: &F,
) -> Result<DownloadReport> {
    thread::scope(|s| -> Result<DownloadReport> {
        let mut workers = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.into_iter().enumerate() {
            let names: Vec<String> = chunk.iter().map(|e| e.rel_path.clone()).collect();
            let handle = thread::Builder::new()
                .name(format!("download-{i}"))
                .spawn_scoped(s, move || download_chunk(&chunk, root, fetcher))
                .with_context(|| format!("spawn download worker {i}"))?;
            workers.push((i, names, handle));
        }

        let mut report = DownloadReport::default();
        for (i, names, handle) in workers {
            match handle.join() {
                Ok(files) => report.files.extend(files),
                Err(_) => {
                    error!(worker = i, files = names.len(), "download worker panicked");
                    report.lost.extend(names);
                }
            }
        }
        Ok(report)
    })
}

/// Fetch and store the files of one chunk, in order.
pub fn download_chunk<F: Fetch + ?Sized>(
    chunk: &[FileEntry],
    root: &Path,
    fetcher: &F,
) -> Vec<FileReport> {
    chunk.iter().map(|entry| download_one(entry, root, fetcher)).collect()
}

fn download_one<F: Fetch + ?Sized>(entry: &FileEntry, root: &Path, fetcher: &F) -> FileReport {
    let mut report =
        FileReport { rel_path: entry.rel_path.clone(), written: None, recovered: Vec::new() };

    let dest = match destination_path(root, &entry.rel_path) {
        Ok(p) => p,
        Err(e) => {
            let err = Recovered::UnsafePath { rel_path: entry.rel_path.clone(), reason: e.to_string() };
            return skip(report, err);
        }
    };

    // A failed mkdir is only noted: the write below reports the real outcome.
    if let Some(parent) = dest.parent() {
        if !parent.is_dir() {
            if let Err(source) = fs::create_dir_all(parent) {
                let err = Recovered::CreateDir { path: parent.to_path_buf(), source };
                warn!("{err}");
                report.recovered.push(err);
            }
        }
    }

    let body = match fetcher.get(&entry.download_url) {
        Ok(b) => b,
        Err(source) => {
            return skip(report, Recovered::Download { url: entry.download_url.clone(), source })
        }
    };

    if let Err(source) = fs::write(&dest, &body) {
        return skip(report, Recovered::Write { path: dest, source });
    }
    info!(path = %entry.rel_path, bytes = body.len(), "downloaded");
    report.written = Some(body.len() as u64);
    report
}

fn skip(mut report: FileReport, err: Recovered) -> FileReport {
    warn!(path = %report.rel_path, "skipped: {err}");
    report.recovered.push(err);
    report
}
