use anyhow::{Context, Result};
use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::checksum::sha256_file;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestRecord {
    pub rel_path: String,
    pub checksum_hex: String,
}

impl ManifestRecord {
    /// `<path>: <hexdigest>` without the trailing newline.
    pub fn line(&self) -> String {
        format!("{}: {}", self.rel_path, self.checksum_hex)
    }
}

/// Path of `path` below the scan `root`, with `/` separators on every platform.
///
/// `None` when `path` is not under `root` or is `root` itself.
pub fn strip_scan_root(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> =
        rel.components().map(|c| c.as_os_str().to_string_lossy().into_owned()).collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

// Files of a directory before its subdirectories, each group by name.
fn files_then_dirs(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Regular files under `root` in traversal order, paired with their manifest path.
///
/// `exclude` is skipped if met (the manifest file itself when it lives inside the tree).
pub fn walk_files(root: &Path, exclude: Option<&Path>) -> Result<Vec<(PathBuf, String)>> {
    let mut out = Vec::new();
    for ent in WalkDir::new(root).min_depth(1).sort_by(files_then_dirs) {
        let ent = ent.with_context(|| format!("walk {}", root.display()))?;
        if !ent.file_type().is_file() {
            continue;
        }
        if exclude.is_some_and(|x| x == ent.path()) {
            continue;
        }
        if let Some(rel_path) = strip_scan_root(root, ent.path()) {
            out.push((ent.into_path(), rel_path));
        }
    }
    Ok(out)
}

/// Hash every regular file under `root` in traversal order.
pub fn collect_records(root: &Path, exclude: Option<&Path>) -> Result<Vec<ManifestRecord>> {
    walk_files(root, exclude)?
        .into_iter()
        .map(|(path, rel_path)| -> Result<ManifestRecord> {
            let checksum_hex =
                sha256_file(&path).with_context(|| format!("hash {}", path.display()))?;
            Ok(ManifestRecord { rel_path, checksum_hex })
        })
        .collect()
}

/// Hash the tree under `root`, write the manifest to `output` and echo each line to `progress`.
///
/// All hashing finishes before `output` is created or truncated.
pub fn write_manifest<W: Write>(
    root: &Path,
    output: &Path,
    progress: &mut W,
) -> Result<Vec<ManifestRecord>> {
    let exclude = path_in_tree(root, output);
    let records = collect_records(root, exclude.as_deref())?;
    let f = File::create(output).with_context(|| format!("create {}", output.display()))?;
    let mut w = BufWriter::new(f);
    for r in &records {
        let line = r.line();
        writeln!(w, "{line}").with_context(|| format!("write {}", output.display()))?;
        writeln!(progress, "{line}")?;
    }
    w.flush().with_context(|| format!("write {}", output.display()))?;
    Ok(records)
}

/// `path` spelled as `root.join(..)` (the form WalkDir yields), if it lies under `root`.
pub fn path_in_tree(root: &Path, path: &Path) -> Option<PathBuf> {
    let root_abs = std::path::absolute(root).ok()?;
    let out_abs = std::path::absolute(path).ok()?;
    let rel = out_abs.strip_prefix(&root_abs).ok()?;
    Some(root.join(rel))
}
