use anyhow::{bail, Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::checksum::sha256_file;
use crate::manifest::{path_in_tree, walk_files, ManifestRecord};
use crate::path_safety::destination_path;

#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    pub ok: Vec<String>,
    pub mismatched: Vec<String>,
    pub missing: Vec<String>,
    /// Files under the root that the manifest does not list.
    pub extra: Vec<String>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.mismatched.is_empty() && self.missing.is_empty() && self.extra.is_empty()
    }
}

/// Parse a manifest written by [`crate::manifest::write_manifest`].
pub fn read_manifest(path: &Path) -> Result<Vec<ManifestRecord>> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_manifest(&text).with_context(|| format!("parse {}", path.display()))
}

pub fn parse_manifest(text: &str) -> Result<Vec<ManifestRecord>> {
    let mut out = Vec::new();
    for (no, line) in text.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        // Paths may contain ": ", digests never do.
        let Some((rel_path, hex)) = line.rsplit_once(": ") else {
            bail!("line {}: expected `<path>: <sha256>`", no + 1);
        };
        if hex.len() != 64 || !hex.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            bail!("line {}: {:?} is not a lowercase sha256 digest", no + 1, hex);
        }
        out.push(ManifestRecord { rel_path: rel_path.to_string(), checksum_hex: hex.to_string() });
    }
    Ok(out)
}

/// Re-hash the files listed in `manifest_path` under `root` and compare.
pub fn verify(manifest_path: &Path, root: &Path) -> Result<VerifyReport> {
    let expected = read_manifest(manifest_path)?;
    verify_records(&expected, root, Some(manifest_path))
}

pub fn verify_records(
    expected: &[ManifestRecord],
    root: &Path,
    manifest_path: Option<&Path>,
) -> Result<VerifyReport> {
    let mut rep = VerifyReport::default();
    let mut listed = BTreeSet::new();
    for rec in expected {
        listed.insert(rec.rel_path.as_str());
        let path = destination_path(root, &rec.rel_path)?;
        if !path.is_file() {
            rep.missing.push(rec.rel_path.clone());
            continue;
        }
        let actual = sha256_file(&path).with_context(|| format!("hash {}", path.display()))?;
        if actual == rec.checksum_hex {
            rep.ok.push(rec.rel_path.clone());
        } else {
            rep.mismatched.push(rec.rel_path.clone());
        }
    }
    let manifest_in_tree = manifest_path.and_then(|m| path_in_tree(root, m));
    for (_, rel_path) in walk_files(root, manifest_in_tree.as_deref())? {
        if !listed.contains(rel_path.as_str()) {
            rep.extra.push(rel_path);
        }
    }
    Ok(rep)
}
