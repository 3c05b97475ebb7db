use anyhow::{bail, Result};
use std::path::{Component, Path, PathBuf};

/// Map a repository-relative path (forward slashes) to a location under `root`.
///
/// Rejects empty, absolute and `..` paths, and any path whose existing
/// components under `root` are symlinks, so that a listing cannot make a
/// download land outside the destination tree.
pub fn destination_path(root: &Path, rel: &str) -> Result<PathBuf> {
    if rel.is_empty() {
        bail!("empty relative path");
    }
    if rel.starts_with('/') || rel.starts_with('\\') {
        bail!("absolute paths are not allowed: {:?}", rel);
    }
    let mut candidate = root.to_path_buf();
    for seg in rel.split('/') {
        if seg.is_empty() || seg == "." {
            continue;
        }
        let seg_path = Path::new(seg);
        let mut comps = seg_path.components();
        match (comps.next(), comps.next()) {
            (Some(Component::Normal(_)), None) => {}
            (Some(Component::ParentDir), None) => bail!("parent traversal not allowed: {:?}", rel),
            _ => bail!("unsupported path segment {:?} in {:?}", seg, rel),
        }
        candidate.push(seg_path);
        if let Ok(m) = std::fs::symlink_metadata(&candidate) {
            if m.file_type().is_symlink() {
                bail!("symlink in path (not following): {:?}", candidate);
            }
        }
    }
    if candidate == root {
        bail!("path names the destination root itself: {:?}", rel);
    }
    Ok(candidate)
}
