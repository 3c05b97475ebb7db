use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::Recovered;

/// Remove `path` and everything below it. Failure is logged and handed back, never raised.
pub fn remove_directory(path: &Path) -> Option<Recovered> {
    match fs::remove_dir_all(path) {
        Ok(()) => {
            info!(path = %path.display(), "removed staging directory");
            None
        }
        Err(source) => {
            let err = Recovered::Cleanup { path: path.to_path_buf(), source };
            warn!("{err}");
            Some(err)
        }
    }
}
