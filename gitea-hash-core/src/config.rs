use std::path::PathBuf;

use crate::error::Fatal;
use crate::tree::RepoId;

pub const DEFAULT_REPO_URL: &str = "https://gitea.radium.group/radium/project-configuration";
pub const DEFAULT_DESTINATION: &str = "tmp";
pub const DEFAULT_RESULT_FILE: &str = "HASHING_RESULTS.txt";

/// Everything one run needs to know, fixed at startup.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub repo_url: String,
    /// Staging folder the repository is downloaded into.
    pub destination: PathBuf,
    /// File name of the manifest, placed next to the staging folder.
    pub result_file_name: String,
    /// Leave the staging folder in place after hashing.
    pub keep_destination: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            repo_url: DEFAULT_REPO_URL.to_string(),
            destination: PathBuf::from(DEFAULT_DESTINATION),
            result_file_name: DEFAULT_RESULT_FILE.to_string(),
            keep_destination: false,
        }
    }
}

impl RunConfig {
    pub fn repo(&self) -> Result<RepoId, Fatal> {
        self.repo_url.parse()
    }

    /// `<parent of the absolute destination>/<result file name>`.
    pub fn manifest_path(&self) -> std::io::Result<PathBuf> {
        let dest = std::path::absolute(&self.destination)?;
        let parent = dest.parent().map(PathBuf::from).unwrap_or_else(|| dest.clone());
        Ok(parent.join(&self.result_file_name))
    }
}
