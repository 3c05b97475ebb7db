use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single HTTP GET.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server answered HTTP {status}")]
    Status { status: u16 },
}

/// Errors that abort the whole run. Nothing from the failing phase is kept.
#[derive(Debug, Error)]
pub enum Fatal {
    #[error("invalid repository url {url:?}: expected scheme://host/owner/project")]
    InvalidRepoUrl { url: String },
    #[error("failed to fetch listing {url}: {source}")]
    ListingFetch {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("malformed listing {url}: {reason}")]
    MalformedListing { url: String, reason: String },
}

/// Errors that are logged and absorbed at the scope of one file (or the final cleanup).
#[derive(Debug, Error)]
pub enum Recovered {
    #[error("could not create directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("refusing to write {rel_path:?}: {reason}")]
    UnsafePath { rel_path: String, reason: String },
    #[error("download of {url} failed: {source}")]
    Download {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("could not write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not remove {path:?}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
