use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::{Fatal, FetchError};

/// One remote file: where it lives in the repository and where to download it from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileEntry {
    pub rel_path: String,
    pub download_url: String,
}

/// A repository on a Gitea host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoId {
    pub host: String,
    pub owner: String,
    pub project: String,
}

impl RepoId {
    /// Listing URL of the repository root.
    pub fn contents_url(&self) -> String {
        format!(
            "https://{}/api/v1/repos/{}/{}/contents/",
            self.host, self.owner, self.project
        )
    }
}

impl FromStr for RepoId {
    type Err = Fatal;

    /// Accepts `scheme://host/owner/project`; the scheme and one trailing slash are optional.
    fn from_str(url: &str) -> Result<Self, Self::Err> {
        let bare = url.rsplit("://").next().unwrap_or(url);
        let bare = bare.strip_suffix('/').unwrap_or(bare);
        let parts: Vec<&str> = bare.split('/').collect();
        match parts.as_slice() {
            [host, owner, project]
                if !host.is_empty() && !owner.is_empty() && !project.is_empty() =>
            {
                Ok(RepoId {
                    host: host.to_string(),
                    owner: owner.to_string(),
                    project: project.to_string(),
                })
            }
            _ => Err(Fatal::InvalidRepoUrl { url: url.to_string() }),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.host, self.owner, self.project)
    }
}

/// Blocking GET of a URL's full body. Shared read-only between download workers.
pub trait Fetch: Sync {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// [`Fetch`] over a blocking reqwest client. Non-2xx answers are errors.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> anyhow::Result<Self> {
        // No request deadline: a slow listing or download waits rather than failing.
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("gitea-hash/", env!("CARGO_PKG_VERSION")))
            .timeout(None)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { status: status.as_u16() });
        }
        let body = resp.bytes().map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(body.to_vec())
    }
}

/// The fields of a `contents` listing item that the traversal looks at.
#[derive(Deserialize, Debug)]
struct ListingItem {
    #[serde(rename = "type")]
    kind: Option<String>,
    path: Option<String>,
    download_url: Option<String>,
    html_url: Option<String>,
    url: Option<String>,
}

/// Path segment of the browsable page and of the raw download for the same file.
const VIEW_SEGMENT: &str = "/src/";
const RAW_SEGMENT: &str = "/raw/";

/// Turn a browsable file URL into a raw-content URL (first `/src/` only).
pub fn raw_url_from_html(html_url: &str) -> String {
    html_url.replacen(VIEW_SEGMENT, RAW_SEGMENT, 1)
}

/// List every file in the repository.
///
/// Directories are walked with an explicit stack. Any fetch failure or
/// malformed listing aborts and nothing is returned; the order of the result
/// is unspecified.
pub fn enumerate_files<F: Fetch + ?Sized>(
    repo: &RepoId,
    fetcher: &F,
) -> Result<Vec<FileEntry>, Fatal> {
    enumerate_listing(repo.contents_url(), fetcher)
}

/// [`enumerate_files`] starting from an explicit root listing URL.
pub fn enumerate_listing<F: Fetch + ?Sized>(
    root_listing: String,
    fetcher: &F,
) -> Result<Vec<FileEntry>, Fatal> {
    let mut stack = vec![root_listing];
    let mut files = Vec::new();
    while let Some(listing_url) = stack.pop() {
        debug!(url = %listing_url, "fetching listing");
        let body = fetcher.get(&listing_url).map_err(|source| Fatal::ListingFetch {
            url: listing_url.clone(),
            source,
        })?;
        let items: Vec<ListingItem> =
            serde_json::from_slice(&body).map_err(|e| malformed(&listing_url, e.to_string()))?;
        for mut item in items {
            let kind = item.kind.take();
            match kind.as_deref() {
                Some("file") => files.push(file_entry(&listing_url, item)?),
                Some("dir") => match item.url {
                    Some(url) if !url.is_empty() => stack.push(url),
                    _ => return Err(malformed(&listing_url, "directory entry without url".into())),
                },
                Some(other) => {
                    let reason = format!("unrecognized entry type {other:?}");
                    return Err(malformed(&listing_url, reason));
                }
                None => return Err(malformed(&listing_url, "entry without type".into())),
            }
        }
    }
    Ok(files)
}

fn file_entry(listing_url: &str, item: ListingItem) -> Result<FileEntry, Fatal> {
    let rel_path = match item.path {
        Some(p) if !p.is_empty() => p,
        _ => return Err(malformed(listing_url, "file entry without path".into())),
    };
    let download_url = match (item.download_url, item.html_url) {
        (Some(u), _) if !u.is_empty() => u,
        (_, Some(html)) if !html.is_empty() => raw_url_from_html(&html),
        _ => {
            return Err(malformed(
                listing_url,
                format!("file {rel_path:?} has neither download_url nor html_url"),
            ))
        }
    };
    Ok(FileEntry { rel_path, download_url })
}

fn malformed(url: &str, reason: String) -> Fatal {
    Fatal::MalformedListing { url: url.to_string(), reason }
}
