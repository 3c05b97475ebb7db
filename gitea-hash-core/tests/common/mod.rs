#![allow(dead_code)]

use gitea_hash_core::error::FetchError;
use gitea_hash_core::tree::Fetch;
use std::collections::HashMap;

/// In-memory `Fetch`: known URLs answer with their body, anything else is a 404.
#[derive(Default)]
pub struct FakeFetcher {
    bodies: HashMap<String, Vec<u8>>,
    broken: HashMap<String, u16>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.bodies.insert(url.to_string(), body.into());
        self
    }
    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.broken.insert(url.to_string(), status);
        self
    }
}

impl Fetch for FakeFetcher {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if let Some(&status) = self.broken.get(url) {
            return Err(FetchError::Status { status });
        }
        self.bodies.get(url).cloned().ok_or(FetchError::Status { status: 404 })
    }
}

pub const ROOT_LISTING: &str = "https://example.com/api/v1/repos/user/repo/contents/";
