use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::{Fetch, PageCache, Result};

/// Blocking HTTP client in front of a [`PageCache`].
///
/// All fetching is synchronous and sequential; one client is built once
/// with the global socket timeout and reused for every request.
#[derive(Debug)]
pub struct Fetcher {
    cache: PageCache,
    http: reqwest::blocking::Client,
}

impl Fetcher {
    pub fn new(cache_dir: impl Into<PathBuf>, timeout: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("test-janitor/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            cache: PageCache::new(cache_dir),
            http,
        })
    }

    /// Live fetch. Network errors and non-success statuses degrade to empty
    /// bytes: "no data available", never an exception.
    fn download(&self, url: &str) -> Vec<u8> {
        info!("downloading {url}");
        let result = self
            .http
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.bytes());
        match result {
            Ok(bytes) => bytes.to_vec(),
            Err(err) => {
                debug!("download of {url} failed: {err}");
                Vec::new()
            }
        }
    }
}

impl Fetch for Fetcher {
    fn get(&self, url: &str, max_age: Duration) -> Result<Vec<u8>> {
        if let Some(bytes) = self.cache.lookup(url, max_age) {
            debug!("using cached copy of {url}");
            return Ok(bytes);
        }
        let bytes = self.download(url);
        self.cache.store(url, &bytes)?;
        Ok(bytes)
    }
}
