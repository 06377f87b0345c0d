#![forbid(unsafe_code)]

//! Fetch-and-cache client.
//!
//! Resolves a URL to bytes, honoring a per-call staleness budget, and owns
//! the on-disk persistence. Two budgets exist in practice: historical build
//! pages and step logs are immutable and cached for [`ONE_DAY`]; "latest
//! build" pointers must reflect near-real-time state and use [`ONE_HOUR`].
//!
//! A failed live fetch is not an error here: it yields empty bytes, which
//! are persisted too so a dead link is not hammered on every run. The only
//! errors this crate surfaces are local I/O failures around the cache.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

mod cache;
mod client;
mod memory;

pub use cache::PageCache;
pub use client::Fetcher;
pub use memory::MemoryFetch;

pub const ONE_HOUR: Duration = Duration::from_secs(60 * 60);
pub const ONE_DAY: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Error)]
pub enum Error {
    #[error("create cache directory {path}: {source}")]
    CreateCacheDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("write cache entry {path}: {source}")]
    WriteCacheEntry {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("build http client: {0}")]
    BuildClient(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// The seam the scrapers consume: resolve a URL to bytes, serving from the
/// cache when the entry is younger than `max_age`.
pub trait Fetch {
    fn get(&self, url: &str, max_age: Duration) -> Result<Vec<u8>>;
}
