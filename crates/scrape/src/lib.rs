#![forbid(unsafe_code)]

//! Provider scrapers and the per-record correlation engine.
//!
//! Two symmetric but non-identical pipelines turn a build page into
//! structured data: [`buildbot`] recovers a step list with per-step logs,
//! [`jenkins`] recovers one console stream. [`analyze`] drives a
//! [`FailureRecord`](janitor_core::model::FailureRecord) through the whole
//! straight-line pipeline: fetch the summary email, classify its first
//! link, scrape the reported build and the job's latest build, correlate
//! the two, and tag the result.

use std::time::Duration;

use janitor_fetch::Fetch;

pub mod analyze;
pub mod buildbot;
pub mod jenkins;

pub use analyze::analyze;

/// Fetch a page and lossy-decode it. An unreachable page comes back as an
/// empty string, which every extraction treats as "no data".
pub(crate) fn fetch_page(
    fetch: &dyn Fetch,
    url: &str,
    max_age: Duration,
) -> janitor_fetch::Result<String> {
    Ok(String::from_utf8_lossy(&fetch.get(url, max_age)?).into_owned())
}
