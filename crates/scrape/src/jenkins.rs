//! Scraper for the stream-based provider (jenkins).
//!
//! There is no step structure to recover: one build has one console stream,
//! served as plain text under a fixed suffix of the build URL. Success is
//! decided purely textually from the console's trailing line.

use std::time::Duration;

use janitor_core::html;
use janitor_fetch::Fetch;

use crate::fetch_page;

/// Fixed path under a build URL where the plain-text console lives.
const CONSOLE_SUFFIX: &str = "consoleText";

/// Final line of a console that finished green.
pub const COMPLETION_MARKER: &str = "Finished: SUCCESS";

/// Build number from a build page's title.
///
/// The title carries the number after the last `#`, possibly followed by
/// descriptive text (`"job #184 Console [Jenkins]"`), so extraction stops
/// at the first space. A missing title (or an unreachable page) yields
/// `None`, which callers must treat as "could not determine".
pub fn build_number(
    fetch: &dyn Fetch,
    url: &str,
    max_age: Duration,
) -> janitor_fetch::Result<Option<String>> {
    let page = fetch_page(fetch, url, max_age)?;
    let number = html::title_text(&page)
        .map(|title| {
            let after = title
                .rsplit_once('#')
                .map(|(_, n)| n.to_string())
                .unwrap_or(title);
            after.split(' ').next().unwrap_or("").to_string()
        })
        .filter(|n| !n.is_empty());
    Ok(number)
}

/// The build's console output, lossy-decoded. `build_url` must carry its
/// trailing slash (the classifier guarantees it).
pub fn console_text(
    fetch: &dyn Fetch,
    build_url: &str,
    max_age: Duration,
) -> janitor_fetch::Result<String> {
    fetch_page(fetch, &format!("{build_url}{CONSOLE_SUFFIX}"), max_age)
}

/// A build is green iff the console, stripped of trailing whitespace, ends
/// exactly in the completion marker. Truncated or empty output is failure.
pub fn succeeded(console_text: &str) -> bool {
    console_text.trim_end().ends_with(COMPLETION_MARKER)
}
