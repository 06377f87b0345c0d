//! Scraper for the step-based provider (buildbot).
//!
//! A build page lists its steps as `div.result` blocks whose anchor leads
//! to the step's stdio log. The build number lives in the page title after
//! the last `#`. Pages fetched through the `-1` "latest" sentinel emit
//! step links relative to `-1/…`, which are only valid once rewritten to
//! the concrete build number.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use url::Url;

use janitor_core::html;
use janitor_core::links::{self, Provider};
use janitor_core::model::{BuildStep, SourceStamp};
use janitor_fetch::{Fetch, ONE_DAY};

use crate::fetch_page;

/// Suffix under a step link where the captured stdio lives.
const STDIO_SUFFIX: &str = "/logs/stdio";

/// Scrape one build page into its step list and build number.
///
/// `skip_if` short-circuits the expensive part: when the page's resolved
/// build number equals it, the caller already holds this build's steps and
/// no log fetches happen; the step list comes back empty. `normalize`
/// requests the `-1/…` step-link rewrite for pages reached through the
/// "latest" sentinel.
///
/// A missing title (or an unreachable page) yields `None` for the build
/// number: "could not determine", never zero and never an error.
pub fn scrape_build(
    fetch: &dyn Fetch,
    url: &str,
    skip_if: Option<&str>,
    normalize: bool,
    max_age: Duration,
) -> janitor_fetch::Result<(Vec<BuildStep>, Option<String>)> {
    let page = fetch_page(fetch, url, max_age)?;
    let number = html::title_text(&page).map(|title| {
        title
            .rsplit_once('#')
            .map(|(_, n)| n.to_string())
            .unwrap_or(title)
    });

    if let (Some(skip), Some(n)) = (skip_if, number.as_deref()) {
        if skip == n {
            return Ok((Vec::new(), number));
        }
    }

    // Relative step links resolve against the concrete build page, not the
    // -1 sentinel the provider served.
    let page_url = if normalize {
        number
            .as_deref()
            .and_then(|n| Provider::Buildbot.normalize_build_url(url, n))
            .unwrap_or_else(|| url.to_string())
    } else {
        url.to_string()
    };
    let base = Url::parse(&page_url).ok();

    let mut steps = Vec::new();
    for div in html::result_divs(&page) {
        let mut rel = div.link_href;
        if normalize {
            if let Some(n) = number.as_deref() {
                if let Some(rewritten) = links::normalize_step_link(&rel, n) {
                    rel = rewritten;
                }
            }
        }
        let resolved = base
            .as_ref()
            .and_then(|b| b.join(&rel).ok())
            .map(|u| u.to_string())
            .unwrap_or(rel);
        let link = format!("{resolved}{STDIO_SUFFIX}");
        let log_page = fetch_page(fetch, &link, ONE_DAY)?;
        steps.push(BuildStep {
            title: div.link_text,
            link,
            status_class: div.class,
            text: step_text(&log_page),
        });
    }
    Ok((steps, number))
}

/// Assemble a step's captured output into one `<pre>` fragment: the leading
/// command line, the stdout/stderr spans verbatim, and the trailing
/// exit-status line. Header spans arrive entity-escaped from the provider
/// and are reused as-is.
fn step_text(log_page: &str) -> String {
    let headers = html::header_spans(log_page);
    let mut out = String::from("<pre>");
    if let Some(first) = headers.first() {
        let line = first.lines().next().unwrap_or("").trim_end();
        out.push_str("<span class=\"header\">");
        out.push_str(line);
        out.push_str("</span>\n");
    }
    for span in html::output_spans(log_page) {
        out.push_str(&span);
    }
    if headers.len() >= 2 {
        if let Some(last) = headers.last() {
            let line = last.lines().next().unwrap_or("").trim_end();
            out.push_str("<span class=\"header\">");
            out.push_str(line);
            out.push_str("</span>\n");
        }
    }
    out.push_str("</pre>");
    out
}

/// A build is green iff it has steps and every one of them passed. An empty
/// step list is never successful; "no data" must not read as "all passed".
pub fn build_succeeded(steps: &[BuildStep]) -> bool {
    !steps.is_empty() && steps.iter().all(BuildStep::is_success)
}

fn fetch_origin_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // The line may open mid-fragment, right after the span markup.
    RE.get_or_init(|| Regex::new(r"(?m)^(?:<[^>]*>)*From (\S+)").expect("fetch origin regex"))
}

fn head_revision_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"HEAD is now at ([0-9a-fA-F]{7,40})").expect("head revision regex"))
}

/// Recover the commit identity from a source-checkout step, if any.
///
/// Looks for the `From <repository>` line of a git fetch and the
/// `HEAD is now at <revision>` line of the following reset; both must come
/// from the same step for a stamp to be constructed.
pub fn extract_source_stamp(steps: &[BuildStep]) -> Option<SourceStamp> {
    for step in steps {
        let repository = fetch_origin_regex()
            .captures(&step.text)
            .map(|m| m[1].to_string());
        let revision = head_revision_regex()
            .captures(&step.text)
            .map(|m| m[1].to_string());
        if let (Some(repository), Some(revision)) = (repository, revision) {
            return Some(SourceStamp {
                repository,
                revision,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(status_class: &str, text: &str) -> BuildStep {
        BuildStep {
            title: "step".into(),
            link: "http://example.org/builds/1/0/logs/stdio".into(),
            status_class: status_class.into(),
            text: text.into(),
        }
    }

    #[test]
    fn empty_step_list_is_never_successful() {
        assert!(!build_succeeded(&[]));
    }

    #[test]
    fn all_green_steps_make_a_green_build() {
        assert!(build_succeeded(&[
            step("success result", "<pre></pre>"),
            step("success result", "<pre></pre>"),
        ]));
        assert!(!build_succeeded(&[
            step("success result", "<pre></pre>"),
            step("failure result", "<pre></pre>"),
        ]));
    }

    #[test]
    fn source_stamp_needs_both_halves_in_one_step() {
        let checkout = step(
            "success result",
            "<pre>From git://github.com/zopefoundation/z3c.form\nHEAD is now at abc1234 Fix the thing</pre>",
        );
        let stamp = extract_source_stamp(&[checkout]).unwrap();
        assert_eq!(stamp.repository, "git://github.com/zopefoundation/z3c.form");
        assert_eq!(stamp.revision, "abc1234");

        let fetch_only = step("success result", "<pre>From git://example.org/repo</pre>");
        let reset_only = step("success result", "<pre>HEAD is now at abc1234</pre>");
        assert_eq!(extract_source_stamp(&[fetch_only, reset_only]), None);
    }
}
