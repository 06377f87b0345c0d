//! Per-record correlation engine.
//!
//! Analysis is a short straight-line pipeline, not a general graph: fetch
//! the summary email page, classify its first link, scrape the reported
//! build, scrape the job's latest build (with a much shorter staleness
//! budget: "latest" pointers move, historical logs don't), decide whether
//! the latest build superseded the failure, and finally tag it.

use tracing::warn;

use janitor_core::html;
use janitor_core::links::{classify, Provider};
use janitor_core::model::FailureRecord;
use janitor_core::signatures::SignatureTable;
use janitor_fetch::{Fetch, ONE_DAY, ONE_HOUR};

use crate::{buildbot, fetch_page, jenkins};

/// Run the full analysis pipeline for one record.
///
/// Only local cache I/O can fail here; everything page-shaped degrades to
/// absent values, and an unrecognized first link simply leaves the record
/// without build data (tagging then runs over nothing and is a no-op).
pub fn analyze(
    record: &mut FailureRecord,
    fetch: &dyn Fetch,
    signatures: &SignatureTable,
) -> janitor_fetch::Result<()> {
    let page = fetch_page(fetch, &record.summary_url, ONE_DAY)?;
    record.summary_body = html::first_pre(&page).map(str::to_string);
    record.first_link = record.summary_body.as_deref().and_then(html::first_link_in);

    let first_link = record.first_link.clone();
    if let Some(link) = first_link.as_deref() {
        match classify(link) {
            Some(Provider::Buildbot) => analyze_buildbot(record, fetch, link)?,
            Some(Provider::Jenkins) => analyze_jenkins(record, fetch, link)?,
            None => {}
        }
    }

    signatures.assign_tag(record);
    Ok(())
}

fn analyze_buildbot(
    record: &mut FailureRecord,
    fetch: &dyn Fetch,
    link: &str,
) -> janitor_fetch::Result<()> {
    let (build_link, _) = Provider::Buildbot.this_build(link);
    let (last_link, _) = Provider::Buildbot.latest_build(link);

    let (steps, number) = buildbot::scrape_build(fetch, &build_link, None, false, ONE_DAY)?;
    record.build_link = Some(build_link);
    record.build_number = number;
    record.steps = steps;

    let (last_steps, last_number) = buildbot::scrape_build(
        fetch,
        &last_link,
        record.build_number.as_deref(),
        true,
        ONE_HOUR,
    )?;
    record.last_build_link = Some(last_link);
    record.last_build_number = last_number;
    record.last_steps = last_steps;

    // When latest turned out to be the build we already scraped, its step
    // fetch was skipped; judge it from the current data instead.
    let superseded = record.has_last_build();
    record.last_build_successful = if superseded {
        Some(buildbot::build_succeeded(&record.last_steps))
    } else {
        Some(buildbot::build_succeeded(&record.steps))
    };

    record.build_source = buildbot::extract_source_stamp(&record.steps);
    let latest_for_source = if record.last_steps.is_empty() {
        &record.steps
    } else {
        &record.last_steps
    };
    record.last_build_source = buildbot::extract_source_stamp(latest_for_source);

    warn_on_inconsistent_numbers(record);
    Ok(())
}

fn analyze_jenkins(
    record: &mut FailureRecord,
    fetch: &dyn Fetch,
    link: &str,
) -> janitor_fetch::Result<()> {
    let (build_link, build_number) = Provider::Jenkins.this_build(link);
    let (last_link, _) = Provider::Jenkins.latest_build(link);

    let console = jenkins::console_text(fetch, &build_link, ONE_DAY)?;
    record.build_link = Some(build_link);
    record.build_number = Some(build_number);
    record.console_text = (!console.is_empty()).then_some(console);

    record.last_build_number = jenkins::build_number(fetch, &last_link, ONE_HOUR)?;
    record.last_build_link = Some(last_link.clone());

    if let Some(last_number) = record.last_build_number.clone() {
        if record.build_number.as_deref() == Some(last_number.as_str()) {
            // Latest is the build we already fetched; judge it from that
            // console instead of fetching identical content again.
            record.last_build_successful = record.console_text.as_deref().map(jenkins::succeeded);
        } else if let Some(url) = Provider::Jenkins.normalize_build_url(&last_link, &last_number) {
            let text = jenkins::console_text(fetch, &url, ONE_DAY)?;
            record.last_build_successful = Some(jenkins::succeeded(&text));
            record.last_console_text = (!text.is_empty()).then_some(text);
        }
    }

    warn_on_inconsistent_numbers(record);
    Ok(())
}

/// A "latest" build older than the one that failed means the provider's
/// pointers disagree with its pages. Surface it and keep going with the
/// values as fetched; discarding them silently would hide the problem.
fn warn_on_inconsistent_numbers(record: &FailureRecord) {
    let (Some(last), Some(current)) = (
        record.last_build_number.as_deref(),
        record.build_number.as_deref(),
    ) else {
        return;
    };
    if let (Ok(last_n), Ok(current_n)) = (last.parse::<i64>(), current.parse::<i64>()) {
        if last_n < current_n {
            warn!(
                "last build ({last_n}) older than current build ({current_n})?! {}",
                record.last_build_link.as_deref().unwrap_or("")
            );
        }
    }
}
