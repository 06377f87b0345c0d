//! Line scan over the piped test-summarizer email.
//!
//! Three line shapes matter: a `Date:` header, a `[<n>] <TITLE>` failure
//! heading at column zero, and an indented mail-archive URL. Every URL line
//! becomes one [`FailureRecord`] paired with the most recent heading.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::FailureRecord;

pub const UNKNOWN_DATE: &str = "<unknown date>";
pub const UNKNOWN_TITLE: &str = "<unknown title>";

fn date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Date: (.*)$").expect("date regex"))
}

fn title_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\[\d+\]\s*[A-Z].*)").expect("title regex"))
}

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s+(https://mail\.zope\.org/pipermail/zope-tests/.*\.html)")
            .expect("url regex")
    })
}

/// Outcome of scanning the summary email.
#[derive(Debug)]
pub struct ParsedEmail {
    /// Report date; the last `Date:` line wins when several occur.
    pub date: String,
    pub failures: Vec<FailureRecord>,
}

/// Scan the email lines in order and collect one record per reported URL.
pub fn parse_summary_email<I, S>(lines: I) -> ParsedEmail
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut date = UNKNOWN_DATE.to_string();
    let mut title = UNKNOWN_TITLE.to_string();
    let mut failures = Vec::new();

    for line in lines {
        let line = line.as_ref().trim_end();
        if let Some(m) = date_regex().captures(line) {
            date = m[1].to_string();
            continue;
        }
        if let Some(m) = title_regex().captures(line) {
            title = m[1].to_string();
            continue;
        }
        if let Some(m) = url_regex().captures(line) {
            failures.push(FailureRecord::new(&title, &m[1]));
        }
    }

    ParsedEmail { date, failures }
}
