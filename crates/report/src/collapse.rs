//! Section-aware truncation of long `<pre>` blocks.
//!
//! Collapsing is lossless: hidden lines stay in the document inside an
//! `<article>` and are revealed by the reader, not re-fetched. The middle of
//! a long block is partitioned at section markers (a shell command echoed by
//! the build opens a section); each partition collapses into one unit whose
//! label counts the hidden lines and any error lines among them.

use std::sync::OnceLock;

use regex::Regex;

use janitor_core::html::escape;

/// Opening markup of a section line; lines starting with this split the
/// collapsed middle into separate units.
pub const SECTION_MARKER: &str = "<span class=\"section\">";

const ERROR_MARKER: &str = "<span class=\"error\">";

/// Head lines always kept visible.
pub const FIRST_LINES: usize = 4;
/// Tail lines always kept visible.
pub const LAST_LINES: usize = 30;
/// Smallest middle worth collapsing; shorter blocks pass through unchanged.
pub const MIN_MIDDLE_LINES: usize = 5;

fn error_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^(Traceback.*(?:\n .*)*\n[^ ].*|ERROR:.*)").expect("error regex")
    })
}

fn section_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^(\+.*)").expect("section regex"))
}

/// Escape a raw console stream and mark it up: traceback blocks and
/// `ERROR:` lines become error spans, echoed commands become section lines.
pub fn format_console_text(text: &str) -> String {
    let escaped = escape(text);
    let marked = error_regex().replace_all(&escaped, "<span class=\"error\">${1}</span>");
    let marked = section_regex().replace_all(&marked, "<span class=\"section\">${1}</span>");
    format!("<pre>{marked}</pre>")
}

/// Partition lines at section markers. Lines before the first marker form
/// their own leading partition.
pub fn split_to_sections<'a>(lines: &[&'a str]) -> Vec<Vec<&'a str>> {
    let mut result = Vec::new();
    let mut pending: Vec<&str> = Vec::new();
    for &line in lines {
        if line.starts_with(SECTION_MARKER) && !pending.is_empty() {
            result.push(std::mem::take(&mut pending));
        }
        pending.push(line);
    }
    if !pending.is_empty() {
        result.push(pending);
    }
    result
}

/// One collapsed unit: a visible label counting the hidden lines (and any
/// error lines among them), followed by the full hidden content.
pub fn collapsed_block(lines: &[&str]) -> String {
    let n_errors = lines.iter().filter(|line| line.contains(ERROR_MARKER)).count();
    let mut label = format!("{} more lines", lines.len());
    if n_errors == 1 {
        label.push_str(" and 1 error");
    } else if n_errors > 1 {
        label.push_str(&format!(" and {n_errors} errors"));
    }
    format!(
        "<span class=\"collapsible collapsed\">({label})</span><article>{}</article>",
        lines.concat()
    )
}

/// [`truncate`] with the report's standard head/tail/middle budget.
pub fn truncate_pre(pre: &str) -> String {
    truncate(pre, FIRST_LINES, LAST_LINES, MIN_MIDDLE_LINES)
}

/// Collapse the middle of a long `<pre>` block.
///
/// Identity whenever the block has fewer than `first + min_middle + last`
/// lines; short content is never truncated. Otherwise the first and last
/// lines stay verbatim and each middle section collapses into one unit; a
/// section opened by a marker keeps the marker line visible and collapses
/// only its body.
pub fn truncate(pre: &str, first: usize, last: usize, min_middle: usize) -> String {
    let lines: Vec<&str> = pre.split_inclusive('\n').collect();
    if lines.len() < first + min_middle + last {
        return pre.to_string();
    }
    let mut out = lines[..first].concat();
    for section in split_to_sections(&lines[first..lines.len() - last]) {
        if section[0].starts_with(SECTION_MARKER) {
            out.push_str(section[0]);
            out.push_str(&collapsed_block(&section[1..]));
        } else {
            out.push_str(&collapsed_block(&section));
        }
    }
    out.push_str(&lines[lines.len() - last..].concat());
    out
}
