//! Tolerant HTML scanning helpers.
//!
//! The provider pages this tool reads are plain, server-rendered HTML; a
//! full DOM is overkill and brittle against markup noise. These helpers do
//! case-insensitive, local scanning within known blocks instead, and degrade
//! to `None`/empty on missing structure; they never panic.

use std::sync::OnceLock;

use regex::Regex;

/// Escape text for embedding in HTML (element content or quoted attributes).
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Decode the handful of entities the scanned pages actually use.
pub fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn title_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title regex"))
}

fn pre_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<pre[^>]*>.*?</pre>").expect("pre regex"))
}

fn href_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)<a\s[^>]*href\s*=\s*["']([^"']*)["']"#).expect("href regex")
    })
}

fn anchor_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)<a\s[^>]*href\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a>"#)
            .expect("anchor regex")
    })
}

fn div_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)<div\s[^>]*class\s*=\s*["']([^"']*)["'][^>]*>(.*?)</div>"#)
            .expect("div regex")
    })
}

fn output_span_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)<span\s[^>]*class\s*=\s*["'](?:stdout|stderr)["'][^>]*>.*?</span>"#)
            .expect("output span regex")
    })
}

fn header_span_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)<span\s[^>]*class\s*=\s*["']header["'][^>]*>(.*?)</span>"#)
            .expect("header span regex")
    })
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag regex"))
}

/// Text of the page's `<title>` element, entity-decoded.
pub fn title_text(html: &str) -> Option<String> {
    title_regex()
        .captures(html)
        .map(|m| unescape(m.get(1).map(|g| g.as_str()).unwrap_or_default()))
}

/// Outer HTML of the first `<pre>…</pre>` block.
pub fn first_pre(html: &str) -> Option<&str> {
    pre_regex().find(html).map(|m| m.as_str())
}

/// The href of the first anchor inside a fragment, entity-decoded.
pub fn first_link_in(fragment: &str) -> Option<String> {
    href_regex()
        .captures(fragment)
        .map(|m| unescape(m.get(1).map(|g| g.as_str()).unwrap_or_default()))
}

/// One `div` carrying the provider's `result` class: its class attribute and
/// the first anchor it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultDiv {
    pub class: String,
    pub link_text: String,
    pub link_href: String,
}

/// All `div.result` blocks in document order. Divs whose class attribute
/// merely contains `result` as a substring of another word do not count.
pub fn result_divs(html: &str) -> Vec<ResultDiv> {
    let mut out = Vec::new();
    for m in div_regex().captures_iter(html) {
        let class = m.get(1).map(|g| g.as_str()).unwrap_or_default();
        if !class.split_whitespace().any(|token| token == "result") {
            continue;
        }
        let body = m.get(2).map(|g| g.as_str()).unwrap_or_default();
        let Some(anchor) = anchor_regex().captures(body) else {
            continue;
        };
        let href = unescape(anchor.get(1).map(|g| g.as_str()).unwrap_or_default());
        let inner = anchor.get(2).map(|g| g.as_str()).unwrap_or_default();
        let text = unescape(&tag_regex().replace_all(inner, ""));
        out.push(ResultDiv {
            class: class.to_string(),
            link_text: text,
            link_href: href,
        });
    }
    out
}

/// Outer HTML of every `span.stdout` / `span.stderr`, in document order.
pub fn output_spans(html: &str) -> Vec<String> {
    output_span_regex()
        .find_iter(html)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Inner HTML of every `span.header`, in document order. Content is returned
/// as-is (still entity-escaped) so it can be re-embedded verbatim.
pub fn header_spans(html: &str) -> Vec<String> {
    header_span_regex()
        .captures_iter(html)
        .map(|m| m.get(1).map(|g| g.as_str()).unwrap_or_default().to_string())
        .collect()
}
