//! HTML report assembly.
//!
//! One self-contained document: a header with the fixed assets, one
//! collapsible section per failure, nested collapsible articles for the
//! summary email and the current/latest build content, and a footer with
//! the failure count. Truncation applies to the text blocks only, never to
//! this skeleton.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use janitor_core::html::escape;
use janitor_core::model::{BuildStep, FailureRecord, SourceStamp};

use crate::assets::{CSS, JAVASCRIPT, JQUERY_URL};
use crate::collapse::{format_console_text, truncate_pre};

/// The fully analyzed run, ready to render.
#[derive(Debug)]
pub struct Report {
    pub date: String,
    pub failures: Vec<FailureRecord>,
}

impl Report {
    pub fn new(date: impl Into<String>, failures: Vec<FailureRecord>) -> Self {
        Self {
            date: date.into(),
            failures,
        }
    }

    /// Render the whole document.
    pub fn render(&self) -> String {
        let mut out = page_header(&format!("Zope tests for {}", self.date));
        for (n, failure) in self.failures.iter().enumerate() {
            render_failure(&mut out, failure, &format!("f{}", n + 1));
        }
        out.push_str(&page_footer(self.failures.len()));
        out
    }

    /// Write the document to `path`, or to `report.html` in a fresh
    /// temporary directory when no path was given. Returns where it landed.
    pub fn write_to(&self, path: Option<&Path>) -> io::Result<PathBuf> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => tempfile::Builder::new()
                .prefix("test-janitor-")
                .tempdir()?
                .into_path()
                .join("report.html"),
        };
        fs::write(&path, self.render())?;
        Ok(path)
    }
}

fn page_header(title: &str) -> String {
    format!(
        "<html>\n\
         \x20 <head>\n\
         \x20   <meta charset=\"UTF-8\">\n\
         \x20   <title>{title}</title>\n\
         \x20   <style type=\"text/css\">{CSS}</style>\n\
         \x20   <script type=\"text/javascript\" src=\"{JQUERY_URL}\"></script>\n\
         \x20   <script type=\"text/javascript\">{JAVASCRIPT}</script>\n\
         \x20 </head>\n\
         <body>\n\
         \x20 <h1>{title}</h1>\n",
        title = escape(title),
    )
}

fn page_footer(count: usize) -> String {
    format!(
        "  <hr>\n\
         \x20 <p id=\"footer\">{count} failures today.</p>\n\
         </body>\n\
         </html>\n"
    )
}

fn collapsible(collapsed: bool) -> &'static str {
    if collapsed {
        "collapsible collapsed"
    } else {
        "collapsible"
    }
}

fn render_failure(out: &mut String, failure: &FailureRecord, id: &str) {
    let mut title = failure.title.clone();
    if let Some(tag) = &failure.tag {
        title.push_str(" - ");
        title.push_str(tag);
    }
    // Tagged failures are old news; only new/unclassified ones open expanded.
    let _ = write!(
        out,
        "  <h2 id=\"{id}\" class=\"{class}\">\n\
         \x20   {title}\n\
         \x20   <a href=\"#{id}\" class=\"headerlink\">¶</a>\n\
         \x20 </h2>\n\
         \x20 <article>\n",
        class = collapsible(failure.tag.is_some()),
        title = escape(&title),
    );

    render_summary_email(out, failure);

    let build_number = failure.build_number.as_deref().unwrap_or("?");
    let last_number = failure.last_build_number.as_deref().unwrap_or("?");
    let superseded = failure.has_last_build();
    let last_green = failure.last_build_successful == Some(true);
    let verdict = if last_green {
        "successful"
    } else {
        "also unsuccessful"
    };

    if let Some(console) = &failure.console_text {
        let label = format!(
            "Console text from <a href=\"{}\">build #{}</a>:",
            escape(failure.build_link.as_deref().unwrap_or("")),
            escape(build_number),
        );
        render_console(out, &label, console, superseded);
        if superseded {
            let label = format!(
                "<a href=\"{}\">Last build (#{})</a> was {verdict}:",
                escape(failure.last_build_link.as_deref().unwrap_or("")),
                escape(last_number),
            );
            let text = failure.last_console_text.as_deref().unwrap_or("");
            render_console(out, &label, text, last_green);
        }
    }

    if !failure.steps.is_empty() {
        let label = format!(
            "Buildbot steps from <a href=\"{}\">build #{}</a>: {}",
            escape(failure.build_link.as_deref().unwrap_or("")),
            escape(build_number),
            steps_row(&failure.steps),
        );
        render_steps(out, &label, &failure.steps, superseded);
        if superseded {
            let label = format!(
                "<a href=\"{}\">Last build (#{})</a> was {verdict}: {}",
                escape(failure.last_build_link.as_deref().unwrap_or("")),
                escape(last_number),
                steps_row(&failure.last_steps),
            );
            render_steps(out, &label, &failure.last_steps, last_green);
        }
        render_source(out, "Source", failure.build_source.as_ref());
        if superseded && failure.last_build_source != failure.build_source {
            render_source(out, "Latest source", failure.last_build_source.as_ref());
        }
    }

    out.push_str("  </article>\n");
}

fn render_summary_email(out: &mut String, failure: &FailureRecord) {
    let pre = failure.summary_body.as_deref().unwrap_or("<pre></pre>");
    let _ = write!(
        out,
        "    <p class=\"{class}\"><a href=\"{url}\">Summary email</a></p>\n\
         \x20   <article>{body}</article>\n",
        class = collapsible(failure.has_build_data()),
        url = escape(&failure.summary_url),
        body = truncate_pre(pre),
    );
}

fn render_console(out: &mut String, label: &str, text: &str, collapsed: bool) {
    let _ = write!(
        out,
        "    <p class=\"{class}\">{label}</p>\n\
         \x20   <article>{body}</article>\n",
        class = collapsible(collapsed),
        body = truncate_pre(&format_console_text(text)),
    );
}

/// The inline row of step links shown next to a build label, each colored
/// by its status class.
fn steps_row(steps: &[BuildStep]) -> String {
    steps
        .iter()
        .map(|step| {
            format!(
                "<a class=\"{}\" href=\"{}\">{}</a>",
                escape(&step.status_class),
                escape(&step.link),
                escape(&step.title),
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_steps(out: &mut String, label: &str, steps: &[BuildStep], collapsed: bool) {
    let _ = write!(
        out,
        "    <p class=\"{class}\">{label}</p>\
         \x20   <article class=\"steps\">\n",
        class = collapsible(collapsed),
    );
    for step in steps {
        // Failing steps are the interesting ones; passing steps start folded.
        let _ = write!(
            out,
            "    <p class=\"{class}\">{title}</p>\n\
             \x20   <article>{body}</article>\n",
            class = collapsible(!step.is_failure()),
            title = escape(&step.title),
            body = truncate_pre(&step.text),
        );
    }
    out.push_str("    </article>\n");
}

fn render_source(out: &mut String, label: &str, source: Option<&SourceStamp>) {
    let Some(stamp) = source else {
        return;
    };
    let _ = write!(
        out,
        "    <p class=\"source\">{label}: {repository} @ {revision}</p>\n",
        repository = escape(&stamp.repository),
        revision = escape(&stamp.revision),
    );
}
