use serde::{Deserialize, Serialize};

/// Status class the step-based provider puts on a passing step.
pub const STEP_SUCCESS_CLASS: &str = "success result";

/// One step within a multi-step build (step-based provider only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStep {
    /// Step name as shown on the build page.
    pub title: String,
    /// Absolute URL of the step's captured stdio log.
    pub link: String,
    /// Raw class attribute from the build page, e.g. `"success result"`.
    pub status_class: String,
    /// Captured output as a well-formed `<pre>…</pre>` fragment; never
    /// unbalanced, even when the capture was empty.
    pub text: String,
}

impl BuildStep {
    pub fn is_success(&self) -> bool {
        self.status_class == STEP_SUCCESS_CLASS
    }

    pub fn is_failure(&self) -> bool {
        self.status_class.contains("failure")
    }
}

/// Commit identity recovered from a source-checkout step.
///
/// Only constructed when one step yields both halves; a repository without a
/// revision (or vice versa) is not a stamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStamp {
    pub repository: String,
    pub revision: String,
}

/// One email-reported failure and everything analysis learned about it.
///
/// Created during email parsing with just `title` and `summary_url`; the
/// remaining fields are filled in by the analysis pipeline and read by the
/// renderer. At most one of `steps` / `console_text` is ever populated
/// (step-based vs stream-based provider); both stay empty when the first
/// link matched neither provider shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Subject line from the summary email.
    pub title: String,
    /// Link to the mail-archive page of the email.
    pub summary_url: String,
    /// Email body as a `<pre>…</pre>` HTML fragment.
    pub summary_body: Option<String>,
    /// First link found inside the body, the entry point into the CI provider.
    pub first_link: Option<String>,

    pub build_link: Option<String>,
    pub build_number: Option<String>,
    pub build_source: Option<SourceStamp>,
    /// Step list, when the build came from the step-based provider.
    pub steps: Vec<BuildStep>,
    /// Console output, when the build came from the stream-based provider.
    pub console_text: Option<String>,

    // Peeking into the future: the provider's latest build of the same job.
    pub last_build_link: Option<String>,
    pub last_build_number: Option<String>,
    pub last_build_source: Option<SourceStamp>,
    pub last_steps: Vec<BuildStep>,
    pub last_console_text: Option<String>,
    /// `None` until the latest build could be judged.
    pub last_build_successful: Option<bool>,

    /// Known-failure tag, or `None` for a new/unclassified failure.
    pub tag: Option<String>,
}

impl FailureRecord {
    pub fn new(title: impl Into<String>, summary_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary_url: summary_url.into(),
            ..Self::default()
        }
    }

    /// Whether analysis recovered any build content at all.
    pub fn has_build_data(&self) -> bool {
        !self.steps.is_empty() || self.console_text.is_some()
    }

    /// True when the provider's latest build is known and is not the build
    /// the email reported.
    pub fn has_last_build(&self) -> bool {
        match (&self.last_build_number, &self.build_number) {
            (Some(last), Some(current)) => last != current,
            (Some(_), None) => true,
            _ => false,
        }
    }
}
