//! Catalogue of previously-diagnosed failure signatures.
//!
//! The table is ordered and immutable: built once at process start and
//! passed by reference into the tagger. When several entries match the same
//! failure, the **last** entry in table order wins; that precedence is part
//! of the table's contract, not an accident, so later entries can refine
//! earlier, broader ones.

use regex::Regex;

use crate::model::FailureRecord;

/// Tag assigned when the latest build of the same job is already green.
pub const TAG_LAST_BUILD_SUCCESSFUL: &str = "last build successful";

/// How one signature is matched against captured text.
#[derive(Debug)]
pub enum Matcher {
    Literal(&'static str),
    Pattern(Regex),
}

/// One catalogue entry: a matcher paired with its human-readable tag.
#[derive(Debug)]
pub struct Signature {
    matcher: Matcher,
    tag: &'static str,
}

impl Signature {
    pub fn literal(needle: &'static str, tag: &'static str) -> Self {
        Self {
            matcher: Matcher::Literal(needle),
            tag,
        }
    }

    pub fn pattern(pattern: &str, tag: &'static str) -> Self {
        Self {
            matcher: Matcher::Pattern(Regex::new(pattern).expect("signature pattern")),
            tag,
        }
    }

    fn matches(&self, text: &str) -> bool {
        match &self.matcher {
            Matcher::Literal(needle) => text.contains(needle),
            Matcher::Pattern(re) => re.is_match(text),
        }
    }
}

/// Ordered, immutable signature table.
#[derive(Debug)]
pub struct SignatureTable {
    rules: Vec<Signature>,
}

impl SignatureTable {
    pub fn new(rules: Vec<Signature>) -> Self {
        Self { rules }
    }

    /// The stock catalogue, carried over from years of triaging these runs.
    pub fn builtin() -> Self {
        Self::new(vec![
            Signature::literal(
                "Error: Couldn't open /home/zope/.jenkins/jobs/zopetoolkit_trunk/workspace/development-python.cfg",
                "bad jenkins config",
            ),
            Signature::literal(
                "ERROR: 'xslt-config' is not recognized as an internal or external command",
                "no lxml on winbot",
            ),
            Signature::literal("A    MOVED_TO_GITHUB", "moved to Github"),
            // Tracebacks print the Windows path with a doubled backslash.
            Signature::pattern(
                r"IOError: \[Errno [02]\] (No such file or directory: |Error: )?'setuptools\\\\cli\.exe'",
                "distribute issue #376",
            ),
        ])
    }

    /// Run one text through the table in order, overwriting `tag` on every
    /// hit so that the last matching rule wins.
    fn scan(&self, text: &str, tag: &mut Option<&'static str>) {
        for rule in &self.rules {
            if rule.matches(text) {
                *tag = Some(rule.tag);
            }
        }
    }

    /// Assign `record.tag` once correlation has finished.
    ///
    /// A latest build that already succeeded short-circuits the scan: the
    /// failure is stale and gets the fixed "already green" marker. Otherwise
    /// the fold covers the console text (latest if any, else current) and
    /// then every step's text (latest steps if any, else current). A record
    /// with nothing to scan keeps `tag = None`, which the renderer treats as
    /// a new, unclassified failure.
    pub fn assign_tag(&self, record: &mut FailureRecord) {
        if record.last_build_successful == Some(true) {
            record.tag = Some(TAG_LAST_BUILD_SUCCESSFUL.to_string());
            return;
        }
        let mut tag = None;
        if let Some(text) = record
            .last_console_text
            .as_deref()
            .or(record.console_text.as_deref())
        {
            self.scan(text, &mut tag);
        }
        let steps = if record.last_steps.is_empty() {
            &record.steps
        } else {
            &record.last_steps
        };
        for step in steps {
            self.scan(&step.text, &mut tag);
        }
        record.tag = tag.map(str::to_string);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BuildStep;

    fn ab_table() -> SignatureTable {
        SignatureTable::new(vec![
            Signature::literal("alpha", "tag A"),
            Signature::literal("beta", "tag B"),
        ])
    }

    fn record_with_console(text: &str) -> FailureRecord {
        let mut record = FailureRecord::new("[1] FAIL", "https://mail.example.org/msg.html");
        record.console_text = Some(text.to_string());
        record
    }

    #[test]
    fn last_matching_entry_wins() {
        let mut record = record_with_console("alpha and beta both appear");
        ab_table().assign_tag(&mut record);
        assert_eq!(record.tag.as_deref(), Some("tag B"));
    }

    #[test]
    fn single_match_tags_normally() {
        let mut record = record_with_console("only alpha here");
        ab_table().assign_tag(&mut record);
        assert_eq!(record.tag.as_deref(), Some("tag A"));
    }

    #[test]
    fn no_match_leaves_the_record_untagged() {
        let mut record = record_with_console("nothing recognizable");
        ab_table().assign_tag(&mut record);
        assert_eq!(record.tag, None);
    }

    #[test]
    fn green_latest_build_skips_signature_matching() {
        let mut record = record_with_console("alpha would match");
        record.last_build_successful = Some(true);
        ab_table().assign_tag(&mut record);
        assert_eq!(record.tag.as_deref(), Some(TAG_LAST_BUILD_SUCCESSFUL));
    }

    #[test]
    fn step_texts_are_scanned_after_the_console() {
        let mut record = FailureRecord::new("[1] FAIL", "https://mail.example.org/msg.html");
        record.console_text = Some("alpha".to_string());
        record.steps = vec![BuildStep {
            title: "test".into(),
            link: "http://example.org/1/0/logs/stdio".into(),
            status_class: "failure result".into(),
            text: "<pre>beta</pre>".into(),
        }];
        ab_table().assign_tag(&mut record);
        assert_eq!(record.tag.as_deref(), Some("tag B"));
    }

    #[test]
    fn builtin_pattern_covers_both_errno_variants() {
        let table = SignatureTable::builtin();
        for text in [
            r"IOError: [Errno 2] No such file or directory: 'setuptools\\cli.exe'",
            r"IOError: [Errno 0] Error: 'setuptools\\cli.exe'",
        ] {
            let mut record = record_with_console(text);
            table.assign_tag(&mut record);
            assert_eq!(record.tag.as_deref(), Some("distribute issue #376"), "{text}");
        }
    }
}
