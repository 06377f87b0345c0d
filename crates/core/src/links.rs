//! Classification and normalization of CI build-page URLs.
//!
//! Two provider shapes are recognized:
//! - step-based (buildbot): `…/builders/<job>/builds/<n>` (no trailing
//!   slash); `-1` is the provider's "latest build" sentinel;
//! - stream-based (jenkins): `…/job/<job>/<n>/` (trailing slash required);
//!   `lastBuild/` is the "latest build" pointer.
//!
//! Both matches are anchored over the full string; a URL with extra path
//! segments after the build number is not a build link.

use std::sync::OnceLock;

use regex::Regex;

/// Build-number placeholder used until a "latest" pointer is resolved.
pub const LATEST: &str = "latest";

fn buildbot_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^.*/builders/[^/]+/builds/-?\d+$").expect("buildbot url regex"))
}

fn jenkins_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^.*/job/[^/]+/\d+/$").expect("jenkins url regex"))
}

/// CI provider recognized from a URL shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Buildbot,
    Jenkins,
}

/// Classify a URL against the two known shapes.
///
/// The shapes are disjoint; buildbot is tested first purely to fix the
/// precedence should that ever change.
pub fn classify(url: &str) -> Option<Provider> {
    if is_buildbot_link(url) {
        Some(Provider::Buildbot)
    } else if is_jenkins_link(url) {
        Some(Provider::Jenkins)
    } else {
        None
    }
}

pub fn is_buildbot_link(url: &str) -> bool {
    buildbot_url_regex().is_match(url)
}

pub fn is_jenkins_link(url: &str) -> bool {
    jenkins_url_regex().is_match(url)
}

impl Provider {
    /// The "this exact build" URL and its build identifier, as carried in
    /// the URL itself.
    pub fn this_build(self, url: &str) -> (String, String) {
        match self {
            Provider::Buildbot => {
                let number = url.rsplit_once('/').map(|(_, n)| n).unwrap_or(url);
                (url.to_string(), number.to_string())
            }
            Provider::Jenkins => {
                let trimmed = url.strip_suffix('/').unwrap_or(url);
                let number = trimmed.rsplit_once('/').map(|(_, n)| n).unwrap_or(trimmed);
                (url.to_string(), number.to_string())
            }
        }
    }

    /// The "latest build for the same job" URL, paired with the [`LATEST`]
    /// placeholder until the page resolves it to a concrete number.
    pub fn latest_build(self, url: &str) -> (String, String) {
        match self {
            Provider::Buildbot => {
                let base = url.rsplit_once('/').map(|(b, _)| b).unwrap_or(url);
                (format!("{base}/-1"), LATEST.to_string())
            }
            Provider::Jenkins => {
                let trimmed = url.strip_suffix('/').unwrap_or(url);
                let base = trimmed.rsplit_once('/').map(|(b, _)| b).unwrap_or(trimmed);
                (format!("{base}/lastBuild/"), LATEST.to_string())
            }
        }
    }

    /// Rewrite a "latest build" URL to the concrete build number resolved
    /// from its page title. Returns `None` when the URL is not in latest
    /// form or the number is not numeric.
    pub fn normalize_build_url(self, url: &str, build_number: &str) -> Option<String> {
        if !build_number.chars().all(|c| c.is_ascii_digit()) || build_number.is_empty() {
            return None;
        }
        match self {
            Provider::Buildbot => {
                let base = url.strip_suffix("/-1")?;
                Some(format!("{base}/{build_number}"))
            }
            Provider::Jenkins => {
                let base = url.strip_suffix("lastBuild/")?;
                Some(format!("{base}{build_number}/"))
            }
        }
    }
}

/// Rewrite a build-relative step link emitted against the `-1` sentinel to
/// the resolved build number. The provider's relative links are only valid
/// relative to the concrete build, so this must happen before joining.
pub fn normalize_step_link(rel: &str, build_number: &str) -> Option<String> {
    let rest = rel.strip_prefix("-1/")?;
    Some(format!("{build_number}/{rest}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUILDBOT: &str =
        "http://winbot.zope.org/builders/z3c.authenticator_py_265_32/builds/185";
    const JENKINS: &str = "http://jenkins.starzel.de/job/zopetoolkit_trunk/184/";

    #[test]
    fn recognizes_buildbot_links() {
        assert!(is_buildbot_link(BUILDBOT));
        assert!(is_buildbot_link(
            "http://winbot.zope.org/builders/foo/builds/-1"
        ));
        assert!(!is_buildbot_link(JENKINS));
        // Full-string anchor: trailing segments disqualify.
        assert!(!is_buildbot_link(&format!("{BUILDBOT}/steps/test")));
    }

    #[test]
    fn recognizes_jenkins_links() {
        assert!(is_jenkins_link(JENKINS));
        assert!(!is_jenkins_link(BUILDBOT));
        // The trailing slash is part of the shape, not optional.
        assert!(!is_jenkins_link(
            "http://jenkins.starzel.de/job/zopetoolkit_trunk/184"
        ));
    }

    #[test]
    fn classify_is_a_closed_choice() {
        assert_eq!(classify(BUILDBOT), Some(Provider::Buildbot));
        assert_eq!(classify(JENKINS), Some(Provider::Jenkins));
        assert_eq!(classify("https://example.org/some/page.html"), None);
    }

    #[test]
    fn buildbot_this_and_latest() {
        assert_eq!(
            Provider::Buildbot.this_build(BUILDBOT),
            (BUILDBOT.to_string(), "185".to_string())
        );
        assert_eq!(
            Provider::Buildbot.latest_build(BUILDBOT),
            (
                "http://winbot.zope.org/builders/z3c.authenticator_py_265_32/builds/-1"
                    .to_string(),
                LATEST.to_string()
            )
        );
    }

    #[test]
    fn jenkins_this_and_latest() {
        assert_eq!(
            Provider::Jenkins.this_build(JENKINS),
            (JENKINS.to_string(), "184".to_string())
        );
        assert_eq!(
            Provider::Jenkins.latest_build(JENKINS),
            (
                "http://jenkins.starzel.de/job/zopetoolkit_trunk/lastBuild/".to_string(),
                LATEST.to_string()
            )
        );
    }

    #[test]
    fn buildbot_normalization_is_idempotent_under_rederivation() {
        let (latest_url, _) = Provider::Buildbot.latest_build(BUILDBOT);
        let concrete = Provider::Buildbot
            .normalize_build_url(&latest_url, "200")
            .unwrap();
        let (rederived, _) = Provider::Buildbot.latest_build(&concrete);
        assert_eq!(rederived, latest_url);
    }

    #[test]
    fn jenkins_normalization() {
        let (latest_url, _) = Provider::Jenkins.latest_build(JENKINS);
        assert_eq!(
            Provider::Jenkins
                .normalize_build_url(&latest_url, "200")
                .as_deref(),
            Some("http://jenkins.starzel.de/job/zopetoolkit_trunk/200/")
        );
        assert_eq!(Provider::Jenkins.normalize_build_url(JENKINS, "200"), None);
        assert_eq!(
            Provider::Jenkins.normalize_build_url(&latest_url, "latest"),
            None
        );
    }

    #[test]
    fn step_links_rewrite_from_sentinel_to_resolved_number() {
        assert_eq!(
            normalize_step_link("-1/0/logs/stdio", "200").as_deref(),
            Some("200/0/logs/stdio")
        );
        assert_eq!(normalize_step_link("185/0/logs/stdio", "200"), None);
    }
}
