//! Offline tests for the buildbot scraper, against captured-page fixtures.

use janitor_fetch::{MemoryFetch, ONE_DAY};
use janitor_scrape::buildbot;

const BUILD_URL: &str = "http://winbot.example.org/builders/foo/builds/185";
const LATEST_URL: &str = "http://winbot.example.org/builders/foo/builds/-1";

fn build_page(number: u32, steps: &[(&str, &str, &str)]) -> String {
    let mut page = format!(
        "<html><head><title>Buildbot: foo build #{number}</title></head><body>"
    );
    for (class, href, title) in steps {
        page.push_str(&format!(
            "<div class=\"{class}\"><a href=\"{href}\">{title}</a></div>"
        ));
    }
    page.push_str("</body></html>");
    page
}

fn log_page(command: &str, stdout: &str, stderr: &str, exit_line: &str) -> String {
    format!(
        "<html><head><title>stdio</title></head><body>\
         <span class=\"header\">{command}\nelapsed and such</span>\
         <span class=\"stdout\">{stdout}\n</span>\
         <span class=\"stderr\">{stderr}\n</span>\
         <span class=\"header\">{exit_line}\nmore trailing meta</span>\
         </body></html>"
    )
}

#[test]
fn scrapes_steps_with_status_titles_and_log_text() {
    let mut fetch = MemoryFetch::new();
    fetch.insert(
        BUILD_URL,
        build_page(
            185,
            &[
                ("success result", "185/0", "svn"),
                ("failure result", "185/1", "test"),
            ],
        ),
    );
    fetch.insert(
        "http://winbot.example.org/builders/foo/builds/185/0/logs/stdio",
        log_page("svn co http://example.org/repo", "checked out", "", "program finished with exit code 0"),
    );
    fetch.insert(
        "http://winbot.example.org/builders/foo/builds/185/1/logs/stdio",
        log_page("bin/test -v", "running tests", "boom", "program finished with exit code 1"),
    );

    let (steps, number) = buildbot::scrape_build(&fetch, BUILD_URL, None, false, ONE_DAY).unwrap();
    assert_eq!(number.as_deref(), Some("185"));
    assert_eq!(steps.len(), 2);

    assert_eq!(steps[0].title, "svn");
    assert_eq!(steps[0].status_class, "success result");
    assert_eq!(
        steps[0].link,
        "http://winbot.example.org/builders/foo/builds/185/0/logs/stdio"
    );
    assert_eq!(
        steps[1].text,
        "<pre><span class=\"header\">bin/test -v</span>\n\
         <span class=\"stdout\">running tests\n</span>\
         <span class=\"stderr\">boom\n</span>\
         <span class=\"header\">program finished with exit code 1</span>\n</pre>"
    );
    assert!(steps[0].is_success());
    assert!(steps[1].is_failure());
}

#[test]
fn skip_if_short_circuits_before_any_log_fetch() {
    let mut fetch = MemoryFetch::new();
    fetch.insert(
        BUILD_URL,
        build_page(185, &[("success result", "185/0", "svn")]),
    );

    let (steps, number) =
        buildbot::scrape_build(&fetch, BUILD_URL, Some("185"), false, ONE_DAY).unwrap();
    assert!(steps.is_empty());
    assert_eq!(number.as_deref(), Some("185"));
    assert_eq!(fetch.requests(), vec![BUILD_URL.to_string()]);
}

#[test]
fn latest_page_rewrites_sentinel_step_links_to_the_resolved_build() {
    let mut fetch = MemoryFetch::new();
    fetch.insert(
        LATEST_URL,
        build_page(200, &[("success result", "-1/0", "svn")]),
    );
    fetch.insert(
        "http://winbot.example.org/builders/foo/builds/200/0/logs/stdio",
        log_page("svn co http://example.org/repo", "checked out", "", "program finished with exit code 0"),
    );

    let (steps, number) =
        buildbot::scrape_build(&fetch, LATEST_URL, Some("185"), true, ONE_DAY).unwrap();
    assert_eq!(number.as_deref(), Some("200"));
    assert_eq!(steps.len(), 1);
    assert_eq!(
        steps[0].link,
        "http://winbot.example.org/builders/foo/builds/200/0/logs/stdio"
    );
    assert!(fetch
        .requests()
        .iter()
        .all(|url| !url.contains("/-1/")));
}

#[test]
fn unreachable_page_yields_no_number_and_no_steps() {
    let fetch = MemoryFetch::new();
    let (steps, number) = buildbot::scrape_build(&fetch, BUILD_URL, None, false, ONE_DAY).unwrap();
    assert!(steps.is_empty());
    assert_eq!(number, None);
}

#[test]
fn empty_log_capture_still_produces_balanced_markup() {
    let mut fetch = MemoryFetch::new();
    fetch.insert(
        BUILD_URL,
        build_page(185, &[("failure result", "185/0", "test")]),
    );
    // The step's log page is unreachable: empty bytes.
    let (steps, _) = buildbot::scrape_build(&fetch, BUILD_URL, None, false, ONE_DAY).unwrap();
    assert_eq!(steps[0].text, "<pre></pre>");
}
