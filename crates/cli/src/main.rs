//! Pipe an email from the test summarizer in, get an HTML report back.

use std::io::{self, BufRead, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use janitor_core::email::parse_summary_email;
use janitor_core::signatures::SignatureTable;
use janitor_fetch::Fetcher;
use janitor_report::Report;

#[derive(Debug, Parser)]
#[command(
    name = "test-janitor",
    version,
    about = "Turn a test-summary email into a triage-friendly HTML report"
)]
struct Cli {
    /// Email file(s) to read; stdin when omitted.
    files: Vec<PathBuf>,

    /// More logging (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Less logging (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count)]
    quiet: u8,

    /// Socket timeout for any single fetch, in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Directory for the page cache.
    #[arg(long, default_value = "~/.cache/test-janitor")]
    cache_dir: String,

    /// Write the report here instead of a fresh temporary file.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Do not open the finished report in a browser.
    #[arg(long)]
    no_open: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(1 + i32::from(cli.verbose) - i32::from(cli.quiet));

    let lines = read_input(&cli.files)?;
    let parsed = parse_summary_email(&lines);

    let cache_dir = PathBuf::from(shellexpand::tilde(&cli.cache_dir).into_owned());
    let fetcher = Fetcher::new(cache_dir, Duration::from_secs(cli.timeout))
        .context("build http client")?;
    let signatures = SignatureTable::builtin();

    // One record at a time, fetches included; the first failure aborts the
    // whole run rather than emitting a misleading partial report.
    let mut failures = parsed.failures;
    for record in &mut failures {
        janitor_scrape::analyze(record, &fetcher, &signatures)
            .with_context(|| format!("analyzing {} ({})", record.title, record.summary_url))?;
    }

    let report = Report::new(parsed.date, failures);
    let path = report.write_to(cli.output.as_deref()).context("write report")?;
    info!("created {}", path.display());
    println!("{}", path.display());
    if !cli.no_open {
        open_in_browser(&path);
    }
    Ok(())
}

fn init_logging(verbosity: i32) {
    let default = match verbosity {
        i32::MIN..=0 => "error",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

fn read_input(files: &[PathBuf]) -> Result<Vec<String>> {
    if files.is_empty() {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            bail!("supply a filename or pipe something to stdin");
        }
        return Ok(stdin.lock().lines().collect::<io::Result<_>>()?);
    }
    let mut lines = Vec::new();
    for file in files {
        let text = std::fs::read_to_string(file)
            .with_context(|| format!("read {}", file.display()))?;
        lines.extend(text.lines().map(str::to_string));
    }
    Ok(lines)
}

fn open_in_browser(path: &Path) {
    let opener = if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    if let Err(err) = Command::new(opener).arg(path).spawn() {
        debug!("could not open {}: {err}", path.display());
    }
}
