//! CLI binary for edgequake-web2md.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_web2md::{
    extract, extract_to_file, service_info, tool_definitions, ExtractionConfig,
    ExtractionProgressCallback, ProgressCallback, StopReason,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max - 1).collect();
        format!("{head}\u{2026}")
    } else {
        s.to_string()
    }
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner (the page count is unknown until the
/// walk ends) plus one log line per extracted page.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Per-page wall-clock start times for elapsed reporting.
    start_times: Mutex<HashMap<usize, Instant>>,
    pagination_errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.set_message("Resolving URL…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
            pagination_errors: AtomicUsize::new(0),
        })
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, url: &str) {
        self.bar.set_prefix("Extracting");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Extracting {}", truncate(url, 90)))
        ));
    }

    fn on_page_start(&self, page_num: usize, url: &str) {
        self.start_times
            .lock()
            .unwrap()
            .insert(page_num, Instant::now());
        self.bar
            .set_message(format!("page {page_num}  {}", dim(&truncate(url, 60))));
    }

    fn on_page_complete(&self, page_num: usize, url: &str, content_len: usize) {
        let elapsed_ms = self
            .start_times
            .lock()
            .unwrap()
            .remove(&page_num)
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);

        self.bar.println(format!(
            "  {} Page {:>3}  {:<8}  {}  {}",
            green("✓"),
            page_num,
            dim(&format!("{content_len:>6} chars")),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
            dim(&truncate(url, 70)),
        ));
    }

    fn on_next_page(&self, _page_num: usize, next_url: &str) {
        self.bar
            .set_message(format!("following {}", dim(&truncate(next_url, 60))));
    }

    fn on_pagination_error(&self, url: &str, error: &str) {
        self.pagination_errors.fetch_add(1, Ordering::SeqCst);
        self.bar.println(format!(
            "  {} next-page lookup failed for {}: {}",
            yellow("⚠"),
            dim(&truncate(url, 60)),
            yellow(&truncate(error, 80)),
        ));
    }

    fn on_extraction_complete(&self, total_pages: usize) {
        self.bar.finish_and_clear();
        let warnings = self.pagination_errors.load(Ordering::SeqCst);
        if warnings == 0 {
            eprintln!(
                "{} {} page(s) extracted",
                green("✔"),
                bold(&total_pages.to_string())
            );
        } else {
            eprintln!(
                "{} {} page(s) extracted  ({} pagination warning(s))",
                yellow("⚠"),
                bold(&total_pages.to_string()),
                warnings
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract an article (stdout)
  web2md https://example.com/long-read

  # Extract to file
  web2md https://example.com/long-read -o article.md

  # Stop after the first 5 pages
  web2md --max-pages 5 https://example.com/long-read

  # Recognise a site-specific "next" label
  web2md --next-marker "weiter" --next-marker "suivant" https://example.de/artikel

  # ISO dates in the header
  web2md --date-format "%Y-%m-%d" https://example.com/long-read

  # JSON output with per-page results and stats
  web2md --json https://example.com/long-read > article.json

  # Tool-host discovery
  web2md --info
  web2md --list-tools

PAGINATION:
  1. A link whose text contains a next marker ("next", "次のページ", "→"),
     or whose rel attribute is "next".
  2. Otherwise, in a .pagination / nav / aria-label*="pag" container, the
     link right after the current page (.current, .active, aria-current).
  The walk stops when no next page is found, when it points back to a page
  already extracted, or after --max-pages pages.

ENVIRONMENT VARIABLES:
  WEB2MD_MAX_PAGES        Page limit (default 25)
  WEB2MD_TIMEOUT          Per-request timeout in seconds (default 30)
  WEB2MD_MAX_RETRIES      Retries on transient HTTP failures (default 2)
  WEB2MD_NEXT_MARKERS     Extra next-link markers, comma separated
  WEB2MD_USER_AGENT       Override the User-Agent header
  RUST_LOG                Override log filtering (e.g. edgequake_web2md=debug)
"#;

/// Extract web articles (following pagination) as Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "web2md",
    version,
    about = "Extract web articles as Markdown, following next-page links",
    long_about = "Extract the readable content of a web article as clean Markdown. Articles \
split over several pages are followed link by link and merged into one document, with the \
first page's title, author, publish date and summary on top.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// HTTP/HTTPS URL of the article's first page.
    #[arg(required_unless_present_any = ["info", "list_tools"])]
    url: Option<String>,

    /// Write Markdown to this file instead of stdout.
    #[arg(short, long, env = "WEB2MD_OUTPUT")]
    output: Option<PathBuf>,

    /// Maximum number of pages to extract.
    #[arg(long, env = "WEB2MD_MAX_PAGES", default_value_t = 25,
          value_parser = clap::value_parser!(u64).range(1..))]
    max_pages: u64,

    /// Per-request HTTP timeout in seconds.
    #[arg(long, env = "WEB2MD_TIMEOUT", default_value_t = 30,
          value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Retries per request on transient HTTP failures.
    #[arg(long, env = "WEB2MD_MAX_RETRIES", default_value_t = 2)]
    max_retries: u32,

    /// Additional next-link marker text (repeatable).
    #[arg(long = "next-marker", value_name = "TEXT", env = "WEB2MD_NEXT_MARKERS",
          value_delimiter = ',')]
    next_markers: Vec<String>,

    /// Override the User-Agent header.
    #[arg(long, env = "WEB2MD_USER_AGENT")]
    user_agent: Option<String>,

    /// Download a page again when the pagination step needs it.
    #[arg(long, env = "WEB2MD_NO_CACHE")]
    no_cache: bool,

    /// strftime pattern for the publish date line.
    #[arg(long, env = "WEB2MD_DATE_FORMAT", default_value = edgequake_web2md::DEFAULT_DATE_FORMAT)]
    date_format: String,

    /// Output structured JSON (ExtractionOutput) instead of Markdown.
    #[arg(long, env = "WEB2MD_JSON")]
    json: bool,

    /// Disable progress spinner.
    #[arg(long, env = "WEB2MD_NO_PROGRESS")]
    no_progress: bool,

    /// Print the service descriptor as JSON and exit.
    #[arg(long)]
    info: bool,

    /// Print the tool definitions as JSON and exit.
    #[arg(long)]
    list_tools: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "WEB2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "WEB2MD_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner gives all the feedback that matters; INFO logs would
    // only tear it up.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Discovery modes ──────────────────────────────────────────────────
    if cli.info {
        println!(
            "{}",
            serde_json::to_string_pretty(&service_info()).context("Failed to serialise service info")?
        );
        return Ok(());
    }
    if cli.list_tools {
        println!(
            "{}",
            serde_json::to_string_pretty(&tool_definitions())
                .context("Failed to serialise tool definitions")?
        );
        return Ok(());
    }

    let url = cli.url.clone().context("A URL is required")?;

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ExtractionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run extraction ───────────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        let stats = extract_to_file(&url, output_path, &config)
            .await
            .context("Extraction failed")?;

        if !cli.quiet {
            eprintln!(
                "{}  {} page(s)  {}ms  {}  →  {}",
                green("✔"),
                stats.pages_fetched,
                stats.total_duration_ms,
                dim(&describe_stop(&stats.stop_reason)),
                bold(&output_path.display().to_string()),
            );
        }
    } else {
        let output = extract(&url, &config).await.context("Extraction failed")?;

        if cli.json {
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
            println!("{json}");
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(output.markdown.as_bytes())
                .context("Failed to write to stdout")?;
            if !output.markdown.ends_with('\n') {
                handle.write_all(b"\n").ok();
            }
        }

        if !cli.quiet && !cli.json {
            eprintln!(
                "   {} page(s) in {}ms  {}",
                output.stats.pages_fetched,
                output.stats.total_duration_ms,
                dim(&describe_stop(&output.stats.stop_reason)),
            );
        }
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .max_pages(cli.max_pages as usize)
        .fetch_timeout_secs(cli.timeout)
        .max_retries(cli.max_retries)
        .cache_html(!cli.no_cache)
        .date_format(cli.date_format.clone());

    for marker in &cli.next_markers {
        builder = builder.next_link_marker(marker.clone());
    }
    if let Some(ref ua) = cli.user_agent {
        builder = builder.user_agent(ua.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn describe_stop(reason: &StopReason) -> String {
    match reason {
        StopReason::NoNextPage => "(no further pages)".to_string(),
        StopReason::AlreadyVisited { url } => format!("(next page {url} already extracted)"),
        StopReason::PageLimit { limit } => format!("(page limit {limit} reached)"),
    }
}
