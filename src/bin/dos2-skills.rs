//! CLI binary for dos2-skills.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ScrapeConfig`, writes the workbook and prints a summary.

use anyhow::{Context, Result};
use clap::Parser;
use dos2_skills::{
    scrape_to_file, CacheSettings, ProgressCallback, ScrapeConfig, ScrapeProgressCallback,
    ScrapeStats, DEFAULT_OUTPUT_FILE,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
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

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar over the school list plus a log line
/// per finished school.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_scrape_start
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS),
        );
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

// A failed run never reaches `on_scrape_complete`; clear the bar when the
// config holding the callback is dropped so the error prints on a clean line.
impl Drop for CliProgressCallback {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

impl ScrapeProgressCallback for CliProgressCallback {
    fn on_scrape_start(&self, total_schools: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:30.green/238}] {pos:>2}/{len} schools  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total_schools as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Scraping");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Scraping {total_schools} skill schools…"))
        ));
    }

    fn on_school_start(&self, _index: usize, _total: usize, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn on_school_complete(
        &self,
        index: usize,
        total: usize,
        name: &str,
        records: usize,
        from_cache: bool,
    ) {
        self.bar.println(format!(
            "  {} {:>2}/{:<2}  {:<13} {}{}",
            green("✓"),
            index,
            total,
            name,
            dim(&format!("{records:>3} skills")),
            if from_cache { dim("  (cached)") } else { String::new() },
        ));
        self.bar.inc(1);
    }

    fn on_scrape_complete(&self, total_schools: usize, total_records: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} skills from {} schools",
            green("✔"),
            bold(&total_records.to_string()),
            total_schools
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Scrape every school into dos2_skills.xlsx
  dos2-skills

  # Write somewhere else
  dos2-skills -o skills/dos2.xlsx

  # Only two schools, ignoring any cached pages
  dos2-skills --school aerotheurge --school warfare --no-cache

  # Refetch pages older than a day, print run stats as JSON
  dos2-skills --cache-max-age 86400 --json

SCHOOLS:
  Aerotheurge Geomancer Huntsman Hydrosophist Necromancer
  Polymorph Pyrokinetic Scoundrel Summoning Warfare

ENVIRONMENT VARIABLES:
  DOS2_SKILLS_CACHE_DIR   Override the default page cache directory
  RUST_LOG                Override the log filter (e.g. dos2_skills=debug)
"#;

/// Scrape the Divinity: Original Sin 2 wiki skill tables into an xlsx workbook.
#[derive(Parser, Debug)]
#[command(
    name = "dos2-skills",
    version,
    about = "Scrape the Divinity: Original Sin 2 wiki skill tables into an xlsx workbook",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Workbook to write.
    #[arg(short, long, env = "DOS2_SKILLS_OUTPUT", default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Only scrape this school (repeatable, case-insensitive).
    #[arg(long = "school", value_name = "NAME", env = "DOS2_SKILLS_SCHOOLS", value_delimiter = ',')]
    schools: Vec<String>,

    /// Always fetch from the wiki; neither read nor write the page cache.
    #[arg(long, env = "DOS2_SKILLS_NO_CACHE")]
    no_cache: bool,

    /// Page cache directory.
    #[arg(long, value_name = "DIR", env = "DOS2_SKILLS_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Refetch cached pages older than this many seconds.
    #[arg(long, value_name = "SECS", env = "DOS2_SKILLS_CACHE_MAX_AGE")]
    cache_max_age: Option<u64>,

    /// Empty the page cache before scraping.
    #[arg(long, env = "DOS2_SKILLS_CLEAR_CACHE")]
    clear_cache: bool,

    /// HTTP timeout per page, in seconds.
    #[arg(long, value_name = "SECS", env = "DOS2_SKILLS_TIMEOUT", default_value_t = 60)]
    timeout: u64,

    /// Print run statistics (ScrapeStats) as JSON on stdout.
    #[arg(long, env = "DOS2_SKILLS_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "DOS2_SKILLS_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOS2_SKILLS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOS2_SKILLS_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs.
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

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ScrapeProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    if cli.clear_cache {
        clear_cache(&config.cache, cli.quiet)?;
    }

    // ── Run ──────────────────────────────────────────────────────────────
    let result = scrape_to_file(&config, &cli.output).await;
    // Releases the progress callback, clearing the bar if the run failed.
    drop(config);
    let stats = result.context("Scrape failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&stats).context("Failed to serialise stats")?;
        println!("{json}");
    }
    if !cli.quiet {
        print_summary(&stats, &cli.output);
    }

    Ok(())
}

/// Map CLI args to `ScrapeConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ScrapeConfig> {
    let mut builder = ScrapeConfig::builder()
        .timeout_secs(cli.timeout)
        .cache_enabled(!cli.no_cache);

    if !cli.schools.is_empty() {
        builder = builder.only_schools(&cli.schools);
    }
    if let Some(ref dir) = cli.cache_dir {
        builder = builder.cache_dir(dir);
    }
    if let Some(secs) = cli.cache_max_age {
        builder = builder.cache_max_age_secs(secs);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Remove every cached page, even when `--no-cache` disabled caching for this run.
fn clear_cache(settings: &CacheSettings, quiet: bool) -> Result<()> {
    let settings = CacheSettings {
        enabled: true,
        ..settings.clone()
    };
    let Some(cache) = settings.open() else {
        return Ok(());
    };
    let removed = cache
        .clear()
        .with_context(|| format!("Failed to clear page cache at {}", cache.dir().display()))?;
    if !quiet {
        eprintln!(
            "{} cleared {} cached pages from {}",
            cyan("◆"),
            removed,
            dim(&cache.dir().display().to_string())
        );
    }
    Ok(())
}

fn print_summary(stats: &ScrapeStats, output: &std::path::Path) {
    eprintln!(
        "{}  {} skills  {} schools ({} cached)  {}ms  →  {}",
        green("✔"),
        stats.total_records,
        stats.schools,
        stats.cache_hits,
        stats.total_duration_ms,
        bold(&output.display().to_string()),
    );
}
