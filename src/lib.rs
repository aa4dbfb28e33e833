//! # dos2-skills
//!
//! Scrape the skill tables of the Divinity: Original Sin 2 wiki into a single
//! Excel workbook.
//!
//! Each of the ten skill schools has one wiki page with one `wiki_table`.
//! Every skill spans two table rows: a header row with the linked name and
//! the description, and a detail row with requirements, costs, cooldown,
//! resistance, scaling attribute, range and a note. Several of those values
//! are only present as icon file names, so extraction decodes them from the
//! `img` sources rather than from text.
//!
//! ## Pipeline Overview
//!
//! ```text
//! school list
//!  │
//!  ├─ 1. Fetch    GET each page (served from the on-disk cache when fresh)
//!  ├─ 2. Table    locate table.wiki_table, pair its body rows
//!  ├─ 3. Extract  one SkillRecord per row pair (icons → values)
//!  ├─ 4. Collect  concatenate in school order, then document order
//!  └─ 5. Export   xlsx: header row + one row per record, HYPERLINK names
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dos2_skills::{scrape_to_file, ScrapeConfig, DEFAULT_OUTPUT_FILE};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScrapeConfig::default();
//!     let stats = scrape_to_file(&config, DEFAULT_OUTPUT_FILE).await?;
//!     eprintln!("{} skills from {} schools", stats.total_records, stats.schools);
//!     Ok(())
//! }
//! ```
//!
//! Parsing is available without any network access through
//! [`extract_school`]:
//!
//! ```rust,no_run
//! use dos2_skills::{extract_school, School};
//! use reqwest::Url;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let html = std::fs::read_to_string("Aerotheurge+Skills.html")?;
//! let school = School::new("Aerotheurge", "https://divinityoriginalsin2.wiki.fextralife.com/Aerotheurge+Skills");
//! let base = Url::parse("https://divinityoriginalsin2.wiki.fextralife.com")?;
//! for skill in extract_school(&html, &school, &base)? {
//!     println!("{} ({} AP)", skill.name.label, skill.action_point_cost);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `dos2-skills` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! dos2-skills = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod scrape;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    CacheSettings, School, ScrapeConfig, ScrapeConfigBuilder, DEFAULT_BASE_URL,
    DEFAULT_OUTPUT_FILE,
};
pub use error::SkillsError;
pub use output::{
    SchoolRequirement, SchoolSummary, ScrapeOutput, ScrapeStats, SkillLink, SkillRecord, COLUMNS,
};
pub use page_cache::{CacheError, PageCache};
pub use progress::{NoopProgressCallback, ProgressCallback, ScrapeProgressCallback};
pub use scrape::{extract_school, scrape, scrape_sync, scrape_to_file};
