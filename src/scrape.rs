//! Collection builder: the run's entry points.
//!
//! Schools are processed strictly in configured order, one at a time:
//! fetch the page, parse it, extract every row pair, append. The first
//! error aborts the run. Parsing happens in [`extract_school`], a plain
//! synchronous function, so a parsed document never lives across an
//! `.await`.

use crate::config::{School, ScrapeConfig};
use crate::error::SkillsError;
use crate::output::{SchoolSummary, ScrapeOutput, ScrapeStats, SkillRecord};
use crate::pipeline::fetch::PageFetcher;
use crate::pipeline::{export, extract, table};
use reqwest::Url;
use scraper::Html;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Scrape every configured school and return the ordered records.
///
/// # Errors
/// Returns the first fetch, structural or extraction error; no partial
/// collection is returned.
pub async fn scrape(config: &ScrapeConfig) -> Result<ScrapeOutput, SkillsError> {
    let total_start = Instant::now();
    let base = config.base()?;
    let fetcher = PageFetcher::from_config(config)?;

    let total = config.schools.len();
    info!("Starting scrape of {} schools", total);
    if let Some(ref cb) = config.progress_callback {
        cb.on_scrape_start(total);
    }

    let mut records: Vec<SkillRecord> = Vec::new();
    let mut per_school = Vec::with_capacity(total);
    let mut fetch_duration_ms = 0u64;

    for (i, school) in config.schools.iter().enumerate() {
        let index = i + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_school_start(index, total, &school.name);
        }

        // ── Fetch ────────────────────────────────────────────────────────
        let fetch_start = Instant::now();
        let page = fetcher.fetch(&school.url).await?;
        fetch_duration_ms += fetch_start.elapsed().as_millis() as u64;

        // ── Parse + extract ──────────────────────────────────────────────
        let school_records = extract_school(&page.body, school, &base)?;
        info!(
            "{}: {} skills{}",
            school.name,
            school_records.len(),
            if page.from_cache { " (cached)" } else { "" }
        );

        if let Some(ref cb) = config.progress_callback {
            cb.on_school_complete(
                index,
                total,
                &school.name,
                school_records.len(),
                page.from_cache,
            );
        }

        per_school.push(SchoolSummary {
            name: school.name.clone(),
            url: school.url.clone(),
            records: school_records.len(),
            from_cache: page.from_cache,
        });
        records.extend(school_records);
    }

    let stats = ScrapeStats {
        schools: total,
        total_records: records.len(),
        cache_hits: per_school.iter().filter(|s| s.from_cache).count(),
        fetch_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        per_school,
    };

    info!(
        "Scrape complete: {} skills from {} schools, {}ms total",
        stats.total_records, stats.schools, stats.total_duration_ms
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_scrape_complete(stats.schools, stats.total_records);
    }

    Ok(ScrapeOutput { records, stats })
}

/// Parse one school page and extract all of its records, in document order.
pub fn extract_school(html: &str, school: &School, base: &Url) -> Result<Vec<SkillRecord>, SkillsError> {
    let document = Html::parse_document(html);
    let pairs = table::skill_rows(&document, &school.name)?;
    debug!("{}: {} row pairs", school.name, pairs.len());

    pairs
        .into_iter()
        .enumerate()
        .map(|(i, pair)| extract::extract_record(pair, &school.name, i + 1, base))
        .collect()
}

/// Scrape and write the workbook directly to a file.
///
/// The file is written atomically (temp file + rename), so a failed run
/// never leaves a truncated workbook behind.
pub async fn scrape_to_file(
    config: &ScrapeConfig,
    output_path: impl AsRef<Path>,
) -> Result<ScrapeStats, SkillsError> {
    let output = scrape(config).await?;
    let path = output_path.as_ref();
    export::write_workbook_file(&output.records, path)?;
    info!("Wrote {} rows to {}", output.records.len(), path.display());
    Ok(output.stats)
}

/// Synchronous wrapper around [`scrape`].
///
/// Creates a temporary tokio runtime internally.
pub fn scrape_sync(config: &ScrapeConfig) -> Result<ScrapeOutput, SkillsError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| SkillsError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(scrape(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_school_preserves_document_order() {
        let html = r#"<table class="wiki_table"><tbody>
            <tr><th><a href="/A">A</a></th><td>first</td></tr>
            <tr><td><img src="/x/warfare-icon.png"> 1</td><td>1</td><td></td><td></td><td>-</td><td></td><td>Strength</td><td>Melee</td><td></td></tr>
            <tr><th><a href="/B">B</a></th><td>second</td></tr>
            <tr><td><img src="/x/warfare-icon.png"> 2</td><td>2</td><td></td><td></td><td>5</td><td></td><td>Strength</td><td>Melee</td><td></td></tr>
        </tbody></table>"#;
        let school = School::new("Warfare", "https://example.com/Warfare+Skills");
        let base = Url::parse("https://example.com").unwrap();

        let records = extract_school(html, &school, &base).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.label.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
        assert!(records.iter().all(|r| r.category == "Warfare"));
        assert_eq!(records[0].cooldown, "0");
        assert_eq!(records[1].primary.level, 2);
    }

    #[test]
    fn extraction_error_names_the_row() {
        let html = r#"<table class="wiki_table"><tbody>
            <tr><th><a href="/A">A</a></th><td>ok</td></tr>
            <tr><td><img src="/x/warfare-icon.png"> 1</td><td>1</td><td></td><td></td><td>1</td><td></td><td>s</td><td>r</td><td></td></tr>
            <tr><th><a href="/B">B</a></th><td>broken</td></tr>
            <tr><td><img src="/x/warfare-icon.png"></td><td>1</td><td></td><td></td><td>1</td><td></td><td>s</td><td>r</td><td></td></tr>
        </tbody></table>"#;
        let school = School::new("Warfare", "https://example.com/Warfare+Skills");
        let base = Url::parse("https://example.com").unwrap();

        let err = extract_school(html, &school, &base).unwrap_err();
        assert!(matches!(err, SkillsError::MissingRequirement { index: 2, .. }), "got: {err}");
    }
}
