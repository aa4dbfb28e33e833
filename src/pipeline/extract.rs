//! Record extraction: one header/detail row pair → one [`SkillRecord`].
//!
//! ## Header row layouts
//!
//! Some school pages put the skill name in a `<th>`, others in a plain
//! `<td>`. [`HeaderLayout`] picks the variant by looking for a `<th>` and
//! decides which cells hold the name and the description.
//!
//! ## Detail row
//!
//! The detail row has nine cells in a fixed order:
//!
//! ```text
//! 0 schools+levels │ 1 memory │ 2 AP │ 3 SP │ 4 cooldown │ 5 resistance │ 6 scaling │ 7 range │ 8 note
//! ```
//!
//! Field rules live in [`super::normalize`]; this module only finds the
//! fragments and attaches row context to errors.

use super::normalize::{self, MalformedIcon};
use super::table::{child_elements, RowPair};
use crate::error::SkillsError;
use crate::output::{SchoolRequirement, SkillLink, SkillRecord};
use once_cell::sync::Lazy;
use reqwest::Url;
use scraper::{ElementRef, Selector};
use tracing::warn;

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static IMAGE: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());

const CELL_TAGS: &[&str] = &["th", "td"];

/// Where the name and description live in a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLayout {
    /// Name in the first `<th>`, description in the first `<td>`.
    Heading,
    /// No `<th>`: name in the first `<td>`, description in the second.
    Plain,
}

impl HeaderLayout {
    pub fn detect(header: ElementRef<'_>) -> Self {
        if child_elements(header, &["th"]).next().is_some() {
            HeaderLayout::Heading
        } else {
            HeaderLayout::Plain
        }
    }

    /// `(name cell, description cell)` of `header` under this layout.
    fn cells<'a>(self, header: ElementRef<'a>) -> (Option<ElementRef<'a>>, Option<ElementRef<'a>>) {
        let mut tds = child_elements(header, &["td"]);
        match self {
            HeaderLayout::Heading => (child_elements(header, &["th"]).next(), tds.next()),
            HeaderLayout::Plain => {
                let name = tds.next();
                (name, tds.next())
            }
        }
    }
}

/// Row context attached to every extraction error.
struct RowCtx<'s> {
    school: &'s str,
    index: usize,
}

impl RowCtx<'_> {
    fn missing_cell(&self, cell: &'static str) -> SkillsError {
        SkillsError::MissingCell {
            school: self.school.to_string(),
            index: self.index,
            cell,
        }
    }

    fn missing_icon(&self, icon: &'static str) -> SkillsError {
        SkillsError::MissingIcon {
            school: self.school.to_string(),
            index: self.index,
            icon,
        }
    }

    /// AP/SP cost from a cost cell; an unrecognised icon counts as 0.
    fn cost(&self, cell: ElementRef<'_>, prefix: &str) -> u8 {
        normalize::icon_cost(first_image(cell), prefix).unwrap_or_else(|MalformedIcon(file)| {
            warn!(
                "{} skill #{}: unrecognised {} icon '{}', using 0",
                self.school, self.index, prefix, file
            );
            0
        })
    }
}

/// Trimmed concatenated text of an element.
pub fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// `src` attributes of the images inside `cell`, in document order.
pub fn image_sources<'a>(cell: ElementRef<'a>) -> Vec<&'a str> {
    cell.select(&IMAGE)
        .filter_map(|img| img.value().attr("src"))
        .collect()
}

fn first_image<'a>(cell: ElementRef<'a>) -> Option<&'a str> {
    cell.select(&IMAGE).find_map(|img| img.value().attr("src"))
}

/// Build one record from a row pair.
///
/// * `school` — the school page being scraped (becomes `category`)
/// * `index`  — 1-based position of the pair in the table, for error messages
/// * `base`   — URL that relative skill links are resolved against
pub fn extract_record(
    pair: RowPair<'_>,
    school: &str,
    index: usize,
    base: &Url,
) -> Result<SkillRecord, SkillsError> {
    let ctx = RowCtx { school, index };

    // ── Header row ──────────────────────────────────────────────────────
    let layout = HeaderLayout::detect(pair.header);
    let (name_cell, description_cell) = layout.cells(pair.header);
    let name_cell = name_cell.ok_or_else(|| ctx.missing_cell("name cell"))?;
    let description_cell = description_cell.ok_or_else(|| ctx.missing_cell("description cell"))?;
    let name = extract_link(name_cell, &ctx, base)?;

    // ── Detail row ──────────────────────────────────────────────────────
    let cells: Vec<ElementRef<'_>> = child_elements(pair.detail, CELL_TAGS).collect();
    let cell = |i: usize, what: &'static str| cells.get(i).copied().ok_or_else(|| ctx.missing_cell(what));

    let (primary, secondary) = extract_schools(cell(0, "requirement cell")?, &ctx)?;

    let action_point_cost = ctx.cost(cell(2, "AP cell")?, "AP");
    let source_point_cost = ctx.cost(cell(3, "SP cell")?, "SP");

    Ok(SkillRecord {
        category: school.to_string(),
        name,
        primary,
        secondary,
        memory_cost: cell_text(cell(1, "memory cell")?),
        action_point_cost,
        source_point_cost,
        cooldown: normalize::cooldown(&cell_text(cell(4, "cooldown cell")?)),
        resistance: normalize::resistance(first_image(cell(5, "resistance cell")?)),
        scaling_attribute: cell_text(cell(6, "scaling cell")?),
        range: cell_text(cell(7, "range cell")?),
        description: cell_text(description_cell),
        note: cell_text(cell(8, "note cell")?),
    })
}

/// Display name and absolute URL from the name cell.
fn extract_link(cell: ElementRef<'_>, ctx: &RowCtx<'_>, base: &Url) -> Result<SkillLink, SkillsError> {
    let missing = || SkillsError::MissingAnchor {
        school: ctx.school.to_string(),
        index: ctx.index,
    };
    let href = cell
        .select(&ANCHOR)
        .next()
        .and_then(|a| a.value().attr("href"))
        .ok_or_else(missing)?;
    let url = base.join(href).map_err(|_| missing())?;

    let label = cell_text(cell);
    if label.is_empty() {
        return Err(ctx.missing_cell("skill name"));
    }

    Ok(SkillLink {
        label,
        url: url.to_string(),
    })
}

/// Primary and optional secondary school prerequisite from the first detail cell.
fn extract_schools(
    cell: ElementRef<'_>,
    ctx: &RowCtx<'_>,
) -> Result<(SchoolRequirement, Option<SchoolRequirement>), SkillsError> {
    let levels = normalize::requirement_levels(&cell.text().collect::<String>());
    let icons = image_sources(cell);

    let Some(&level) = levels.first() else {
        return Err(SkillsError::MissingRequirement {
            school: ctx.school.to_string(),
            index: ctx.index,
        });
    };
    let icon = icons.first().ok_or_else(|| ctx.missing_icon("school"))?;
    let primary = SchoolRequirement {
        school: normalize::school_from_icon(icon),
        level,
    };

    let secondary = match (icons.get(1), levels.get(1)) {
        (Some(icon), Some(&level)) => Some(SchoolRequirement {
            school: normalize::school_from_icon(icon),
            level,
        }),
        (None, None) => None,
        _ => {
            warn!(
                "{} skill #{}: {} school icons but {} level digits; ignoring second school",
                ctx.school,
                ctx.index,
                icons.len(),
                levels.len()
            );
            None
        }
    };

    Ok((primary, secondary))
}
