//! Result types: skill records and run statistics.

use serde::{Deserialize, Serialize};

/// Column headers of the exported workbook, in [`SkillRecord`] field order.
pub const COLUMNS: [&str; 14] = [
    "name",
    "primary_school",
    "primary_requirement",
    "secondary_school",
    "secondary_requirement",
    "memory_cost",
    "action_point_cost",
    "source_point_cost",
    "cooldown",
    "resistance",
    "scaling_attribute",
    "range",
    "description",
    "note",
];

/// Resistance value used when a skill has no resistance icon.
pub const NO_RESISTANCE: &str = "n/a";

/// A skill's display name and the absolute URL of its wiki page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLink {
    pub label: String,
    pub url: String,
}

/// A school prerequisite: school name plus required level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolRequirement {
    pub school: String,
    pub level: u8,
}

/// One skill entry, built from one header/detail row pair.
///
/// `secondary` holds the optional second school and its level together,
/// so the two are always both present or both absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRecord {
    /// The school page this record was scraped from.
    pub category: String,
    pub name: SkillLink,
    pub primary: SchoolRequirement,
    pub secondary: Option<SchoolRequirement>,
    pub memory_cost: String,
    pub action_point_cost: u8,
    pub source_point_cost: u8,
    pub cooldown: String,
    pub resistance: String,
    pub scaling_attribute: String,
    pub range: String,
    pub description: String,
    pub note: String,
}

impl SkillRecord {
    pub fn secondary_school(&self) -> Option<&str> {
        self.secondary.as_ref().map(|s| s.school.as_str())
    }

    pub fn secondary_requirement(&self) -> Option<u8> {
        self.secondary.as_ref().map(|s| s.level)
    }
}

/// Per-school summary of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolSummary {
    pub name: String,
    pub url: String,
    pub records: usize,
    pub from_cache: bool,
}

/// Statistics for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeStats {
    pub schools: usize,
    pub total_records: usize,
    /// Pages served from the response cache instead of the network.
    pub cache_hits: usize,
    /// Wall-clock time spent fetching pages.
    pub fetch_duration_ms: u64,
    pub total_duration_ms: u64,
    pub per_school: Vec<SchoolSummary>,
}

/// The ordered record collection plus run statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeOutput {
    /// Records in (school order, document order).
    pub records: Vec<SkillRecord>,
    pub stats: ScrapeStats,
}
