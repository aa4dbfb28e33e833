//! Pipeline stages for wiki-to-workbook scraping.
//!
//! Each submodule implements one step. Only [`fetch`] is async; [`table`],
//! [`extract`] and [`normalize`] work on in-memory HTML, and [`export`]
//! touches the file system only in [`export::write_workbook_file`].
//!
//! ## Data Flow
//!
//! ```text
//! fetch ──▶ table ──▶ extract ──▶ export
//! (HTML)   (row pairs) (records)   (xlsx)
//!                 normalize ─┘
//! ```
//!
//! 1. [`fetch`]     — GET a school page, through the on-disk response cache
//! 2. [`table`]     — find `table.wiki_table` and pair its body rows
//! 3. [`extract`]   — turn one row pair into a [`crate::SkillRecord`]
//! 4. [`normalize`] — per-field rules for icon-encoded values and text quirks
//! 5. [`export`]    — write the ordered records to an xlsx workbook

pub mod export;
pub mod extract;
pub mod fetch;
pub mod normalize;
pub mod table;
