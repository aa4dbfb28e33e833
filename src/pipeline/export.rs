//! Export: serialise the ordered record collection to an xlsx workbook.
//!
//! One worksheet, a bold header row with the [`COLUMNS`] names, then one row
//! per record in collection order. The `name` column holds a
//! `=HYPERLINK(url, label)` formula whose cached result is the label, so
//! viewers that do not recalculate still show the skill name.
//!
//! The workbook creation time is pinned, which makes the bytes a pure
//! function of the records: re-running against unchanged pages yields an
//! identical file.

use crate::error::SkillsError;
use crate::output::{SkillRecord, COLUMNS};
use crate::pipeline::normalize::plain_integer;
use rust_xlsxwriter::{
    ColNum, DocProperties, ExcelDateTime, Format, Formula, RowNum, Workbook, Worksheet,
};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Name of the single worksheet.
pub const SHEET_NAME: &str = "Skills";

/// Build the workbook and return its bytes.
pub fn write_workbook(records: &[SkillRecord]) -> Result<Vec<u8>, SkillsError> {
    let mut workbook = Workbook::new();
    let created = ExcelDateTime::from_ymd(2017, 9, 14)?;
    workbook.set_properties(
        &DocProperties::new()
            .set_title("Divinity: Original Sin 2 skills")
            .set_creation_datetime(&created),
    );

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header = Format::new().set_bold();
    for (col, title) in COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as ColNum, *title, &header)?;
    }

    for (i, record) in records.iter().enumerate() {
        write_record(worksheet, i as RowNum + 1, record)?;
    }

    worksheet.set_freeze_panes(1, 0)?;
    worksheet.autofit();

    let bytes = workbook.save_to_buffer()?;
    debug!("Workbook built: {} rows, {} bytes", records.len(), bytes.len());
    Ok(bytes)
}

/// Write the workbook to `path` atomically (temp file + rename).
pub fn write_workbook_file(records: &[SkillRecord], path: &Path) -> Result<(), SkillsError> {
    let bytes = write_workbook(records)?;
    let write_failed = |source: std::io::Error| SkillsError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_failed)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_failed)?;
    tmp.write_all(&bytes).map_err(write_failed)?;
    tmp.persist(path).map_err(|e| write_failed(e.error))?;
    Ok(())
}

/// `=HYPERLINK("url", "label")` with embedded quotes doubled.
pub fn hyperlink_formula(url: &str, label: &str) -> String {
    format!(
        "=HYPERLINK(\"{}\", \"{}\")",
        url.replace('"', "\"\""),
        label.replace('"', "\"\"")
    )
}

fn write_record(ws: &mut Worksheet, row: RowNum, r: &SkillRecord) -> Result<(), SkillsError> {
    for (col, field) in COLUMNS.iter().enumerate() {
        write_field(ws, row, col as ColNum, field, r)?;
    }
    Ok(())
}

/// Write the value of column `field` for `r`. Columns are looked up by
/// name, so the header row and the data rows share one ordering.
fn write_field(
    ws: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    field: &str,
    r: &SkillRecord,
) -> Result<(), SkillsError> {
    match field {
        "name" => {
            let formula =
                Formula::new(hyperlink_formula(&r.name.url, &r.name.label)).set_result(&r.name.label);
            ws.write_formula(row, col, formula)?;
        }
        "primary_school" => write_text(ws, row, col, &r.primary.school)?,
        "primary_requirement" => {
            ws.write_number(row, col, r.primary.level)?;
        }
        "secondary_school" => {
            if let Some(school) = r.secondary_school() {
                write_text(ws, row, col, school)?;
            }
        }
        "secondary_requirement" => {
            if let Some(level) = r.secondary_requirement() {
                ws.write_number(row, col, level)?;
            }
        }
        "memory_cost" => write_count(ws, row, col, &r.memory_cost)?,
        "action_point_cost" => {
            ws.write_number(row, col, r.action_point_cost)?;
        }
        "source_point_cost" => {
            ws.write_number(row, col, r.source_point_cost)?;
        }
        "cooldown" => write_count(ws, row, col, &r.cooldown)?,
        "resistance" => write_text(ws, row, col, &r.resistance)?,
        "scaling_attribute" => write_text(ws, row, col, &r.scaling_attribute)?,
        "range" => write_text(ws, row, col, &r.range)?,
        "description" => write_text(ws, row, col, &r.description)?,
        "note" => write_text(ws, row, col, &r.note)?,
        other => {
            return Err(SkillsError::Internal(format!(
                "no cell writer for column '{other}'"
            )))
        }
    }
    Ok(())
}

/// Text cell; empty text leaves the cell blank.
fn write_text(ws: &mut Worksheet, row: RowNum, col: ColNum, text: &str) -> Result<(), SkillsError> {
    if !text.is_empty() {
        ws.write_string(row, col, text)?;
    }
    Ok(())
}

/// Number cell when `text` is a plain integer, text cell otherwise.
fn write_count(ws: &mut Worksheet, row: RowNum, col: ColNum, text: &str) -> Result<(), SkillsError> {
    match plain_integer(text) {
        Some(n) => {
            ws.write_number(row, col, n)?;
            Ok(())
        }
        None => write_text(ws, row, col, text),
    }
}
