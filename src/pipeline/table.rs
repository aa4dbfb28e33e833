//! Document parsing: locate the skill table and pair its rows.
//!
//! Every skill occupies two consecutive body rows of the page's
//! `table.wiki_table`: a header row (name + description) followed by a detail
//! row (requirements, costs, cooldown, …). Rows are paired positionally,
//! `(2k, 2k + 1)`, in document order.

use crate::error::SkillsError;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static SKILL_TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table.wiki_table").unwrap());

/// One skill's header row and detail row.
#[derive(Debug, Clone, Copy)]
pub struct RowPair<'a> {
    pub header: ElementRef<'a>,
    pub detail: ElementRef<'a>,
}

/// Element children of `parent` with the given tag name, in order.
pub(crate) fn child_elements<'a>(
    parent: ElementRef<'a>,
    tags: &'static [&'static str],
) -> impl Iterator<Item = ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |el| tags.contains(&el.value().name()))
}

/// Body rows of the first skill table, paired as header/detail.
///
/// # Errors
/// - [`SkillsError::TableNotFound`] when the page has no `table.wiki_table`
///   or the table has no `tbody`
/// - [`SkillsError::UnpairedRow`] when the body has an odd number of rows
pub fn skill_rows<'a>(document: &'a Html, school: &str) -> Result<Vec<RowPair<'a>>, SkillsError> {
    let not_found = || SkillsError::TableNotFound {
        school: school.to_string(),
    };

    let table = document.select(&SKILL_TABLE).next().ok_or_else(not_found)?;
    let tbody = child_elements(table, &["tbody"]).next().ok_or_else(not_found)?;
    let rows: Vec<ElementRef<'a>> = child_elements(tbody, &["tr"]).collect();

    if rows.len() % 2 != 0 {
        return Err(SkillsError::UnpairedRow {
            school: school.to_string(),
            rows: rows.len(),
        });
    }

    Ok(rows
        .chunks_exact(2)
        .map(|pair| RowPair {
            header: pair[0],
            detail: pair[1],
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(pairs: &[RowPair<'_>]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|p| {
                (
                    p.header.text().collect::<String>().trim().to_string(),
                    p.detail.text().collect::<String>().trim().to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn pairs_rows_in_document_order() {
        let html = Html::parse_document(
            r#"<table class="wiki_table"><tbody>
                <tr><td>h1</td></tr><tr><td>d1</td></tr>
                <tr><td>h2</td></tr><tr><td>d2</td></tr>
            </tbody></table>"#,
        );
        let pairs = skill_rows(&html, "Warfare").unwrap();
        assert_eq!(
            texts(&pairs),
            vec![
                ("h1".to_string(), "d1".to_string()),
                ("h2".to_string(), "d2".to_string())
            ]
        );
    }

    #[test]
    fn skips_other_tables_and_header_section() {
        let html = Html::parse_document(
            r#"<table class="other"><tbody><tr><td>x</td></tr></tbody></table>
               <table class="wiki_table sortable">
                 <thead><tr><th>Name</th></tr></thead>
                 <tbody><tr><td>h</td></tr><tr><td>d</td></tr></tbody>
               </table>"#,
        );
        let pairs = skill_rows(&html, "Warfare").unwrap();
        assert_eq!(texts(&pairs), vec![("h".to_string(), "d".to_string())]);
    }

    #[test]
    fn empty_body_yields_no_pairs() {
        let html = Html::parse_document(r#"<table class="wiki_table"><tbody></tbody></table>"#);
        assert!(skill_rows(&html, "Warfare").unwrap().is_empty());
    }

    #[test]
    fn missing_table_is_an_error() {
        let html = Html::parse_document("<p>maintenance</p>");
        let err = skill_rows(&html, "Polymorph").unwrap_err();
        assert!(matches!(err, SkillsError::TableNotFound { ref school } if school == "Polymorph"));
    }

    #[test]
    fn odd_row_count_is_an_error() {
        let html = Html::parse_document(
            r#"<table class="wiki_table"><tbody>
                <tr><td>h1</td></tr><tr><td>d1</td></tr><tr><td>h2</td></tr>
            </tbody></table>"#,
        );
        let err = skill_rows(&html, "Summoning").unwrap_err();
        assert!(matches!(err, SkillsError::UnpairedRow { rows: 3, .. }));
    }
}
