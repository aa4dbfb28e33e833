//! Field normalisation: pure string rules applied to raw cell fragments.
//!
//! The wiki encodes several values only through image file names (school
//! icons, AP/SP pips, resistance badges) and carries a couple of literal
//! oddities in plain text. Each rule lives here as a standalone function
//! that takes the raw fragment (an `img` `src`, or trimmed cell text) and
//! returns the normalised value, including the default for a missing icon.
//!
//! | Field | Input | Rule |
//! |-------|-------|------|
//! | school | `…/aerotheurge-icon.png` | text before first `-`, typo fix, title case |
//! | requirement | `"Aero 2 Pyro 3"` | every ASCII digit, in order |
//! | AP / SP | `…/AP3.png` | `AP` → 1, `AP<n>` → n, no icon → 0 |
//! | cooldown | `"-"` | `"4 (3 in def. Edition)"` → `"3"`, `"-"` → `"0"` |
//! | resistance | `…/Fire_Resistance.png` | text before first `_`, title case; no icon → `n/a` |

use crate::output::NO_RESISTANCE;
use once_cell::sync::Lazy;
use regex::Regex;

/// The wiki misspells one school in its icon file names.
const SCHOOL_TYPO: (&str, &str) = ("hunstman", "huntsman");

/// Cooldown text used on the wiki for skills changed in the Definitive Edition.
const DEFINITIVE_EDITION_COOLDOWN: &str = "4 (3 in def. Edition)";

static RE_LEVEL_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").unwrap());

/// An icon file name that does not match the expected `<prefix><n>` shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedIcon(pub String);

/// Final path segment of an image `src`.
pub fn file_name(src: &str) -> &str {
    src.rsplit('/').next().unwrap_or(src)
}

/// File name without its extension (text before the first `.`).
pub fn file_stem(src: &str) -> &str {
    let name = file_name(src);
    name.split('.').next().unwrap_or(name)
}

/// Capitalise the first letter of every alphabetic run and lowercase the rest.
///
/// `"fire"` → `"Fire"`, `"PHYSICAL"` → `"Physical"`, `"ap2b"` → `"Ap2B"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// School name encoded in a school icon `src`.
pub fn school_from_icon(src: &str) -> String {
    let name = file_name(src);
    let prefix = name.split('-').next().unwrap_or(name);
    title_case(&prefix.replace(SCHOOL_TYPO.0, SCHOOL_TYPO.1))
}

/// Requirement levels embedded in the requirement cell text, left to right.
pub fn requirement_levels(text: &str) -> Vec<u8> {
    RE_LEVEL_DIGIT
        .find_iter(text)
        .map(|m| m.as_str().as_bytes()[0] - b'0')
        .collect()
}

/// Cost encoded by an `AP`/`SP` icon.
///
/// `prefix` is `"AP"` or `"SP"`. A bare prefix means 1, a numeric suffix is
/// the cost, no icon means 0.
pub fn icon_cost(src: Option<&str>, prefix: &str) -> Result<u8, MalformedIcon> {
    let Some(src) = src else {
        return Ok(0);
    };
    let malformed = || MalformedIcon(file_name(src).to_string());
    let suffix = file_stem(src).strip_prefix(prefix).ok_or_else(malformed)?;
    if suffix.is_empty() {
        return Ok(1);
    }
    suffix.parse::<u8>().map_err(|_| malformed())
}

/// Cooldown text with the two literal substitutions applied.
pub fn cooldown(text: &str) -> String {
    match text {
        DEFINITIVE_EDITION_COOLDOWN => "3".to_string(),
        "-" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Resistance encoded by a resistance icon; `n/a` when there is none.
pub fn resistance(src: Option<&str>) -> String {
    match src {
        Some(src) => {
            let name = file_name(src);
            title_case(name.split('_').next().unwrap_or(name))
        }
        None => NO_RESISTANCE.to_string(),
    }
}

/// Parse a cell's text as a plain unsigned integer (no sign, no spaces).
pub fn plain_integer(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ICON_DIR: &str = "/file/Divinity-Original-Sin-2/";

    fn icon(name: &str) -> String {
        format!("{ICON_DIR}{name}")
    }

    #[test]
    fn title_case_matches_word_rules() {
        assert_eq!(title_case("fire"), "Fire");
        assert_eq!(title_case("PHYSICAL"), "Physical");
        assert_eq!(title_case("magic armor"), "Magic Armor");
        assert_eq!(title_case("ap2b"), "Ap2B");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn school_icon_prefix_is_title_cased() {
        assert_eq!(school_from_icon(&icon("aerotheurge-icon.png")), "Aerotheurge");
        assert_eq!(school_from_icon(&icon("pyrokinetic-icon.png")), "Pyrokinetic");
        assert_eq!(school_from_icon("polymorph.png"), "Polymorph.Png");
    }

    #[test]
    fn school_icon_typo_is_corrected() {
        assert_eq!(school_from_icon(&icon("hunstman-icon.png")), "Huntsman");
        assert_eq!(school_from_icon(&icon("huntsman-icon.png")), "Huntsman");
    }

    #[test]
    fn requirement_digits_in_order() {
        assert_eq!(requirement_levels(" 2 3"), vec![2, 3]);
        assert_eq!(requirement_levels("1"), vec![1]);
        assert_eq!(requirement_levels("Aero 12"), vec![1, 2]);
        assert!(requirement_levels("none").is_empty());
    }

    #[test]
    fn ap_icon_costs() {
        assert_eq!(icon_cost(Some(&icon("AP.png")), "AP"), Ok(1));
        assert_eq!(icon_cost(Some(&icon("AP3.png")), "AP"), Ok(3));
        assert_eq!(icon_cost(None, "AP"), Ok(0));
    }

    #[test]
    fn sp_icon_costs() {
        assert_eq!(icon_cost(Some(&icon("SP.png")), "SP"), Ok(1));
        assert_eq!(icon_cost(Some(&icon("SP2.png")), "SP"), Ok(2));
        assert_eq!(icon_cost(None, "SP"), Ok(0));
    }

    #[test]
    fn unexpected_cost_icon_is_malformed() {
        assert_eq!(
            icon_cost(Some(&icon("SP2.png")), "AP"),
            Err(MalformedIcon("SP2.png".into()))
        );
        assert_eq!(
            icon_cost(Some(&icon("APx.png")), "AP"),
            Err(MalformedIcon("APx.png".into()))
        );
    }

    #[test]
    fn cooldown_substitutions() {
        assert_eq!(cooldown("4 (3 in def. Edition)"), "3");
        assert_eq!(cooldown("-"), "0");
        assert_eq!(cooldown("5"), "5");
        assert_eq!(cooldown("Once per combat"), "Once per combat");
        assert_eq!(cooldown("1-2"), "1-2");
    }

    #[test]
    fn resistance_from_icon() {
        assert_eq!(resistance(Some(&icon("Fire_Resistance.png"))), "Fire");
        assert_eq!(resistance(Some(&icon("physical_armor.png"))), "Physical");
        assert_eq!(resistance(None), "n/a");
    }

    #[test]
    fn plain_integer_only_accepts_digits() {
        assert_eq!(plain_integer("3"), Some(3));
        assert_eq!(plain_integer("12"), Some(12));
        assert_eq!(plain_integer(""), None);
        assert_eq!(plain_integer("-1"), None);
        assert_eq!(plain_integer("1 (2)"), None);
    }
}
