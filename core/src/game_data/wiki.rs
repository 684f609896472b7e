//! Spell-level extraction from raw wiki markup.
//!
//! Spell pages list each class on its own bullet line:
//!
//! ```text
//! * [[Druid]] - Level 53 {{Kunark Era Inline}} - Level 51 {{Velious Era Inline}}
//! ```
//!
//! When a class line carries several levels, the one tagged for the Velious
//! era is preferred; otherwise the first level listed wins.

use std::sync::LazyLock;

use regex::Regex;

static LEVEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)level\s+(\d+)\s*").expect("valid level regex"));

const PREFERRED_ERA: &str = "velious";

/// Extract `base_class`'s level from a spell page's raw markup.
pub fn parse_spell_level(markup: &str, base_class: &str) -> Option<u32> {
    let class_re = Regex::new(&format!(
        r"(?i)\*\s*\[\[{}\]\]([^\n]*)",
        regex::escape(base_class)
    ))
    .ok()?;
    let caps = class_re.captures(markup)?;
    let line = caps.get(1)?.as_str();
    let lowered = line.to_ascii_lowercase();

    let mut levels: Vec<(u32, &str)> = Vec::new();
    for m in LEVEL_RE.captures_iter(line) {
        let (Some(whole), Some(digits)) = (m.get(0), m.get(1)) else {
            continue;
        };
        let Ok(level) = digits.as_str().parse::<u32>() else {
            continue;
        };
        // Trailing text runs to the next "level" or the end of the line
        let trailing_end = lowered[whole.end()..]
            .find("level")
            .map(|p| whole.end() + p)
            .unwrap_or(line.len());
        levels.push((level, &line[whole.end()..trailing_end]));
    }

    let (first, _) = *levels.first()?;
    if levels.len() > 1
        && let Some((level, _)) = levels
            .iter()
            .find(|(_, trailing)| trailing.to_lowercase().contains(PREFERRED_ERA))
    {
        return Some(*level);
    }
    Some(first)
}

/// File name a spell page is cached under: spaces become `_`, backticks `'`.
///
/// ```
/// use eqchannel_core::game_data::wiki_cache_file_name;
/// assert_eq!(wiki_cache_file_name("Spirit of Oak"), "Spirit_of_Oak.txt");
/// assert_eq!(wiki_cache_file_name("Tuyen`s Chant"), "Tuyen's_Chant.txt");
/// ```
pub fn wiki_cache_file_name(spell_name: &str) -> String {
    format!("{}.txt", spell_name.replace(' ', "_").replace('`', "'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "{{Spellbox\n| name = Spirit of Oak\n}}\n\
        == Classes ==\n\
        * [[Druid]] - Level 53 {{Kunark Era Inline}} - Level 51 {{Velious Era Inline}}\n\
        * [[Shaman]] - Level 44\n";

    #[test]
    fn test_prefers_velious_level() {
        assert_eq!(parse_spell_level(PAGE, "Druid"), Some(51));
    }

    #[test]
    fn test_single_level() {
        assert_eq!(parse_spell_level(PAGE, "Shaman"), Some(44));
    }

    #[test]
    fn test_class_match_is_case_insensitive() {
        assert_eq!(parse_spell_level(PAGE, "shaman"), Some(44));
    }

    #[test]
    fn test_missing_class() {
        assert_eq!(parse_spell_level(PAGE, "Wizard"), None);
    }

    #[test]
    fn test_class_without_levels() {
        assert_eq!(parse_spell_level("* [[Cleric]] - see notes\n", "Cleric"), None);
    }

    #[test]
    fn test_multiple_levels_without_era_takes_first() {
        let page = "* [[Cleric]] - Level 9 - Level 12\n";
        assert_eq!(parse_spell_level(page, "Cleric"), Some(9));
    }

    #[test]
    fn test_multi_word_class() {
        let page = "* [[Shadow Knight]] - Level 39\n";
        assert_eq!(parse_spell_level(page, "Shadow Knight"), Some(39));
    }
}
