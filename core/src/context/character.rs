use std::path::Path;

/// Filename fragments that never name a character (`eqlog_Name_server.txt`).
pub const DEFAULT_INFRASTRUCTURE_TOKENS: &[&str] = &["eqlog", "txt"];

/// Derive the tracked character name from a log file name.
///
/// Splits the name into runs of ASCII letters, drops runs equal
/// (case-insensitively) to an infrastructure token, and returns the first
/// run left over.
///
/// ```
/// use eqchannel_core::context::character_name;
/// let tokens = ["eqlog".to_string(), "txt".to_string()];
/// assert_eq!(character_name("eqlog_Harcourt_P1999Green.txt", &tokens), Some("Harcourt"));
/// assert_eq!(character_name("eqlog.txt", &tokens), None);
/// ```
pub fn character_name<'a>(file_name: &'a str, tokens: &[String]) -> Option<&'a str> {
    file_name
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|run| !run.is_empty())
        .find(|run| !tokens.iter().any(|t| t.eq_ignore_ascii_case(run)))
}

/// [`character_name`] applied to the final component of `path`.
pub fn character_name_from_path(path: &Path, tokens: &[String]) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    character_name(file_name, tokens).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> Vec<String> {
        DEFAULT_INFRASTRUCTURE_TOKENS
            .iter()
            .map(|t| t.to_string())
            .collect()
    }

    #[test]
    fn test_standard_log_name() {
        assert_eq!(
            character_name("eqlog_Harcourt_project1999.txt", &tokens()),
            Some("Harcourt")
        );
    }

    #[test]
    fn test_tokens_are_case_insensitive() {
        assert_eq!(
            character_name("EQLOG_Harcourt.TXT", &tokens()),
            Some("Harcourt")
        );
    }

    #[test]
    fn test_digits_split_runs() {
        // "P1999Green" splits into "P" and "Green"; the name still comes first
        assert_eq!(
            character_name("eqlog_Mira_P1999Green.txt", &tokens()),
            Some("Mira")
        );
        assert_eq!(character_name("eqlog_2024_x.txt", &tokens()), Some("x"));
    }

    #[test]
    fn test_no_name_left() {
        assert_eq!(character_name("eqlog_2024.txt", &tokens()), None);
        assert_eq!(character_name("", &tokens()), None);
    }

    #[test]
    fn test_custom_tokens() {
        let custom = vec!["eqlog".to_string(), "txt".to_string(), "backup".to_string()];
        assert_eq!(
            character_name("backup_eqlog_Harcourt.txt", &custom),
            Some("Harcourt")
        );
    }

    #[test]
    fn test_from_path_uses_file_name_only() {
        let path = Path::new("/logs/archive/eqlog_Harcourt_green.txt");
        assert_eq!(
            character_name_from_path(path, &tokens()),
            Some("Harcourt".to_string())
        );
    }
}
