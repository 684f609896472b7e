//! Spell level lookup.
//!
//! Levels come from a chain of sources, tried in order:
//! - **Builtin**: a few spells the reference pages get wrong or lack
//! - **Table**: a user TOML file (`[spells."Spirit of Oak"] Druid = 39`)
//! - **Wiki cache**: a directory of raw spell pages saved from the wiki
//!
//! Lookups are memoized per (spell, class), misses included.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::wiki::{parse_spell_level, wiki_cache_file_name};
use crate::error::ReferenceError;

/// Manually maintained levels, keyed by (spell, base class).
pub const BUILTIN_SPELL_LEVELS: &[(&str, &str, u32)] = &[
    ("Wrath of Nature", "Druid", 50),
    ("Spirit of Eagle", "Druid", 54),
    ("Shield of Thorns", "Druid", 49),
];

/// Something that can tell the level at which a class gets a spell.
pub trait SpellLevelSource {
    fn spell_level(&self, spell: &str, base_class: &str) -> Option<u32>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinSpells;

impl SpellLevelSource for BuiltinSpells {
    fn spell_level(&self, spell: &str, base_class: &str) -> Option<u32> {
        BUILTIN_SPELL_LEVELS
            .iter()
            .find(|(s, c, _)| *s == spell && *c == base_class)
            .map(|(_, _, level)| *level)
    }

    fn name(&self) -> &'static str {
        "builtin"
    }
}

/// Spell levels loaded from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SpellTable {
    /// Spell name -> (class -> level)
    #[serde(default)]
    pub spells: HashMap<String, HashMap<String, u32>>,
}

impl SpellTable {
    pub fn load(path: &Path) -> Result<Self, ReferenceError> {
        let contents = fs::read_to_string(path).map_err(|e| ReferenceError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ReferenceError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }
}

impl SpellLevelSource for SpellTable {
    fn spell_level(&self, spell: &str, base_class: &str) -> Option<u32> {
        self.spells
            .get(spell)?
            .iter()
            .find(|(class, _)| class.eq_ignore_ascii_case(base_class))
            .map(|(_, level)| *level)
    }

    fn name(&self) -> &'static str {
        "table"
    }
}

/// A directory of raw wiki pages, one file per spell.
#[derive(Debug, Clone)]
pub struct WikiCache {
    dir: PathBuf,
}

impl WikiCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn page_path(&self, spell: &str) -> PathBuf {
        self.dir.join(wiki_cache_file_name(spell))
    }
}

impl SpellLevelSource for WikiCache {
    fn spell_level(&self, spell: &str, base_class: &str) -> Option<u32> {
        let path = self.page_path(spell);
        let markup = match fs::read_to_string(&path) {
            Ok(markup) => markup,
            Err(e) => {
                tracing::debug!(spell, path = %path.display(), error = %e, "No cached wiki page");
                return None;
            }
        };

        let level = parse_spell_level(&markup, base_class);
        if level.is_none() {
            tracing::warn!(spell, base_class, "Class not listed on cached wiki page");
        }
        level
    }

    fn name(&self) -> &'static str {
        "wiki"
    }
}

/// Chains sources and memoizes answers.
pub struct SpellLevelResolver {
    sources: Vec<Box<dyn SpellLevelSource + Send + Sync>>,
    cache: HashMap<(String, String), Option<u32>>,
}

impl Default for SpellLevelResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SpellLevelResolver {
    /// A resolver with only the builtin source.
    pub fn new() -> Self {
        Self {
            sources: vec![Box::new(BuiltinSpells)],
            cache: HashMap::new(),
        }
    }

    /// A resolver with no sources at all; every lookup misses.
    pub fn empty() -> Self {
        Self {
            sources: Vec::new(),
            cache: HashMap::new(),
        }
    }

    /// Append a source; earlier sources take precedence.
    pub fn add_source(&mut self, source: Box<dyn SpellLevelSource + Send + Sync>) {
        self.sources.push(source);
    }

    pub fn with_source(mut self, source: Box<dyn SpellLevelSource + Send + Sync>) -> Self {
        self.add_source(source);
        self
    }

    pub fn resolve(&mut self, spell: &str, base_class: &str) -> Option<u32> {
        let key = (spell.to_string(), base_class.to_string());
        if let Some(cached) = self.cache.get(&key) {
            return *cached;
        }

        let found = self.sources.iter().find_map(|source| {
            source
                .spell_level(spell, base_class)
                .map(|level| (source.name(), level))
        });

        let level = match found {
            Some((source, level)) => {
                tracing::debug!(spell, base_class, level, source, "Resolved spell level");
                Some(level)
            }
            None => {
                tracing::debug!(spell, base_class, "Spell level unknown");
                None
            }
        };

        self.cache.insert(key, level);
        level
    }

    /// Number of distinct (spell, class) lookups performed.
    pub fn cached_lookups(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: Arc<AtomicUsize>,
        level: Option<u32>,
    }

    impl SpellLevelSource for CountingSource {
        fn spell_level(&self, _spell: &str, _base_class: &str) -> Option<u32> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.level
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    #[test]
    fn test_builtin_levels() {
        assert_eq!(BuiltinSpells.spell_level("Spirit of Eagle", "Druid"), Some(54));
        assert_eq!(BuiltinSpells.spell_level("Spirit of Eagle", "Ranger"), None);
    }

    #[test]
    fn test_parse_spell_table() {
        let toml = r#"
[spells."Spirit of Oak"]
Druid = 39

[spells."Greater Healing"]
Cleric = 29
Druid = 44
"#;
        let table: SpellTable = toml::from_str(toml).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.spell_level("Spirit of Oak", "Druid"), Some(39));
        assert_eq!(table.spell_level("Greater Healing", "cleric"), Some(29));
        assert_eq!(table.spell_level("Greater Healing", "Wizard"), None);
        assert_eq!(table.spell_level("Unknown", "Druid"), None);
    }

    #[test]
    fn test_load_spell_table_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            SpellTable::load(&missing),
            Err(ReferenceError::Io { .. })
        ));

        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "spells = 3").unwrap();
        assert!(matches!(
            SpellTable::load(&bad),
            Err(ReferenceError::Parse { .. })
        ));
    }

    #[test]
    fn test_wiki_cache_reads_pages() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Spirit_of_Oak.txt"),
            "* [[Druid]] - Level 39\n",
        )
        .unwrap();

        let cache = WikiCache::new(dir.path());
        assert_eq!(cache.spell_level("Spirit of Oak", "Druid"), Some(39));
        assert_eq!(cache.spell_level("Spirit of Oak", "Cleric"), None);
        assert_eq!(cache.spell_level("Gate", "Druid"), None);
    }

    #[test]
    fn test_resolver_precedence_builtin_first() {
        let mut table = SpellTable::default();
        table.spells.insert(
            "Spirit of Eagle".to_string(),
            HashMap::from([("Druid".to_string(), 1)]),
        );
        let mut resolver = SpellLevelResolver::new().with_source(Box::new(table));
        assert_eq!(resolver.resolve("Spirit of Eagle", "Druid"), Some(54));
    }

    #[test]
    fn test_resolver_memoizes_misses() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut resolver = SpellLevelResolver::empty().with_source(Box::new(CountingSource {
            calls: Arc::clone(&calls),
            level: None,
        }));

        assert_eq!(resolver.resolve("Gate", "Druid"), None);
        assert_eq!(resolver.resolve("Gate", "Druid"), None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.cached_lookups(), 1);
    }

    #[test]
    fn test_resolver_falls_through_sources() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut resolver = SpellLevelResolver::new().with_source(Box::new(CountingSource {
            calls: Arc::clone(&calls),
            level: Some(12),
        }));
        assert_eq!(resolver.resolve("Gate", "Druid"), Some(12));
        assert_eq!(resolver.resolve("Spirit of Eagle", "Druid"), Some(54));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
