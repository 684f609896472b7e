mod classes;
mod spells;
mod wiki;

pub use classes::{BASE_CLASSES, base_class};
pub use spells::{
    BUILTIN_SPELL_LEVELS, BuiltinSpells, SpellLevelResolver, SpellLevelSource, SpellTable,
    WikiCache,
};
pub use wiki::{parse_spell_level, wiki_cache_file_name};
