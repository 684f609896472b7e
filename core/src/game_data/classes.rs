//! Class title lookup.
//!
//! Who-lines show a level-dependent title ("Hierophant", "Grave Lord")
//! rather than the class. Titles are mapped back to one of the fourteen base
//! classes here.

use phf::phf_map;

pub const BASE_CLASSES: [&str; 14] = [
    "Bard",
    "Cleric",
    "Druid",
    "Enchanter",
    "Magician",
    "Monk",
    "Necromancer",
    "Paladin",
    "Ranger",
    "Rogue",
    "Shadow Knight",
    "Shaman",
    "Warrior",
    "Wizard",
];

/// Lowercased title -> base class.
static CLASS_TITLES: phf::Map<&'static str, &'static str> = phf_map! {
    "bard" => "Bard", "minstrel" => "Bard", "troubadour" => "Bard", "virtuoso" => "Bard",
    "cleric" => "Cleric", "vicar" => "Cleric", "templar" => "Cleric", "high priest" => "Cleric",
    "druid" => "Druid", "wanderer" => "Druid", "preserver" => "Druid", "hierophant" => "Druid",
    "enchanter" => "Enchanter", "illusionist" => "Enchanter", "beguiler" => "Enchanter",
    "phantasmist" => "Enchanter",
    "magician" => "Magician", "elementalist" => "Magician", "conjurer" => "Magician",
    "arch mage" => "Magician",
    "monk" => "Monk", "disciple" => "Monk", "master" => "Monk", "grandmaster" => "Monk",
    "necromancer" => "Necromancer", "heretic" => "Necromancer", "defiler" => "Necromancer",
    "warlock" => "Necromancer",
    "paladin" => "Paladin", "cavalier" => "Paladin", "knight" => "Paladin",
    "crusader" => "Paladin",
    "ranger" => "Ranger", "pathfinder" => "Ranger", "outrider" => "Ranger", "warder" => "Ranger",
    "rogue" => "Rogue", "rake" => "Rogue", "blackguard" => "Rogue", "assassin" => "Rogue",
    "shadow knight" => "Shadow Knight", "reaver" => "Shadow Knight",
    "revenant" => "Shadow Knight", "grave lord" => "Shadow Knight",
    "shaman" => "Shaman", "mystic" => "Shaman", "luminary" => "Shaman", "oracle" => "Shaman",
    "warrior" => "Warrior", "champion" => "Warrior", "myrmidon" => "Warrior",
    "warlord" => "Warrior",
    "wizard" => "Wizard", "channeler" => "Wizard", "evoker" => "Wizard", "sorcerer" => "Wizard",
};

/// Map a class title to its base class, case-insensitively.
///
/// Unknown titles are returned unchanged.
///
/// ```
/// use eqchannel_core::game_data::base_class;
/// assert_eq!(base_class("Grave Lord"), "Shadow Knight");
/// assert_eq!(base_class("HIEROPHANT"), "Druid");
/// assert_eq!(base_class("Beastlord"), "Beastlord");
/// ```
pub fn base_class(title: &str) -> &str {
    CLASS_TITLES
        .get(title.to_lowercase().as_str())
        .copied()
        .unwrap_or(title)
}
