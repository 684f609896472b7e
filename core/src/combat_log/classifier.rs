//! Message classification.
//!
//! Maps a normalized message (timestamp already stripped) onto a [`LogEvent`].
//! Rules are evaluated top to bottom and the first match wins. Two rule sets
//! exist: the full set used by the sequential pass, and the reduced
//! skill/level/identity set used while resolving a file's baseline.

use std::sync::LazyLock;

use regex::Regex;

use super::LogEvent;

const CAST_BEGIN_MARKER: &str = "You begin casting ";
const STUNNED_MARKER: &str = "You are stunned!";
const CONCENTRATION_MARKER: &str = "You regain your concentration";
const INTERRUPTED_MARKER: &str = "Your spell is interrupted.";

static CAST_BEGIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^You begin casting (.*?)\.").expect("valid cast regex"));

// The `You have been \w+.` alternative is a broad catch-all for status lines
// (poisoned, diseased, blinded, ...). It matches any sentence of that shape.
static DAMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?: YOU for \d+ points of damage|You have been \w+)\.").expect("valid damage regex")
});

static SKILL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^You have become better at Channeling! \((\d+)\)").expect("valid skill regex")
});

static LEVEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:You have gained a level!|You raise a level!) Welcome to level (\d+)!")
        .expect("valid level regex")
});

/// Classifies messages for one log file.
///
/// The identity rule is bound to the file's tracked character, so a
/// classifier is built per file.
#[derive(Debug, Clone)]
pub struct EventClassifier {
    identity: Option<Regex>,
}

impl EventClassifier {
    /// Build a classifier. Without a character name, identity lines never match.
    pub fn new(character_name: Option<&str>) -> Self {
        let identity = character_name.and_then(|name| {
            let pattern = format!(r"(?i)^\[(\d+)\s+(.*?)\]\s+{}\b", regex::escape(name));
            Regex::new(&pattern).ok()
        });
        Self { identity }
    }

    /// Full rule set, in the priority the sequential pass requires.
    ///
    /// Skill and level updates win over everything, then cast begin, then
    /// the in-cast events. Identity sightings come last.
    pub fn classify(&self, message: &str) -> LogEvent {
        if let Some(event) = classify_skill(message) {
            return event;
        }
        if let Some(event) = classify_level(message) {
            return event;
        }
        if let Some(event) = classify_cast_begin(message) {
            return event;
        }
        if message.starts_with(STUNNED_MARKER) {
            return LogEvent::Stunned;
        }
        if DAMAGE_RE.is_match(message) {
            return LogEvent::DamageHit;
        }
        if message.starts_with(CONCENTRATION_MARKER) {
            return LogEvent::ConcentrationHeld;
        }
        if message.starts_with(INTERRUPTED_MARKER) {
            return LogEvent::CastInterrupted;
        }
        self.classify_identity(message)
            .unwrap_or(LogEvent::Unclassified)
    }

    /// Reduced rule set for the baseline pass: skill, level, identity only.
    pub fn classify_baseline(&self, message: &str) -> LogEvent {
        classify_skill(message)
            .or_else(|| classify_level(message))
            .or_else(|| self.classify_identity(message))
            .unwrap_or(LogEvent::Unclassified)
    }

    fn classify_identity(&self, message: &str) -> Option<LogEvent> {
        let caps = self.identity.as_ref()?.captures(message)?;
        let level = caps[1].parse().ok()?;
        Some(LogEvent::IdentitySighting {
            level,
            class_title: caps[2].to_string(),
        })
    }
}

fn classify_skill(message: &str) -> Option<LogEvent> {
    let caps = SKILL_RE.captures(message)?;
    let new_skill_value = caps[1].parse().ok()?;
    Some(LogEvent::SkillIncrease { new_skill_value })
}

fn classify_level(message: &str) -> Option<LogEvent> {
    let caps = LEVEL_RE.captures(message)?;
    let new_level = caps[1].parse().ok()?;
    Some(LogEvent::LevelGain { new_level })
}

fn classify_cast_begin(message: &str) -> Option<LogEvent> {
    // Cheap prefix check before running the regex
    if !message.starts_with(CAST_BEGIN_MARKER) {
        return None;
    }
    let caps = CAST_BEGIN_RE.captures(message)?;
    Some(LogEvent::CastBegin {
        spell_name: caps[1].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> EventClassifier {
        EventClassifier::new(Some("Harcourt"))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cast lifecycle messages
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_cast_begin_extracts_spell_name() {
        assert_eq!(
            classifier().classify("You begin casting Spirit of Oak."),
            LogEvent::CastBegin {
                spell_name: "Spirit of Oak".to_string()
            }
        );
    }

    #[test]
    fn test_cast_begin_stops_at_first_period() {
        assert_eq!(
            classifier().classify("You begin casting Gate. Again."),
            LogEvent::CastBegin {
                spell_name: "Gate".to_string()
            }
        );
    }

    #[test]
    fn test_cast_begin_requires_period() {
        assert_eq!(
            classifier().classify("You begin casting Gate"),
            LogEvent::Unclassified
        );
    }

    #[test]
    fn test_resolution_messages() {
        let c = classifier();
        assert_eq!(
            c.classify("You regain your concentration and continue your casting."),
            LogEvent::ConcentrationHeld
        );
        assert_eq!(
            c.classify("Your spell is interrupted."),
            LogEvent::CastInterrupted
        );
        assert_eq!(c.classify("You are stunned!"), LogEvent::Stunned);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Hits
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_melee_hit_matches_anywhere() {
        let c = classifier();
        assert_eq!(
            c.classify("A bat hits YOU for 5 points of damage."),
            LogEvent::DamageHit
        );
        assert_eq!(
            c.classify("a cyclops crushes YOU for 212 points of damage."),
            LogEvent::DamageHit
        );
    }

    #[test]
    fn test_status_catch_all_matches_single_word() {
        let c = classifier();
        assert_eq!(c.classify("You have been poisoned."), LogEvent::DamageHit);
        assert_eq!(c.classify("You have been blinded."), LogEvent::DamageHit);
        // Broad by design: any single-word sentence of this shape counts
        assert_eq!(c.classify("You have been summoned."), LogEvent::DamageHit);
    }

    #[test]
    fn test_status_catch_all_rejects_multi_word() {
        assert_eq!(
            classifier().classify("You have been knocked unconscious!"),
            LogEvent::Unclassified
        );
    }

    #[test]
    fn test_outgoing_damage_is_not_a_hit() {
        assert_eq!(
            classifier().classify("You hit a bat for 5 points of damage."),
            LogEvent::Unclassified
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Counters
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_skill_increase() {
        assert_eq!(
            classifier().classify("You have become better at Channeling! (121)"),
            LogEvent::SkillIncrease {
                new_skill_value: 121
            }
        );
    }

    #[test]
    fn test_other_skill_is_ignored() {
        assert_eq!(
            classifier().classify("You have become better at Abjuration! (121)"),
            LogEvent::Unclassified
        );
    }

    #[test]
    fn test_level_gain_both_phrasings() {
        let c = classifier();
        assert_eq!(
            c.classify("You have gained a level! Welcome to level 34!"),
            LogEvent::LevelGain { new_level: 34 }
        );
        assert_eq!(
            c.classify("You raise a level! Welcome to level 35!"),
            LogEvent::LevelGain { new_level: 35 }
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Identity
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_identity_sighting_case_insensitive() {
        assert_eq!(
            classifier().classify("[50 Hierophant] harcourt (Wood Elf) <Applets>"),
            LogEvent::IdentitySighting {
                level: 50,
                class_title: "Hierophant".to_string()
            }
        );
    }

    #[test]
    fn test_identity_multi_word_title() {
        assert_eq!(
            classifier().classify("[52 Grave Lord] Harcourt"),
            LogEvent::IdentitySighting {
                level: 52,
                class_title: "Grave Lord".to_string()
            }
        );
    }

    #[test]
    fn test_identity_requires_word_boundary() {
        assert_eq!(
            classifier().classify("[50 Druid] Harcourtson"),
            LogEvent::Unclassified
        );
    }

    #[test]
    fn test_identity_other_character() {
        assert_eq!(
            classifier().classify("[50 Cleric] Someone (Human)"),
            LogEvent::Unclassified
        );
    }

    #[test]
    fn test_no_character_never_matches_identity() {
        let c = EventClassifier::new(None);
        assert_eq!(c.classify("[50 Cleric] Anyone"), LogEvent::Unclassified);
    }

    #[test]
    fn test_baseline_rules_ignore_cast_events() {
        let c = classifier();
        assert_eq!(
            c.classify_baseline("You begin casting Spirit of Oak."),
            LogEvent::Unclassified
        );
        assert_eq!(
            c.classify_baseline("A bat hits YOU for 5 points of damage."),
            LogEvent::Unclassified
        );
        assert_eq!(
            c.classify_baseline("You raise a level! Welcome to level 2!"),
            LogEvent::LevelGain { new_level: 2 }
        );
    }
}
