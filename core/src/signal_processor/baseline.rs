//! Baseline resolution.
//!
//! Character logs usually start mid-session, so the skill, level and class in
//! effect at the first line have to be inferred from later announcements:
//! - Skill: the first "better at Channeling! (n)" message, minus one.
//! - Level: the first level-up message minus one, or a who-line level if that
//!   comes first (who-lines report the current level exactly).
//! - Class: the title from the first who-line naming the character.

use crate::combat_log::{EventClassifier, LogEvent, normalize_line};
use crate::game_data::base_class;

/// Starting values for one file, each possibly still unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Baseline {
    pub skill: Option<u32>,
    pub level: Option<u32>,
    pub class: Option<String>,
}

/// A baseline with every field known; the only kind the state machine accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBaseline {
    pub skill: u32,
    pub level: u32,
    pub class: String,
}

impl Baseline {
    pub fn is_complete(&self) -> bool {
        self.skill.is_some() && self.level.is_some() && self.class.is_some()
    }

    /// Names of the fields still unknown, for rejection diagnostics.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.skill.is_none() {
            missing.push("skill");
        }
        if self.level.is_none() {
            missing.push("level");
        }
        if self.class.is_none() {
            missing.push("class");
        }
        missing
    }

    /// `Some` only when all three values were found.
    pub fn resolved(&self) -> Option<ResolvedBaseline> {
        Some(ResolvedBaseline {
            skill: self.skill?,
            level: self.level?,
            class: self.class.clone()?,
        })
    }

    /// Fold one classified event into the baseline. Known fields never change.
    fn observe(&mut self, event: LogEvent) {
        match event {
            LogEvent::SkillIncrease { new_skill_value } if self.skill.is_none() => {
                self.skill = Some(new_skill_value.saturating_sub(1));
            }
            LogEvent::LevelGain { new_level } if self.level.is_none() => {
                self.level = Some(new_level.saturating_sub(1));
            }
            LogEvent::IdentitySighting { level, class_title } => {
                if self.level.is_none() {
                    self.level = Some(level);
                }
                if self.class.is_none() {
                    self.class = Some(base_class(&class_title).to_string());
                }
            }
            _ => {}
        }
    }
}

/// Scan `lines` in order until skill, level and class are all known, or the
/// lines run out. Lines that are not log lines are skipped.
pub fn resolve_baseline<I, S>(lines: I, classifier: &EventClassifier) -> Baseline
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut baseline = Baseline::default();

    for line in lines {
        let Some(message) = normalize_line(line.as_ref()) else {
            continue;
        };
        baseline.observe(classifier.classify_baseline(message));
        if baseline.is_complete() {
            break;
        }
    }

    baseline
}
