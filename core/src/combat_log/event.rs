/// Semantic tag for a single normalized log message.
///
/// Only the handful of message shapes that matter for channeling analysis are
/// recognized; everything else is [`LogEvent::Unclassified`] and dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogEvent {
    /// "You begin casting <spell>."
    CastBegin { spell_name: String },

    /// Struck by an attack, or a "You have been <word>." status line.
    DamageHit,

    /// "You are stunned!"
    Stunned,

    /// "You regain your concentration..." (the cast held).
    ConcentrationHeld,

    /// "Your spell is interrupted." (the cast failed).
    CastInterrupted,

    /// "You have become better at Channeling! (<n>)"
    SkillIncrease { new_skill_value: u32 },

    /// "You have gained a level! Welcome to level <n>!"
    LevelGain { new_level: u32 },

    /// A who/roster line naming the tracked character: "[<level> <title>] <name>".
    IdentitySighting { level: u32, class_title: String },

    #[default]
    Unclassified,
}
