//! Cast session state machine.
//!
//! Tracks one cast at a time:
//! - Idle: no cast in progress
//! - Casting: a cast has begun; hits and stuns are counted until it resolves
//!
//! A cast resolves back to Idle on "regain your concentration" (success) or
//! "spell is interrupted" (failure). Only casts that took at least one hit
//! produce a record, and interruptions during a stun are not channeling
//! failures so they are never recorded.

use std::sync::Arc;

use crate::combat_log::{EventClassifier, LogEvent, normalize_line};
use crate::record::{CastAttemptRecord, Outcome, Provenance};

use super::ResolvedBaseline;

/// The cast currently being channeled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveCast {
    pub spell_name: String,
    pub hits: u32,
    pub stunned: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CastState {
    #[default]
    Idle,
    Casting(ActiveCast),
}

/// Mutable per-file state threaded through every event.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub current_skill: u32,
    pub current_level: u32,
    character_class: String,
    source: Option<Arc<str>>,
    pub cast: CastState,
}

impl SessionState {
    pub fn new(baseline: &ResolvedBaseline) -> Self {
        Self {
            current_skill: baseline.skill,
            current_level: baseline.level,
            character_class: baseline.class.clone(),
            source: None,
            cast: CastState::Idle,
        }
    }

    /// Attach a source file name; emitted records then carry provenance.
    pub fn with_source(mut self, file_name: impl Into<Arc<str>>) -> Self {
        self.source = Some(file_name.into());
        self
    }

    pub fn character_class(&self) -> &str {
        &self.character_class
    }

    pub fn is_casting(&self) -> bool {
        matches!(self.cast, CastState::Casting(_))
    }

    pub fn hits_this_cast(&self) -> u32 {
        match &self.cast {
            CastState::Casting(cast) => cast.hits,
            CastState::Idle => 0,
        }
    }

    pub fn stunned_this_cast(&self) -> bool {
        matches!(&self.cast, CastState::Casting(cast) if cast.stunned)
    }

    fn record(&self, cast: ActiveCast, outcome: Outcome, line_number: u64) -> CastAttemptRecord {
        CastAttemptRecord {
            skill: self.current_skill,
            level: self.current_level,
            class: self.character_class.clone(),
            spell: cast.spell_name,
            hits: cast.hits,
            outcome,
            provenance: self.source.as_ref().map(|file_name| Provenance {
                file_name: Arc::clone(file_name),
                line_number,
            }),
        }
    }
}

/// Advance the state machine by one event.
///
/// Returns the record emitted when this event resolves a cast that took hits.
/// `line_number` is only used for provenance.
pub fn advance_cast_state(
    event: LogEvent,
    state: &mut SessionState,
    line_number: u64,
) -> Option<CastAttemptRecord> {
    // Counters update in any state and never touch the active cast
    match event {
        LogEvent::SkillIncrease { new_skill_value } => {
            state.current_skill = new_skill_value;
            return None;
        }
        LogEvent::LevelGain { new_level } => {
            state.current_level = new_level;
            return None;
        }
        LogEvent::CastBegin { spell_name } => {
            if let CastState::Casting(prev) = &state.cast {
                tracing::trace!(
                    spell = %prev.spell_name,
                    hits = prev.hits,
                    line_number,
                    "Abandoning unresolved cast"
                );
            }
            state.cast = CastState::Casting(ActiveCast {
                spell_name,
                hits: 0,
                stunned: false,
            });
            return None;
        }
        _ => {}
    }

    match std::mem::take(&mut state.cast) {
        CastState::Idle => None,
        CastState::Casting(cast) => handle_casting(event, cast, state, line_number),
    }
}

fn handle_casting(
    event: LogEvent,
    mut cast: ActiveCast,
    state: &mut SessionState,
    line_number: u64,
) -> Option<CastAttemptRecord> {
    match event {
        LogEvent::DamageHit => {
            cast.hits = cast.hits.saturating_add(1);
            state.cast = CastState::Casting(cast);
            None
        }
        LogEvent::Stunned => {
            cast.stunned = true;
            state.cast = CastState::Casting(cast);
            None
        }
        LogEvent::ConcentrationHeld => {
            // Zero-hit casts still resolve; they just carry no channeling signal
            (cast.hits > 0).then(|| state.record(cast, Outcome::Success, line_number))
        }
        LogEvent::CastInterrupted => {
            (cast.hits > 0 && !cast.stunned)
                .then(|| state.record(cast, Outcome::Failure, line_number))
        }
        _ => {
            state.cast = CastState::Casting(cast);
            None
        }
    }
}

/// Replay `lines` through a fresh state machine seeded from `baseline`.
///
/// A cast still open when the lines run out is discarded.
pub fn run_session<I, S>(
    lines: I,
    baseline: &ResolvedBaseline,
    classifier: &EventClassifier,
) -> Vec<CastAttemptRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    run_session_with(SessionState::new(baseline), lines, classifier)
}

/// [`run_session`] starting from a caller-built state (e.g. with a source name).
pub fn run_session_with<I, S>(
    mut state: SessionState,
    lines: I,
    classifier: &EventClassifier,
) -> Vec<CastAttemptRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut records = Vec::new();

    for (idx, line) in lines.into_iter().enumerate() {
        let Some(message) = normalize_line(line.as_ref()) else {
            continue;
        };
        let event = classifier.classify(message);
        if let Some(record) = advance_cast_state(event, &mut state, idx as u64 + 1) {
            tracing::trace!(
                spell = %record.spell,
                hits = record.hits,
                outcome = %record.outcome,
                "Cast attempt recorded"
            );
            records.push(record);
        }
    }

    if let CastState::Casting(cast) = &state.cast {
        tracing::trace!(spell = %cast.spell_name, "Discarding cast open at end of log");
    }

    records
}
