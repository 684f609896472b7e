//! Per-file analysis passes.
//!
//! A file is read twice: [`resolve_baseline`] establishes the starting
//! skill, level and class, then [`run_session`] replays every line through the
//! cast state machine. Both are pure over in-memory lines.

mod baseline;
mod cast_state;

pub use baseline::{Baseline, ResolvedBaseline, resolve_baseline};
pub use cast_state::{
    ActiveCast, CastState, SessionState, advance_cast_state, run_session, run_session_with,
};
