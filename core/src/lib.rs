pub mod batch;
pub mod combat_log;
pub mod context;
pub mod enrichment;
pub mod error;
pub mod game_data;
pub mod models;
pub mod record;
pub mod report;
pub mod signal_processor;
pub mod storage;

// Re-exports for convenience
pub use batch::{
    BatchOutput, BatchSummary, FileOutcome, ProcessOptions, RejectReason, process_directory,
    process_file, scan_directory, scan_file,
};
pub use combat_log::{EventClassifier, LogEvent, normalize_line};
pub use error::{ConfigError, ParseError, ReferenceError, StorageError};
pub use record::{CastAttemptRecord, EnrichedRecord, Outcome, Provenance};
pub use signal_processor::{Baseline, SessionState, resolve_baseline, run_session};
