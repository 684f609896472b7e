//! Directory-level driver: one log file in, zero or more records out.
//!
//! Each file goes through name binding, the baseline pass and the cast
//! session pass on private state. Files can run on the rayon pool; results
//! are merged back in file-name order.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::combat_log::{EventClassifier, LogFile};
use crate::context::{AppConfig, DEFAULT_INFRASTRUCTURE_TOKENS, character_name_from_path};
use crate::error::ParseError;
use crate::record::CastAttemptRecord;
use crate::signal_processor::{ResolvedBaseline, SessionState, resolve_baseline, run_session_with};

const LOG_EXTENSION: &str = "txt";

#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// File-name fragments skipped when deriving the character name.
    pub infrastructure_tokens: Vec<String>,
    /// Process files on the rayon thread pool.
    pub parallel: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            infrastructure_tokens: DEFAULT_INFRASTRUCTURE_TOKENS
                .iter()
                .map(|t| t.to_string())
                .collect(),
            parallel: true,
        }
    }
}

impl ProcessOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            infrastructure_tokens: config.infrastructure_tokens.clone(),
            parallel: config.parallel,
        }
    }
}

/// Why a readable file produced no records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    NoCharacterName,
    IncompleteBaseline { missing: Vec<&'static str> },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NoCharacterName => f.write_str("no character name in file name"),
            RejectReason::IncompleteBaseline { missing } => {
                write!(f, "baseline incomplete, missing {}", missing.join(", "))
            }
        }
    }
}

/// Result of processing one file.
#[derive(Debug)]
pub enum FileOutcome {
    Parsed {
        path: PathBuf,
        character: String,
        baseline: ResolvedBaseline,
        records: Vec<CastAttemptRecord>,
    },
    Rejected {
        path: PathBuf,
        reason: RejectReason,
    },
    Unreadable {
        path: PathBuf,
        error: io::Error,
    },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            FileOutcome::Parsed { path, .. }
            | FileOutcome::Rejected { path, .. }
            | FileOutcome::Unreadable { path, .. } => path,
        }
    }

    pub fn records(&self) -> &[CastAttemptRecord] {
        match self {
            FileOutcome::Parsed { records, .. } => records,
            _ => &[],
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, FileOutcome::Parsed { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub files_seen: usize,
    pub files_parsed: usize,
    pub files_rejected: usize,
    pub files_unreadable: usize,
    pub successes: usize,
    pub failures: usize,
}

impl BatchSummary {
    fn add(&mut self, outcome: &FileOutcome) {
        self.files_seen += 1;
        match outcome {
            FileOutcome::Parsed { records, .. } => {
                self.files_parsed += 1;
                for record in records {
                    if record.outcome.is_success() {
                        self.successes += 1;
                    } else {
                        self.failures += 1;
                    }
                }
            }
            FileOutcome::Rejected { .. } => self.files_rejected += 1,
            FileOutcome::Unreadable { .. } => self.files_unreadable += 1,
        }
    }

    pub fn records(&self) -> usize {
        self.successes + self.failures
    }
}

/// Every file's outcome, in file-name order.
#[derive(Debug, Default)]
pub struct BatchOutput {
    pub outcomes: Vec<FileOutcome>,
    pub summary: BatchSummary,
}

impl BatchOutput {
    pub fn records(&self) -> impl Iterator<Item = &CastAttemptRecord> {
        self.outcomes.iter().flat_map(|o| o.records())
    }

    pub fn into_records(self) -> Vec<CastAttemptRecord> {
        self.outcomes
            .into_iter()
            .flat_map(|o| match o {
                FileOutcome::Parsed { records, .. } => records,
                _ => Vec::new(),
            })
            .collect()
    }
}

/// Run both passes over one log file.
///
/// Never fails; problems are reported through the returned outcome and the
/// log.
pub fn process_file(path: &Path, options: &ProcessOptions) -> FileOutcome {
    let Some(character) = character_name_from_path(path, &options.infrastructure_tokens) else {
        tracing::warn!(file = %path.display(), "Skipping log: no character name in file name");
        return FileOutcome::Rejected {
            path: path.to_path_buf(),
            reason: RejectReason::NoCharacterName,
        };
    };

    let log = match LogFile::open(path) {
        Ok(log) => log,
        Err(error) => {
            tracing::error!(file = %path.display(), error = %error, "Failed to read log");
            return FileOutcome::Unreadable {
                path: path.to_path_buf(),
                error,
            };
        }
    };

    let classifier = EventClassifier::new(Some(&character));
    let baseline = resolve_baseline(log.lines().map(|(_, line)| line), &classifier);

    let Some(resolved) = baseline.resolved() else {
        let missing = baseline.missing_fields();
        tracing::warn!(
            file = %path.display(),
            character = %character,
            skill = ?baseline.skill,
            level = ?baseline.level,
            class = ?baseline.class,
            missing = ?missing,
            "Skipping log: baseline incomplete"
        );
        return FileOutcome::Rejected {
            path: path.to_path_buf(),
            reason: RejectReason::IncompleteBaseline { missing },
        };
    };

    tracing::debug!(
        file = %path.display(),
        skill = resolved.skill,
        level = resolved.level,
        class = %resolved.class,
        "Baseline resolved"
    );

    let state = SessionState::new(&resolved).with_source(source_name(path));
    let records = run_session_with(state, log.lines().map(|(_, line)| line), &classifier);

    tracing::info!(
        file = %path.display(),
        character = %character,
        lines = log.line_count(),
        bytes = log.byte_len(),
        records = records.len(),
        "Parsed log"
    );

    FileOutcome::Parsed {
        path: path.to_path_buf(),
        character,
        baseline: resolved,
        records,
    }
}

/// Run the cast session pass over one log with no name or baseline gate.
///
/// Records carry zeroed skill, level and class; only their outcome, hit
/// count and provenance are meaningful. Used by the max-hits report, which
/// needs every cast in every log.
pub fn scan_file(path: &Path) -> io::Result<Vec<CastAttemptRecord>> {
    let log = LogFile::open(path)?;
    let placeholder = ResolvedBaseline {
        skill: 0,
        level: 0,
        class: String::new(),
    };
    let state = SessionState::new(&placeholder).with_source(source_name(path));
    let classifier = EventClassifier::new(None);
    let records = run_session_with(state, log.lines().map(|(_, line)| line), &classifier);

    tracing::debug!(file = %path.display(), records = records.len(), "Scanned log");
    Ok(records)
}

/// [`scan_file`] over every log in `dir`, concatenated in file-name order.
///
/// Unreadable files are logged and skipped.
pub fn scan_directory(
    dir: &Path,
    options: &ProcessOptions,
) -> Result<Vec<CastAttemptRecord>, ParseError> {
    let files = list_log_files(dir)?;
    tracing::info!(dir = %dir.display(), files = files.len(), parallel = options.parallel, "Scanning logs");

    let scan = |path: &PathBuf| match scan_file(path) {
        Ok(records) => records,
        Err(error) => {
            tracing::error!(file = %path.display(), error = %error, "Failed to read log");
            Vec::new()
        }
    };

    let per_file: Vec<Vec<CastAttemptRecord>> = if options.parallel {
        files.par_iter().map(scan).collect()
    } else {
        files.iter().map(scan).collect()
    };

    Ok(per_file.into_iter().flatten().collect())
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `*.txt` files directly inside `dir`, sorted by file name.
pub fn list_log_files(dir: &Path) -> Result<Vec<PathBuf>, ParseError> {
    if !dir.is_dir() {
        return Err(ParseError::DirectoryNotFound(dir.to_path_buf()));
    }

    let entries = fs::read_dir(dir).map_err(|e| ParseError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == LOG_EXTENSION)
        })
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Process every log in `dir`.
///
/// Only a missing directory is fatal; per-file problems end up in the
/// outcomes and the summary.
pub fn process_directory(dir: &Path, options: &ProcessOptions) -> Result<BatchOutput, ParseError> {
    let files = list_log_files(dir)?;
    tracing::info!(dir = %dir.display(), files = files.len(), parallel = options.parallel, "Processing logs");

    let outcomes: Vec<FileOutcome> = if options.parallel {
        files
            .par_iter()
            .map(|path| process_file(path, options))
            .collect()
    } else {
        files
            .iter()
            .map(|path| process_file(path, options))
            .collect()
    };

    let mut summary = BatchSummary::default();
    for outcome in &outcomes {
        summary.add(outcome);
    }

    tracing::info!(
        files = summary.files_seen,
        parsed = summary.files_parsed,
        rejected = summary.files_rejected,
        unreadable = summary.files_unreadable,
        successes = summary.successes,
        failures = summary.failures,
        "Batch complete"
    );

    Ok(BatchOutput { outcomes, summary })
}
