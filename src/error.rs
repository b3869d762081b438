//! Crate-boundary error type (spec.md §7, SPEC_FULL.md §8).
//!
//! Rule/handler failures are never `Result` errors — they are caught by
//! the walker and turned into diagnostics (spec.md §7 "Rule crash").
//! `LintError` exists only for the three failure paths that genuinely
//! abort an operation before any diagnostics can be produced: a missing
//! or unparseable config file, and a bad glob pattern.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LintError {
    #[error("config file not found starting from {0}")]
    ConfigNotFound(PathBuf),

    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid glob pattern {pattern:?}: {source}")]
    GlobCompile {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("failed to read fixture {0}")]
    FixtureIo(#[source] std::io::Error),
}
