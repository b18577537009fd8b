//! Harness-wide error type.
//!
//! Every failure that is not an ordinary test mismatch flows through
//! [`HarnessError`]. A mismatch is never an error here: it is the normal way
//! a test reports "wrong" and is handled by the batch loop instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

/// Names the toolchain stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Compile,
    Assemble,
    Link,
    Execute,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Compile => "compile",
            Stage::Assemble => "assemble",
            Stage::Link => "link",
            Stage::Execute => "execute",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to walk corpus directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// A corpus-configuration problem: the case exists but its recording
    /// does not. Aborts selection for that case rather than silently
    /// skipping it.
    #[error("case '{id}' has no expected-output file at {path}")]
    MissingExpected { id: String, path: PathBuf },

    #[error("failed to load toolchain config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("{stage} stage failed to start ({program}): {source}")]
    Spawn {
        stage: Stage,
        program: String,
        #[source]
        source: io::Error,
    },

    /// The front-end rejected the source before producing an artifact.
    /// Surfaced distinctly from a test mismatch: no comparison happened.
    #[error("compiler rejected case '{id}' (exit status {status})")]
    BuildFailure { id: String, status: i32 },

    /// An intermediate stage (assembler or linker) exited nonzero. This is
    /// toolchain plumbing going wrong, not observed program behavior.
    #[error("{stage} stage exited with status {status} for case '{id}'")]
    StageFailure { stage: Stage, id: String, status: i32 },
}

impl HarnessError {
    /// True for the build-error short-circuit, which the reporter labels
    /// separately from mismatches and infrastructure errors.
    pub fn is_build_failure(&self) -> bool {
        matches!(self, HarnessError::BuildFailure { .. })
    }
}
