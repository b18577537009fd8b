//! Output normalization and expected-vs-observed comparison.
//!
//! Everything here is pure: parsing the recorded `.out` format, folding raw
//! process exit statuses into the 0-255 convention, and deciding pass/fail.
//! The toolchain and filesystem never appear in this module, which is what
//! keeps the comparison rules easy to test exhaustively.

/// The decoded contents of a recorded `.out` file.
///
/// The file format is plain text: everything after the final line break is
/// the expected process exit code (decimal, as text); everything before it
/// is the expected standard output. A file with no line break at all is
/// wholly an exit-code token with no expected output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedResult {
    pub output: String,
    pub exit_code: String,
}

impl ExpectedResult {
    /// Parses raw `.out` file contents per the last-line-break rule.
    ///
    /// Both halves are whitespace-trimmed, so a trailing newline in the
    /// recording never matters.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.rfind('\n') {
            Some(pos) => Self {
                output: trimmed[..pos].trim().to_string(),
                exit_code: trimmed[pos..].trim().to_string(),
            },
            None => Self {
                output: String::new(),
                exit_code: trimmed.to_string(),
            },
        }
    }
}

/// What one toolchain run actually produced: trimmed captured stdout plus
/// the normalized exit-code token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub output: String,
    pub exit_code: String,
}

impl RunOutcome {
    /// Builds an outcome from the raw captured stdout and raw exit status.
    pub fn new(captured: &str, raw_status: i32) -> Self {
        Self {
            output: captured.trim().to_string(),
            exit_code: normalize_exit_status(raw_status),
        }
    }
}

/// Folds a raw process exit status into `[0, 256)` and renders it as a
/// decimal token.
///
/// Hosts disagree on whether a wait status comes back as a signed byte;
/// the double modulo makes `-1` and `255` (and any `s + 256k`) the same
/// token.
pub fn normalize_exit_status(raw: i32) -> String {
    (((raw % 256) + 256) % 256).to_string()
}

/// An expected/observed pair held together so failure reporting can show
/// all four compared values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub expected: ExpectedResult,
    pub observed: RunOutcome,
}

impl Comparison {
    pub fn new(expected: ExpectedResult, observed: RunOutcome) -> Self {
        Self { expected, observed }
    }

    /// Exact string equality on both the exit-code token and the output
    /// text; both must hold. No partial credit.
    pub fn passed(&self) -> bool {
        self.observed.exit_code == self.expected.exit_code
            && self.observed.output == self.expected.output
    }
}
