//! The batch verification loop.
//!
//! Selected cases run strictly one after another: toolchain stages, then
//! comparison, then verdict reporting. Fail-fast is the default (the first
//! non-pass halts the scan, earlier passes are still reported); keep-going
//! mode runs everything and summarizes.

use std::fs;

use serde::Serialize;

use crate::cli::output::Reporter;
use crate::corpus::TestCase;
use crate::errors::HarnessError;
use crate::toolchain::ToolchainRunner;
use crate::verdict::{Comparison, ExpectedResult};

/// How one case ended.
///
/// Build failures and per-case infrastructure errors are kept apart from
/// logic mismatches: for those no meaningful comparison ever happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    Pass,
    Mismatch(Comparison),
    BuildFailure { status: i32 },
    Error { message: String },
}

impl CaseOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, CaseOutcome::Pass)
    }
}

/// Per-case entry for the optional machine-readable report.
#[derive(Debug, Clone, Serialize)]
pub struct CaseRecord {
    pub id: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_exit_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_exit_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CaseRecord {
    fn new(id: &str, outcome: &CaseOutcome) -> Self {
        let mut record = Self {
            id: id.to_string(),
            status: match outcome {
                CaseOutcome::Pass => "pass",
                CaseOutcome::Mismatch(_) => "mismatch",
                CaseOutcome::BuildFailure { .. } => "build_failure",
                CaseOutcome::Error { .. } => "error",
            },
            expected_exit_code: None,
            observed_exit_code: None,
            expected_output: None,
            observed_output: None,
            detail: None,
        };
        match outcome {
            CaseOutcome::Mismatch(cmp) => {
                record.expected_exit_code = Some(cmp.expected.exit_code.clone());
                record.observed_exit_code = Some(cmp.observed.exit_code.clone());
                record.expected_output = Some(cmp.expected.output.clone());
                record.observed_output = Some(cmp.observed.output.clone());
            }
            CaseOutcome::BuildFailure { status } => {
                record.detail = Some(format!("compiler exit status {status}"));
            }
            CaseOutcome::Error { message } => {
                record.detail = Some(message.clone());
            }
            CaseOutcome::Pass => {}
        }
        record
    }
}

/// Aggregate counts for one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub passed: usize,
    pub mismatched: usize,
    pub build_failures: usize,
    pub errors: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.passed + self.mismatched + self.build_failures + self.errors
    }

    pub fn all_passed(&self) -> bool {
        self.total() == self.passed
    }
}

/// Full result of a batch run: the summary plus one record per case that
/// actually ran (cases skipped by a fail-fast halt are absent).
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub summary: RunSummary,
    pub cases: Vec<CaseRecord>,
}

#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    pub fail_fast: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self { fail_fast: true }
    }
}

/// Runs every selected case through the toolchain and comparison, printing
/// verdicts as it goes.
pub fn run_batch(
    cases: &[TestCase],
    runner: &ToolchainRunner,
    reporter: &mut Reporter,
    options: BatchOptions,
) -> BatchReport {
    let mut summary = RunSummary::default();
    let mut records = Vec::with_capacity(cases.len());

    for case in cases {
        reporter.case_started(&case.id);
        let outcome = evaluate_case(case, runner);
        reporter.case_finished(case, &outcome);
        records.push(CaseRecord::new(&case.id, &outcome));

        match &outcome {
            CaseOutcome::Pass => summary.passed += 1,
            CaseOutcome::Mismatch(_) => summary.mismatched += 1,
            CaseOutcome::BuildFailure { .. } => summary.build_failures += 1,
            CaseOutcome::Error { .. } => summary.errors += 1,
        }
        if options.fail_fast && !outcome.is_pass() {
            break;
        }
    }

    reporter.summary(&summary);
    BatchReport {
        summary,
        cases: records,
    }
}

/// Runs one case end to end and classifies the result. Never panics and
/// never escalates a mismatch: "wrong" is an outcome, not an error.
pub fn evaluate_case(case: &TestCase, runner: &ToolchainRunner) -> CaseOutcome {
    let observed = match runner.run_case(case) {
        Ok(observed) => observed,
        Err(HarnessError::BuildFailure { status, .. }) => {
            return CaseOutcome::BuildFailure { status }
        }
        Err(err) => {
            return CaseOutcome::Error {
                message: err.to_string(),
            }
        }
    };

    let raw = match fs::read_to_string(&case.expected) {
        Ok(raw) => raw,
        Err(err) => {
            return CaseOutcome::Error {
                message: format!("failed to read {}: {err}", case.expected.display()),
            }
        }
    };

    let comparison = Comparison::new(ExpectedResult::parse(&raw), observed);
    if comparison.passed() {
        CaseOutcome::Pass
    } else {
        CaseOutcome::Mismatch(comparison)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::RunOutcome;

    #[test]
    fn summary_counts_and_exit_condition() {
        let mut summary = RunSummary {
            passed: 3,
            ..RunSummary::default()
        };
        assert!(summary.all_passed());
        summary.build_failures = 1;
        assert!(!summary.all_passed());
        assert_eq!(summary.total(), 4);
    }

    #[test]
    fn mismatch_record_carries_all_four_values() {
        let cmp = Comparison::new(ExpectedResult::parse("mismatch\n0"), RunOutcome::new("correct", 0));
        let record = CaseRecord::new("t9", &CaseOutcome::Mismatch(cmp));
        assert_eq!(record.status, "mismatch");
        assert_eq!(record.expected_exit_code.as_deref(), Some("0"));
        assert_eq!(record.observed_exit_code.as_deref(), Some("0"));
        assert_eq!(record.expected_output.as_deref(), Some("mismatch"));
        assert_eq!(record.observed_output.as_deref(), Some("correct"));
    }

    #[test]
    fn build_failure_record_is_labeled_distinctly() {
        let record = CaseRecord::new("t2", &CaseOutcome::BuildFailure { status: 1 });
        assert_eq!(record.status, "build_failure");
        assert!(record.detail.unwrap().contains("exit status 1"));
        assert!(record.expected_output.is_none());
    }

    #[test]
    fn records_serialize_without_empty_fields() {
        let record = CaseRecord::new("t1", &CaseOutcome::Pass);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"id":"t1","status":"pass"}"#);
    }
}
