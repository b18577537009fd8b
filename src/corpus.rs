//! Test-case discovery and selection.
//!
//! A corpus is a directory tree of `{id}.sy` sources, each paired with a
//! required `{id}.out` recording and an optional `{id}.in` stdin file.
//! Discovery walks the tree recursively, applies the caller's filter, and
//! yields cases in deterministic order. Each call is a fresh traversal.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::{HarnessError, Result};

/// Reserved extension for source programs.
pub const SOURCE_EXT: &str = "sy";
/// Reserved extension for per-case stdin files.
pub const STDIN_EXT: &str = "in";
/// Reserved extension for recorded expected results.
pub const EXPECTED_EXT: &str = "out";

/// One unit of verification: a source program, its optional stdin file,
/// and its recorded expected result. Constructed once per discovery pass
/// and discarded after its run completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Filename stem, used for ordering and filtering.
    pub id: String,
    pub source: PathBuf,
    /// Present iff a sibling `{id}.in` exists.
    pub stdin: Option<PathBuf>,
    pub expected: PathBuf,
}

/// How case ids are ordered and how range bounds are compared.
///
/// Lexical comparison silently misorders unpadded numeric ids ("9" sorts
/// after "10"), so corpora with unpadded names should ask for `Numeric`,
/// which compares the leading decimal digits of the id and falls back to
/// lexical order for ids without any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseOrdering {
    #[default]
    Lexical,
    Numeric,
}

/// Selection predicate over case ids: an optional literal prefix, an
/// optional half-open range `[low, high)`, and an explicit exclusion set.
/// All constraints must hold for a case to be selected.
#[derive(Debug, Clone, Default)]
pub struct CaseFilter {
    pub prefix: Option<String>,
    pub range: Option<(String, String)>,
    pub exclude: Vec<String>,
    pub ordering: CaseOrdering,
}

impl CaseFilter {
    pub fn matches(&self, id: &str) -> bool {
        if let Some(prefix) = &self.prefix {
            if !id.starts_with(prefix.as_str()) {
                return false;
            }
        }
        if let Some((low, high)) = &self.range {
            if !self.in_range(id, low, high) {
                return false;
            }
        }
        !self.exclude.iter().any(|ex| id == ex)
    }

    fn in_range(&self, id: &str, low: &str, high: &str) -> bool {
        match self.ordering {
            CaseOrdering::Lexical => low <= id && id < high,
            CaseOrdering::Numeric => match (numeric_key(id), numeric_key(low), numeric_key(high)) {
                (Some(id), Some(low), Some(high)) => low <= id && id < high,
                _ => low <= id && id < high,
            },
        }
    }

    fn compare(&self, a: &str, b: &str) -> std::cmp::Ordering {
        match self.ordering {
            CaseOrdering::Lexical => a.cmp(b),
            CaseOrdering::Numeric => match (numeric_key(a), numeric_key(b)) {
                (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
                _ => a.cmp(b),
            },
        }
    }
}

/// Leading decimal digits of an id, if any ("042_main" -> 42).
fn numeric_key(id: &str) -> Option<u64> {
    let digits: String = id.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Recursively scans `root` for `.sy` sources accepted by `filter` and
/// pairs each with its siblings.
///
/// A matching source whose `.out` recording is missing is a corpus error,
/// not a silent skip. The returned list is sorted by id under the filter's
/// ordering so batch runs are deterministic.
pub fn discover_cases<P: AsRef<Path>>(root: P, filter: &CaseFilter) -> Result<Vec<TestCase>> {
    let mut cases = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().map_or(true, |ext| ext != SOURCE_EXT) {
            continue;
        }
        let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if !filter.matches(id) {
            continue;
        }
        cases.push(pair_case(path, id)?);
    }
    cases.sort_by(|a, b| filter.compare(&a.id, &b.id));
    Ok(cases)
}

/// Builds a [`TestCase`] from a source path, checking sibling presence up
/// front so the runner can decide stdin redirection before spawning.
fn pair_case(source: &Path, id: &str) -> Result<TestCase> {
    let expected = source.with_extension(EXPECTED_EXT);
    if !expected.is_file() {
        return Err(HarnessError::MissingExpected {
            id: id.to_string(),
            path: expected,
        });
    }
    let stdin = source.with_extension(STDIN_EXT);
    Ok(TestCase {
        id: id.to_string(),
        source: source.to_path_buf(),
        stdin: stdin.is_file().then_some(stdin),
        expected,
    })
}
