//! Comparison of formatter output against fixture expectations.
//!
//! A fixture expects either rendered text or a failure label
//! (`error:<kind>`). A failed call passes only when the label matches and,
//! for argument errors, nothing reached the sink.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tinyfmt_core::ArgumentPolicy;

use crate::diff;
use crate::fixtures::FixtureCase;

const ERROR_PREFIX: &str = "error:";

/// What a case produced, or is expected to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Rendered,
    Rejected,
}

impl OutcomeKind {
    #[must_use]
    pub fn classify(text: &str) -> Self {
        if text.starts_with(ERROR_PREFIX) {
            Self::Rejected
        } else {
            Self::Rendered
        }
    }
}

/// Result of verifying a single fixture case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub case_name: String,
    /// The format string under test.
    pub format: String,
    /// Policy name the case ran under.
    pub mode: String,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
    pub outcome: OutcomeKind,
    /// Bytes the sink received during the call.
    pub bytes_written: usize,
    /// Diff if the case failed.
    pub diff: Option<String>,
}

impl VerificationResult {
    /// Judge one execution of `case` under `policy`.
    ///
    /// `actual` is the rendered text, or the failure label when the call
    /// returned an error.
    #[must_use]
    pub fn judge(
        case: &FixtureCase,
        policy: ArgumentPolicy,
        actual: String,
        bytes_written: usize,
    ) -> Self {
        let outcome = OutcomeKind::classify(&actual);
        let leaked = outcome == OutcomeKind::Rejected
            && is_argument_label(&actual)
            && bytes_written > 0;
        let passed = actual == case.expected_output && !leaked;
        let diff = (!passed).then(|| {
            let mut text = diff::render_diff(&case.expected_output, &actual);
            if leaked {
                text.push_str(&format!(
                    "! {bytes_written} bytes reached the sink before the argument error\n"
                ));
            }
            text
        });
        Self {
            case_name: case.name.clone(),
            format: case.format.clone(),
            mode: policy.as_str().to_string(),
            passed,
            expected: case.expected_output.clone(),
            actual,
            outcome,
            bytes_written,
            diff,
        }
    }
}

fn is_argument_label(label: &str) -> bool {
    matches!(
        label,
        "error:missing_argument" | "error:argument_mismatch"
    )
}

/// Pass/fail counts for one policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyTally {
    pub passed: usize,
    pub failed: usize,
    /// Cases that ended in an error, as expected or not.
    pub rejected: usize,
}

/// Aggregate verification summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Keyed by policy name.
    pub by_policy: BTreeMap<String, PolicyTally>,
    pub results: Vec<VerificationResult>,
}

impl VerificationSummary {
    #[must_use]
    pub fn from_results(results: Vec<VerificationResult>) -> Self {
        let mut by_policy: BTreeMap<String, PolicyTally> = BTreeMap::new();
        for r in &results {
            let tally = by_policy.entry(r.mode.clone()).or_default();
            if r.passed {
                tally.passed += 1;
            } else {
                tally.failed += 1;
            }
            if r.outcome == OutcomeKind::Rejected {
                tally.rejected += 1;
            }
        }
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            total,
            passed,
            failed: total - passed,
            by_policy,
            results,
        }
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Failing results only.
    pub fn failures(&self) -> impl Iterator<Item = &VerificationResult> {
        self.results.iter().filter(|r| !r.passed)
    }
}
