//! Test execution engine.

use std::time::Instant;

use tinyfmt_core::{ArgumentPolicy, FormatConfig, FormatError, Formatter};

use crate::fixtures::{FixtureCase, FixtureSet};
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome};
use crate::verify::VerificationResult;

/// Runs a fixture set under one argument policy and collects results.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
    /// Policy being tested (strict or hardened).
    pub mode: String,
}

/// Outcome of executing one case, before comparison.
struct Execution {
    actual: String,
    bytes: usize,
    latency_ns: u64,
}

impl TestRunner {
    #[must_use]
    pub fn new(campaign: impl Into<String>, mode: impl Into<String>) -> Self {
        Self {
            campaign: campaign.into(),
            mode: mode.into(),
        }
    }

    fn policy(&self) -> ArgumentPolicy {
        ArgumentPolicy::from_str_loose(&self.mode)
    }

    /// Run all matching fixtures in a set and return results.
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        self.matching(fixture_set)
            .map(|case| self.verify(case, &self.execute(case)))
            .collect()
    }

    /// Like [`TestRunner::run`], also emitting one `case` log entry per
    /// fixture plus a closing `run_summary`.
    pub fn run_logged(
        &self,
        fixture_set: &FixtureSet,
        emitter: &mut LogEmitter,
    ) -> std::io::Result<Vec<VerificationResult>> {
        let mode = self.policy().as_str();
        let mut results = Vec::new();
        for case in self.matching(fixture_set) {
            let execution = self.execute(case);
            let result = self.verify(case, &execution);
            let (level, outcome) = if result.passed {
                (LogLevel::Info, Outcome::Pass)
            } else {
                (LogLevel::Error, Outcome::Fail)
            };
            let mut entry = LogEntry::new("", level, "case")
                .with_mode(mode)
                .with_case(&case.name)
                .with_outcome(outcome)
                .with_bytes(execution.bytes as u64)
                .with_latency_ns(execution.latency_ns);
            if !result.passed {
                entry = entry.with_details(serde_json::json!({
                    "family": fixture_set.family,
                    "expected": result.expected,
                    "actual": result.actual,
                }));
            }
            emitter.emit_entry(entry)?;
            results.push(result);
        }

        let passed = results.iter().filter(|r| r.passed).count();
        let summary = LogEntry::new("", LogLevel::Info, "run_summary")
            .with_mode(mode)
            .with_details(serde_json::json!({
                "campaign": self.campaign,
                "family": fixture_set.family,
                "total": results.len(),
                "passed": passed,
                "failed": results.len() - passed,
            }));
        emitter.emit_entry(summary)?;
        Ok(results)
    }

    fn matching<'a>(&'a self, set: &'a FixtureSet) -> impl Iterator<Item = &'a FixtureCase> {
        set.cases
            .iter()
            .filter(|case| mode_matches(&self.mode, &case.mode))
    }

    fn execute(&self, case: &FixtureCase) -> Execution {
        let mut config = FormatConfig::new(self.policy());
        if let Some(capacity) = case.capacity {
            config = config.with_capacity(capacity);
        }
        let formatter = Formatter::new(config);
        let args = case.format_args();
        let mut out = Vec::new();

        let started = Instant::now();
        let result = formatter.format(&mut out, case.format.as_bytes(), &args);
        let latency_ns = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);

        let actual = match result {
            Ok(_) => String::from_utf8_lossy(&out).into_owned(),
            Err(err) => error_label(&err).to_string(),
        };
        Execution {
            actual,
            bytes: out.len(),
            latency_ns,
        }
    }

    fn verify(&self, case: &FixtureCase, execution: &Execution) -> VerificationResult {
        VerificationResult::judge(
            case,
            self.policy(),
            execution.actual.clone(),
            execution.bytes,
        )
    }
}

fn mode_matches(active_mode: &str, case_mode: &str) -> bool {
    let active = active_mode.to_ascii_lowercase();
    let case = case_mode.to_ascii_lowercase();
    case == active || case == "both"
}

/// Fixture spelling of a failed call.
fn error_label(err: &FormatError) -> &'static str {
    match err {
        FormatError::MissingArgument { .. } => "error:missing_argument",
        FormatError::ArgumentMismatch { .. } => "error:argument_mismatch",
        FormatError::Sink { .. } => "error:sink",
        FormatError::NotInitialized | FormatError::AlreadyInitialized => "error:global",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured_log::validate_log_text;

    fn fixture() -> FixtureSet {
        FixtureSet::from_json(
            r#"{
                "version":"v1",
                "family":"printf/smoke",
                "captured_at":"2026-10-01T00:00:00Z",
                "cases":[
                    {"name":"width","format":"[%5d]","args":[{"kind":"int","value":42}],"expected_output":"[   42]","mode":"both"},
                    {"name":"strict_missing","format":"%d %d","args":[{"kind":"int","value":1}],"expected_output":"error:missing_argument","mode":"strict"},
                    {"name":"hardened_missing","format":"%d %d","args":[{"kind":"int","value":1}],"expected_output":"1 0","mode":"hardened"},
                    {"name":"strict_mismatch","format":"%s","args":[{"kind":"float","value":1.5}],"expected_output":"error:argument_mismatch","mode":"strict"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn strict_runner_executes_matching_cases() {
        let results = TestRunner::new("smoke", "strict").run(&fixture());
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.passed), "{results:?}");
        assert!(results.iter().all(|r| r.mode == "strict"));
    }

    #[test]
    fn hardened_runner_executes_matching_cases() {
        let results = TestRunner::new("smoke", "hardened").run(&fixture());
        let names: Vec<_> = results.iter().map(|r| r.case_name.as_str()).collect();
        assert_eq!(names, ["width", "hardened_missing"]);
        assert!(results.iter().all(|r| r.passed), "{results:?}");
    }

    #[test]
    fn failing_case_carries_diff() {
        let mut set = fixture();
        set.cases[0].expected_output = "[  42]".to_string();
        let results = TestRunner::new("smoke", "strict").run(&set);
        assert!(!results[0].passed);
        assert!(results[0].diff.as_deref().unwrap().contains("col 2"));
    }

    #[test]
    fn logged_run_emits_valid_jsonl() {
        let path = std::env::temp_dir().join(format!(
            "tinyfmt-runner-{}.jsonl",
            std::process::id()
        ));
        let mut emitter = LogEmitter::to_file(&path, "smoke", "run-1").unwrap();
        let results = TestRunner::new("smoke", "hardened")
            .run_logged(&fixture(), &mut emitter)
            .unwrap();
        emitter.flush().unwrap();
        assert_eq!(emitter.emitted(), results.len() as u64 + 1);
        drop(emitter);

        let text = std::fs::read_to_string(&path).unwrap();
        let (lines, errors) = validate_log_text(&text);
        assert_eq!(lines, 3);
        assert!(errors.is_empty(), "{errors:?}");
        assert!(text.contains("\"event\":\"run_summary\""));
        assert!(text.contains("\"case\":\"hardened_missing\""));
        let _ = std::fs::remove_file(path);
    }
}
