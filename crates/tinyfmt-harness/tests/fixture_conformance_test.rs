//! Integration test: printf fixture conformance
//!
//! Validates that:
//! 1. Every fixture set under tests/fixtures parses.
//! 2. Every case passes under each policy it names.
//! 3. Each policy exercises policy-specific cases.
//! 4. A logged run produces schema-valid JSONL and a hashed artifact index.
//!
//! Run: cargo test -p tinyfmt-harness --test fixture_conformance_test

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tinyfmt_harness::structured_log::{ArtifactIndex, LogEmitter, sha256_hex, validate_log_file};
use tinyfmt_harness::{FixtureSet, TestRunner, VerificationSummary, load_fixture_dir};

fn workspace_root() -> PathBuf {
    let manifest = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest)
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

fn fixture_sets() -> Vec<FixtureSet> {
    load_fixture_dir(&workspace_root().join("tests/fixtures")).expect("fixtures should load")
}

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tinyfmt-{tag}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn case_names_are_unique() {
    for set in fixture_sets() {
        let mut seen = HashSet::new();
        for case in &set.cases {
            assert!(seen.insert(case.name.as_str()), "duplicate case {}", case.name);
            assert!(
                ["strict", "hardened", "both"].contains(&case.mode.as_str()),
                "{}: bad mode {}",
                case.name,
                case.mode
            );
        }
    }
}

#[test]
fn all_cases_pass_under_both_policies() {
    let mut results = Vec::new();
    for set in fixture_sets() {
        results.extend(TestRunner::new("conformance", "strict").run(&set));
        results.extend(TestRunner::new("conformance", "hardened").run(&set));
    }
    let summary = VerificationSummary::from_results(results);
    let failures: Vec<String> = summary
        .failures()
        .map(|r| format!("{} ({}):\n{}", r.case_name, r.mode, r.diff.clone().unwrap_or_default()))
        .collect();
    assert!(failures.is_empty(), "failing cases:\n{}", failures.join("\n"));
    assert!(summary.total > 50);
    let policies: Vec<&str> = summary.by_policy.keys().map(String::as_str).collect();
    assert_eq!(policies, ["hardened", "strict"]);
    assert!(summary.by_policy["strict"].rejected > 0);
}

#[test]
fn each_policy_has_dedicated_cases() {
    let sets = fixture_sets();
    let modes: HashSet<&str> = sets
        .iter()
        .flat_map(|s| s.cases.iter().map(|c| c.mode.as_str()))
        .collect();
    assert!(modes.contains("strict"));
    assert!(modes.contains("hardened"));
    assert!(modes.contains("both"));
}

#[test]
fn logged_run_is_schema_valid_and_indexed() {
    let dir = scratch_dir("conformance-log");
    let log_path = dir.join("verify.jsonl");
    let mut emitter = LogEmitter::to_file(&log_path, "conformance", "run-test").unwrap();

    let mut total = 0;
    for set in fixture_sets() {
        total += TestRunner::new("conformance", "strict")
            .run_logged(&set, &mut emitter)
            .unwrap()
            .len();
    }
    emitter.flush().unwrap();
    drop(emitter);

    let (lines, errors) = validate_log_file(&log_path).unwrap();
    assert!(errors.is_empty(), "{errors:?}");
    // One entry per case plus one summary per set.
    assert_eq!(lines, total + fixture_sets().len());

    let mut index = ArtifactIndex::new("run-test");
    index.add_file(&log_path, "log_jsonl").unwrap();
    let json: serde_json::Value = serde_json::from_str(&index.to_json().unwrap()).unwrap();
    let bytes = std::fs::read(&log_path).unwrap();
    assert_eq!(json["artifacts"][0]["sha256"], sha256_hex(&bytes));

    let _ = std::fs::remove_dir_all(dir);
}
