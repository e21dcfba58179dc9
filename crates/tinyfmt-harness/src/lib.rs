//! Conformance testing harness for tinyfmt.
//!
//! This crate provides:
//! - Fixture verify: run JSON fixture cases under each argument policy
//! - Structured logs: JSONL run logs plus a hashed artifact index
//! - Report generation: markdown and JSON conformance reports
//! - The demonstration program exercising every conversion

#![forbid(unsafe_code)]

pub mod demo;
pub mod diff;
pub mod error;
pub mod fixtures;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod verify;

pub use error::HarnessError;
pub use fixtures::{FixtureArg, FixtureCase, FixtureSet, load_fixture_dir};
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use verify::{OutcomeKind, PolicyTally, VerificationResult, VerificationSummary};
