//! CLI entrypoint for the tinyfmt conformance harness.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use tinyfmt_core::config::global_config;
use tinyfmt_core::{ArgumentPolicy, FormatArg, Formatter, IoSink, init_global};
use tinyfmt_harness::structured_log::{ArtifactIndex, LogEmitter, now_utc};
use tinyfmt_harness::{ConformanceReport, FixtureArg, TestRunner, VerificationSummary};

/// Conformance tooling for tinyfmt.
#[derive(Debug, Parser)]
#[command(name = "tinyfmt-harness")]
#[command(about = "Conformance testing harness for tinyfmt")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify the formatter against fixture files under both policies.
    Verify {
        /// Directory containing fixture JSON files.
        #[arg(long)]
        fixture: PathBuf,
        /// Output report path (markdown; a JSON twin is written alongside).
        #[arg(long)]
        report: Option<PathBuf>,
        /// Structured JSONL log path (an artifact index is written alongside).
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Print the demonstration through the process-wide formatter.
    Demo,
    /// Format one string with typed arguments and print the result.
    Render {
        /// Format string.
        #[arg(long)]
        format: String,
        /// Arguments as tag:value (i, u, c, s, f, p); repeatable.
        #[arg(long = "arg")]
        args: Vec<String>,
        /// Argument policy (strict or hardened).
        #[arg(long, default_value = "strict")]
        mode: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Verify {
            fixture,
            report,
            log,
        } => {
            eprintln!("Verifying against fixtures in {}", fixture.display());
            let fixture_sets = tinyfmt_harness::load_fixture_dir(&fixture)?;

            let run_id = format!("run-{}", std::process::id());
            let mut emitter = match &log {
                Some(path) => LogEmitter::to_file(path, "fixture-verify", &run_id)?,
                None => LogEmitter::to_buffer("fixture-verify", &run_id),
            };

            let strict_runner = TestRunner::new("fixture-verify", "strict");
            let hardened_runner = TestRunner::new("fixture-verify", "hardened");
            let mut results = Vec::new();
            for set in &fixture_sets {
                results.extend(strict_runner.run_logged(set, &mut emitter)?);
                results.extend(hardened_runner.run_logged(set, &mut emitter)?);
            }
            emitter.flush()?;
            drop(emitter);

            let report_doc = ConformanceReport {
                title: String::from("tinyfmt Conformance Report"),
                mode: String::from("strict+hardened"),
                timestamp: now_utc(),
                summary: VerificationSummary::from_results(results),
            };

            eprintln!(
                "Verification complete: total={}, passed={}, failed={}",
                report_doc.summary.total, report_doc.summary.passed, report_doc.summary.failed
            );

            let mut index = ArtifactIndex::new(&run_id);
            if let Some(report_path) = &report {
                eprintln!("Writing report to {}", report_path.display());
                std::fs::write(report_path, report_doc.to_markdown())?;
                let json_path = report_path.with_extension("json");
                std::fs::write(&json_path, report_doc.to_json())?;
                index.add_file(report_path, "report_md")?;
                index.add_file(&json_path, "report_json")?;
            }
            if let Some(log_path) = &log {
                index.add_file(log_path, "log_jsonl")?;
                let index_path = log_path.with_extension("artifacts.json");
                std::fs::write(&index_path, index.to_json()?)?;
                eprintln!("Wrote artifact index to {}", index_path.display());
            }

            if !report_doc.summary.all_passed() {
                return Err("Conformance verification failed".into());
            }
        }
        Command::Demo => {
            init_global(Box::new(IoSink::new(std::io::stdout())), global_config())?;
            tinyfmt_harness::demo::render_demo_global()?;
        }
        Command::Render { format, args, mode } => {
            let parsed = args
                .iter()
                .map(|spec| FixtureArg::parse_tagged(spec))
                .collect::<Result<Vec<_>, _>>()?;
            let format_args: Vec<FormatArg<'_>> =
                parsed.iter().map(FixtureArg::as_format_arg).collect();

            let config = global_config().with_policy(ArgumentPolicy::from_str_loose(&mode));
            let mut sink = IoSink::new(std::io::stdout());
            Formatter::new(config).format(&mut sink, format.as_bytes(), &format_args)?;
        }
    }

    Ok(())
}
