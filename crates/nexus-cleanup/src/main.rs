//! nexus-cleanup - Retention cleanup for Nexus repositories
//!
//! Entry point: resolves settings, runs one cleanup and maps the outcome to
//! an exit code.

mod cli;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use nexus_retention::{
    BranchSummary, Cleanup, CleanupSettings, CompactionOutcome, HaltReason, LogSink,
    ProcessUntagger, RunOutcome, RunSummary, TracingSink,
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;

/// Exit code for input rejected by the validation gate
///
/// Same code clap uses for usage errors, so bad flag values and bad flag
/// syntax exit alike. Every other halt exits with 1.
const EXIT_INVALID_INPUT: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let settings = CleanupSettings::load(cli.config.as_deref())
        .context("Failed to load settings")?
        .apply_env_overrides();
    let settings = cli.apply_to(settings);
    tracing::debug!("Resolved settings: {:?}", settings);

    let log: Arc<dyn LogSink> = Arc::new(TracingSink::new("cleanup"));
    let untagger = Arc::new(ProcessUntagger::from_tool(&settings.untag_tool, log.clone()));
    let cleanup = Cleanup::new(log, untagger);

    let outcome = cleanup.run(&cli.to_request(&settings)).await;
    if !cli.quiet {
        print_outcome(&outcome);
    }

    Ok(exit_code(&outcome))
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn exit_code(outcome: &RunOutcome) -> ExitCode {
    if !outcome.is_halted() {
        return ExitCode::SUCCESS;
    }
    match outcome {
        RunOutcome::Halted(HaltReason::InvalidInput(_)) => ExitCode::from(EXIT_INVALID_INPUT),
        _ => ExitCode::FAILURE,
    }
}

fn print_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Completed(summary) => print_summary(summary),
        RunOutcome::Skipped { repository, format } => output::warning(&format!(
            "Skipped '{}': format '{}' is not supported",
            repository, format
        )),
        RunOutcome::Halted(reason) => output::error(&format!("Cleanup halted: {}", reason)),
    }
}

fn print_summary(summary: &RunSummary) {
    output::header(&format!("Cleanup of '{}'", summary.repository));
    output::kv("Format", &summary.format.to_string());
    output::kv("Keep", &summary.keep.to_string());
    output::kv("Components fetched", &summary.components_fetched.to_string());

    match &summary.branch {
        BranchSummary::Image {
            selected,
            untagged,
            compaction,
        } => {
            output::kv("Images selected", &selected.len().to_string());
            if summary.dry_run {
                output::info("Dry run: no images were un-tagged");
                return;
            }
            output::kv("Un-tag requests", &untagged.len().to_string());
            match compaction {
                CompactionOutcome::Triggered { task_id } => {
                    output::success(&format!("Compaction started (task {})", task_id))
                }
                CompactionOutcome::TaskNotFound => {
                    output::warning("Compaction task not found; blob store not compacted")
                }
                CompactionOutcome::Failed(reason) => {
                    output::warning(&format!("Compaction failed: {}", reason))
                }
                CompactionOutcome::Skipped => {}
            }
        }
        BranchSummary::Maven { selected, report } => {
            output::kv("Versions selected", &selected.to_string());
            if summary.dry_run {
                output::info("Dry run: nothing was deleted");
                return;
            }
            if report.is_clean() {
                output::success(&format!("Deleted {} version(s)", report.deleted.len()));
            } else {
                output::warning(&format!(
                    "Deleted {} of {} version(s); {} failed",
                    report.deleted.len(),
                    report.attempted(),
                    report.failed.len()
                ));
            }
        }
    }
}
