//! Generate command - runs aapt and aidl and reports the registered source roots.

use crate::cli::{Cli, GenerateArgs, TaskArgs};
use crate::commands::load_config;
use droidgen_core::{
    BuildSession, FailurePolicy, GenerateConfig, GenerationReport, SourceGenerator,
    error::Result,
};
use tracing::info;

/// Runs every enabled task with default settings.
pub fn run_default(cli: &Cli) -> Result<()> {
    run(cli, GenerateArgs::default())
}

/// Runs every enabled task.
pub fn run(cli: &Cli, args: GenerateArgs) -> Result<()> {
    let mut config = load_config(cli)?;
    apply_overrides(&mut config, &args);

    let mut session = BuildSession::new();
    let report = SourceGenerator::new(config).generate_all(&mut session)?;
    log_report(&report);
    Ok(())
}

/// Runs only the aapt task.
pub fn run_resources(cli: &Cli, args: TaskArgs) -> Result<()> {
    let mut config = load_config(cli)?;
    apply_task_overrides(&mut config, &args);

    let mut session = BuildSession::new();
    let outcome = SourceGenerator::new(config).generate_resources(&mut session)?;
    info!(
        "R.java generated into {} ({} stale file(s) removed)",
        outcome.output_root.display(),
        outcome.conflicting_files_deleted
    );
    Ok(())
}

/// Runs only the aidl task.
pub fn run_aidl(cli: &Cli, args: TaskArgs) -> Result<()> {
    let mut config = load_config(cli)?;
    apply_task_overrides(&mut config, &args);

    let mut session = BuildSession::new();
    match SourceGenerator::new(config).generate_aidl(&mut session)? {
        Some(outcome) => info!(
            "{} aidl stub(s) generated into {}",
            outcome.invocations,
            outcome.output_root.display()
        ),
        None => info!("No aidl files found, nothing to do"),
    }
    Ok(())
}

fn apply_overrides(config: &mut GenerateConfig, args: &GenerateArgs) {
    if args.skip_resources {
        config.resources = false;
    }
    if args.skip_aidl {
        config.aidl = false;
    }
    if args.keep_going {
        config.failure_policy = FailurePolicy::CollectAll;
    }
    apply_task_overrides(config, &args.task);
}

fn apply_task_overrides(config: &mut GenerateConfig, args: &TaskArgs) {
    if args.keep_conflicting {
        config.delete_conflicting_files = false;
    }
}

fn log_report(report: &GenerationReport) {
    for outcome in &report.outcomes {
        info!(
            "{}: {} invocation(s), {} conflicting file(s) deleted",
            outcome.kind, outcome.invocations, outcome.conflicting_files_deleted
        );
    }
    if report.compile_source_roots.is_empty() {
        info!("No compile source roots registered");
    }
    for root in &report.compile_source_roots {
        info!("Compile source root: {}", root.display());
    }
}
