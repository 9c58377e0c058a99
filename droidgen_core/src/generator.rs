//! Composition of the generation tasks.

use crate::config::{FailurePolicy, GenerateConfig};
use crate::error::{DroidgenError, Result};
use crate::exec::{CommandExecutor, ExecutionResult, ProcessExecutor};
use crate::session::BuildSession;
use crate::{aidl, resources};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The two kinds of generation this crate drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskKind {
    /// `aapt package`: resource ids (`R.java`).
    Resource,
    /// `aidl`: interface stubs.
    Aidl,
}

/// One planned invocation of an external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTask {
    pub kind: TaskKind,
    pub program: String,
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    pub arguments: Vec<String>,
}

impl GenerationTask {
    /// Runs the tool, failing on a non-zero exit.
    pub fn run(
        &self,
        executor: &dyn CommandExecutor,
        working_dir: &Path,
    ) -> Result<ExecutionResult> {
        debug!(
            "Running {} task for {} into {}",
            self.kind,
            self.input_root.display(),
            self.output_root.display()
        );
        executor.execute(&self.program, &self.arguments, working_dir, true)
    }
}

/// Summary of a task that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskOutcome {
    pub kind: TaskKind,
    /// Directory registered as a compile source root.
    pub output_root: PathBuf,
    /// Number of tool invocations.
    pub invocations: usize,
    pub conflicting_files_deleted: usize,
}

/// Report of a [`SourceGenerator::generate_all`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Tasks that ran; a skipped or no-op task has no entry.
    pub outcomes: Vec<TaskOutcome>,
    pub compile_source_roots: Vec<PathBuf>,
}

impl GenerationReport {
    pub fn outcome(&self, kind: TaskKind) -> Option<&TaskOutcome> {
        self.outcomes.iter().find(|o| o.kind == kind)
    }
}

/// Runs resource and interface-stub generation for one project.
pub struct SourceGenerator<E = ProcessExecutor> {
    config: GenerateConfig,
    executor: E,
}

impl SourceGenerator<ProcessExecutor> {
    pub fn new(config: GenerateConfig) -> Self {
        Self::with_executor(config, ProcessExecutor::new())
    }
}

impl<E: CommandExecutor> SourceGenerator<E> {
    pub fn with_executor(config: GenerateConfig, executor: E) -> Self {
        Self { config, executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Runs the resource generation task.
    pub fn generate_resources(&self, session: &mut BuildSession) -> Result<TaskOutcome> {
        resources::run(&self.config, &self.executor, session)
            .map_err(|e| DroidgenError::task(TaskKind::Resource, e))
    }

    /// Runs the interface-stub generation task. Returns `None` when there
    /// are no `.aidl` inputs.
    pub fn generate_aidl(&self, session: &mut BuildSession) -> Result<Option<TaskOutcome>> {
        aidl::run(&self.config, &self.executor, session)
            .map_err(|e| DroidgenError::task(TaskKind::Aidl, e))
    }

    /// Runs every enabled task in order, resource generation first.
    ///
    /// With [`FailurePolicy::FailFast`] the first failure is returned and
    /// later tasks do not run. With [`FailurePolicy::CollectAll`] every
    /// enabled task runs and the failures come back as
    /// [`DroidgenError::Multiple`] (or unwrapped, if there was only one).
    /// Roots registered by successful tasks stay in `session` either way.
    pub fn generate_all(&self, session: &mut BuildSession) -> Result<GenerationReport> {
        info!("Starting source generation");
        let mut report = GenerationReport::default();
        let mut failures = Vec::new();

        if self.config.resources {
            match self.generate_resources(session) {
                Ok(outcome) => report.outcomes.push(outcome),
                Err(e) => self.record_failure(e, &mut failures)?,
            }
        } else {
            debug!("Skipping resource generation (disabled in config)");
        }

        if self.config.aidl {
            match self.generate_aidl(session) {
                Ok(Some(outcome)) => report.outcomes.push(outcome),
                Ok(None) => debug!("No interface stubs to generate"),
                Err(e) => self.record_failure(e, &mut failures)?,
            }
        } else {
            debug!("Skipping aidl generation (disabled in config)");
        }

        report.compile_source_roots = session.compile_source_roots().to_vec();

        match failures.len() {
            0 => {
                info!("Source generation completed successfully");
                Ok(report)
            }
            1 => Err(failures.remove(0)),
            _ => Err(DroidgenError::Multiple(failures)),
        }
    }

    fn record_failure(
        &self,
        err: DroidgenError,
        failures: &mut Vec<DroidgenError>,
    ) -> Result<()> {
        match self.config.failure_policy {
            FailurePolicy::FailFast => Err(err),
            FailurePolicy::CollectAll => {
                debug!("{}; continuing with remaining tasks", err);
                failures.push(err);
                Ok(())
            }
        }
    }
}

/// Absolute form of `path`, without resolving symlinks.
pub(crate) fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(std::path::absolute(path)?)
}

pub(crate) fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
