//! Interface stub generation through `aidl`, one invocation per `.aidl` file.

use crate::cleaner::delete_if_exists;
use crate::config::GenerateConfig;
use crate::error::Result;
use crate::exec::CommandExecutor;
use crate::generator::{GenerationTask, TaskKind, TaskOutcome, absolute, path_arg};
use crate::scanner::find_files;
use crate::sdk::{Tool, resolve_framework_aidl, resolve_tool};
use crate::session::BuildSession;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const AIDL_PATTERN: &str = "**/*.aidl";

/// `pkg/sub/Foo.aidl` maps to `<output_root>/pkg/sub/Foo.java`.
pub fn output_path_for(output_root: &Path, relative_aidl: &Path) -> PathBuf {
    output_root.join(relative_aidl).with_extension("java")
}

/// Plans the `aidl` invocation for one input file.
///
/// Arguments: `[-p<framework.aidl>] -I<source_dir> <input> <output>`.
pub fn stub_task(
    program: &str,
    framework_aidl: Option<&Path>,
    source_dir: &Path,
    output_root: &Path,
    relative_aidl: &Path,
) -> GenerationTask {
    let mut args = Vec::new();
    if let Some(framework) = framework_aidl {
        args.push(format!("-p{}", framework.display()));
    }
    args.push(format!("-I{}", source_dir.display()));
    args.push(path_arg(&source_dir.join(relative_aidl)));
    args.push(path_arg(&output_path_for(output_root, relative_aidl)));

    GenerationTask {
        kind: TaskKind::Aidl,
        program: program.to_string(),
        input_root: source_dir.to_path_buf(),
        output_root: output_root.to_path_buf(),
        arguments: args,
    }
}

pub(crate) fn run(
    config: &GenerateConfig,
    executor: &dyn CommandExecutor,
    session: &mut BuildSession,
) -> Result<Option<TaskOutcome>> {
    let source_dir = absolute(&config.source_dir())?;
    let files = find_files(&source_dir, AIDL_PATTERN)?;
    info!("Found aidl files: Count = {}", files.len());
    if files.is_empty() {
        return Ok(None);
    }

    let output_root = absolute(&config.aidl_output_dir())?;
    fs::create_dir_all(&output_root)?;

    let program = path_arg(&resolve_tool(&config.sdk, Tool::Aidl));
    let framework_aidl = resolve_framework_aidl(&config.sdk);
    let working_dir = absolute(&config.base_directory)?;

    let mut deleted = 0;
    for relative in &files {
        let output_file = output_path_for(&output_root, relative);
        if let Some(target_dir) = output_file.parent() {
            fs::create_dir_all(target_dir)?;
        }

        if config.delete_conflicting_files {
            let conflicting = source_dir.join(relative).with_extension("java");
            if delete_if_exists(&conflicting)? {
                debug!("Deleted conflicting {}", conflicting.display());
                deleted += 1;
            }
        }

        let task = stub_task(
            &program,
            framework_aidl.as_deref(),
            &source_dir,
            &output_root,
            relative,
        );
        task.run(executor, &working_dir)?;
    }

    if deleted > 0 {
        info!(
            "Deleted {} conflicting aidl-generated *.java file(s) in source directory. \
             IDEs may need to refresh the project.",
            deleted
        );
    }

    session.add_compile_source_root(output_root.clone());
    Ok(Some(TaskOutcome {
        kind: TaskKind::Aidl,
        output_root,
        invocations: files.len(),
        conflicting_files_deleted: deleted,
    }))
}
