//! Resource id generation (`R.java`) through `aapt package`.

use crate::cleaner::{delete_if_exists, delete_matching};
use crate::config::GenerateConfig;
use crate::error::{DroidgenError, Result};
use crate::exec::CommandExecutor;
use crate::generator::{GenerationTask, TaskKind, TaskOutcome, absolute, path_arg};
use crate::sdk::{Tool, resolve_platform_jar, resolve_tool};
use crate::session::BuildSession;
use std::fs;
use std::path::Path;
use tracing::info;

/// Previously generated resource id sources in the source tree.
pub const STALE_R_PATTERN: &str = "**/R.java";

/// Windows thumbnail cache that `aapt` chokes on.
pub const THUMBS_DB: &str = "drawable/Thumbs.db";

/// Plans the `aapt package` invocation for `config`.
///
/// `-S` and `-A` are only passed for resource and asset directories that
/// exist.
pub fn resource_task(config: &GenerateConfig, platform_jar: &Path) -> Result<GenerationTask> {
    let output_root = absolute(&config.resource_output_dir())?;
    let resource_dir = config.resource_dir();
    let assets_dir = config.assets_dir();

    let mut args = vec!["package".to_string()];
    if config.create_package_directories {
        args.push("-m".to_string());
    }
    args.push("-J".to_string());
    args.push(path_arg(&output_root));
    args.push("-M".to_string());
    args.push(path_arg(&absolute(&config.manifest_path())?));
    if resource_dir.is_dir() {
        args.push("-S".to_string());
        args.push(path_arg(&absolute(&resource_dir)?));
    }
    if assets_dir.is_dir() {
        args.push("-A".to_string());
        args.push(path_arg(&absolute(&assets_dir)?));
    }
    args.push("-I".to_string());
    args.push(path_arg(&absolute(platform_jar)?));

    Ok(GenerationTask {
        kind: TaskKind::Resource,
        program: path_arg(&resolve_tool(&config.sdk, Tool::Aapt)),
        input_root: absolute(&resource_dir)?,
        output_root,
        arguments: args,
    })
}

pub(crate) fn run(
    config: &GenerateConfig,
    executor: &dyn CommandExecutor,
    session: &mut BuildSession,
) -> Result<TaskOutcome> {
    // Inputs are checked before anything is deleted.
    let manifest = config.manifest_path();
    if !manifest.is_file() {
        return Err(DroidgenError::missing_input(manifest));
    }
    let platform_jar = resolve_platform_jar(&config.sdk)?;
    if !platform_jar.is_file() {
        return Err(DroidgenError::missing_input(platform_jar));
    }

    let mut deleted = 0;
    if config.delete_conflicting_files {
        deleted = delete_matching(config.source_dir(), STALE_R_PATTERN)?;
        if deleted > 0 {
            info!(
                "Deleted {} conflicting R.java file(s) in source directory. \
                 IDEs may need to refresh the project.",
                deleted
            );
        }

        if delete_if_exists(config.resource_dir().join(THUMBS_DB))? {
            info!("Deleted Thumbs.db from resource directory");
        }
    }

    let output_root = config.resource_output_dir();
    fs::create_dir_all(&output_root)?;

    let task = resource_task(config, &platform_jar)?;
    task.run(executor, &absolute(&config.base_directory)?)?;

    session.add_compile_source_root(task.output_root.clone());
    Ok(TaskOutcome {
        kind: TaskKind::Resource,
        output_root: task.output_root,
        invocations: 1,
        conflicting_files_deleted: deleted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn config_in(root: &Path) -> GenerateConfig {
        GenerateConfig::builder()
            .base_directory(root)
            .aapt("aapt")
            .build()
    }

    fn arg(path: PathBuf) -> String {
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_arguments_without_resource_or_assets_dirs() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        let jar = dir.path().join("android.jar");

        let task = resource_task(&config, &jar).unwrap();

        assert_eq!(task.program, "aapt");
        assert_eq!(
            task.arguments,
            vec![
                "package".to_string(),
                "-m".to_string(),
                "-J".to_string(),
                arg(dir.path().join("target/generated-sources/r")),
                "-M".to_string(),
                arg(dir.path().join("AndroidManifest.xml")),
                "-I".to_string(),
                arg(jar),
            ]
        );
    }

    #[test]
    fn test_resource_dir_added_only_when_present() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        let jar = dir.path().join("android.jar");

        let without = resource_task(&config, &jar).unwrap();
        assert!(!without.arguments.contains(&"-S".to_string()));

        fs::create_dir_all(dir.path().join("res")).unwrap();
        let with = resource_task(&config, &jar).unwrap();
        let pos = with.arguments.iter().position(|a| a == "-S").unwrap();
        assert_eq!(with.arguments[pos + 1], arg(dir.path().join("res")));
    }

    #[test]
    fn test_assets_dir_follows_resource_dir() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("res")).unwrap();
        fs::create_dir_all(dir.path().join("assets")).unwrap();
        let config = config_in(dir.path());

        let task = resource_task(&config, &dir.path().join("android.jar")).unwrap();
        let flags: Vec<&str> = task
            .arguments
            .iter()
            .map(String::as_str)
            .filter(|a| a.starts_with('-'))
            .collect();
        assert_eq!(flags, vec!["-m", "-J", "-M", "-S", "-A", "-I"]);
    }

    #[test]
    fn test_package_directories_flag_can_be_disabled() {
        let dir = TempDir::new().unwrap();
        let config = GenerateConfig {
            create_package_directories: false,
            ..config_in(dir.path())
        };
        let task = resource_task(&config, &dir.path().join("android.jar")).unwrap();
        assert_eq!(task.arguments[0], "package");
        assert_eq!(task.arguments[1], "-J");
    }
}
