//! Validate command - checks configuration, inputs and tool availability.

use crate::cli::Cli;
use crate::commands::load_config;
use droidgen_core::{
    GenerateConfig,
    error::{DroidgenError, Result},
    sdk::{Tool, resolve_framework_aidl, resolve_platform_jar, resolve_tool},
};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Findings from inspecting a configuration without running any tool.
#[derive(Debug, Default)]
pub struct Findings {
    pub problems: Vec<String>,
    pub warnings: Vec<String>,
}

/// Runs the validate command.
pub fn run(cli: &Cli) -> Result<()> {
    info!("Validating droidgen configuration");

    let config = load_config(cli).inspect_err(|_| error!("  Configuration file: FAILED"))?;
    info!("  Configuration file: OK");

    let findings = inspect(&config);
    for warning in &findings.warnings {
        warn!("  {}", warning);
    }
    for problem in &findings.problems {
        error!("  {}", problem);
    }

    if findings.problems.is_empty() {
        info!("Validation passed");
        Ok(())
    } else {
        Err(DroidgenError::config(format!(
            "Validation failed with {} problem(s)",
            findings.problems.len()
        )))
    }
}

/// Checks what the enabled tasks would need.
pub fn inspect(config: &GenerateConfig) -> Findings {
    let mut findings = Findings::default();

    if config.resources {
        let manifest = config.manifest_path();
        if !manifest.is_file() {
            findings
                .problems
                .push(format!("Manifest not found: {}", manifest.display()));
        }

        match resolve_platform_jar(&config.sdk) {
            Ok(jar) if jar.is_file() => {}
            Ok(jar) => findings
                .problems
                .push(format!("Platform jar not found: {}", jar.display())),
            Err(e) => findings.problems.push(e.to_string()),
        }

        if !config.resource_dir().is_dir() {
            findings.warnings.push(format!(
                "Resource directory {} does not exist and will not be passed to aapt",
                config.resource_dir().display()
            ));
        }

        check_tool(config, Tool::Aapt, &mut findings);
    }

    if config.aidl {
        if !config.source_dir().is_dir() {
            findings.warnings.push(format!(
                "Source directory {} does not exist; aidl generation will be skipped",
                config.source_dir().display()
            ));
        }

        if let Some(framework) = resolve_framework_aidl(&config.sdk)
            && !framework.is_file()
        {
            findings.warnings.push(format!(
                "Framework aidl {} does not exist",
                framework.display()
            ));
        }

        check_tool(config, Tool::Aidl, &mut findings);
    }

    findings
}

fn check_tool(config: &GenerateConfig, tool: Tool, findings: &mut Findings) {
    let program = resolve_tool(&config.sdk, tool);
    match locate_program(&program) {
        Some(path) => info!("  {}: {}", tool, path.display()),
        None => findings
            .problems
            .push(format!("{} not found: {}", tool, program.display())),
    }
}

/// Bare names are looked up on `PATH`; anything with a directory part must exist as given.
pub fn locate_program(program: &Path) -> Option<PathBuf> {
    if program.components().count() > 1 || program.is_absolute() {
        return program.is_file().then(|| program.to_path_buf());
    }
    let path_var = env::var_os("PATH")?;
    env::split_paths(&path_var)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}
