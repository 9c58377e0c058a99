//! Info command - displays the resolved configuration and discovered aidl files.

use crate::cli::{Cli, InfoArgs, InfoFormat};
use crate::commands::load_config;
use droidgen_core::{
    GenerateConfig,
    aidl::AIDL_PATTERN,
    error::Result,
    scanner::find_files,
    sdk::{Tool, resolve_framework_aidl, resolve_platform_jar, resolve_tool},
};
use serde::Serialize;
use std::path::PathBuf;

/// Everything `info` reports, in the shape emitted by `--format json`.
#[derive(Debug, Serialize)]
pub struct ProjectInfo {
    pub config: GenerateConfig,
    pub manifest: PathBuf,
    pub resource_output: PathBuf,
    pub aidl_output: PathBuf,
    pub aapt: PathBuf,
    pub aidl: PathBuf,
    pub platform_jar: Option<PathBuf>,
    pub framework_aidl: Option<PathBuf>,
    pub aidl_files: Vec<PathBuf>,
}

impl ProjectInfo {
    pub fn collect(config: GenerateConfig) -> Result<Self> {
        let aidl_files = find_files(config.source_dir(), AIDL_PATTERN)?;
        Ok(Self {
            manifest: config.manifest_path(),
            resource_output: config.resource_output_dir(),
            aidl_output: config.aidl_output_dir(),
            aapt: resolve_tool(&config.sdk, Tool::Aapt),
            aidl: resolve_tool(&config.sdk, Tool::Aidl),
            platform_jar: resolve_platform_jar(&config.sdk).ok(),
            framework_aidl: resolve_framework_aidl(&config.sdk),
            aidl_files,
            config,
        })
    }
}

/// Runs the info command.
pub fn run(cli: &Cli, args: InfoArgs) -> Result<()> {
    let info = ProjectInfo::collect(load_config(cli)?)?;
    match args.format {
        InfoFormat::Pretty => print_pretty(&info),
        InfoFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
    }
    Ok(())
}

fn enabled(flag: bool) -> &'static str {
    if flag { "enabled" } else { "disabled" }
}

fn print_pretty(info: &ProjectInfo) {
    let config = &info.config;

    println!("\n=== Project ===\n");
    println!("Base directory:   {}", config.base_directory.display());
    println!("Source directory: {}", config.source_dir().display());
    println!("Manifest:         {}", info.manifest.display());
    println!("Resources:        {}", config.resource_dir().display());
    println!("Assets:           {}", config.assets_dir().display());

    println!("\n=== Tasks ===\n");
    println!("  Resources (aapt): {}", enabled(config.resources));
    println!("  AIDL:             {}", enabled(config.aidl));
    println!(
        "  Delete conflicting files: {}",
        enabled(config.delete_conflicting_files)
    );
    println!(
        "  Package directories (-m): {}",
        enabled(config.create_package_directories)
    );
    println!("  Failure policy:   {:?}", config.failure_policy);

    println!("\n=== SDK ===\n");
    match &config.sdk.path {
        Some(path) => println!("SDK path:       {}", path.display()),
        None => println!("SDK path:       (not set)"),
    }
    println!("aapt:           {}", info.aapt.display());
    println!("aidl:           {}", info.aidl.display());
    match &info.platform_jar {
        Some(jar) => println!("Platform jar:   {}", jar.display()),
        None => println!("Platform jar:   (unresolved)"),
    }
    if let Some(framework) = &info.framework_aidl {
        println!("Framework aidl: {}", framework.display());
    }

    println!("\n=== Outputs ===\n");
    println!("R.java:      {}", info.resource_output.display());
    println!("aidl stubs:  {}", info.aidl_output.display());

    println!("\n=== AIDL files ({}) ===\n", info.aidl_files.len());
    for file in &info.aidl_files {
        println!("  {}", file.display());
    }
    println!();
}
