//! Init command - writes a starter droidgen.toml.

use crate::cli::{Cli, InitArgs};
use droidgen_core::{
    config::CONFIG_FILE_NAME,
    error::{DroidgenError, Result},
};
use std::fs;
use std::path::Path;
use tracing::info;

/// Runs the init command in the current directory.
pub fn run(_cli: &Cli, args: InitArgs) -> Result<()> {
    write_config(Path::new("."), &args)?;

    info!("droidgen initialized successfully!");
    info!("Next steps:");
    info!("  1. Point [sdk] at your Android SDK or export ANDROID_SDK");
    info!("  2. Adjust [project] paths if your layout differs from the defaults");
    info!("  3. Run 'droidgen generate'");
    Ok(())
}

/// Writes the template into `dir`, refusing to clobber an existing file unless forced.
pub fn write_config(dir: &Path, args: &InitArgs) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() && !args.force {
        return Err(DroidgenError::config(format!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        )));
    }

    let content = if args.minimal {
        minimal_config()
    } else {
        full_config()
    };
    fs::write(&config_path, content)?;
    info!("Created {}", config_path.display());
    Ok(())
}

fn minimal_config() -> &'static str {
    r#"[project]
manifest = "AndroidManifest.xml"

[generate]
resources = true
aidl = true
"#
}

fn full_config() -> &'static str {
    r#"# droidgen configuration
# Relative paths resolve against base_directory, which resolves against this file.

[project]
base_directory = "."
source_directory = "src/main/java"
build_directory = "target"
manifest = "AndroidManifest.xml"
resource_directory = "res"
assets_directory = "assets"

[sdk]
# Falls back to the ANDROID_SDK environment variable when unset.
# path = "${ANDROID_SDK}"
# platform = "34"
# platform_jar = "libs/android.jar"
# aapt = "/opt/android-sdk/build-tools/34.0.0/aapt"
# aidl = "/opt/android-sdk/build-tools/34.0.0/aidl"
# framework_aidl = "/opt/android-sdk/platforms/android-34/framework.aidl"

[generate]
resources = true
aidl = true
# Delete stale R.java, Thumbs.db and aidl-generated .java files before regenerating
delete_conflicting_files = true
# Pass -m so aapt creates package directories under the output root
create_package_directories = true
# "fail-fast" or "collect-all"
failure_policy = "fail-fast"
"#
}
