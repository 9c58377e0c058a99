//! Locating SDK files: the platform base library and the build tools.

use crate::config::SdkConfig;
use crate::error::{DroidgenError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// External tools invoked during generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Tool {
    Aapt,
    Aidl,
}

impl Tool {
    /// File name of the tool binary on this platform.
    pub fn file_name(&self) -> String {
        format!("{}{}", self.as_ref(), std::env::consts::EXE_SUFFIX)
    }
}

/// Resolves the program to run for `tool`.
///
/// Order: the explicitly configured binary, `<sdk>/platform-tools/<tool>`, the
/// newest `<sdk>/build-tools/<version>/<tool>`, then the bare name so the
/// system `PATH` decides.
pub fn resolve_tool(sdk: &SdkConfig, tool: Tool) -> PathBuf {
    let explicit = match tool {
        Tool::Aapt => sdk.aapt.as_ref(),
        Tool::Aidl => sdk.aidl.as_ref(),
    };
    if let Some(path) = explicit {
        return path.clone();
    }

    if let Some(root) = &sdk.path {
        let platform_tools = root.join("platform-tools").join(tool.file_name());
        if platform_tools.is_file() {
            debug!("Resolved {} to {}", tool, platform_tools.display());
            return platform_tools;
        }

        if let Some(build_tools) = newest_subdirectory(&root.join("build-tools"), version_key) {
            let candidate = build_tools.join(tool.file_name());
            if candidate.is_file() {
                debug!("Resolved {} to {}", tool, candidate.display());
                return candidate;
            }
        }
    }

    debug!("Resolving {} through PATH", tool);
    PathBuf::from(tool.file_name())
}

/// Resolves the platform base library archive (`android.jar`).
///
/// An explicit `platform_jar` wins. Otherwise the archive is taken from
/// `<sdk>/platforms/android-<N>/`, where `N` is the configured platform or the
/// highest installed API level.
pub fn resolve_platform_jar(sdk: &SdkConfig) -> Result<PathBuf> {
    if let Some(jar) = &sdk.platform_jar {
        return Ok(jar.clone());
    }

    let root = sdk.path.as_ref().ok_or_else(|| {
        DroidgenError::config(
            "No platform jar configured and no Android SDK path available; \
             set [sdk] path, [sdk] platform_jar or ANDROID_SDK",
        )
    })?;
    let platforms = root.join("platforms");

    let platform_dir = match &sdk.platform {
        Some(platform) => platforms.join(platform_dir_name(platform)),
        None => newest_subdirectory(&platforms, api_level_key).ok_or_else(|| {
            DroidgenError::config(format!(
                "No android-<N> platforms installed under {}",
                platforms.display()
            ))
        })?,
    };

    let jar = platform_dir.join("android.jar");
    debug!("Resolved platform jar to {}", jar.display());
    Ok(jar)
}

/// The framework `.aidl` passed to `aidl -p`, if one is known.
pub fn resolve_framework_aidl(sdk: &SdkConfig) -> Option<PathBuf> {
    sdk.framework_aidl.clone().or_else(|| {
        sdk.path
            .as_ref()
            .map(|root| root.join("tools").join("lib").join("framework.aidl"))
    })
}

fn platform_dir_name(platform: &str) -> String {
    let platform = platform.trim();
    if platform.starts_with("android-") {
        platform.to_string()
    } else {
        format!("android-{platform}")
    }
}

fn api_level_key(name: &str) -> Option<Vec<u32>> {
    name.strip_prefix("android-")?
        .parse::<u32>()
        .ok()
        .map(|level| vec![level])
}

fn version_key(name: &str) -> Option<Vec<u32>> {
    name.split(['.', '-'])
        .map(|part| part.parse::<u32>().ok())
        .take_while(Option::is_some)
        .collect::<Option<Vec<_>>>()
        .filter(|parts| !parts.is_empty())
}

/// Picks the subdirectory of `dir` with the greatest key; unkeyed names are skipped.
fn newest_subdirectory(dir: &Path, key: fn(&str) -> Option<Vec<u32>>) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            key(&name).map(|k| (k, entry.path()))
        })
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, path)| path)
}
