//! Project configuration for source generation.
//!
//! Configuration is read from `droidgen.toml` or assembled with
//! [`GenerateConfig::builder`]. Environment lookups (`.env`, `${VAR}`
//! substitution, `ANDROID_SDK`) happen here, once, before any task runs.

use crate::error::{DroidgenError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error, info, trace, warn};

pub const CONFIG_FILE_NAME: &str = "droidgen.toml";

/// Environment variable naming the Android SDK installation.
pub const ANDROID_SDK_ENV: &str = "ANDROID_SDK";

/// How [`crate::SourceGenerator::generate_all`] reacts to a failing task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop at the first failing task.
    #[default]
    FailFast,
    /// Attempt every enabled task and report all failures together.
    CollectAll,
}

/// Where to find the SDK and the files resolved from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SdkConfig {
    /// SDK root directory.
    pub path: Option<PathBuf>,
    /// Platform API level (`"8"`) or directory name (`"android-8"`).
    pub platform: Option<String>,
    /// Explicit platform base library archive, overrides the SDK lookup.
    pub platform_jar: Option<PathBuf>,
    /// Explicit `aapt` binary.
    pub aapt: Option<PathBuf>,
    /// Explicit `aidl` binary.
    pub aidl: Option<PathBuf>,
    /// Explicit framework `.aidl` passed to `aidl -p`.
    pub framework_aidl: Option<PathBuf>,
}

impl SdkConfig {
    /// Reads the SDK root from `ANDROID_SDK`.
    ///
    /// An unset or empty variable leaves the path unset. A value that is not
    /// a directory is rejected.
    pub fn from_env() -> Result<Self> {
        let path = match env::var(ANDROID_SDK_ENV) {
            Ok(value) if !value.trim().is_empty() => {
                let path = PathBuf::from(value);
                validate_sdk_dir(&path)?;
                debug!("Using SDK from {}: {}", ANDROID_SDK_ENV, path.display());
                Some(path)
            }
            _ => {
                debug!("{} not set", ANDROID_SDK_ENV);
                None
            }
        };

        Ok(Self {
            path,
            ..Self::default()
        })
    }
}

fn validate_sdk_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        error!("SDK path {} is not a directory", path.display());
        Err(DroidgenError::config(format!(
            "Android SDK path '{}' is not a directory",
            path.display()
        )))
    }
}

/// Everything the generation tasks need to know about the project.
///
/// Relative project paths are interpreted against `base_directory`; use the
/// resolving accessors (e.g. [`GenerateConfig::source_dir`]) rather than the
/// raw fields when touching the file system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateConfig {
    /// Project root; the working directory of every tool invocation.
    pub base_directory: PathBuf,
    /// Primary source root scanned for `.aidl` files and stale outputs.
    pub source_directory: PathBuf,
    /// Build output directory; generated sources go under `generated-sources/`.
    pub build_directory: PathBuf,
    pub manifest: PathBuf,
    pub resource_directory: PathBuf,
    pub assets_directory: PathBuf,
    pub sdk: SdkConfig,
    /// Run the resource generation task.
    pub resources: bool,
    /// Run the interface-stub generation task.
    pub aidl: bool,
    /// Delete previously generated files before regenerating them.
    pub delete_conflicting_files: bool,
    /// Pass `-m` to `aapt` so `R.java` lands in package directories.
    pub create_package_directories: bool,
    pub failure_policy: FailurePolicy,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            base_directory: PathBuf::from("."),
            source_directory: PathBuf::from("src/main/java"),
            build_directory: PathBuf::from("target"),
            manifest: PathBuf::from("AndroidManifest.xml"),
            resource_directory: PathBuf::from("res"),
            assets_directory: PathBuf::from("assets"),
            sdk: SdkConfig::default(),
            resources: true,
            aidl: true,
            delete_conflicting_files: true,
            create_package_directories: true,
            failure_policy: FailurePolicy::FailFast,
        }
    }
}

impl GenerateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> GenerateConfigBuilder {
        GenerateConfigBuilder::new()
    }

    /// Loads `droidgen.toml`, searching upward from `CARGO_MANIFEST_DIR` (if
    /// set) or the current directory.
    pub fn from_toml() -> Result<Self> {
        let start_dir = match env::var("CARGO_MANIFEST_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => env::current_dir()?,
        };
        let path = find_config_file(&start_dir)?;
        Self::from_toml_path(path)
    }

    /// Loads a specific configuration file.
    pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from {}", path.display());
        dotenv::dotenv().ok();

        let contents = fs::read_to_string(path).map_err(|e| {
            error!("Failed to read configuration file: {}", e);
            DroidgenError::from(e)
        })?;
        debug!("Configuration file size: {} bytes", contents.len());

        let config_dir = path.parent().unwrap_or(Path::new("."));
        Self::parse_toml(&contents, config_dir)
    }

    /// Parses configuration text; relative paths resolve against `config_dir`.
    pub fn parse_toml(contents: &str, config_dir: &Path) -> Result<Self> {
        let mut file: ConfigFile = toml::from_str(contents).map_err(|e| {
            error!("Failed to parse TOML configuration: {}", e);
            DroidgenError::from(e)
        })?;

        debug!("Substituting environment variables in configuration");
        file.substitute_env_vars()?;

        let defaults = Self::default();
        let base_directory = join_clean(
            config_dir,
            &file
                .project
                .base_directory
                .unwrap_or(defaults.base_directory),
        );

        let sdk = match non_empty(file.sdk.path) {
            Some(path) => {
                let path = join_clean(&base_directory, &path);
                validate_sdk_dir(&path)?;
                SdkConfig {
                    path: Some(path),
                    ..SdkConfig::default()
                }
            }
            None => SdkConfig::from_env()?,
        };

        let resolve = |value: Option<PathBuf>| -> Option<PathBuf> {
            non_empty(value).map(|p| join_clean(&base_directory, &p))
        };

        let sdk = SdkConfig {
            platform: file.sdk.platform.filter(|p| !p.trim().is_empty()),
            platform_jar: resolve(file.sdk.platform_jar),
            aapt: non_empty(file.sdk.aapt),
            aidl: non_empty(file.sdk.aidl),
            framework_aidl: resolve(file.sdk.framework_aidl),
            ..sdk
        };

        let config = Self {
            source_directory: file
                .project
                .source_directory
                .unwrap_or(defaults.source_directory),
            build_directory: file
                .project
                .build_directory
                .unwrap_or(defaults.build_directory),
            manifest: file.project.manifest.unwrap_or(defaults.manifest),
            resource_directory: file
                .project
                .resource_directory
                .unwrap_or(defaults.resource_directory),
            assets_directory: file
                .project
                .assets_directory
                .unwrap_or(defaults.assets_directory),
            sdk,
            resources: file.generate.resources.unwrap_or(defaults.resources),
            aidl: file.generate.aidl.unwrap_or(defaults.aidl),
            delete_conflicting_files: file
                .generate
                .delete_conflicting_files
                .unwrap_or(defaults.delete_conflicting_files),
            create_package_directories: file
                .generate
                .create_package_directories
                .unwrap_or(defaults.create_package_directories),
            failure_policy: file
                .generate
                .failure_policy
                .unwrap_or(defaults.failure_policy),
            base_directory,
        };

        info!("Configuration loaded successfully");
        debug!(
            "Tasks - resources: {}, aidl: {}, delete conflicting: {}, policy: {:?}",
            config.resources, config.aidl, config.delete_conflicting_files, config.failure_policy
        );
        Ok(config)
    }

    pub fn source_dir(&self) -> PathBuf {
        self.resolve(&self.source_directory)
    }

    pub fn build_dir(&self) -> PathBuf {
        self.resolve(&self.build_directory)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.resolve(&self.manifest)
    }

    pub fn resource_dir(&self) -> PathBuf {
        self.resolve(&self.resource_directory)
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.resolve(&self.assets_directory)
    }

    /// `<build>/generated-sources/r`
    pub fn resource_output_dir(&self) -> PathBuf {
        self.build_dir().join("generated-sources").join("r")
    }

    /// `<build>/generated-sources/aidl`
    pub fn aidl_output_dir(&self) -> PathBuf {
        self.build_dir().join("generated-sources").join("aidl")
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        join_clean(&self.base_directory, path)
    }
}

/// Searches `start_dir` and its ancestors for `droidgen.toml`.
pub fn find_config_file(start_dir: &Path) -> Result<PathBuf> {
    debug!("Starting config file search from: {:?}", start_dir);

    for dir in start_dir.ancestors() {
        let candidate = dir.join(CONFIG_FILE_NAME);
        trace!("Checking for config at: {:?}", candidate);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    error!(
        "Configuration file '{}' not found in any parent directory.",
        CONFIG_FILE_NAME
    );
    Err(DroidgenError::config(format!(
        "{CONFIG_FILE_NAME} not found in {} or any parent directory.",
        start_dir.display()
    )))
}

/// Substitutes `${VAR}` and `${VAR:-default}` references.
pub fn substitute_env_vars(value: &str) -> Result<String> {
    trace!("Substituting environment variables in: {}", value);
    let re = regex::Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}")?;
    let mut result = value.to_string();

    for cap in re.captures_iter(value) {
        let var_name = &cap[1];
        let default_value = cap.get(2).map(|m| m.as_str());

        let replacement = match env::var(var_name) {
            Ok(val) => {
                debug!("Resolved environment variable: {}", var_name);
                val
            }
            Err(_) => match default_value {
                Some(default) => {
                    warn!(
                        "Environment variable {} not set, using default: {:?}",
                        var_name, default
                    );
                    default.to_string()
                }
                None => {
                    error!(
                        "Environment variable {} not set and no default provided",
                        var_name
                    );
                    return Err(DroidgenError::EnvVarNotSet(var_name.to_string()));
                }
            },
        };

        result = result.replace(&cap[0], &replacement);
    }

    Ok(result)
}

fn substitute_path(path: &mut Option<PathBuf>) -> Result<()> {
    if let Some(value) = path.as_ref().and_then(|p| p.to_str()) {
        *path = Some(PathBuf::from(substitute_env_vars(value)?));
    }
    Ok(())
}

fn substitute_string(value: &mut Option<String>) -> Result<()> {
    if let Some(current) = value.as_deref() {
        *value = Some(substitute_env_vars(current)?);
    }
    Ok(())
}

fn non_empty(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty())
}

/// Joins `path` onto `base` unless it is absolute, dropping `.` components.
pub(crate) fn join_clean(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let mut joined = base.to_path_buf();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            other => joined.push(other),
        }
    }
    joined
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    project: ProjectSection,
    #[serde(default)]
    sdk: SdkSection,
    #[serde(default)]
    generate: GenerateSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectSection {
    base_directory: Option<PathBuf>,
    source_directory: Option<PathBuf>,
    build_directory: Option<PathBuf>,
    manifest: Option<PathBuf>,
    resource_directory: Option<PathBuf>,
    assets_directory: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SdkSection {
    path: Option<PathBuf>,
    platform: Option<String>,
    platform_jar: Option<PathBuf>,
    aapt: Option<PathBuf>,
    aidl: Option<PathBuf>,
    framework_aidl: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GenerateSection {
    resources: Option<bool>,
    aidl: Option<bool>,
    delete_conflicting_files: Option<bool>,
    create_package_directories: Option<bool>,
    failure_policy: Option<FailurePolicy>,
}

impl ConfigFile {
    /// Expands `${VAR}` references in every string value after parsing.
    fn substitute_env_vars(&mut self) -> Result<()> {
        let project = &mut self.project;
        for path in [
            &mut project.base_directory,
            &mut project.source_directory,
            &mut project.build_directory,
            &mut project.manifest,
            &mut project.resource_directory,
            &mut project.assets_directory,
        ] {
            substitute_path(path)?;
        }

        let sdk = &mut self.sdk;
        for path in [
            &mut sdk.path,
            &mut sdk.platform_jar,
            &mut sdk.aapt,
            &mut sdk.aidl,
            &mut sdk.framework_aidl,
        ] {
            substitute_path(path)?;
        }
        substitute_string(&mut sdk.platform)
    }
}

/// Builder for [`GenerateConfig`].
#[derive(Debug, Clone, Default)]
pub struct GenerateConfigBuilder {
    config: GenerateConfig,
}

impl GenerateConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: GenerateConfig::default(),
        }
    }

    pub fn base_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.base_directory = path.into();
        self
    }

    pub fn source_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.source_directory = path.into();
        self
    }

    pub fn build_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.build_directory = path.into();
        self
    }

    pub fn manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.manifest = path.into();
        self
    }

    pub fn resource_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.resource_directory = path.into();
        self
    }

    pub fn assets_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.assets_directory = path.into();
        self
    }

    pub fn sdk(mut self, sdk: SdkConfig) -> Self {
        self.config.sdk = sdk;
        self
    }

    pub fn sdk_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.sdk.path = Some(path.into());
        self
    }

    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.config.sdk.platform = Some(platform.into());
        self
    }

    pub fn platform_jar(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.sdk.platform_jar = Some(path.into());
        self
    }

    pub fn aapt(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.sdk.aapt = Some(path.into());
        self
    }

    pub fn aidl_tool(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.sdk.aidl = Some(path.into());
        self
    }

    pub fn framework_aidl(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.sdk.framework_aidl = Some(path.into());
        self
    }

    pub fn resources(mut self, enabled: bool) -> Self {
        self.config.resources = enabled;
        self
    }

    pub fn aidl(mut self, enabled: bool) -> Self {
        self.config.aidl = enabled;
        self
    }

    pub fn delete_conflicting_files(mut self, enabled: bool) -> Self {
        self.config.delete_conflicting_files = enabled;
        self
    }

    pub fn create_package_directories(mut self, enabled: bool) -> Self {
        self.config.create_package_directories = enabled;
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.config.failure_policy = policy;
        self
    }

    pub fn build(self) -> GenerateConfig {
        self.config
    }
}
