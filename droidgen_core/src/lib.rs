//! Source generation for Android projects: runs `aapt` and `aidl` and removes
//! the stale generated files they would otherwise collide with.
//!
//! ## Quick Start (in build.rs)
//!
//! ```rust,ignore
//! fn main() {
//!     let report = droidgen_core::generate().expect("Source generation failed");
//!     for root in &report.compile_source_roots {
//!         println!("cargo:warning=generated sources in {}", root.display());
//!     }
//!     println!("cargo:rerun-if-changed=res/");
//!     println!("cargo:rerun-if-changed=droidgen.toml");
//! }
//! ```

pub mod aidl;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod exec;
pub mod generator;
pub mod resources;
pub mod scanner;
pub mod sdk;
pub mod session;

pub use config::{FailurePolicy, GenerateConfig, SdkConfig};
pub use error::{DroidgenError, Result};
pub use exec::{CommandExecutor, ExecutionResult, ProcessExecutor};
pub use generator::{GenerationReport, GenerationTask, SourceGenerator, TaskKind, TaskOutcome};
pub use session::BuildSession;

/// Runs every enabled task using configuration from `droidgen.toml`.
///
/// The file is searched for from `CARGO_MANIFEST_DIR` (or the current
/// directory) upward.
///
/// # Errors
///
/// Returns `DroidgenError` if:
/// - the configuration cannot be found or parsed
/// - a required input (manifest, platform jar) is missing
/// - a tool cannot be started or exits non-zero
/// - a stale file cannot be deleted
pub fn generate() -> Result<GenerationReport> {
    generate_with_config(GenerateConfig::from_toml()?)
}

/// Runs every enabled task with a programmatic configuration.
pub fn generate_with_config(config: GenerateConfig) -> Result<GenerationReport> {
    let mut session = BuildSession::new();
    SourceGenerator::new(config).generate_all(&mut session)
}
