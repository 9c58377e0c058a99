pub use droidgen_core::{
    aidl, cleaner, config, error, exec, generator, resources, scanner, sdk, session,
};
pub use droidgen_core::{
    BuildSession, DroidgenError, FailurePolicy, GenerateConfig, GenerationReport, SourceGenerator,
    TaskKind, generate, generate_with_config,
};
