use crate::generator::TaskKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DroidgenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    #[error("Invalid file pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    #[error("Failed to scan \"{}\": {source}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Required input does not exist: {path}")]
    MissingInput { path: PathBuf },

    #[error("Tool '{program}' could not be started: {source}")]
    ToolNotFound {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to spawn tool '{program}': {source}")]
    ToolSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Tool '{program}' failed with {}:\n{output}", describe_exit(.exit_code))]
    ToolExecutionFailed {
        program: String,
        exit_code: Option<i32>,
        output: String,
    },

    #[error("Failed to delete \"{}\": {source}", .path.display())]
    FileDeletionFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{kind} generation failed: {source}")]
    Task {
        kind: TaskKind,
        #[source]
        source: Box<DroidgenError>,
    },

    #[error("{} generation task(s) failed: {}", .0.len(), join_errors(.0))]
    Multiple(Vec<DroidgenError>),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "termination by signal".to_string(),
    }
}

fn join_errors(errors: &[DroidgenError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<regex::Error> for DroidgenError {
    fn from(err: regex::Error) -> Self {
        DroidgenError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DroidgenError>;

impl DroidgenError {
    pub fn config(message: impl Into<String>) -> Self {
        DroidgenError::Config(message.into())
    }

    pub fn pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        DroidgenError::Pattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    pub fn missing_input(path: impl Into<PathBuf>) -> Self {
        DroidgenError::MissingInput { path: path.into() }
    }

    /// Wraps an error raised while running the given task.
    pub fn task(kind: TaskKind, source: DroidgenError) -> Self {
        DroidgenError::Task {
            kind,
            source: Box::new(source),
        }
    }

    /// Returns the innermost error, looking through `Task` wrappers.
    pub fn root_cause(&self) -> &DroidgenError {
        match self {
            DroidgenError::Task { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_execution_failed_display_includes_exit_code() {
        let err = DroidgenError::ToolExecutionFailed {
            program: "aapt".to_string(),
            exit_code: Some(1),
            output: "ERROR: no manifest".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("aapt"));
        assert!(msg.contains("exit code 1"));
        assert!(msg.contains("ERROR: no manifest"));
    }

    #[test]
    fn test_tool_execution_failed_display_signal() {
        let err = DroidgenError::ToolExecutionFailed {
            program: "aidl".to_string(),
            exit_code: None,
            output: String::new(),
        };
        assert!(err.to_string().contains("termination by signal"));
    }

    #[test]
    fn test_task_wrapper_root_cause() {
        let err = DroidgenError::task(
            TaskKind::Aidl,
            DroidgenError::missing_input("/tmp/AndroidManifest.xml"),
        );
        assert!(err.to_string().starts_with("aidl generation failed"));
        assert!(matches!(
            err.root_cause(),
            DroidgenError::MissingInput { .. }
        ));
    }

    #[test]
    fn test_multiple_display_counts_errors() {
        let err = DroidgenError::Multiple(vec![
            DroidgenError::config("first"),
            DroidgenError::config("second"),
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("2 generation task(s) failed"));
        assert!(msg.contains("first"));
        assert!(msg.contains("second"));
    }
}
