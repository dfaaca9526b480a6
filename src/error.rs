//! Error types for tenthousand
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, missing config, unknown task)
//! - 4: Operation failed (I/O, lock, corrupt task file)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the tenthousand CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for tenthousand operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Config file not found at {0}")]
    ConfigNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid task name: '{0}'")]
    InvalidTaskName(String),

    /// Suggestions are carried as data; rendering them is the output layer's job.
    #[error("Task not found: {name}")]
    TaskNotFound {
        name: String,
        suggestions: Vec<String>,
    },

    #[error("Task '{0}' was not created")]
    TaskCreationDeclined(String),

    #[error("Total for task '{0}' exceeds the largest supported count")]
    TotalOverflow(String),

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Malformed task file {path} at line {line}: {reason}")]
    MalformedTaskFile {
        path: PathBuf,
        line: u64,
        reason: String,
    },
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::ConfigNotFound(_)
            | Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::InvalidTaskName(_)
            | Error::TaskNotFound { .. }
            | Error::TaskCreationDeclined(_)
            | Error::TotalOverflow(_) => exit_codes::USER_ERROR,

            // Operation failures
            Error::Io(_)
            | Error::Csv(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::Prompt(_)
            | Error::MalformedTaskFile { .. } => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured payload for machine-readable output
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::TaskNotFound { name, suggestions } => Some(serde_json::json!({
                "task": name,
                "suggestions": suggestions,
            })),
            Error::ConfigNotFound(path) => Some(serde_json::json!({
                "path": path,
            })),
            Error::MalformedTaskFile { path, line, .. } => Some(serde_json::json!({
                "path": path,
                "line": line,
            })),
            _ => None,
        }
    }

    /// Coarse error class, derived from the exit code
    pub fn kind(&self) -> &'static str {
        match self.exit_code() {
            exit_codes::USER_ERROR => "user_error",
            _ => "operation_failed",
        }
    }
}

/// Result type alias for tenthousand operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub message: String,
    pub code: i32,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            message: err.to_string(),
            code: err.exit_code(),
            kind: err.kind(),
            details: err.details(),
        }
    }
}
