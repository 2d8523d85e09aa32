//! Error types for tt
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, validation, unknown check)
//! - 3: Blocked (bad credentials, not logged in, role lacks permission)
//! - 4: Operation failed (io, serialization)

use thiserror::Error;

use crate::model::Role;
use crate::policy::Action;
use crate::session::Tab;

/// Exit codes for the tt CLI
pub mod exit_codes {
    pub const USER_ERROR: i32 = 2;
    pub const POLICY_BLOCKED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for checklist operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Check not found: {0}")]
    TaskNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Blocked (exit code 3)
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Permission denied: {role} cannot {action} this check")]
    PermissionDenied { role: Role, action: Action },

    #[error("The {tab} tab is not available to {role}")]
    TabUnavailable { role: Role, tab: Tab },

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_)
            | Error::TaskNotFound(_)
            | Error::InvalidArgument(_)
            | Error::InvalidConfig(_) => exit_codes::USER_ERROR,

            Error::InvalidCredentials
            | Error::NotAuthenticated
            | Error::PermissionDenied { .. }
            | Error::TabUnavailable { .. } => exit_codes::POLICY_BLOCKED,

            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Stable machine-readable kind, used in JSON error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::TaskNotFound(_) => "not_found",
            Error::InvalidArgument(_) => "invalid_argument",
            Error::InvalidConfig(_) => "invalid_config",
            Error::InvalidCredentials => "auth",
            Error::NotAuthenticated => "not_authenticated",
            Error::PermissionDenied { .. } | Error::TabUnavailable { .. } => "permission_denied",
            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_) => "operation_failed",
        }
    }

    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::PermissionDenied { role, action } => Some(serde_json::json!({
                "role": role,
                "action": action,
            })),
            Error::TabUnavailable { role, tab } => Some(serde_json::json!({
                "role": role,
                "tab": tab,
            })),
            Error::TaskNotFound(id) => Some(serde_json::json!({ "id": id })),
            _ => None,
        }
    }
}

/// Result type alias for checklist operations
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
