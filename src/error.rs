//! Error types for audit and monitor operations

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for audit operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Exit code for bad arguments, unknown agents and dead targets.
pub const EXIT_USER_ERROR: u8 = 2;
/// Exit code for anything else that goes wrong.
pub const EXIT_FAILURE: u8 = 1;

/// Errors surfaced to the caller.
///
/// Transient observation gaps never show up here: the monitor turns them
/// into missing data before they reach this type.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Could not detect supported agent at {}", path.display())]
    UnknownAgent { path: PathBuf },

    #[error("PID {pid} is not running or not visible from this namespace.")]
    ProcessNotVisible { pid: u32 },

    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AuditError {
    /// True for conditions the user can fix by changing the invocation.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AuditError::UnknownAgent { .. }
                | AuditError::ProcessNotVisible { .. }
                | AuditError::Launch { .. }
        )
    }

    pub fn exit_code(&self) -> u8 {
        if self.is_user_error() {
            EXIT_USER_ERROR
        } else {
            EXIT_FAILURE
        }
    }
}
