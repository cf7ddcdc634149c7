use std::io;
use thiserror::Error;

// Import module-level errors for AppError
use crate::config::settings::ConfigError;
use crate::exec::executor::ExecError;
use crate::security::sanitizer::SanitizeError;
use crate::security::validator::ValidationError;
use crate::workspace::manager::WorkspaceError;

/// Top-level application error that wraps all module-specific errors
///
/// This provides a unified error type for application-level code while
/// preserving the specific error context from each module. All module errors
/// automatically convert to AppError via the `From` trait.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Sanitization error: {0}")]
    Sanitize(#[from] SanitizeError),

    #[error("Execution error: {0}")]
    Exec(#[from] ExecError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Workspace error: {0}")]
    Workspace(#[from] WorkspaceError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for application-level operations
pub type AppResult<T> = std::result::Result<T, AppError>;
