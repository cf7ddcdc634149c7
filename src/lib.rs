pub mod audit;
pub mod config;
pub mod error;
pub mod exec;
pub mod security;
pub mod workspace;

// Re-export commonly used types for convenience
pub use config::{Config, ProjectConfig};
pub use error::{AppError, AppResult};
pub use exec::{ExecOptions, ExecutionResult, GhCli, GitCli, SecureExecutor};
pub use security::ALLOWED_EXECUTABLES;
pub use workspace::{WorkspaceManager, samples_branch_name};
