pub mod executor;
pub mod gh;
pub mod git;

// Re-export commonly used types
pub use executor::{
    DEFAULT_TIMEOUT, Environment, ExecError, ExecOptions, ExecutionResult, SecureExecutor,
};
pub use gh::GhCli;
pub use git::{GitCli, WorktreeEntry};
