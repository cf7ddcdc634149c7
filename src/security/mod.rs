pub mod sanitizer;
pub mod validator;

pub use sanitizer::{SanitizeError, sanitize_shell_arg};
pub use validator::{
    ValidationError, validate_branch_name, validate_github_ids, validate_project_key,
    validate_workspace_name,
};

/// Allowlist of permitted executables
///
/// This list is used by the SecureExecutor (the only process-spawn path in
/// this crate) and by the integration tests to ensure consistency.
///
/// Adding a new executable requires careful security review.
pub const ALLOWED_EXECUTABLES: &[&str] = &[
    // Version control
    "git",
    // Platform / issue-tracker CLI
    "gh",
    // POSIX shell entry point (spawned as a plain executable with an argument
    // vector, never with shell interpretation of a command line)
    "sh",
    // Tooling runtime
    "node",
    // Package managers
    "npm",
    "pnpm",
    "yarn",
];
