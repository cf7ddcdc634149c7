use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::security::{ALLOWED_EXECUTABLES, SanitizeError, sanitize_shell_arg};

/// Default per-call timeout: 30 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Exit code reported when the process could not be launched at all
/// (not found, permission denied). Matches the shell convention.
const LAUNCH_FAILURE_EXIT_CODE: i32 = 127;

/// Policy errors raised before any process is spawned.
///
/// Everything that happens after a successful spawn is reported through
/// [`ExecutionResult`] instead, so callers can branch on the exit code alone.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("Unauthorized command: {executable}")]
    UnauthorizedCommand { executable: String },

    #[error(transparent)]
    Sanitize(#[from] SanitizeError),
}

/// Uniform outcome of a subprocess attempt.
///
/// `exit_code` is always present: 0 on success, the child's code on failure,
/// and a synthesized non-zero code (with an explanatory `stderr`) for timeout
/// and launch failure. Callers never see a raised error for anything past the
/// spawn point.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// True when the failure came from the launch itself rather than from the
    /// tool. Used upstream for "is this executable installed?" diagnostics.
    pub fn launch_failed(&self) -> bool {
        self.exit_code == LAUNCH_FAILURE_EXIT_CODE
    }
}

/// Environment policy for a spawned process.
///
/// The default is full inheritance of the parent environment, so executables
/// resolved through `PATH` at tool-install time (package managers especially)
/// stay resolvable in the child.
#[derive(Debug, Clone, Default)]
pub enum Environment {
    #[default]
    Inherit,
    /// Inherit, then overlay the given variables.
    Extend(Vec<(String, String)>),
    /// Discard the parent environment and use exactly the given mapping.
    Replace(HashMap<String, String>),
}

/// Per-call execution options.
#[derive(Debug, Clone)]
pub struct ExecOptions {
    pub cwd: Option<PathBuf>,
    pub timeout: Duration,
    pub env: Environment,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            cwd: None,
            timeout: DEFAULT_TIMEOUT,
            env: Environment::Inherit,
        }
    }
}

impl ExecOptions {
    pub fn with_cwd<P: Into<PathBuf>>(mut self, cwd: P) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }
}

/// The sole path by which this crate spawns OS processes.
///
/// Holds only the immutable allowlist; individual calls share no state, so
/// concurrent use needs no synchronization.
#[derive(Debug, Clone)]
pub struct SecureExecutor {
    allowlist: HashSet<String>,
}

impl SecureExecutor {
    /// Create an executor over the default allowlist
    /// ([`ALLOWED_EXECUTABLES`]).
    pub fn new() -> Self {
        Self::with_allowlist(ALLOWED_EXECUTABLES.iter().map(|s| s.to_string()))
    }

    /// Create an executor over a custom allowlist. Intended for tests and
    /// embedders that need a narrower set.
    pub fn with_allowlist<I>(allowlist: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            allowlist: allowlist.into_iter().collect(),
        }
    }

    /// Execute an allow-listed executable with a sanitized argument vector.
    ///
    /// Policy violations (unknown executable, unsafe argument) return `Err`
    /// before any process exists. Every post-spawn outcome, including timeout
    /// and launch failure, is an `Ok(ExecutionResult)`.
    pub async fn execute<S: AsRef<str>>(
        &self,
        executable: &str,
        args: &[S],
        options: &ExecOptions,
    ) -> Result<ExecutionResult, ExecError> {
        if !self.allowlist.contains(executable) {
            return Err(ExecError::UnauthorizedCommand {
                executable: executable.to_string(),
            });
        }

        let mut argv = Vec::with_capacity(args.len());
        for arg in args {
            argv.push(sanitize_shell_arg(arg.as_ref())?.to_string());
        }

        debug!(executable, args = ?argv, cwd = ?options.cwd, "spawning");

        // Arguments are passed as an exact argv vector; no shell ever parses
        // them. kill_on_drop reaps the child if the timeout drops the future.
        let mut cmd = Command::new(executable);
        cmd.args(&argv)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(cwd) = &options.cwd {
            cmd.current_dir(cwd);
        }

        match &options.env {
            Environment::Inherit => {}
            Environment::Extend(pairs) => {
                cmd.envs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            }
            Environment::Replace(map) => {
                cmd.env_clear().envs(map);
            }
        }

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(executable, error = %e, "failed to launch");
                return Ok(ExecutionResult {
                    stdout: String::new(),
                    stderr: format!("failed to launch '{executable}': {e}"),
                    exit_code: LAUNCH_FAILURE_EXIT_CODE,
                });
            }
        };

        match timeout(options.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let result = ExecutionResult {
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                    exit_code: output.status.code().unwrap_or(-1),
                };
                if !result.success() {
                    warn!(executable, exit_code = result.exit_code, "command failed");
                }
                Ok(result)
            }
            Ok(Err(e)) => Ok(ExecutionResult {
                stdout: String::new(),
                stderr: format!("failed to collect output from '{executable}': {e}"),
                exit_code: -1,
            }),
            Err(_) => {
                warn!(executable, timeout_ms = options.timeout.as_millis() as u64, "timed out");
                Ok(ExecutionResult {
                    stdout: String::new(),
                    stderr: format!(
                        "'{executable}' timed out after {}ms and was killed",
                        options.timeout.as_millis()
                    ),
                    exit_code: -1,
                })
            }
        }
    }
}

impl Default for SecureExecutor {
    fn default() -> Self {
        Self::new()
    }
}
