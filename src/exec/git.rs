use std::path::Path;

use crate::exec::executor::{ExecError, ExecOptions, ExecutionResult, SecureExecutor};

/// A parsed entry from `git worktree list --porcelain`.
#[derive(Debug, Clone, PartialEq)]
pub struct WorktreeEntry {
    pub path: String,
    pub branch: Option<String>,
}

/// Fixed-executable facade over the [`SecureExecutor`] for git.
///
/// Everything still flows through the executor: allowlist check, argument
/// sanitization, non-shell spawn, timeout.
#[derive(Debug, Clone)]
pub struct GitCli {
    executor: SecureExecutor,
}

impl GitCli {
    pub fn new(executor: SecureExecutor) -> Self {
        Self { executor }
    }

    /// Run a git invocation, forwarding options unchanged.
    pub async fn run<S: AsRef<str>>(
        &self,
        args: &[S],
        options: &ExecOptions,
    ) -> Result<ExecutionResult, ExecError> {
        self.executor.execute("git", args, options).await
    }

    /// List worktrees of the given repository.
    pub async fn worktree_list(&self, repo: &Path) -> Result<Vec<WorktreeEntry>, ExecError> {
        let result = self
            .run(
                &["worktree", "list", "--porcelain"],
                &ExecOptions::default().with_cwd(repo),
            )
            .await?;

        if !result.success() {
            return Ok(Vec::new());
        }

        Ok(parse_worktree_porcelain(&result.stdout))
    }

    /// Check whether a local branch exists.
    pub async fn branch_exists(&self, repo: &Path, branch: &str) -> Result<bool, ExecError> {
        let refname = format!("refs/heads/{branch}");
        let result = self
            .run(
                &["rev-parse", "--verify", "--quiet", &refname],
                &ExecOptions::default().with_cwd(repo),
            )
            .await?;
        Ok(result.success())
    }
}

/// Parse `git worktree list --porcelain` output.
///
/// Entries are blank-line separated; each starts with a `worktree <path>`
/// line, optionally followed by `branch refs/heads/<name>`.
fn parse_worktree_porcelain(output: &str) -> Vec<WorktreeEntry> {
    let mut entries = Vec::new();
    let mut current: Option<WorktreeEntry> = None;

    for line in output.lines() {
        if let Some(path) = line.strip_prefix("worktree ") {
            if let Some(entry) = current.take() {
                entries.push(entry);
            }
            current = Some(WorktreeEntry {
                path: path.to_string(),
                branch: None,
            });
        } else if let Some(branch) = line.strip_prefix("branch ") {
            if let Some(entry) = current.as_mut() {
                entry.branch = Some(
                    branch
                        .strip_prefix("refs/heads/")
                        .unwrap_or(branch)
                        .to_string(),
                );
            }
        }
    }

    if let Some(entry) = current {
        entries.push(entry);
    }

    entries
}
