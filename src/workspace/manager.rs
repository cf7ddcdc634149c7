use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::audit::AuditLogger;
use crate::config::ProjectConfig;
use crate::exec::{ExecError, ExecOptions, ExecutionResult, GhCli, GitCli, SecureExecutor, WorktreeEntry};
use crate::security::{
    ValidationError, validate_branch_name, validate_github_ids, validate_workspace_name,
};

/// Suffix appended to a feature branch to name its companion samples branch.
pub const SAMPLES_SUFFIX: &str = "-samples";

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error("Branch already exists: {branch}")]
    BranchExists { branch: String },

    #[error("{description} failed with exit code {exit_code}: {stderr}")]
    CommandFailed {
        description: String,
        exit_code: i32,
        stderr: String,
    },

    #[error(
        "'{executable}' could not be launched. Is it installed and on your PATH? \
         (e.g. `npm install -g {executable}`)"
    )]
    MissingTool { executable: String },
}

/// Derive the companion samples branch name from a feature branch name.
///
/// Slashes are flattened to dashes so the result is a single path segment,
/// then the fixed suffix is appended. Callers pass an already-validated
/// branch name; the output satisfies the same validation.
pub fn samples_branch_name(branch: &str) -> String {
    format!("{}{}", branch.replace('/', "-"), SAMPLES_SUFFIX)
}

/// What `create` provisioned (or, under dry-run, would provision).
#[derive(Debug, Clone)]
pub struct CreatedWorkspace {
    pub workspace: String,
    pub branch: String,
    pub worktree_dir: PathBuf,
    pub samples: Option<(String, PathBuf)>,
}

/// Options for creating a workspace.
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Explicit branch name; defaults to the workspace name.
    pub branch: Option<String>,
    /// Also provision a companion samples worktree.
    pub samples: bool,
    /// GitHub issue ids to link to the new branch.
    pub issues: Vec<String>,
}

/// Provisions per-feature worktrees for a configured project.
///
/// All input crosses the validators and all process execution crosses the
/// secure executor; this type only composes them.
pub struct WorkspaceManager {
    git: GitCli,
    gh: GhCli,
    executor: SecureExecutor,
    audit: Option<AuditLogger>,
    dry_run: bool,
}

impl WorkspaceManager {
    pub fn new(executor: SecureExecutor) -> Self {
        Self {
            git: GitCli::new(executor.clone()),
            gh: GhCli::new(executor.clone()),
            executor,
            audit: None,
            dry_run: false,
        }
    }

    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Create an isolated worktree for a feature workspace.
    pub async fn create(
        &self,
        project: &ProjectConfig,
        workspace_name: &str,
        options: &CreateOptions,
    ) -> Result<CreatedWorkspace, WorkspaceError> {
        let workspace = validate_workspace_name(workspace_name)?;
        let branch = match &options.branch {
            Some(branch) => validate_branch_name(branch)?,
            None => validate_branch_name(&workspace)?,
        };
        let issue_ids = validate_github_ids(&options.issues)?;

        let worktree_dir = project.workspaces_root().join(&workspace);
        let samples = if options.samples {
            let samples_branch = validate_branch_name(&samples_branch_name(&branch))?;
            let samples_dir = project
                .workspaces_root()
                .join(format!("{workspace}{SAMPLES_SUFFIX}"));
            Some((samples_branch, samples_dir))
        } else {
            None
        };

        if self.dry_run {
            info!(
                workspace = %workspace,
                branch = %branch,
                worktree_dir = %worktree_dir.display(),
                samples = samples.is_some(),
                issues = ?issue_ids,
                "dry run: would create workspace"
            );
            return Ok(CreatedWorkspace {
                workspace,
                branch,
                worktree_dir,
                samples,
            });
        }

        if self.git.branch_exists(&project.path, &branch).await? {
            return Err(WorkspaceError::BranchExists { branch });
        }

        self.add_worktree(&project.path, &worktree_dir, &branch, &project.base_branch)
            .await?;

        if let Some((samples_branch, samples_dir)) = &samples {
            self.add_worktree(&project.path, samples_dir, samples_branch, &project.base_branch)
                .await?;
        }

        if let Some(command) = &project.post_init {
            self.run_post_init(command, &worktree_dir).await?;
        }

        for id in &issue_ids {
            let id_str = id.to_string();
            let args = ["issue", "develop", id_str.as_str(), "--branch", branch.as_str()];
            let result = self
                .gh
                .run(&args, &ExecOptions::default().with_cwd(&project.path))
                .await?;
            self.record("gh", &args, &project.path, result.exit_code);
            check(result, format!("linking issue #{id}"))?;
        }

        info!(workspace = %workspace, branch = %branch, "workspace ready");

        Ok(CreatedWorkspace {
            workspace,
            branch,
            worktree_dir,
            samples,
        })
    }

    /// List the worktrees currently provisioned for a project.
    pub async fn list(&self, project: &ProjectConfig) -> Result<Vec<WorktreeEntry>, WorkspaceError> {
        Ok(self.git.worktree_list(&project.path).await?)
    }

    /// Remove a workspace's worktree.
    pub async fn remove(
        &self,
        project: &ProjectConfig,
        workspace_name: &str,
    ) -> Result<(), WorkspaceError> {
        let workspace = validate_workspace_name(workspace_name)?;
        let worktree_dir = project.workspaces_root().join(&workspace);
        let dir = worktree_dir.display().to_string();

        if self.dry_run {
            info!(workspace = %workspace, dir = %dir, "dry run: would remove worktree");
            return Ok(());
        }

        let args = ["worktree", "remove", dir.as_str()];
        let result = self
            .git
            .run(&args, &ExecOptions::default().with_cwd(&project.path))
            .await?;
        self.record("git", &args, &project.path, result.exit_code);
        check(result, format!("removing worktree {dir}"))?;
        Ok(())
    }

    async fn add_worktree(
        &self,
        repo: &Path,
        worktree_dir: &Path,
        branch: &str,
        base_branch: &str,
    ) -> Result<(), WorkspaceError> {
        let dir = worktree_dir.display().to_string();
        let args = ["worktree", "add", dir.as_str(), "-b", branch, base_branch];

        debug!(branch, dir = %dir, "creating worktree");
        let result = self
            .git
            .run(&args, &ExecOptions::default().with_cwd(repo))
            .await?;
        self.record("git", &args, repo, result.exit_code);
        check(result, format!("creating worktree for branch {branch}"))?;
        Ok(())
    }

    /// Run the project's post-init command inside a fresh worktree.
    ///
    /// The command string comes from the config file, so it is semi-trusted:
    /// its first token must be allow-listed and every token passes through
    /// the sanitizer like any other argument.
    async fn run_post_init(&self, command: &str, worktree_dir: &Path) -> Result<(), WorkspaceError> {
        let mut tokens = command.split_whitespace();
        let Some(executable) = tokens.next() else {
            return Ok(());
        };
        let args: Vec<&str> = tokens.collect();

        info!(command, dir = %worktree_dir.display(), "running post-init");
        let result = self
            .executor
            .execute(executable, &args, &ExecOptions::default().with_cwd(worktree_dir))
            .await?;
        self.record(executable, &args, worktree_dir, result.exit_code);

        if result.launch_failed() {
            return Err(WorkspaceError::MissingTool {
                executable: executable.to_string(),
            });
        }
        check(result, format!("post-init command '{command}'"))?;
        Ok(())
    }

    fn record<S: AsRef<str>>(&self, executable: &str, args: &[S], cwd: &Path, exit_code: i32) {
        if let Some(audit) = &self.audit
            && let Err(e) = audit.log_execution(executable, args, cwd, exit_code)
        {
            tracing::warn!(error = %e, "failed to write audit log");
        }
    }
}

fn check(result: ExecutionResult, description: String) -> Result<(), WorkspaceError> {
    if result.success() {
        Ok(())
    } else {
        Err(WorkspaceError::CommandFailed {
            description,
            exit_code: result.exit_code,
            stderr: result.stderr.trim().to_string(),
        })
    }
}
