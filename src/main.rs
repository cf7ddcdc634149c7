use clap::Parser as _;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

use branchpad::audit::AuditLogger;
use branchpad::config::Config;
use branchpad::error::{AppError, AppResult};
use branchpad::exec::SecureExecutor;
use branchpad::security::validate_project_key;
use branchpad::workspace::{CreateOptions, WorkspaceError, WorkspaceManager};

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "branchpad=debug"
    } else if cli.silent {
        "branchpad=error"
    } else {
        "branchpad=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(exit_code_for(&e));
    }
}

/// Map a failure to the process exit code. A failed underlying command chain
/// propagates the child's exit code; policy and config errors exit 1.
fn exit_code_for(error: &AppError) -> i32 {
    match error {
        AppError::Workspace(WorkspaceError::CommandFailed { exit_code, .. }) if *exit_code > 0 => {
            *exit_code
        }
        _ => 1,
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::load(&config_path)?;

    let executor = SecureExecutor::new();
    let manager = WorkspaceManager::new(executor)
        .with_audit(AuditLogger::new()?)
        .dry_run(cli.dry_run);

    match cli.command {
        Commands::Init {
            project,
            workspace,
            branch,
            samples,
            issues,
        } => {
            let key = validate_project_key(&project)?;
            let project = config.project(&key)?;
            let created = manager
                .create(
                    project,
                    &workspace,
                    &CreateOptions {
                        branch,
                        samples,
                        issues,
                    },
                )
                .await?;

            println!(
                "Workspace '{}' ready: branch '{}' at {}",
                created.workspace,
                created.branch,
                created.worktree_dir.display()
            );
            if let Some((samples_branch, samples_dir)) = created.samples {
                println!(
                    "Samples workspace ready: branch '{}' at {}",
                    samples_branch,
                    samples_dir.display()
                );
            }
        }

        Commands::List { project } => {
            let key = validate_project_key(&project)?;
            let project = config.project(&key)?;
            for entry in manager.list(project).await? {
                match entry.branch {
                    Some(branch) => println!("{}\t{}", entry.path, branch),
                    None => println!("{}\t(detached)", entry.path),
                }
            }
        }

        Commands::Remove { project, workspace } => {
            let key = validate_project_key(&project)?;
            let project = config.project(&key)?;
            manager.remove(project, &workspace).await?;
            println!("Removed workspace '{workspace}'");
        }

        Commands::Projects => {
            for (key, project) in &config.projects {
                println!("{}\t{}", key, project.path.display());
            }
        }
    }

    Ok(())
}
