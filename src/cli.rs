use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "branchpad")]
#[command(about = "Provision per-feature development workspaces from a declarative config", long_about = None)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to the YAML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Print the plan without running anything")]
    pub dry_run: bool,

    #[arg(long, global = true, help = "Only print errors")]
    pub silent: bool,

    #[arg(long, global = true, conflicts_with = "silent", help = "Enable debug output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create a workspace: a worktree on a fresh branch, post-initialized")]
    Init {
        #[arg(help = "Project key from the config file")]
        project: String,

        #[arg(help = "Workspace name")]
        workspace: String,

        #[arg(long, help = "Branch name (defaults to the workspace name)")]
        branch: Option<String>,

        #[arg(long, help = "Also create a companion samples worktree")]
        samples: bool,

        #[arg(long = "issue", help = "GitHub issue id to link (repeatable)")]
        issues: Vec<String>,
    },

    #[command(about = "List a project's worktrees")]
    List {
        #[arg(help = "Project key from the config file")]
        project: String,
    },

    #[command(about = "Remove a workspace's worktree")]
    Remove {
        #[arg(help = "Project key from the config file")]
        project: String,

        #[arg(help = "Workspace name")]
        workspace: String,
    },

    #[command(about = "Show configured projects")]
    Projects,
}
