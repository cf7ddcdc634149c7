use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::security::{ValidationError, validate_project_key};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    #[error("Invalid project key in config: {0}")]
    InvalidProjectKey(#[from] ValidationError),

    #[error("Unknown project: {key}")]
    UnknownProject { key: String },
}

/// A single project entry, normalized.
///
/// On disk both `post-init` (current) and `post_init` (legacy) spellings are
/// accepted; after loading only the hyphen form exists, and when both are
/// present the hyphen form wins. No default command is ever injected.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectConfig {
    pub path: PathBuf,

    #[serde(rename = "base-branch")]
    pub base_branch: String,

    /// Directory that receives per-feature worktrees. Defaults to a
    /// `<repo>-workspaces` sibling of the project path.
    #[serde(rename = "workspaces-dir", skip_serializing_if = "Option::is_none")]
    pub workspaces_dir: Option<PathBuf>,

    /// Command run inside a freshly created worktree, e.g. "pnpm install".
    #[serde(rename = "post-init", skip_serializing_if = "Option::is_none")]
    pub post_init: Option<String>,
}

impl ProjectConfig {
    /// Resolve the directory worktrees are created under.
    pub fn workspaces_root(&self) -> PathBuf {
        match &self.workspaces_dir {
            Some(dir) => dir.clone(),
            None => {
                let name = self
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "project".to_string());
                self.path
                    .parent()
                    .unwrap_or(Path::new("."))
                    .join(format!("{name}-workspaces"))
            }
        }
    }
}

/// Wire form of a project entry, before legacy-key reconciliation.
#[derive(Debug, Deserialize)]
struct RawProjectConfig {
    path: PathBuf,

    #[serde(rename = "base-branch", default = "default_base_branch")]
    base_branch: String,

    #[serde(rename = "workspaces-dir", default)]
    workspaces_dir: Option<PathBuf>,

    #[serde(rename = "post-init", default)]
    post_init: Option<String>,

    #[serde(rename = "post_init", default)]
    post_init_legacy: Option<String>,
}

fn default_base_branch() -> String {
    "main".to_string()
}

impl RawProjectConfig {
    fn normalize(self) -> ProjectConfig {
        ProjectConfig {
            path: expand_tilde(self.path),
            base_branch: self.base_branch,
            workspaces_dir: self.workspaces_dir.map(expand_tilde),
            // Hyphen form wins; the legacy spelling is discarded either way.
            post_init: self.post_init.or(self.post_init_legacy),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    projects: BTreeMap<String, RawProjectConfig>,
}

/// The loaded, normalized project configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub projects: BTreeMap<String, ProjectConfig>,
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// Normalization (legacy keys, tilde expansion) and project-key
    /// validation happen here, before any value can reach the executor.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_yaml_bw::from_str(contents)?;

        let mut projects = BTreeMap::new();
        for (key, raw_project) in raw.projects {
            validate_project_key(&key)?;
            projects.insert(key, raw_project.normalize());
        }

        Ok(Self { projects })
    }

    /// Look up a project by its (already validated) key.
    pub fn project(&self, key: &str) -> Result<&ProjectConfig, ConfigError> {
        self.projects
            .get(key)
            .ok_or_else(|| ConfigError::UnknownProject {
                key: key.to_string(),
            })
    }

    /// Default config path: ~/.config/branchpad/config.yaml
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = std::env::var("HOME").map_err(|_| {
            ConfigError::ReadError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "HOME environment variable not set",
            ))
        })?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("branchpad")
            .join("config.yaml"))
    }
}

/// Expand a leading `~` to $HOME. Paths without one pass through unchanged.
fn expand_tilde(path: PathBuf) -> PathBuf {
    let Ok(stripped) = path.strip_prefix("~") else {
        return path;
    };
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(stripped),
        Err(_) => path,
    }
}
