pub mod manager;

pub use manager::{
    CreateOptions, CreatedWorkspace, SAMPLES_SUFFIX, WorkspaceError, WorkspaceManager,
    samples_branch_name,
};
