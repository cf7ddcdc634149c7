use crate::exec::executor::{ExecError, ExecOptions, ExecutionResult, SecureExecutor};

/// Fixed-executable facade over the [`SecureExecutor`] for the GitHub CLI.
#[derive(Debug, Clone)]
pub struct GhCli {
    executor: SecureExecutor,
}

impl GhCli {
    pub fn new(executor: SecureExecutor) -> Self {
        Self { executor }
    }

    /// Run an arbitrary gh invocation, forwarding options unchanged.
    pub async fn run<S: AsRef<str>>(
        &self,
        args: &[S],
        options: &ExecOptions,
    ) -> Result<ExecutionResult, ExecError> {
        self.executor.execute("gh", args, options).await
    }
}
