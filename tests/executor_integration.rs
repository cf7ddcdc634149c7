// Executor integration tests against real subprocesses in throwaway repos

mod helpers;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use branchpad::exec::{Environment, ExecOptions, ExecutionResult, SecureExecutor};
use helpers::{create_commit, create_test_repo};

#[tokio::test]
async fn test_git_status_succeeds_with_clean_result() {
    let (_temp, repo_path) = create_test_repo();
    let executor = SecureExecutor::new();

    let result = executor
        .execute(
            "git",
            &["status", "--porcelain"],
            &ExecOptions::default().with_cwd(&repo_path),
        )
        .await
        .unwrap();

    assert_eq!(result.exit_code, 0);
    assert_eq!(result.stderr, "");
}

#[tokio::test]
async fn test_cwd_is_forwarded() {
    let (_temp, repo_path) = create_test_repo();
    create_commit(&repo_path, "file.txt", "content", "add file");

    let executor = SecureExecutor::new();
    let result = executor
        .execute(
            "git",
            &["log", "--oneline"],
            &ExecOptions::default().with_cwd(&repo_path),
        )
        .await
        .unwrap();

    assert!(result.success());
    assert!(result.stdout.contains("add file"));
}

#[tokio::test]
async fn test_arguments_are_not_shell_interpreted() {
    let (_temp, repo_path) = create_test_repo();
    let executor = SecureExecutor::new();

    // A commit message with spaces and quotes travels as one argv element
    create_commit(&repo_path, "a.txt", "x", "placeholder");
    let result = executor
        .execute(
            "git",
            &["commit", "--allow-empty", "-m", "message with 'spaces'"],
            &ExecOptions::default().with_cwd(&repo_path),
        )
        .await
        .unwrap();
    assert!(result.success(), "stderr: {}", result.stderr);

    let log = executor
        .execute(
            "git",
            &["log", "-1", "--pretty=%s"],
            &ExecOptions::default().with_cwd(&repo_path),
        )
        .await
        .unwrap();
    assert_eq!(log.stdout.trim(), "message with 'spaces'");
}

#[tokio::test]
async fn test_nonzero_exit_is_returned_not_raised() {
    let (_temp, repo_path) = create_test_repo();
    let executor = SecureExecutor::new();

    let result: ExecutionResult = executor
        .execute(
            "git",
            &["checkout", "no-such-branch"],
            &ExecOptions::default().with_cwd(&repo_path),
        )
        .await
        .unwrap();

    assert_ne!(result.exit_code, 0);
    assert!(!result.stderr.is_empty());
}

#[tokio::test]
async fn test_timeout_terminates_long_running_child() {
    let executor = SecureExecutor::new();
    let options = ExecOptions::default().with_timeout(Duration::from_millis(200));

    let start = Instant::now();
    let result = executor
        .execute("sh", &["-c", "sleep 10"], &options)
        .await
        .unwrap();

    assert!(start.elapsed() < Duration::from_secs(5));
    assert_ne!(result.exit_code, 0);
    assert!(result.stderr.contains("timed out"));
}

#[tokio::test]
async fn test_environment_inherit_is_default() {
    let executor = SecureExecutor::new();
    let result = executor
        .execute("sh", &["-c", "printf %s \"$PATH\""], &ExecOptions::default())
        .await
        .unwrap();
    assert!(
        !result.stdout.is_empty(),
        "PATH should be visible to children by default"
    );
}

#[tokio::test]
async fn test_environment_replace_drops_parent_vars() {
    let executor = SecureExecutor::new();

    let mut env = HashMap::new();
    env.insert("ONLY_VAR".to_string(), "yes".to_string());
    let options = ExecOptions::default().with_env(Environment::Replace(env));

    let result = executor
        .execute("sh", &["-c", "printf %s \"$PATH$ONLY_VAR\""], &options)
        .await
        .unwrap();
    assert_eq!(result.stdout, "yes");
}

#[tokio::test]
async fn test_launch_failure_names_the_executable() {
    let executor = SecureExecutor::with_allowlist(["surely-not-installed-tool".to_string()]);
    let result = executor
        .execute("surely-not-installed-tool", &["install"], &ExecOptions::default())
        .await
        .unwrap();

    assert!(result.launch_failed());
    assert!(result.stderr.contains("surely-not-installed-tool"));
}

#[tokio::test]
async fn test_concurrent_executions_are_independent() {
    let executor = SecureExecutor::new();

    let calls = (0..8).map(|i| {
        let executor = executor.clone();
        async move {
            executor
                .execute(
                    "sh",
                    &["-c", &format!("printf %s {i}")],
                    &ExecOptions::default(),
                )
                .await
                .unwrap()
        }
    });

    let results = futures_join_all(calls).await;
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.stdout, i.to_string());
        assert_eq!(result.exit_code, 0);
    }
}

// Small local join_all so the test suite does not pull in the futures crate
async fn futures_join_all<F, T>(futures: impl IntoIterator<Item = F>) -> Vec<T>
where
    F: std::future::Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handles: Vec<_> = futures.into_iter().map(tokio::spawn).collect();
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    results
}
