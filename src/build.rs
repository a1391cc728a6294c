//! Build and test execution over the generated project
//!
//! Drives the external toolchain (dependency install, build, test) through
//! the `CommandExecutor` capability and captures everything into
//! `BuildOutcome`/`TestOutcome`. Non-zero exits and execution errors are
//! reported inside the outcome — they never propagate as `Err` past this
//! boundary, because a failing build is a property of the generated project,
//! not of the pipeline.

use crate::exec::{CommandExecutor, CommandOutput, ExecError};
use crate::model::{BuildOutcome, TestOutcome};
use chrono::Utc;
use regex::Regex;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Default per-command timeout, matching the external toolchain's worst case
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(300);

pub struct BuildRunner {
    executor: Arc<dyn CommandExecutor>,
    timeout: Duration,
}

impl BuildRunner {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self::with_timeout(executor, DEFAULT_COMMAND_TIMEOUT)
    }

    pub fn with_timeout(executor: Arc<dyn CommandExecutor>, timeout: Duration) -> Self {
        Self { executor, timeout }
    }

    /// Install dependencies and build the project in `project_dir`
    ///
    /// Install scripts are disabled (`--ignore-scripts`); the build script
    /// itself still executes generated code via the configured executor.
    pub async fn build(&self, project_dir: &Path) -> BuildOutcome {
        let install = match self
            .executor
            .run(
                "npm",
                &["install", "--ignore-scripts"],
                project_dir,
                self.timeout,
            )
            .await
        {
            Ok(output) => output,
            Err(e) => return failed_build(&e),
        };

        if !install.success() {
            warn!(
                exit_code = ?install.exit_code,
                "Dependency installation failed"
            );
            return outcome_from(&install, false);
        }

        let build = match self
            .executor
            .run("npm", &["run", "build"], project_dir, self.timeout)
            .await
        {
            Ok(output) => output,
            Err(e) => return failed_build(&e),
        };

        let success = build.success();
        if success {
            info!("Build completed successfully");
        } else {
            warn!(exit_code = ?build.exit_code, "Build failed");
        }

        let mut outcome = outcome_from(&build, success);
        // Install logs precede build logs in the combined transcript
        let mut logs = install.stdout_lines();
        logs.extend(outcome.logs);
        outcome.logs = logs;
        outcome
    }

    /// Run the project's test suite in `project_dir`
    pub async fn test(&self, project_dir: &Path) -> TestOutcome {
        let output = match self
            .executor
            .run("npm", &["test"], project_dir, self.timeout)
            .await
        {
            Ok(output) => output,
            Err(e) => {
                warn!(error = %e, "Test run could not execute");
                return TestOutcome {
                    success: false,
                    total_tests: 0,
                    passed_tests: 0,
                    failed_tests: 0,
                    test_suites: Vec::new(),
                    coverage: None,
                    timestamp: Utc::now(),
                };
            }
        };

        let (passed, failed) = parse_test_counts(&output.stdout);
        let success = output.success();

        info!(success, passed, failed, "Test run finished");

        TestOutcome {
            success,
            total_tests: passed + failed,
            passed_tests: passed,
            failed_tests: failed,
            test_suites: Vec::new(),
            coverage: None,
            timestamp: Utc::now(),
        }
    }
}

fn outcome_from(output: &CommandOutput, success: bool) -> BuildOutcome {
    let warnings = output
        .stdout
        .lines()
        .chain(output.stderr.lines())
        .filter(|line| line.to_lowercase().contains("warning"))
        .map(str::to_string)
        .collect();

    BuildOutcome {
        success,
        logs: output.stdout_lines(),
        errors: output.stderr_lines(),
        warnings,
        artifacts: if success {
            vec!["dist".to_string()]
        } else {
            Vec::new()
        },
        timestamp: Utc::now(),
    }
}

fn failed_build(error: &ExecError) -> BuildOutcome {
    BuildOutcome {
        success: false,
        logs: Vec::new(),
        errors: vec![error.to_string()],
        warnings: Vec::new(),
        artifacts: Vec::new(),
        timestamp: Utc::now(),
    }
}

/// Pull passed/failed counts out of a test runner transcript
///
/// Counts come from the vitest/jest "Tests" summary line; the runner prints
/// a "Test Files" line above it whose counts are file counts, not test
/// counts. Transcripts without a "Tests" line are scanned whole; absent
/// counts default to zero.
fn parse_test_counts(stdout: &str) -> (u32, u32) {
    let summary_re = Regex::new(r"(?m)^\s*Tests:?\s+(.+)$").expect("valid regex");
    let passed_re = Regex::new(r"(\d+)\s+passed").expect("valid regex");
    let failed_re = Regex::new(r"(\d+)\s+failed").expect("valid regex");

    let summary = summary_re.captures(stdout).map(|c| c[1].to_string());
    let haystack = summary.as_deref().unwrap_or(stdout);

    let passed = passed_re
        .captures(haystack)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(0);
    let failed = failed_re
        .captures(haystack)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(0);

    (passed, failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::ScriptedExecutor;

    fn runner(executor: ScriptedExecutor) -> BuildRunner {
        BuildRunner::with_timeout(Arc::new(executor), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_successful_build() {
        let executor = ScriptedExecutor::new();
        executor.push_success("added 120 packages");
        executor.push_success("vite v5.0.0 building for production...\ndist/index.html  0.4 kB");

        let outcome = runner(executor).build(Path::new("/tmp/p")).await;

        assert!(outcome.success);
        assert_eq!(outcome.artifacts, vec!["dist"]);
        assert!(outcome.logs.iter().any(|l| l.contains("added 120 packages")));
        assert!(outcome.logs.iter().any(|l| l.contains("dist/index.html")));
    }

    #[tokio::test]
    async fn test_install_failure_short_circuits() {
        let executor = ScriptedExecutor::new();
        executor.push_failure(1, "npm ERR! network refused");

        let outcome = runner(executor).build(Path::new("/tmp/p")).await;

        assert!(!outcome.success);
        assert!(outcome.artifacts.is_empty());
        assert!(outcome.errors.iter().any(|l| l.contains("network refused")));
    }

    #[tokio::test]
    async fn test_build_failure_captured_not_raised() {
        let executor = ScriptedExecutor::new();
        executor.push_success("installed");
        executor.push_failure(2, "error TS2322: type mismatch");

        let outcome = runner(executor).build(Path::new("/tmp/p")).await;

        assert!(!outcome.success);
        assert!(outcome.errors.iter().any(|l| l.contains("TS2322")));
    }

    #[tokio::test]
    async fn test_commands_issued_in_order() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.push_success("");
        executor.push_success("");
        let runner = BuildRunner::with_timeout(executor.clone(), Duration::from_secs(1));

        let outcome = runner.build(Path::new("/tmp/p")).await;
        assert!(outcome.success);
        assert_eq!(
            executor.invocations(),
            vec![
                "npm install --ignore-scripts".to_string(),
                "npm run build".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_warning_lines_collected() {
        let executor = ScriptedExecutor::new();
        executor.push_success("");
        executor.push_output(crate::exec::CommandOutput {
            exit_code: Some(0),
            stdout: "Warning: large chunk size\nbuilt in 2s".to_string(),
            stderr: String::new(),
        });

        let outcome = runner(executor).build(Path::new("/tmp/p")).await;
        assert_eq!(outcome.warnings, vec!["Warning: large chunk size"]);
    }

    #[tokio::test]
    async fn test_test_counts_parsed() {
        let executor = ScriptedExecutor::new();
        executor.push_success("Tests  7 passed | 1 failed (8)");

        let outcome = runner(executor).test(Path::new("/tmp/p")).await;

        assert!(outcome.success);
        assert_eq!(outcome.passed_tests, 7);
        assert_eq!(outcome.failed_tests, 1);
        assert_eq!(outcome.total_tests, 8);
    }

    #[test]
    fn test_counts_ignore_test_files_line() {
        // Vitest prints file counts before the per-test summary
        let transcript = "RUN  v1.0.0\n\n Test Files  1 passed (1)\n      Tests  5 passed (5)\n";
        assert_eq!(parse_test_counts(transcript), (5, 0));

        let failing = " Test Files  1 failed (1)\n      Tests  2 failed | 3 passed (5)\n";
        assert_eq!(parse_test_counts(failing), (3, 2));

        // Jest-style summary with a colon
        let jest = "Test Suites: 1 passed, 1 total\nTests:       4 passed, 4 total\n";
        assert_eq!(parse_test_counts(jest), (4, 0));

        // No summary line at all falls back to scanning the transcript
        assert_eq!(parse_test_counts("7 passed, 1 failed"), (7, 1));
    }

    #[tokio::test]
    async fn test_test_exec_error_yields_failed_outcome() {
        let executor = ScriptedExecutor::new();
        // Queue empty: executor reports a spawn error

        let outcome = runner(executor).test(Path::new("/tmp/p")).await;
        assert!(!outcome.success);
        assert_eq!(outcome.total_tests, 0);
    }
}
