//! Fluent builder for invoking `cargo expand`.
//!
//! A thin, type-safe wrapper over [`tokio::process::Command`] that captures
//! combined stdout/stderr and reports what the tool said without judging it:
//! a nonzero exit is still a successful *capture*, because the rendered
//! document is whatever cargo-expand printed. Only spawn-level failures (no
//! binary, no permissions) and timeouts surface as errors.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::core::ExpandError;

/// Captured result of one external `cargo expand` invocation.
#[derive(Debug, Clone)]
pub struct ExpandOutput {
    /// Captured standard output (lossy UTF-8)
    pub stdout: String,
    /// Captured standard error (lossy UTF-8)
    pub stderr: String,
    /// Whether the process exited with status zero
    pub success: bool,
    /// The raw exit code, if the process exited normally
    pub exit_code: Option<i32>,
}

impl ExpandOutput {
    /// The text rendered as the document body: stdout when the tool produced
    /// any, otherwise its error output.
    pub fn body(&self) -> &str {
        if self.stdout.trim().is_empty() { &self.stderr } else { &self.stdout }
    }

    /// Warnings captured alongside a usable expansion.
    ///
    /// cargo-expand writes the expansion to stdout and compiler warnings to
    /// stderr; when stderr *is* the body (the tool produced nothing else)
    /// there is nothing separate to report.
    pub fn warnings(&self) -> Option<&str> {
        if self.stdout.trim().is_empty() || self.stderr.trim().is_empty() {
            None
        } else {
            Some(&self.stderr)
        }
    }
}

/// Builder for one `cargo expand` process invocation.
///
/// # Examples
///
/// ```rust,no_run
/// use rustexpand::expand::CargoCommand;
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// let output = CargoCommand::from_line("cargo expand inner::thing")?
///     .current_dir(Path::new("/proj"))
///     .execute()
///     .await?;
/// println!("{}", output.body());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CargoCommand {
    /// Resolved path to the program binary
    program: PathBuf,
    /// The original command line, kept for logging and error messages
    line: String,
    /// Arguments passed to the program
    args: Vec<String>,
    /// Working directory for the process
    current_dir: Option<PathBuf>,
    /// Maximum duration to wait (None = no timeout, the default)
    timeout_duration: Option<Duration>,
}

impl CargoCommand {
    /// Build a command from a full command line such as
    /// `cargo expand foo::bar`.
    ///
    /// The command line is split on whitespace; the first token is resolved
    /// through `PATH`.
    ///
    /// # Errors
    ///
    /// - [`ExpandError::EmptyCommand`] for a blank line
    /// - [`ExpandError::CargoNotFound`] when `cargo` is not on the `PATH`
    /// - [`ExpandError::CommandFailed`] when some other program is named and
    ///   cannot be found
    pub fn from_line(line: &str) -> Result<Self> {
        let mut tokens = line.split_whitespace();
        let program = tokens.next().ok_or(ExpandError::EmptyCommand)?;
        let args: Vec<String> = tokens.map(str::to_string).collect();

        let resolved = which::which(program).map_err(|_| {
            if program == "cargo" {
                ExpandError::CargoNotFound
            } else {
                ExpandError::CommandFailed {
                    command: line.to_string(),
                    reason: format!("{program} not found in PATH"),
                }
            }
        })?;

        Ok(Self {
            program: resolved,
            line: line.to_string(),
            args,
            current_dir: None,
            timeout_duration: None,
        })
    }

    /// Set the working directory for the process.
    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set an optional timeout. The default is none: a hung expansion blocks
    /// only this one invocation.
    #[must_use]
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Run the process and capture its output.
    ///
    /// A nonzero exit status is *not* an error here; the caller renders the
    /// captured text either way. The one exception is a missing `cargo
    /// expand` subcommand, which is a setup problem reported as
    /// [`ExpandError::CargoExpandMissing`].
    pub async fn execute(self) -> Result<ExpandOutput> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.stdin(Stdio::null());

        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
            tracing::debug!(target: "expand", "Executing '{}' in {}", self.line, dir.display());
        } else {
            tracing::debug!(target: "expand", "Executing '{}'", self.line);
        }

        let output_future = cmd.output();
        let output = if let Some(duration) = self.timeout_duration {
            match timeout(duration, output_future).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(
                        target: "expand",
                        "'{}' timed out after {} seconds",
                        self.line,
                        duration.as_secs()
                    );
                    return Err(ExpandError::CommandFailed {
                        command: self.line,
                        reason: format!("timed out after {} seconds", duration.as_secs()),
                    }
                    .into());
                }
            }
        } else {
            output_future.await
        }
        .map_err(|e| ExpandError::CommandFailed {
            command: self.line.clone(),
            reason: e.to_string(),
        })
        .with_context(|| "failed to run the expansion tool".to_string())?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let success = output.status.success();

        if !success {
            tracing::debug!(
                target: "expand",
                "'{}' exited with {:?}",
                self.line,
                output.status.code()
            );
            // `cargo` without the expand subcommand installed is a setup
            // problem, not tool output worth rendering.
            if stderr.contains("no such command") || stderr.contains("no such subcommand") {
                return Err(ExpandError::CargoExpandMissing.into());
            }
        }

        Ok(ExpandOutput {
            stdout,
            stderr,
            success,
            exit_code: output.status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_line_rejects_empty() {
        let err = CargoCommand::from_line("   ").unwrap_err();
        let err = err.downcast::<ExpandError>().unwrap();
        assert!(matches!(err, ExpandError::EmptyCommand));
    }

    #[test]
    fn test_from_line_unknown_program() {
        let err = CargoCommand::from_line("definitely-not-a-real-binary-7f3a foo").unwrap_err();
        let err = err.downcast::<ExpandError>().unwrap();
        assert!(matches!(err, ExpandError::CommandFailed { .. }));
    }

    #[test]
    fn test_body_prefers_stdout() {
        let output = ExpandOutput {
            stdout: "fn expanded() {}\n".to_string(),
            stderr: "warning: unused variable\n".to_string(),
            success: true,
            exit_code: Some(0),
        };
        assert_eq!(output.body(), "fn expanded() {}\n");
        assert_eq!(output.warnings(), Some("warning: unused variable\n"));
    }

    #[test]
    fn test_body_falls_back_to_stderr() {
        let output = ExpandOutput {
            stdout: String::new(),
            stderr: "error[E0433]: failed to resolve\n".to_string(),
            success: false,
            exit_code: Some(101),
        };
        assert_eq!(output.body(), "error[E0433]: failed to resolve\n");
        assert_eq!(output.warnings(), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_captures_nonzero_exit() {
        // `false` exists on every Unix and exits 1 with no output
        let output = CargoCommand::from_line("false").unwrap().execute().await.unwrap();
        assert!(!output.success);
        assert_eq!(output.exit_code, Some(1));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_runs_in_working_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = CargoCommand::from_line("pwd")
            .unwrap()
            .current_dir(dir.path())
            .execute()
            .await
            .unwrap();
        assert!(output.success);
        // Compare canonicalized paths; macOS tempdirs live behind symlinks
        let reported = std::path::Path::new(output.stdout.trim()).canonicalize().unwrap();
        assert_eq!(reported, dir.path().canonicalize().unwrap());
    }
}
