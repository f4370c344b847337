//! Narrow seams around the two external utilities this crate depends on.

use crate::error::DirectoryError;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// `getent` exit status for "one or more supplied keys could not be found".
pub const GETENT_KEY_NOT_FOUND: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Database {
    Passwd,
    Group,
}

impl Database {
    pub fn as_str(&self) -> &'static str {
        match self {
            Database::Passwd => "passwd",
            Database::Group => "group",
        }
    }
}

/// Result of a process that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStatus {
    pub success: bool,
    pub code: Option<i32>,
    /// Standard output followed by standard error.
    pub output: String,
}

#[async_trait]
pub trait Enumerator: Send + Sync {
    /// Returns the raw text of `database`, narrowed to `key` when given.
    async fn enumerate(&self, database: Database, key: Option<&str>)
        -> Result<String, DirectoryError>;
}

#[async_trait]
pub trait AccountTool: Send + Sync {
    /// Runs the creation utility with `args`. Errors only when it cannot be launched.
    async fn create(&self, args: &[String]) -> Result<CommandStatus, DirectoryError>;
}

pub struct Getent {
    program: String,
}

impl Getent {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Getent {
    fn default() -> Self {
        Self::new("getent")
    }
}

#[async_trait]
impl Enumerator for Getent {
    async fn enumerate(
        &self,
        database: Database,
        key: Option<&str>,
    ) -> Result<String, DirectoryError> {
        let mut args = vec![database.as_str()];
        if let Some(key) = key {
            args.push(key);
        }

        debug!(program = %self.program, ?args, "Querying directory service");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| DirectoryError::Launch {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DirectoryError::Exit {
                program: self.program.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| DirectoryError::InvalidOutput {
            program: self.program.clone(),
        })
    }
}

pub struct Useradd {
    program: String,
}

impl Useradd {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Useradd {
    fn default() -> Self {
        Self::new("useradd")
    }
}

#[async_trait]
impl AccountTool for Useradd {
    async fn create(&self, args: &[String]) -> Result<CommandStatus, DirectoryError> {
        debug!(program = %self.program, arg_count = args.len(), "Running account creation");

        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| DirectoryError::Launch {
                program: self.program.clone(),
                source,
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(CommandStatus {
            success: output.status.success(),
            code: output.status.code(),
            output: combined,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_pass_database_and_key_as_arguments() {
        let echo = Getent::new("echo");

        let all = echo.enumerate(Database::Passwd, None).await.unwrap();
        assert_eq!(all, "passwd\n");

        let one = echo.enumerate(Database::Group, Some("alice")).await.unwrap();
        assert_eq!(one, "group alice\n");
    }

    #[tokio::test]
    async fn should_report_non_zero_exit_as_error() {
        let failing = Getent::new("false");

        let error = failing.enumerate(Database::Passwd, None).await.unwrap_err();
        assert!(matches!(error, DirectoryError::Exit { .. }));
        assert_eq!(error.exit_code(), Some(1));
    }

    #[tokio::test]
    async fn should_report_missing_program_as_launch_error() {
        let missing = Getent::new("/nonexistent/getent");

        let error = missing.enumerate(Database::Passwd, None).await.unwrap_err();
        assert!(matches!(error, DirectoryError::Launch { .. }));
    }

    #[tokio::test]
    async fn should_capture_stdout_then_stderr_and_exit_status() {
        let shell = Useradd::new("sh");
        let args = vec![
            "-c".to_string(),
            "echo out; echo err >&2; exit 3".to_string(),
        ];

        let status = shell.create(&args).await.unwrap();

        assert!(!status.success);
        assert_eq!(status.code, Some(3));
        assert_eq!(status.output, "out\nerr\n");
    }

    #[tokio::test]
    async fn should_report_successful_creation() {
        let status = Useradd::new("true").create(&[]).await.unwrap();

        assert!(status.success);
        assert_eq!(status.code, Some(0));
        assert!(status.output.is_empty());
    }

    #[tokio::test]
    async fn should_fail_only_when_creation_tool_cannot_launch() {
        let result = Useradd::new("/nonexistent/useradd")
            .create(&["bob".to_string()])
            .await;

        assert!(matches!(result, Err(DirectoryError::Launch { .. })));
    }
}
