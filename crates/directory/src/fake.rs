//! In-memory stand-ins for `getent` and `useradd`.

use crate::command::{AccountTool, CommandStatus, Database, Enumerator, GETENT_KEY_NOT_FOUND};
use crate::error::DirectoryError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum FakeResponse {
    Output(String),
    Exit(i32),
    Unlaunchable,
}

/// Answers queries from canned text. Queries nobody configured behave like
/// `getent` on a missing key and exit with status 2.
#[derive(Debug, Default)]
pub struct FakeEnumerator {
    responses: HashMap<(Database, Option<String>), FakeResponse>,
    calls: Mutex<Vec<(Database, Option<String>)>>,
}

impl FakeEnumerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, database: Database, key: Option<&str>, text: &str) -> Self {
        self.responses.insert(
            (database, key.map(str::to_string)),
            FakeResponse::Output(text.to_string()),
        );
        self
    }

    pub fn with_exit(mut self, database: Database, key: Option<&str>, code: i32) -> Self {
        self.responses
            .insert((database, key.map(str::to_string)), FakeResponse::Exit(code));
        self
    }

    pub fn with_launch_failure(mut self, database: Database, key: Option<&str>) -> Self {
        self.responses.insert(
            (database, key.map(str::to_string)),
            FakeResponse::Unlaunchable,
        );
        self
    }

    pub fn calls(&self) -> Vec<(Database, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Enumerator for FakeEnumerator {
    async fn enumerate(
        &self,
        database: Database,
        key: Option<&str>,
    ) -> Result<String, DirectoryError> {
        let query = (database, key.map(str::to_string));
        self.calls.lock().unwrap().push(query.clone());

        match self.responses.get(&query) {
            Some(FakeResponse::Output(text)) => Ok(text.clone()),
            Some(FakeResponse::Exit(code)) => Err(exit_error(*code)),
            Some(FakeResponse::Unlaunchable) => Err(DirectoryError::Launch {
                program: "getent".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "fake launch failure"),
            }),
            None => Err(exit_error(GETENT_KEY_NOT_FOUND)),
        }
    }
}

fn exit_error(code: i32) -> DirectoryError {
    DirectoryError::Exit {
        program: "getent".to_string(),
        code: Some(code),
        stderr: String::new(),
    }
}

/// Records every argument list and replies with a fixed status.
#[derive(Debug)]
pub struct FakeAccountTool {
    reply: Option<CommandStatus>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeAccountTool {
    pub fn succeeding(output: &str) -> Self {
        Self::replying(CommandStatus {
            success: true,
            code: Some(0),
            output: output.to_string(),
        })
    }

    pub fn failing(code: i32, output: &str) -> Self {
        Self::replying(CommandStatus {
            success: false,
            code: Some(code),
            output: output.to_string(),
        })
    }

    pub fn unlaunchable() -> Self {
        Self {
            reply: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn replying(status: CommandStatus) -> Self {
        Self {
            reply: Some(status),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AccountTool for FakeAccountTool {
    async fn create(&self, args: &[String]) -> Result<CommandStatus, DirectoryError> {
        self.calls.lock().unwrap().push(args.to_vec());

        self.reply.clone().ok_or_else(|| DirectoryError::Launch {
            program: "useradd".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "fake launch failure"),
        })
    }
}
