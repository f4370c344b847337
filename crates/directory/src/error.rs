use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {}: {stderr}", describe_exit_code(.code))]
    Exit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("'{program}' produced output that is not valid UTF-8")]
    InvalidOutput { program: String },
}

impl DirectoryError {
    /// Exit code of the external utility, if it ran to completion.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            DirectoryError::Exit { code, .. } => *code,
            _ => None,
        }
    }
}

fn describe_exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_format_exit_error_with_code() {
        let error = DirectoryError::Exit {
            program: "getent".to_string(),
            code: Some(2),
            stderr: "".to_string(),
        };

        assert_eq!(error.to_string(), "'getent' exited with status 2: ");
        assert_eq!(error.exit_code(), Some(2));
    }

    #[test]
    fn should_format_exit_error_without_code() {
        let error = DirectoryError::Exit {
            program: "useradd".to_string(),
            code: None,
            stderr: "killed".to_string(),
        };

        assert!(error.to_string().contains("terminated by signal"));
        assert_eq!(error.exit_code(), None);
    }

    #[test]
    fn should_format_launch_error() {
        let error = DirectoryError::Launch {
            program: "getent".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file"),
        };

        assert!(error.to_string().contains("Failed to launch 'getent'"));
        assert!(error.to_string().contains("No such file"));
        assert_eq!(error.exit_code(), None);
    }
}
