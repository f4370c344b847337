use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

pub const DEFAULT_SYSTEM_GID_THRESHOLD: u32 = 1000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address for the HTTP transport. Empty or missing selects stdio.
    #[serde(default)]
    pub http: Option<String>,
}

impl ServerConfig {
    pub fn with_env_overrides(&self) -> Self {
        self.with_http_override(env::var("USERADD_MCP_HTTP").ok())
    }

    pub fn with_http_override(&self, http: Option<String>) -> Self {
        Self {
            http: http.or_else(|| self.http.clone()),
        }
    }

    pub fn transport(&self) -> Transport {
        match self.http.as_deref().map(str::trim) {
            Some(addr) if !addr.is_empty() => Transport::Http(addr.to_string()),
            _ => Transport::Stdio,
        }
    }
}

/// Outcome of [`Config::load_from_env`].
#[derive(Debug)]
pub enum ConfigLoad {
    Loaded(Config),
    /// No path was configured and the default file does not exist.
    DefaultMissing,
    Failed { path: String, error: anyhow::Error },
}

/// How the server talks to its client. Fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    Stdio,
    Http(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default = "default_getent_path")]
    pub getent_path: String,
    #[serde(default = "default_useradd_path")]
    pub useradd_path: String,
    /// Accounts whose primary gid is below this value are reported as system accounts.
    #[serde(default = "default_system_gid_threshold")]
    pub system_gid_threshold: u32,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            getent_path: default_getent_path(),
            useradd_path: default_useradd_path(),
            system_gid_threshold: default_system_gid_threshold(),
        }
    }
}

fn default_getent_path() -> String {
    "getent".to_string()
}

fn default_useradd_path() -> String {
    "useradd".to_string()
}

fn default_system_gid_threshold() -> u32 {
    DEFAULT_SYSTEM_GID_THRESHOLD
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads from `CONFIG_PATH`, or from the default path when it is unset.
    pub fn load_from_env() -> ConfigLoad {
        Self::load_or_report(env::var("CONFIG_PATH").ok(), &Self::default_config_path())
    }

    fn load_or_report(config_path: Option<String>, default_path: &str) -> ConfigLoad {
        let path = match config_path {
            Some(path) => path,
            None if !Path::new(default_path).exists() => return ConfigLoad::DefaultMissing,
            None => default_path.to_string(),
        };

        match Self::load(Path::new(&path)) {
            Ok(config) => ConfigLoad::Loaded(config),
            Err(error) => ConfigLoad::Failed { path, error },
        }
    }

    pub fn default_config_path() -> String {
        "./config.toml".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL_CONFIG: &str = r#"
[server]
http = "127.0.0.1:8080"

[logging]
level = "debug"

[directory]
getent_path = "/usr/bin/getent"
useradd_path = "/usr/sbin/useradd"
system_gid_threshold = 500
"#;

    #[test]
    fn should_deserialize_config_from_toml() {
        let config: Config = toml::from_str(FULL_CONFIG).unwrap();

        assert_eq!(config.server.http.as_deref(), Some("127.0.0.1:8080"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.directory.getent_path, "/usr/bin/getent");
        assert_eq!(config.directory.useradd_path, "/usr/sbin/useradd");
        assert_eq!(config.directory.system_gid_threshold, 500);
    }

    #[test]
    fn should_fill_missing_sections_with_defaults() {
        let config: Config = toml::from_str("[logging]\nlevel = \"warn\"\n").unwrap();

        assert_eq!(config.server.http, None);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.directory, DirectoryConfig::default());
        assert_eq!(config.directory.system_gid_threshold, 1000);
    }

    #[test]
    fn should_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(FULL_CONFIG.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(
            config.server.transport(),
            Transport::Http("127.0.0.1:8080".to_string())
        );
    }

    #[test]
    fn should_load_config_with_env_path() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(FULL_CONFIG.as_bytes()).unwrap();
        let temp_path = temp_file.path().to_string_lossy().to_string();

        env::set_var("CONFIG_PATH", &temp_path);

        let ConfigLoad::Loaded(config) = Config::load_from_env() else {
            panic!("expected the config to load");
        };

        assert_eq!(config.directory.system_gid_threshold, 500);

        env::remove_var("CONFIG_PATH");
    }

    #[test]
    fn should_report_missing_default_file_quietly() {
        let dir = tempfile::tempdir().unwrap();
        let default_path = dir.path().join("config.toml");

        let outcome = Config::load_or_report(None, &default_path.to_string_lossy());

        assert!(matches!(outcome, ConfigLoad::DefaultMissing));
    }

    #[test]
    fn should_report_failure_for_missing_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let default_path = dir.path().join("config.toml");

        let outcome = Config::load_or_report(
            Some("/non/existent/path.toml".to_string()),
            &default_path.to_string_lossy(),
        );

        let ConfigLoad::Failed { path, .. } = outcome else {
            panic!("expected a load failure");
        };
        assert_eq!(path, "/non/existent/path.toml");
    }

    #[test]
    fn should_report_failure_for_invalid_default_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"invalid toml content [[[").unwrap();

        let outcome = Config::load_or_report(None, &temp_file.path().to_string_lossy());

        assert!(matches!(outcome, ConfigLoad::Failed { .. }));
    }

    #[test]
    fn should_use_default_config_path() {
        assert_eq!(Config::default_config_path(), "./config.toml");
    }

    #[test]
    fn should_return_error_for_missing_file() {
        let result = Config::load(Path::new("/non/existent/path.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn should_return_error_for_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"invalid toml content [[[").unwrap();

        let result = Config::load(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn should_select_stdio_when_http_is_missing_or_blank() {
        assert_eq!(ServerConfig { http: None }.transport(), Transport::Stdio);
        assert_eq!(
            ServerConfig {
                http: Some("".to_string())
            }
            .transport(),
            Transport::Stdio
        );
        assert_eq!(
            ServerConfig {
                http: Some("   ".to_string())
            }
            .transport(),
            Transport::Stdio
        );
    }

    #[test]
    fn should_let_override_replace_configured_address() {
        let server = ServerConfig {
            http: Some("127.0.0.1:8080".to_string()),
        };

        let overridden = server.with_http_override(Some("0.0.0.0:9000".to_string()));
        assert_eq!(
            overridden.transport(),
            Transport::Http("0.0.0.0:9000".to_string())
        );

        let kept = server.with_http_override(None);
        assert_eq!(kept, server);

        // An explicit empty override forces stdio.
        let forced = server.with_http_override(Some(String::new()));
        assert_eq!(forced.transport(), Transport::Stdio);
    }
}
