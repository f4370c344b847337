pub mod config;

pub use config::{Config, ConfigLoad, DirectoryConfig, LoggingConfig, ServerConfig, Transport};
