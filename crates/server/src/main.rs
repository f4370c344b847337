use anyhow::Context;
use clap::Parser;
use server::{build_tools, http, stdio};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use useradd_core::{Config, ConfigLoad, Transport};

/// MCP server exposing user account listing and creation.
#[derive(Parser, Debug)]
#[command(name = "useradd-mcp", version)]
struct Args {
    /// Serve over HTTP on this address instead of stdio
    #[arg(long, value_name = "ADDR")]
    http: Option<String>,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries protocol traffic in stdio mode
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // An explicit --config must load; the environment path only warns.
    let outcome = match &args.config {
        Some(path) => ConfigLoad::Loaded(
            Config::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
        ),
        None => Config::load_from_env(),
    };

    let mut config = match &outcome {
        ConfigLoad::Loaded(config) => config.clone(),
        _ => Config::default(),
    };

    init_logging(&config.logging.level);
    match outcome {
        ConfigLoad::Loaded(_) => {}
        ConfigLoad::DefaultMissing => debug!(
            path = %Config::default_config_path(),
            "No config file found, using defaults"
        ),
        ConfigLoad::Failed { path, error } => {
            warn!(%path, error = %error, "Could not load config, using defaults")
        }
    }

    config.server = config.server.with_env_overrides().with_http_override(args.http);

    info!("Starting useradd MCP server");
    let tools = build_tools(&config);

    match config.server.transport() {
        Transport::Stdio => stdio::serve_stdio(tools).await,
        Transport::Http(addr) => http::serve_http(tools, &addr).await,
    }
}
