//! `sdrbot` — lead-qualification chatbot.
//!
//! Two entry points over the same library crates: `serve` runs the HTTP API,
//! `chat` runs the guided command-line dialogue.

mod chat;

use clap::{Parser, Subcommand};
use sdrbot_llm::{LlmClient, ModelConfig};
use sdrbot_server::{spawn_expiry_sweep, ApiServer, AppState};
use sdrbot_session::MemorySessionStore;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sdrbot", about = "sdrbot — AI SDR lead-qualification bot")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "sdrbot.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the qualification API server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run the guided intake dialogue on the terminal
    Chat,
}

#[derive(Deserialize, Default)]
struct SdrbotConfig {
    #[serde(default)]
    model: ModelConfig,
    #[serde(default)]
    server: ServerConfig,
}

#[derive(Deserialize)]
struct ServerConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    /// Sessions idle longer than this are expired.
    #[serde(default = "default_session_ttl_secs")]
    session_ttl_secs: u64,
    /// How often the expiry sweep runs.
    #[serde(default = "default_sweep_interval_secs")]
    sweep_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_ttl_secs: default_session_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_session_ttl_secs() -> u64 {
    30 * 60
}
fn default_sweep_interval_secs() -> u64 {
    60
}

/// Loads the config file if present, then lets `OPENROUTER_API_KEY` override
/// the credential.
async fn load_config(path: &PathBuf) -> anyhow::Result<SdrbotConfig> {
    let mut config = if path.exists() {
        let config_str = tokio::fs::read_to_string(path).await.map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;
        toml::from_str(&config_str)?
    } else {
        SdrbotConfig::default()
    };

    if let Ok(key) = std::env::var("OPENROUTER_API_KEY") {
        if !key.is_empty() {
            config.model.api_key = key;
        }
    }
    Ok(config)
}

/// Converts the configured idle TTL into a [`chrono::Duration`], saturating
/// instead of truncating when the value exceeds what chrono can represent.
fn session_ttl(secs: u64) -> chrono::Duration {
    i64::try_from(secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .unwrap_or(chrono::Duration::MAX)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the chat dialogue owns stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(&cli.config).await?;
    let llm = Arc::new(LlmClient::new(config.model));

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);

            let sessions = Arc::new(MemorySessionStore::new());
            let state = AppState::new(llm, sessions);

            spawn_expiry_sweep(
                state.sessions.clone(),
                state.locks.clone(),
                session_ttl(config.server.session_ttl_secs),
                std::time::Duration::from_secs(config.server.sweep_interval_secs),
            );

            let app = ApiServer::build(state);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!("sdrbot API listening on {}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Chat => {
            let mut input = std::io::stdin().lock();
            let mut output = std::io::stdout();
            chat::run_guided_intake(&mut input, &mut output, llm.as_ref()).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ttl_ordinary_value() {
        assert_eq!(session_ttl(1800), chrono::Duration::seconds(1800));
    }

    #[test]
    fn test_session_ttl_saturates_on_absurd_values() {
        // Must not truncate or panic.
        assert_eq!(session_ttl(u64::MAX), chrono::Duration::MAX);
        let huge = session_ttl(i64::MAX as u64);
        assert!(huge > chrono::Duration::days(365));
    }
}
