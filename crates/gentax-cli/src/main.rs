//! The `gentax` binary: configuration loading and service wiring.

use gentax_agent::{ChatRunner, ModelConfig};
use gentax_gateway::{build_router, AppState};
use gentax_retrieval::{HttpRetriever, NoRetriever, Retriever};
use gentax_session::{FileSessionStore, SessionStore};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gentax", about = "GenTax — AI-powered Indian tax assistant")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "gentax.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Inspect persisted sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// List persisted sessions and their transcript lengths
    List,
}

#[derive(Deserialize)]
struct GentaxConfig {
    #[serde(default)]
    model: ModelConfig,
    #[serde(default = "default_data_dir")]
    data_dir: PathBuf,
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    retrieval: RetrievalConfig,
}

impl Default for GentaxConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            data_dir: default_data_dir(),
            server: ServerConfig::default(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

#[derive(Deserialize)]
struct ServerConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_static_dir")]
    static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

#[derive(Deserialize, Default)]
struct RetrievalConfig {
    /// URL of the external retrieval API; retrieval is disabled when unset.
    endpoint: Option<String>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_static_dir() -> PathBuf {
    PathBuf::from("./static")
}

const SERVICE_NAME: &str = "GenTax Chatbot";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let cli = Cli::parse();

    let config: GentaxConfig = if cli.config.exists() {
        let config_str = tokio::fs::read_to_string(&cli.config).await.map_err(|e| {
            anyhow::anyhow!(
                "Failed to read config file '{}': {}",
                cli.config.display(),
                e
            )
        })?;
        toml::from_str(&config_str)?
    } else {
        info!(path = %cli.config.display(), "No config file, using defaults");
        GentaxConfig::default()
    };

    match cli.command {
        Commands::Serve { host, port } => serve(config, host, port).await,
        Commands::Session { action } => match action {
            SessionAction::List => list_sessions(config).await,
        },
    }
}

async fn serve(config: GentaxConfig, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let host = host
        .or_else(|| std::env::var("HOST").ok())
        .unwrap_or(config.server.host);
    let port = port
        .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
        .unwrap_or(config.server.port);

    let mut model = config.model;
    if let Ok(key) = std::env::var("GROQ_API_KEY") {
        if !key.is_empty() {
            model.api_key = key;
        }
    }
    if model.api_key.is_empty() {
        anyhow::bail!(
            "GROQ_API_KEY not found in environment variables (and no [model] api_key in config)"
        );
    }
    if let Ok(model_id) = std::env::var("GROQ_MODEL") {
        if !model_id.is_empty() {
            model.model_id = model_id;
        }
    }

    info!(model_id = %model.model_id, "Starting GenTax gateway on {}:{}", host, port);

    let sessions = Arc::new(FileSessionStore::load(config.data_dir.join("sessions.json")).await?);
    info!(sessions = sessions.len().await, "Session store ready");

    let retriever: Arc<dyn Retriever> = match config.retrieval.endpoint {
        Some(endpoint) => {
            info!(endpoint = %endpoint, "Knowledge retrieval enabled");
            Arc::new(HttpRetriever::new(endpoint))
        }
        None => {
            info!("No retrieval endpoint configured, answering without context");
            Arc::new(NoRetriever)
        }
    };

    let runner = Arc::new(ChatRunner::new(model, retriever, sessions));
    let state = Arc::new(AppState {
        runner,
        service: SERVICE_NAME.to_string(),
        static_dir: config.server.static_dir,
    });
    let app = build_router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("GenTax gateway listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn list_sessions(config: GentaxConfig) -> anyhow::Result<()> {
    let store = FileSessionStore::load(config.data_dir.join("sessions.json")).await?;

    let mut ids = store.session_ids().await;
    if ids.is_empty() {
        println!("No sessions recorded.");
        return Ok(());
    }
    ids.sort();

    println!("Recorded sessions:");
    for id in &ids {
        let turns = store.transcript(id).await.map(|t| t.len()).unwrap_or(0);
        println!("  {id} — {turns} turn(s)");
    }
    println!("\nTotal: {} session(s)", ids.len());

    Ok(())
}
