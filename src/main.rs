use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use code_assistant::{server, CodeAnalyzer, Config};

#[derive(Parser, Debug)]
#[command(name = "code-assistant")]
#[command(version = "0.1.0")]
#[command(about = "Explain, review and improve code snippets with an LLM over HTTP")]
struct Args {
    /// Address to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// LLM provider: claude, gemini or mock (overrides LLM_PROVIDER)
    #[arg(long)]
    provider: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("code_assistant=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    // Load environment variables
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(provider) = args.provider {
        // Re-read so provider-specific defaults and keys follow the override.
        config = Config::from_vars(|key| match key {
            "LLM_PROVIDER" => Some(provider.clone()),
            _ => std::env::var(key).ok(),
        })?;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let analyzer = CodeAnalyzer::from_config(&config)?;
    if analyzer.is_configured() {
        tracing::info!(
            "Using {} in {:?} mode with models {:?}",
            config.provider,
            config.mode,
            config.candidate_models()
        );
    } else {
        tracing::warn!(
            "{} not set; /analyze will fail until it is configured",
            config.provider.api_key_var().unwrap_or("API key")
        );
    }

    let listener = TcpListener::bind(config.bind_address()).await?;
    server::serve(listener, Arc::new(analyzer)).await?;

    Ok(())
}
