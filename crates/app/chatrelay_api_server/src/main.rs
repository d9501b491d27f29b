//! Chat relay server binary.
//!
//! Hosts the relay router. The Gemini API key is read from the environment on
//! every request, so it can be set or rotated while the server runs.

use std::future::Future;

use chatrelay_api::config::ApiConfig;
use clap::Parser;
use tracing::{error, info, warn};

/// CLI arguments for the relay server.
///
/// Each flag overrides the matching environment variable read by
/// [`ApiConfig::from_env`].
#[derive(Parser, Debug, Default)]
#[command(name = "chatrelay_api_server", about = "Chat relay server")]
struct Args {
    /// Address to listen on [env: BIND_ADDR].
    #[arg(long)]
    bind_addr: Option<String>,

    /// Base URL of the Gemini API [env: GEMINI_BASE_URL].
    #[arg(long)]
    upstream_base_url: Option<String>,

    /// Gemini model name [env: GEMINI_MODEL].
    #[arg(long)]
    model: Option<String>,

    /// Name of the environment variable holding the Gemini API key [env: GEMINI_API_KEY_VAR].
    #[arg(long)]
    api_key_var: Option<String>,
}

impl Args {
    fn apply(self, mut config: ApiConfig) -> ApiConfig {
        if let Some(v) = self.bind_addr {
            config.bind_addr = v;
        }
        if let Some(v) = self.upstream_base_url {
            config.upstream_base_url = v;
        }
        if let Some(v) = self.model {
            config.model = v;
        }
        if let Some(v) = self.api_key_var {
            config.api_key_var = v;
        }
        config
    }
}

/// Resolves when `signal` fires. If the handler could not be installed the
/// error is logged and this never resolves, so the server keeps running.
async fn shutdown_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "info,chatrelay_api=debug,chatrelay_core=debug,tower_http=debug",
                )
            }),
        )
        .init();

    let config = Args::parse().apply(ApiConfig::from_env());

    info!(
        upstream = %config.upstream_base_url,
        model = %config.model,
        "starting chatrelay_api_server"
    );
    if std::env::var(&config.api_key_var).map_or(true, |v| v.is_empty()) {
        warn!(
            var = %config.api_key_var,
            "API key is not set; replies will ask an administrator to configure it"
        );
    }

    let state = chatrelay_api::AppState::from_config(config.clone())?;
    let app = chatrelay_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "relay listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(tokio::signal::ctrl_c()))
        .await?;

    Ok(())
}
