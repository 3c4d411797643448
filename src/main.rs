use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use insta_api::app::{app, AppState};
use insta_api::config::{self, AppConfig};
use insta_api::database::MongoStore;

#[derive(Parser)]
#[command(name = "insta-api")]
#[command(about = "Users and posts JSON API backed by MongoDB")]
#[command(version)]
struct Args {
    #[arg(long, help = "Address to listen on, e.g. 0.0.0.0:8081 (overrides BIND_ADDRESS/PORT)")]
    bind: Option<String>,

    #[arg(long, help = "MongoDB connection URI (overrides MONGODB_URI)")]
    mongodb_uri: Option<String>,

    #[arg(long, help = "Database name (overrides MONGODB_DATABASE)")]
    database: Option<String>,
}

impl Args {
    fn apply(self, mut config: AppConfig) -> AppConfig {
        if let Some(bind) = self.bind {
            config.server.bind_address = bind;
        }
        if let Some(uri) = self.mongodb_uri {
            config.database.uri = uri;
        }
        if let Some(name) = self.database {
            config.database.name = name;
        }
        config
    }
}

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up MONGODB_URI, BIND_ADDRESS, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("insta_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let config = args.apply(config::config().clone());

    if let Err(e) = run(config).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    info!("Starting insta-api in {:?} mode", config.environment);

    // There is no fallback data path, so an unreachable store halts startup
    let store = MongoStore::connect(&config.database)
        .await
        .context("document store unreachable")?;

    let bind_addr = config.server.bind_address.clone();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!(
        "insta-api listening on http://{} (database '{}')",
        listener.local_addr()?,
        store.database_name()
    );

    let state = AppState::new(Arc::new(store.clone()), config);
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}
