use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use api_rest::{AppState, router};
use hms_core::config::{
    data_dir_from_env_value, port_from_env_value, request_timeout_from_env_value,
};
use hms_core::{CoreConfig, DocumentStore, store};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Address the HTTP server binds to for `port`.
fn listen_addr(port: u16) -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, port))
}

/// Main entry point for the HMS service
///
/// Resolves configuration from the environment (and `.env`), opens the document store and
/// serves the REST API until the process is stopped.
///
/// # Environment Variables
/// - `PORT`: listen port (default: 8001)
/// - `SECRET_KEY`: token signing secret (required)
/// - `REQUEST_TIMEOUT_SECS`: per-request store deadline (default: 100)
/// - `HMS_DATA_DIR`: root of the JSON file store; in-memory store when unset
/// - `RUST_LOG`: tracing filter
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - any configuration value is missing or invalid,
/// - the data directory cannot be opened,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hms_run=info".parse()?)
                .add_directive("hms_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port = port_from_env_value(std::env::var("PORT").ok())?;
    let request_timeout =
        request_timeout_from_env_value(std::env::var("REQUEST_TIMEOUT_SECS").ok())?;
    let data_dir = data_dir_from_env_value(std::env::var("HMS_DATA_DIR").ok());
    let secret = std::env::var("SECRET_KEY").context("SECRET_KEY must be set")?;

    let cfg = Arc::new(CoreConfig::new(secret, request_timeout, data_dir)?);
    let store = store::open(&cfg).await?;
    tracing::info!(
        "++ Using {} document store (request timeout {:?})",
        store.backend_name(),
        cfg.request_timeout()
    );

    let app = router(AppState::new(cfg, store));

    let addr = listen_addr(port);
    tracing::info!("++ Starting HMS REST on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
