//! graphwalk REST API server.

use graph_api::config::ApiConfig;
use graph_api::repository::JsonFileGraphRepository;
use graph_api::server::{self, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env();
    let state = Arc::new(AppState {
        repository: Arc::new(JsonFileGraphRepository::new(&config.data_file)),
    });

    let app = server::router(state);
    let addr: SocketAddr = config.listen.parse()?;
    tracing::info!(data_file = %config.data_file.display(), "graphwalk API listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(addr).await?,
        app.into_make_service(),
    )
    .await?;
    Ok(())
}
