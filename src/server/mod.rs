pub mod handlers;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::analysis::CodeAnalyzer;
use crate::error::Result;

pub type AppState = Arc<CodeAnalyzer>;

pub fn router(analyzer: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/analyze", post(handlers::analyze))
        .with_state(analyzer)
}

/// Serves the API on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, analyzer: AppState) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Listening on http://{}", addr);
    }

    axum::serve(listener, router(analyzer))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
