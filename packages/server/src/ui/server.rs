//! HTTP / WebSocket bridge server.

use std::{
    future::Future,
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::{Router, routing::get};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::{
    handler::{debug_registry, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Build the bridge router. Unknown paths fall back to `static_dir` when given.
pub fn router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let app = Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/debug/registry", get(debug_registry))
        .with_state(state);

    let app = match static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app,
    };

    app.layer(TraceLayer::new_for_http())
}

/// HTTP / WebSocket bridge in front of the server actor
///
/// # Example
///
/// ```ignore
/// let server = Server::new(state, config.static_dir.clone());
/// server.run(config.listen_address).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    static_dir: Option<PathBuf>,
}

impl Server {
    pub fn new(state: Arc<AppState>, static_dir: Option<PathBuf>) -> Self {
        Self { state, static_dir }
    }

    /// Bind `listen_address` and serve until Ctrl+C / SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or serving fails.
    pub async fn run(self, listen_address: SocketAddr) -> Result<(), ServerError> {
        let listener = TcpListener::bind(listen_address)
            .await
            .map_err(|source| ServerError::Bind {
                addr: listen_address,
                source,
            })?;

        tracing::info!("HTTP bridge listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", listen_address);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = router(self.state, self.static_dir.as_deref());
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await?;
        Ok(())
    }
}
