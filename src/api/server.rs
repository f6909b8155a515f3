//! API server.
//!
//! Server setup, middleware stack, and graceful shutdown.

use super::{
    handlers::AppState,
    middleware::{create_cors_layer, request_id_middleware},
    routes::create_router,
};
use crate::config::ServerConfig;
use crate::engine::Engine;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

/// HTTP server wrapping the engine
pub struct ApiServer {
    config: ServerConfig,
    engine: Arc<Engine>,
}

impl ApiServer {
    pub fn new(config: ServerConfig, engine: Arc<Engine>) -> Self {
        Self { config, engine }
    }

    /// Start the API server and block until shutdown.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.create_app();
        let addr = self.socket_addr()?;

        info!("🚀 Starting Fairline API Server");
        info!("   Listen: http://{}", addr);
        info!("   Request timeout: {}s", self.config.request_timeout_secs);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("✅ API Server running");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("🛑 API Server stopped gracefully");
        Ok(())
    }

    /// Create the application with the middleware stack.
    pub fn create_app(&self) -> axum::Router {
        let state = Arc::new(AppState {
            engine: self.engine.clone(),
        });

        create_router(state).layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    self.config.request_timeout_secs,
                )))
                .layer(create_cors_layer(self.config.allowed_origins.clone()))
                .layer(axum::middleware::from_fn(request_id_middleware)),
        )
    }

    fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.config.host, self.config.port).parse()
    }
}

/// Resolve on ctrl-c or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
