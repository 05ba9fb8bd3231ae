//! Router construction and server startup.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, put};
use tasklane::storage::TaskStore;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Shared application state.
pub struct AppState {
    /// The task store; writers hold the lock across validate, apply and save.
    pub store: RwLock<Box<dyn TaskStore>>,
}

impl AppState {
    /// Wrap a store for sharing between handlers.
    pub fn new(store: Box<dyn TaskStore>) -> Self {
        Self {
            store: RwLock::new(store),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &"<dyn TaskStore>")
            .finish()
    }
}

/// Build the `/api` router.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route("/tasks/:id", get(handlers::get_task).delete(handlers::delete_task))
        .route("/tasks/:id/dependencies", put(handlers::set_dependencies))
        .route("/analysis", get(handlers::analysis))
        .route("/graph", get(handlers::graph))
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(store: Box<dyn TaskStore>, addr: &str) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(store));
    let app = router(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
