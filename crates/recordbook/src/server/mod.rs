//! HTTP surface for recordbook.
//!
//! Routes:
//!
//! | Method   | Path                | Handler                          |
//! |----------|---------------------|----------------------------------|
//! | `GET`    | `/`                 | [`handlers::records_page`]       |
//! | `GET`    | `/api/records`      | [`handlers::list_records`]       |
//! | `POST`   | `/api/records`      | [`handlers::create_record`]      |
//! | `GET`    | `/api/records/{id}` | [`handlers::get_record`]         |
//! | `DELETE` | `/api/records/{id}` | [`handlers::delete_record`]      |

mod error;
pub mod handlers;

use std::net::SocketAddr;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::storage::RecordStore;

pub use error::ApiError;

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The record store.
    pub store: RecordStore,
}

impl AppState {
    /// Wrap a store for use by the router.
    #[must_use]
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::records_page))
        .route(
            "/api/records",
            get(handlers::list_records).post(handlers::create_record),
        )
        .route(
            "/api/records/{id}",
            get(handlers::get_record).delete(handlers::delete_record),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API on `addr` until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn serve(store: RecordStore, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| Error::ServerBind {
            addr: addr.to_string(),
            source,
        })?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(AppState::new(store)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not install Ctrl-C handler: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
