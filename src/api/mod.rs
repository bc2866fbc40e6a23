//! REST API over the shared micro-grid state.
//!
//! Endpoints:
//! - `GET /state`: full snapshot of the last completed tick
//! - `GET /devices`: device inventory with on/off state
//! - `POST /devices/{id}/{action}`: switch a device `on` or `off`

mod handlers;
mod types;

use std::future::Future;
use std::io;
use std::net::SocketAddr;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::sim::manager::SharedGrid;

pub use types::ErrorResponse;

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `grid` - Handle to the shared energy manager
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(grid: SharedGrid) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/devices", get(handlers::list_devices))
        .route("/devices/{id}/{action}", post(handlers::command_device))
        .with_state(grid)
        .layer(TraceLayer::new_for_http())
}

/// Binds to `addr` and serves the API until `shutdown` resolves.
///
/// # Errors
///
/// Returns an I/O error if the listener cannot bind or the server fails.
pub async fn serve(
    grid: SharedGrid,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(grid))
        .with_graceful_shutdown(shutdown)
        .await
}
