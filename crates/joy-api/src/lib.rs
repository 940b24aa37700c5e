//! Read-only HTTP API over the uploaded episode collection.

mod error;
pub mod filters;
mod routes;
mod state;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tracing::info;

pub use error::ApiError;
pub use filters::{EpisodeFilter, FilterError, FilterParams, MatchMode, MonthRange};
pub use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/episodes/filterName", get(routes::get_by_name))
        .route("/episodes/filter", get(routes::filter))
        .route("/episodes/{id}", get(routes::get_by_id))
        .with_state(Arc::new(state))
}

pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    info!(
        addr = %listener.local_addr()?,
        collection = state.collection(),
        "listening"
    );
    axum::serve(listener, router(state)).await
}
