use std::collections::HashSet;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use futures::future::try_join_all;
use joy_processing::{Episode, fields};
use joy_store::{FilterOp, Query as StoreQuery};
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;
use crate::filters::{EpisodeFilter, FilterParams};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NameParams {
    pub name: Option<String>,
}

pub async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Episode>, ApiError> {
    let document = state
        .store()
        .get_document(state.collection(), &id)
        .await?
        .ok_or(ApiError::EpisodeNotFound)?;

    Ok(Json(Episode::from_document(&id, &document)?))
}

/// Exact title match. Titles are expected to be unique; the lowest id wins otherwise.
pub async fn get_by_name(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NameParams>,
) -> Result<Json<Episode>, ApiError> {
    let name = params
        .name
        .filter(|name| !name.is_empty())
        .ok_or(ApiError::MissingName)?;

    let query = StoreQuery::new()
        .filter(fields::TITLE, FilterOp::Equal, name.as_str())
        .limit(1);
    let found = state.store().query(state.collection(), &query).await?;
    let document = found.into_iter().next().ok_or(ApiError::EpisodeNotFound)?;

    Ok(Json(Episode::from_document(&document.id, &document.fields)?))
}

pub async fn filter(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<Episode>>, ApiError> {
    let filter = EpisodeFilter::from_params(&params)?;
    let queries = filter.queries();
    debug!(mode = ?filter.mode, queries = queries.len(), "running episode filter");

    let batches = try_join_all(
        queries
            .iter()
            .map(|query| state.store().query(state.collection(), query)),
    )
    .await?;

    let mut seen = HashSet::new();
    let mut episodes = Vec::new();
    for document in batches.into_iter().flatten() {
        if seen.insert(document.id.clone()) {
            episodes.push(Episode::from_document(&document.id, &document.fields)?);
        }
    }

    if episodes.is_empty() {
        return Err(ApiError::NoMatches);
    }
    Ok(Json(episodes))
}
