//! Catalog summary endpoint (home-page counters)

use axum::{extract::State, Json};

use crate::{error::AppResult, services::stats::CatalogSummary};

/// Get the catalog summary counters
///
/// Each request also bumps the persistent visit counter.
#[utoipa::path(
    get,
    path = "/summary",
    tag = "stats",
    responses(
        (status = 200, description = "Catalog summary", body = CatalogSummary)
    )
)]
pub async fn summary(State(state): State<crate::AppState>) -> AppResult<Json<CatalogSummary>> {
    let summary = state.services.stats.summary().await?;
    Ok(Json(summary))
}
