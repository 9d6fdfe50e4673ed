use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::state::AppState;
use crate::store::StoreStats;

/// GET /api/v1/stats
/// Row counts and whether a master résumé is currently set.
pub async fn handle_get_stats(State(state): State<AppState>) -> Result<Json<StoreStats>, AppError> {
    Ok(Json(state.store.get_stats().await?))
}
