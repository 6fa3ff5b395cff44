//! Tag endpoints

use axum::{extract::State, routing::get, Json, Router};

use crate::http::error::ApiError;
use crate::http::server::AppState;

/// GET /tags - every known tag name (unordered)
async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let names = state.store.list_all_tag_names().await?;
    Ok(Json(names))
}

/// Tag routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tags", get(list_tags))
        .route("/tags/", get(list_tags))
}
