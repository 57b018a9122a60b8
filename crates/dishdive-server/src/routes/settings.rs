//! User taste settings.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use dishdive_recommend::SettingsUpdate;

use crate::routes::error_response;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/users/{id}/settings", get(get_settings).put(update_settings))
}

/// GET /api/users/{id}/settings
async fn get_settings(State(state): State<Arc<AppState>>, Path(user_id): Path<i64>) -> impl IntoResponse {
    match state.settings.get(user_id) {
        Ok(settings) => Json(serde_json::json!(settings)).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

/// PUT /api/users/{id}/settings with explicit values plus English group lists.
async fn update_settings(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Json(update): Json<SettingsUpdate>,
) -> impl IntoResponse {
    match state.settings.update(user_id, &update) {
        Ok(updated) => Json(serde_json::json!({ "success": true, "updated": updated })).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}
