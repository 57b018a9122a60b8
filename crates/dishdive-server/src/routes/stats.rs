//! Stats route.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::routes::error_response;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/stats", get(get_stats))
}

/// GET /api/stats: row counts and worker limits.
async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.get_stats() {
        Ok(stats) => Json(serde_json::json!({
            "restaurants": stats.restaurants,
            "dishes": stats.dishes,
            "keywords": stats.keywords,
            "reviews": stats.reviews,
            "extracts": stats.extracts,
            "reviewLinks": stats.review_links,
            "dbPath": stats.db_path,
            "workers": state.config.workers,
        }))
        .into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use crate::routes::tests::{call, test_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_stats_shape() {
        let app = test_app();
        app.state.store.add_restaurant("Krua Apsorn", Some("thai"), None).unwrap();
        let (status, body) = call(&app.router, "GET", "/api/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["restaurants"], 1);
        assert_eq!(body["reviews"], 0);
        assert_eq!(body["workers"]["max_concurrency"], 4);
    }
}
