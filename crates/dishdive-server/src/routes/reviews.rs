//! Review submission and processing status.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use dishdive_runtime::ReviewSubmission;

use crate::routes::{error_response, parse_source_type};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reviews", post(submit_review))
        .route("/reviews/{id}/status", get(review_status))
        .route("/reviews/{id}/extract", get(review_extract))
}

#[derive(Deserialize)]
struct SourceQuery {
    source_type: Option<String>,
}

/// POST /api/reviews: store the review and queue background processing.
async fn submit_review(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReviewSubmission>,
) -> impl IntoResponse {
    match state.reviews.submit_review(req).await {
        Ok(receipt) => (StatusCode::CREATED, Json(serde_json::json!(receipt))).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

/// GET /api/reviews/{id}/status
async fn review_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(query): Query<SourceQuery>,
) -> impl IntoResponse {
    let source_type = match parse_source_type(query.source_type.as_deref()) {
        Ok(t) => t,
        Err(resp) => return resp.into_response(),
    };
    match state.reviews.status(id, source_type) {
        Ok(status) => Json(serde_json::json!(status)).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

/// GET /api/reviews/{id}/extract: the stored payload, parsed when possible.
async fn review_extract(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(query): Query<SourceQuery>,
) -> impl IntoResponse {
    let source_type = match parse_source_type(query.source_type.as_deref()) {
        Ok(t) => t,
        Err(resp) => return resp.into_response(),
    };
    match state.reviews.raw_extract(id, source_type) {
        Ok(Some(raw)) => {
            let data = serde_json::from_str::<serde_json::Value>(&raw)
                .unwrap_or(serde_json::Value::String(raw));
            Json(serde_json::json!({
                "source_id": id,
                "source_type": source_type,
                "data_extract": data,
            }))
            .into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("no extract for {}:{}", source_type, id) })),
        )
            .into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::tests::{call, test_app};

    #[tokio::test]
    async fn test_submit_and_poll() {
        let app = test_app();
        let store = &app.state.store;
        let res = store.add_restaurant("Som Tam Der", Some("thai"), None).unwrap();
        let dish = store.add_dish(res, "ส้มตำปลาร้า", Some("thai"), None).unwrap();

        let (status, body) = call(
            &app.router,
            "POST",
            "/api/reviews",
            Some(json!({
                "user_id": 1,
                "dish_id": dish,
                "restaurant_id": res,
                "review_text": "ส้มตำปลาร้าแซ่บ อร่อยมาก",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        let id = body["review_id"].as_i64().unwrap();

        let uri = format!("/api/reviews/{}/status", id);
        let mut polled = json!(null);
        for _ in 0..200 {
            let (_, body) = call(&app.router, "GET", &uri, None).await;
            polled = body;
            if polled["state"] == "normalized" {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(polled["state"], "normalized");
        assert_eq!(polled["has_extract"], true);
        assert_eq!(polled["has_normalized"], true);
        assert_eq!(polled["source_type"], "user");

        let (status, body) = call(
            &app.router,
            "GET",
            &format!("/api/reviews/{}/extract?source_type=user", id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data_extract"].is_array());
    }

    #[tokio::test]
    async fn test_bad_requests() {
        let app = test_app();
        let (status, _) = call(
            &app.router,
            "POST",
            "/api/reviews",
            Some(json!({ "user_id": 1, "dish_id": 1, "restaurant_id": 1, "review_text": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(&app.router, "GET", "/api/reviews/1/status?source_type=fax", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(&app.router, "GET", "/api/reviews/1/extract", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
