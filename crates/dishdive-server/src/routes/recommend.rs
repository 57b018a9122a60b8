//! Dish recommendations and restaurant search.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use dishdive_recommend::RestaurantQuery;

use crate::routes::error_response;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/{id}/recommendations", get(recommend_dishes))
        .route("/restaurants", get(search_restaurants))
}

#[derive(Deserialize)]
struct RecommendQuery {
    restaurant_id: Option<i64>,
    q: Option<String>,
}

/// GET /api/users/{id}/recommendations?restaurant_id=&q=
async fn recommend_dishes(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Query(query): Query<RecommendQuery>,
) -> impl IntoResponse {
    match state
        .recommender
        .recommend_dishes(user_id, query.restaurant_id, query.q.as_deref())
    {
        Ok(dishes) => Json(serde_json::json!({ "dishes": dishes })).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

/// GET /api/restaurants?user_id=&lat=&lng=&radius=
async fn search_restaurants(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RestaurantQuery>,
) -> impl IntoResponse {
    match state.recommender.search_restaurants(&query) {
        Ok(restaurants) => Json(serde_json::json!({ "restaurants": restaurants })).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}
