//! HTTP route handlers.

pub mod recommend;
pub mod reviews;
pub mod settings;
pub mod stats;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use dishdive_core::Error;
use dishdive_store::SourceType;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(stats::routes())
        .merge(reviews::routes())
        .merge(recommend::routes())
        .merge(settings::routes())
}

type ErrorResponse = (StatusCode, Json<serde_json::Value>);

/// Map a domain error to a status code and `{"error": ...}` body.
pub(crate) fn error_response(e: &Error) -> ErrorResponse {
    let status = match e {
        Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(serde_json::json!({ "error": e.to_string() })))
}

/// `?source_type=` with `user` as the default.
pub(crate) fn parse_source_type(raw: Option<&str>) -> Result<SourceType, ErrorResponse> {
    match raw {
        None => Ok(SourceType::User),
        Some(s) => s
            .parse()
            .map_err(|e: String| error_response(&Error::InvalidInput(e))),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::Request;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use dishdive_core::DishDiveConfig;
    use dishdive_llm::{LLMConfig, LlmClient};
    use dishdive_store::SqliteStore;

    pub(crate) struct TestApp {
        pub router: Router,
        pub state: Arc<AppState>,
        pub _dir: TempDir,
    }

    /// App over a temp store with no extraction model configured.
    pub(crate) fn test_app() -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let config = DishDiveConfig::from_env(dir.path()).unwrap();
        let store = Arc::new(SqliteStore::open(&config.data_paths.db).unwrap());
        let client = LlmClient::new(&LLMConfig::default(), Duration::from_secs(5)).unwrap();
        let state = Arc::new(AppState::new(config, store, Arc::new(client)).unwrap());
        TestApp {
            router: build_router(state.clone()),
            state,
            _dir: dir,
        }
    }

    pub(crate) async fn call(
        router: &Router,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(error_response(&Error::InvalidInput("x".into())).0, StatusCode::BAD_REQUEST);
        assert_eq!(error_response(&Error::NotFound("x".into())).0, StatusCode::NOT_FOUND);
        assert_eq!(
            error_response(&Error::Database("x".into())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_source_type_param() {
        assert_eq!(parse_source_type(None).unwrap(), SourceType::User);
        assert_eq!(parse_source_type(Some("web")).unwrap(), SourceType::Web);
        assert_eq!(parse_source_type(Some("fax")).unwrap_err().0, StatusCode::BAD_REQUEST);
    }
}
