//! Control API (C11): an HTTP surface over the store and supervisor for a
//! local dashboard or script to drive without touching the config file or
//! database directly.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;

use crate::config::Config;
use crate::store::DbPool;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Shared handler state. `config` is the same `Arc<RwLock<Config>>` the
/// supervisor's reload path writes to, so a config edit made through this
/// API (or a `--reset`/file-watch reload) is visible here immediately.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub db_path: PathBuf,
    pub config: Arc<RwLock<Config>>,
}

pub fn build_router(state: AppState) -> axum::Router {
    routes::router(state).layer(tower_http::trace::TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::open_in_memory;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState {
            pool: open_in_memory(),
            db_path: PathBuf::from(":memory:"),
            config: Arc::new(RwLock::new(Config::default())),
        }
    }

    #[tokio::test]
    async fn list_devices_on_empty_store_returns_empty_page() {
        let app = build_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/devices").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_device_fingerprint_returns_error_status() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/devices/aa:bb:cc:dd:ee:ff/fingerprint")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn auth_required_once_credentials_are_set() {
        let state = test_state();
        {
            let mut config = state.config.write().unwrap();
            config.web_interface.username = "admin".to_string();
            config.web_interface.password_hash = "doesnotmatter".to_string();
        }
        let app = build_router(state);
        let response = app
            .oneshot(Request::builder().uri("/devices").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
