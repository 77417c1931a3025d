use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use fritter_shared::constants::SESSION_HEADER;
use fritter_store::Database;

use crate::config::ServerConfig;
use crate::routes;

#[derive(Clone)]
pub struct AppState {
    /// One connection shared by all handlers.  Guards and the write that
    /// follows them run under a single lock.
    pub db: Arc<Mutex<Database>>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ServerConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = if state.config.cors_permissive {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                header::CONTENT_TYPE,
                header::HeaderName::from_static(SESSION_HEADER),
            ])
    };

    Router::new()
        .route("/health", get(health_check))
        .merge(routes::users::router())
        .merge(routes::freets::router())
        .merge(routes::comments::router())
        .merge(routes::likes::router())
        .merge(routes::followees::router())
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Helpers for driving the router in-process from route tests.
#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;

    pub struct TestApp {
        _dir: tempfile::TempDir,
        pub router: Router,
        pub state: AppState,
    }

    pub fn app() -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("api.db")).unwrap();
        let state = AppState::new(db, ServerConfig::default());
        TestApp {
            _dir: dir,
            router: build_router(state.clone()),
            state,
        }
    }

    impl TestApp {
        pub async fn send(
            &self,
            method: Method,
            uri: &str,
            session: Option<Uuid>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut request = Request::builder().method(method).uri(uri);
            if let Some(user) = session {
                request = request.header(SESSION_HEADER, user.to_string());
            }
            let request = match body {
                Some(json) => request
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json.to_string())),
                None => request.body(Body::empty()),
            }
            .unwrap();

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let json = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or(Value::Null)
            };
            (status, json)
        }

        /// Register `username` and return its id, for use as a session.
        pub async fn user(&self, username: &str) -> Uuid {
            let (status, json) = self
                .send(
                    Method::POST,
                    "/api/users",
                    None,
                    Some(serde_json::json!({ "username": username })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "{json}");
            json["user"]["_id"].as_str().unwrap().parse().unwrap()
        }

        /// Post a freet as `session` and return its id.
        pub async fn freet(&self, session: Uuid, body: Value) -> String {
            let (status, json) = self
                .send(Method::POST, "/api/freets", Some(session), Some(body))
                .await;
            assert_eq!(status, StatusCode::CREATED, "{json}");
            json["freet"]["_id"].as_str().unwrap().to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::test_support::app;
    use super::*;

    #[tokio::test]
    async fn health() {
        let app = app();
        let (status, json) = app.send(Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let app = app();
        let user = app.user("alice").await;
        let huge = "x".repeat(ServerConfig::default().max_body_size + 1);
        let (status, _) = app
            .send(
                Method::POST,
                "/api/freets",
                Some(user),
                Some(serde_json::json!({ "content": huge })),
            )
            .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
