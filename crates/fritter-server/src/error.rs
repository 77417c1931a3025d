use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use fritter_shared::ValidationError;
use fritter_store::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Conflict(_) => StatusCode::CONFLICT,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ServerError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<ValidationError> for ServerError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::TooLong { .. } => ServerError::PayloadTooLarge(err.to_string()),
            _ => ServerError::BadRequest(err.to_string()),
        }
    }
}

/// Fallback mapping for store errors the handler did not translate itself.
impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ServerError::NotFound(err.to_string()),
            StoreError::Duplicate | StoreError::MissingReference => {
                ServerError::Conflict(err.to_string())
            }
            other => ServerError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_status_codes() {
        let too_long: ServerError = ValidationError::TooLong {
            field: "Freet content",
            max: 140,
        }
        .into();
        assert_eq!(too_long.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let empty: ServerError = ValidationError::Empty { field: "Feed name" }.into();
        assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_errors_map_to_http() {
        assert_eq!(
            ServerError::from(StoreError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServerError::from(StoreError::Duplicate).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServerError::from(StoreError::Migration("boom".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_detail_is_hidden() {
        let response = ServerError::Internal("disk on fire".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
