//! Session identity.
//!
//! Sessions are issued upstream; this service only reads the session user's
//! id from the [`SESSION_HEADER`] header and resolves it to a user.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use uuid::Uuid;

use fritter_shared::constants::SESSION_HEADER;
use fritter_store::User;

use crate::api::AppState;
use crate::error::ServerError;

/// The logged-in user making the request.  Rejects with 403 when there is
/// no valid session.
pub struct CurrentUser(pub User);

fn session_user_id(headers: &HeaderMap) -> Option<Uuid> {
    let raw = headers.get(SESSION_HEADER)?.to_str().ok()?;
    Uuid::parse_str(raw.trim()).ok()
}

fn not_logged_in() -> ServerError {
    ServerError::Forbidden("You must be logged in to complete this action.".into())
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let id = session_user_id(&parts.headers).ok_or_else(not_logged_in)?;

        let db = state.db.lock().await;
        let user = db.find_user(id)?.ok_or_else(not_logged_in)?;
        Ok(Self(user))
    }
}
