use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use fritter_shared::Username;
use fritter_store::StoreError;

use crate::api::AppState;
use crate::error::ServerError;
use crate::response::UserResponse;
use crate::session::CurrentUser;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(create_user).delete(delete_account))
        .route("/api/users/:username", get(get_user))
}

#[derive(Debug, Deserialize)]
struct CreateUserBody {
    username: Option<String>,
}

async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserBody>,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    let username = Username::new(body.username.as_deref().unwrap_or_default())?;

    let db = state.db.lock().await;
    let user = db.create_user(&username).map_err(|e| match e {
        StoreError::Duplicate => {
            ServerError::Conflict("An account with this username already exists.".into())
        }
        other => other.into(),
    })?;

    info!(user_id = %user.id, username = %user.username, "User created");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!("Your account was created successfully. You are {}.", user.username),
            "user": UserResponse::from(user),
        })),
    ))
}

async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, ServerError> {
    let db = state.db.lock().await;
    let user = db.find_user_by_username(&username)?.ok_or_else(|| {
        ServerError::NotFound(format!("A user with username {username} does not exist."))
    })?;
    Ok(Json(user.into()))
}

/// Remove the session user and everything that references them.
async fn delete_account(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>, ServerError> {
    let db = state.db.lock().await;
    db.remove_user_account(user.id)?;

    info!(user_id = %user.id, username = %user.username, "Account deleted");

    Ok(Json(json!({
        "message": "Your account has been deleted successfully.",
    })))
}

#[cfg(test)]
mod tests {
    use axum::http::Method;

    use crate::api::test_support::app;

    use super::*;

    #[tokio::test]
    async fn register_and_lookup() {
        let app = app();
        app.user("alice").await;

        let (status, json) = app
            .send(Method::GET, "/api/users/alice", None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["username"], "alice");

        let (status, _) = app.send(Method::GET, "/api/users/bob", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .send(
                Method::POST,
                "/api/users",
                None,
                Some(json!({ "username": "alice" })),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = app
            .send(
                Method::POST,
                "/api/users",
                None,
                Some(json!({ "username": "no spaces" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn account_removal_leaves_no_references() {
        let app = app();
        let alice = app.user("alice").await;
        let bob = app.user("bob").await;

        let alices = app.freet(alice, json!({ "content": "by alice" })).await;
        let bobs = app.freet(bob, json!({ "content": "by bob" })).await;
        for (user, freet) in [(alice, &bobs), (bob, &alices)] {
            app.send(
                Method::POST,
                "/api/likes",
                Some(user),
                Some(json!({ "freetId": freet })),
            )
            .await;
            app.send(
                Method::POST,
                "/api/comments",
                Some(user),
                Some(json!({ "freetId": freet, "content": "nice" })),
            )
            .await;
        }
        app.send(
            Method::POST,
            "/api/followees",
            Some(alice),
            Some(json!({ "followee": "bob", "feedName": "news" })),
        )
        .await;
        app.send(
            Method::POST,
            "/api/followees",
            Some(bob),
            Some(json!({ "followee": "alice", "feedName": "news" })),
        )
        .await;

        let (status, _) = app.send(Method::DELETE, "/api/users", Some(alice), None).await;
        assert_eq!(status, StatusCode::OK);

        // The old session no longer resolves.
        let (status, _) = app
            .send(Method::GET, "/api/followees", Some(alice), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (_, json) = app
            .send(Method::GET, &format!("/api/likes?freetId={bobs}"), None, None)
            .await;
        assert_eq!(json["rank"], 0);
        let (_, json) = app.send(Method::GET, "/api/comments", None, None).await;
        assert_eq!(json.as_array().map(Vec::len), Some(0));
        let (_, json) = app.send(Method::GET, "/api/likes?author=bob", None, None).await;
        assert_eq!(json.as_array().map(Vec::len), Some(0));
        let (_, json) = app.send(Method::GET, "/api/followees", Some(bob), None).await;
        assert_eq!(json.as_array().map(Vec::len), Some(0));
        let (_, json) = app.send(Method::GET, "/api/freets", None, None).await;
        assert_eq!(json.as_array().map(Vec::len), Some(1));

        let db = app.state.db.lock().await;
        assert!(db.find_user(alice).unwrap().is_none());
    }
}
