use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use fritter_shared::CommentContent;

use crate::api::AppState;
use crate::error::ServerError;
use crate::guards::{require_author, require_comment, require_comment_author, require_freet};
use crate::response::{all, CommentResponse};
use crate::session::CurrentUser;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/comments", get(list_comments).post(create_comment))
        .route("/api/comments/:id", get(get_comment).delete(delete_comment))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentQuery {
    author: Option<String>,
    freet_id: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CommentFilter {
    All,
    Author(String),
    Freet(String),
}

impl From<CommentQuery> for CommentFilter {
    fn from(query: CommentQuery) -> Self {
        match (query.author, query.freet_id) {
            (Some(author), _) => CommentFilter::Author(author),
            (None, Some(freet_id)) => CommentFilter::Freet(freet_id),
            (None, None) => CommentFilter::All,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateCommentBody {
    freet_id: Option<String>,
    content: Option<String>,
}

async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<CommentQuery>,
) -> Result<Json<Vec<CommentResponse>>, ServerError> {
    let db = state.db.lock().await;

    let comments = match CommentFilter::from(query) {
        CommentFilter::All => db.find_all_comments()?,
        CommentFilter::Author(username) => {
            let author = require_author(&db, &username)?;
            db.find_comments_by_username(&author.username)?
        }
        CommentFilter::Freet(freet_id) => {
            let freet = require_freet(&db, &freet_id)?;
            db.find_comments_by_freet(freet.freet.id)?
        }
    };
    Ok(Json(all(comments)))
}

async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CommentResponse>, ServerError> {
    let db = state.db.lock().await;
    Ok(Json(require_comment(&db, &id)?.into()))
}

async fn create_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateCommentBody>,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    let db = state.db.lock().await;
    let freet = require_freet(&db, body.freet_id.as_deref().unwrap_or_default())?;
    let content = CommentContent::new(body.content.as_deref().unwrap_or_default())?;

    let comment = db.create_comment(user.id, freet.freet.id, &content)?;

    info!(comment_id = %comment.comment.id, freet_id = %freet.freet.id, "Comment created");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Your comment was created successfully.",
            "comment": CommentResponse::from(comment),
        })),
    ))
}

async fn delete_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ServerError> {
    let db = state.db.lock().await;
    let comment = require_comment(&db, &id)?;
    require_comment_author(&comment, &user)?;

    db.delete_comment(comment.comment.id)?;

    info!(comment_id = %comment.comment.id, "Comment deleted");
    Ok(Json(json!({
        "message": "Your comment was deleted successfully.",
    })))
}

#[cfg(test)]
mod tests {
    use axum::http::Method;

    use crate::api::test_support::app;

    use super::*;

    #[test]
    fn author_wins_over_freet() {
        let query = CommentQuery {
            author: Some("alice".into()),
            freet_id: Some("x".into()),
        };
        assert_eq!(CommentFilter::from(query), CommentFilter::Author("alice".into()));
        let query = CommentQuery {
            freet_id: Some("x".into()),
            ..Default::default()
        };
        assert_eq!(CommentFilter::from(query), CommentFilter::Freet("x".into()));
    }

    #[tokio::test]
    async fn comment_lifecycle() {
        let app = app();
        let alice = app.user("alice").await;
        let bob = app.user("bob").await;
        let freet_id = app.freet(alice, json!({ "content": "hello" })).await;

        let (status, json) = app
            .send(
                Method::POST,
                "/api/comments",
                Some(bob),
                Some(json!({ "freetId": freet_id, "content": "hi back" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let comment = &json["comment"];
        assert_eq!(comment["author"], "bob");
        assert_eq!(comment["freet"], "hello");
        assert_eq!(comment["freetId"], freet_id.as_str());
        assert_eq!(comment["content"], "hi back");
        let uri = format!("/api/comments/{}", comment["_id"].as_str().unwrap());

        let (_, json) = app
            .send(
                Method::GET,
                &format!("/api/comments?freetId={freet_id}"),
                None,
                None,
            )
            .await;
        assert_eq!(json.as_array().map(Vec::len), Some(1));

        let (_, json) = app
            .send(Method::GET, "/api/comments?author=alice", None, None)
            .await;
        assert_eq!(json.as_array().map(Vec::len), Some(0));

        let (status, _) = app.send(Method::DELETE, &uri, Some(alice), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = app.send(Method::DELETE, &uri, Some(bob), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app.send(Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn comment_needs_existing_freet_and_content() {
        let app = app();
        let alice = app.user("alice").await;
        let freet_id = app.freet(alice, json!({ "content": "hello" })).await;

        let (status, _) = app
            .send(
                Method::POST,
                "/api/comments",
                Some(alice),
                Some(json!({ "freetId": uuid::Uuid::new_v4(), "content": "lost" })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .send(
                Method::POST,
                "/api/comments",
                Some(alice),
                Some(json!({ "freetId": freet_id, "content": "" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .send(
                Method::POST,
                "/api/comments",
                Some(alice),
                Some(json!({ "freetId": freet_id, "content": "y".repeat(141) })),
            )
            .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn deleting_freet_removes_its_comments() {
        let app = app();
        let alice = app.user("alice").await;
        let freet_id = app.freet(alice, json!({ "content": "short lived" })).await;
        app.send(
            Method::POST,
            "/api/comments",
            Some(alice),
            Some(json!({ "freetId": freet_id, "content": "note" })),
        )
        .await;

        let (status, _) = app
            .send(Method::DELETE, &format!("/api/freets/{freet_id}"), Some(alice), None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let (_, json) = app.send(Method::GET, "/api/comments", None, None).await;
        assert_eq!(json.as_array().map(Vec::len), Some(0));
    }
}
