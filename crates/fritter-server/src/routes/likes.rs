use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use fritter_store::StoreError;

use crate::api::AppState;
use crate::error::ServerError;
use crate::guards::{require_author, require_freet, require_liked};
use crate::response::{all, LikeResponse};
use crate::session::CurrentUser;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/likes", get(list_likes).post(add_like))
        .route("/api/likes/:freet_id", delete(remove_like))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeQuery {
    author: Option<String>,
    freet_id: Option<String>,
}

/// The two listing modes of `GET /api/likes`.  Exactly one query parameter
/// selects the mode.
#[derive(Debug, PartialEq, Eq)]
pub enum LikeListing {
    ByAuthor(String),
    ByFreet(String),
}

impl TryFrom<LikeQuery> for LikeListing {
    type Error = ServerError;

    fn try_from(query: LikeQuery) -> Result<Self, Self::Error> {
        match (query.author, query.freet_id) {
            (Some(author), None) => Ok(LikeListing::ByAuthor(author)),
            (None, Some(freet_id)) => Ok(LikeListing::ByFreet(freet_id)),
            _ => Err(ServerError::BadRequest(
                "Provide exactly one of author or freetId.".into(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LikeBody {
    freet_id: Option<String>,
}

async fn list_likes(
    State(state): State<AppState>,
    Query(query): Query<LikeQuery>,
) -> Result<Json<Value>, ServerError> {
    let listing = LikeListing::try_from(query)?;
    let db = state.db.lock().await;

    let body = match listing {
        LikeListing::ByAuthor(username) => {
            let author = require_author(&db, &username)?;
            let likes: Vec<LikeResponse> = all(db.find_likes_by_username(&author.username)?);
            json!(likes)
        }
        LikeListing::ByFreet(raw) => {
            let freet = require_freet(&db, &raw)?;
            let rank = db.like_rank(freet.freet.id)?;
            let likes: Vec<LikeResponse> = all(db.find_likes_by_freet(freet.freet.id)?);
            json!({
                "rank": rank,
                "freetId": freet.freet.id.to_string(),
                "likes": likes,
            })
        }
    };
    Ok(Json(body))
}

async fn add_like(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<LikeBody>,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    let db = state.db.lock().await;
    let freet = require_freet(&db, body.freet_id.as_deref().unwrap_or_default())?;

    let like = db.add_like(user.id, freet.freet.id).map_err(|e| match e {
        StoreError::Duplicate => ServerError::Conflict(format!(
            "Like with freet ID {} and user ID {} already exists.",
            freet.freet.id, user.id
        )),
        other => other.into(),
    })?;

    info!(freet_id = %freet.freet.id, user = %user.username, "Like added");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Your like was created successfully.",
            "like": LikeResponse::from(like),
        })),
    ))
}

async fn remove_like(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(freet_id): Path<String>,
) -> Result<Json<Value>, ServerError> {
    let db = state.db.lock().await;
    let freet = require_freet(&db, &freet_id)?;
    require_liked(&db, freet.freet.id, &user)?;

    db.delete_like(user.id, freet.freet.id)?;

    info!(freet_id = %freet.freet.id, user = %user.username, "Like removed");
    Ok(Json(json!({
        "message": "Your like was deleted successfully.",
    })))
}
