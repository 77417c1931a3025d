//! Feeds: named groups of followed users, and the timeline of each feed.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use fritter_shared::FeedName;
use fritter_store::StoreError;

use crate::api::AppState;
use crate::error::ServerError;
use crate::guards::{check_feed, require_followee, require_followee_owner, require_followee_user};
use crate::response::{all, FolloweeResponse, FreetResponse};
use crate::session::CurrentUser;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/followees",
            get(list_followees).post(follow).delete(delete_feed),
        )
        .route("/api/followees/:id", delete(unfollow))
        .route("/api/feeds/:feed_name/freets", get(feed_timeline))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedQuery {
    feed_name: Option<String>,
}

/// Which of the session user's followees a listing covers.
#[derive(Debug, PartialEq, Eq)]
pub enum FeedSelector {
    All,
    Feed(String),
}

impl From<FeedQuery> for FeedSelector {
    fn from(query: FeedQuery) -> Self {
        match query.feed_name {
            Some(name) => FeedSelector::Feed(name),
            None => FeedSelector::All,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FollowBody {
    /// Username to follow.
    followee: Option<String>,
    feed_name: Option<String>,
}

async fn follow(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<FollowBody>,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    let db = state.db.lock().await;
    let followed = require_followee_user(&db, body.followee.as_deref())?;
    let feed_name = FeedName::new(body.feed_name.as_deref().unwrap_or_default())?;

    let followee = db
        .add_followee(user.id, &followed.username, &feed_name)
        .map_err(|e| match e {
            StoreError::Duplicate => ServerError::Conflict(format!(
                "You already follow user {} on the feed {}.",
                followed.username,
                feed_name.as_str()
            )),
            other => other.into(),
        })?;

    info!(
        author = %user.username,
        followee = %followed.username,
        feed = feed_name.as_str(),
        "Followee added"
    );
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!(
                "You followed user {} on the feed {}, successfully.",
                followed.username,
                feed_name.as_str()
            ),
            "followee": FolloweeResponse::from(followee),
        })),
    ))
}

async fn list_followees(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<FolloweeResponse>>, ServerError> {
    let db = state.db.lock().await;

    let followees = match FeedSelector::from(query) {
        FeedSelector::All => db.find_all_followees(user.id)?,
        FeedSelector::Feed(name) => {
            let feed_name = check_feed(&db, user.id, &name, |n: &String| Some(n.as_str()))?
                .require()?;
            db.find_followees_by_feed_name(user.id, &feed_name)?
        }
    };
    Ok(Json(all(followees)))
}

async fn unfollow(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ServerError> {
    let db = state.db.lock().await;
    let followee = require_followee(&db, &id)?;
    require_followee_owner(&followee, &user)?;

    db.delete_followee(followee.followee.id)?;

    info!(followee_id = %followee.followee.id, "Followee removed");
    Ok(Json(json!({
        "message": "You unfollowed the user from this feed successfully.",
    })))
}

async fn delete_feed(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Value>, ServerError> {
    let db = state.db.lock().await;
    let feed_name = check_feed(&db, user.id, &query, |q: &FeedQuery| q.feed_name.as_deref())?
        .require()?;

    let removed = db.delete_feed(user.id, &feed_name)?;

    info!(author = %user.username, feed = %feed_name, removed, "Feed deleted");
    Ok(Json(json!({
        "message": "You deleted your feed successfully.",
    })))
}

async fn feed_timeline(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(feed_name): Path<String>,
) -> Result<Json<Vec<FreetResponse>>, ServerError> {
    let db = state.db.lock().await;
    let feed_name = check_feed(&db, user.id, &feed_name, |n: &String| Some(n.as_str()))?
        .require()?;

    let freets = db.find_freets_in_feed(user.id, &feed_name)?;
    Ok(Json(all(freets)))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use axum::http::Method;
    use uuid::Uuid;

    use crate::api::test_support::{app, TestApp};

    use super::*;

    async fn follow(app: &TestApp, user: Uuid, followee: &str, feed: &str) -> (StatusCode, Value) {
        app.send(
            Method::POST,
            "/api/followees",
            Some(user),
            Some(json!({ "followee": followee, "feedName": feed })),
        )
        .await
    }

    #[tokio::test]
    async fn feed_groups_members() {
        let app = app();
        let alice = app.user("alice").await;
        app.user("bob").await;
        app.user("carol").await;
        app.user("dave").await;

        let (status, json) = follow(&app, alice, "bob", "news").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            json["message"],
            "You followed user bob on the feed news, successfully."
        );
        assert_eq!(json["followee"]["followee"], "bob");
        assert_eq!(json["followee"]["feedName"], "news");
        follow(&app, alice, "carol", "news").await;
        follow(&app, alice, "dave", "friends").await;

        let (status, json) = app
            .send(Method::GET, "/api/followees?feedName=news", Some(alice), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let members: HashSet<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|f| f["followee"].as_str())
            .collect();
        assert_eq!(members, HashSet::from(["bob", "carol"]));

        let (_, json) = app
            .send(Method::GET, "/api/followees", Some(alice), None)
            .await;
        assert_eq!(json.as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn follow_validation() {
        let app = app();
        let alice = app.user("alice").await;
        app.user("bob").await;

        assert_eq!(follow(&app, alice, "ghost", "news").await.0, StatusCode::NOT_FOUND);
        assert_eq!(follow(&app, alice, "", "news").await.0, StatusCode::BAD_REQUEST);
        assert_eq!(follow(&app, alice, "bob", "  ").await.0, StatusCode::BAD_REQUEST);
        assert_eq!(
            follow(&app, alice, "bob", &"n".repeat(51)).await.0,
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(follow(&app, alice, "bob", "news").await.0, StatusCode::CREATED);
        assert_eq!(follow(&app, alice, "bob", "news").await.0, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn feed_must_exist() {
        let app = app();
        let alice = app.user("alice").await;

        let (status, json) = app
            .send(Method::GET, "/api/followees?feedName=nope", Some(alice), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "There is no followee under this feed.");

        let (status, _) = app
            .send(Method::DELETE, "/api/followees?feedName=nope", Some(alice), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .send(Method::DELETE, "/api/followees", Some(alice), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .send(Method::GET, "/api/feeds/nope/freets", Some(alice), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unfollow_and_delete_feed() {
        let app = app();
        let alice = app.user("alice").await;
        let bob = app.user("bob").await;
        app.user("carol").await;

        let (_, json) = follow(&app, alice, "bob", "news").await;
        let uri = format!("/api/followees/{}", json["followee"]["_id"].as_str().unwrap());
        follow(&app, alice, "carol", "news").await;

        let (status, _) = app.send(Method::DELETE, &uri, Some(bob), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = app.send(Method::DELETE, &uri, Some(alice), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = app
            .send(Method::DELETE, "/api/followees?feedName=news", Some(alice), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "You deleted your feed successfully.");

        let (_, json) = app
            .send(Method::GET, "/api/followees", Some(alice), None)
            .await;
        assert_eq!(json.as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn padded_feed_name_stays_reachable() {
        let app = app();
        let alice = app.user("alice").await;
        let bob = app.user("bob").await;
        app.freet(bob, json!({ "content": "from bob" })).await;

        let (status, json) = follow(&app, alice, "bob", "  news ").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["followee"]["feedName"], "news");

        let (status, json) = app
            .send(Method::GET, "/api/followees?feedName=news%20", Some(alice), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().map(Vec::len), Some(1));

        let (status, json) = app
            .send(Method::GET, "/api/feeds/news/freets", Some(alice), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json[0]["content"], "from bob");

        // The same user under the padded spelling is the same feed.
        assert_eq!(follow(&app, alice, "bob", "news").await.0, StatusCode::CONFLICT);

        let (status, _) = app
            .send(Method::DELETE, "/api/followees?feedName=news%20", Some(alice), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let (_, json) = app
            .send(Method::GET, "/api/followees", Some(alice), None)
            .await;
        assert_eq!(json.as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn timeline_shows_members_freets() {
        let app = app();
        let alice = app.user("alice").await;
        let bob = app.user("bob").await;
        let carol = app.user("carol").await;
        app.freet(bob, json!({ "content": "from bob" })).await;
        app.freet(carol, json!({ "content": "from carol" })).await;
        follow(&app, alice, "bob", "news").await;

        let (status, json) = app
            .send(Method::GET, "/api/feeds/news/freets", Some(alice), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().map(Vec::len), Some(1));
        assert_eq!(json[0]["content"], "from bob");
    }
}
