use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use fritter_shared::{optional_label, FreetContent};

use crate::api::AppState;
use crate::error::ServerError;
use crate::guards::{require_author, require_freet, require_freet_author};
use crate::response::{all, FreetResponse, Listing};
use crate::session::CurrentUser;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/freets", get(list_freets).post(create_freet))
        .route(
            "/api/freets/:id",
            get(get_freet).patch(update_freet).delete(delete_freet),
        )
}

#[derive(Debug, Default, Deserialize)]
pub struct FreetQuery {
    author: Option<String>,
    topic: Option<String>,
    country: Option<String>,
}

/// Which freets `GET /api/freets` lists.
#[derive(Debug, PartialEq, Eq)]
pub enum FreetFilter {
    All,
    Author(String),
    Topic(String),
    Country(String),
}

impl From<FreetQuery> for FreetFilter {
    /// `author` wins over `topic`, which wins over `country`.
    fn from(query: FreetQuery) -> Self {
        match query {
            FreetQuery {
                author: Some(author),
                ..
            } => FreetFilter::Author(author),
            FreetQuery {
                topic: Some(topic), ..
            } => FreetFilter::Topic(topic.trim().to_owned()),
            FreetQuery {
                country: Some(country),
                ..
            } => FreetFilter::Country(country.trim().to_owned()),
            _ => FreetFilter::All,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FreetBody {
    content: Option<String>,
    topic: Option<String>,
    country: Option<String>,
}

impl FreetBody {
    fn content(&self) -> Result<FreetContent, ServerError> {
        Ok(FreetContent::new(self.content.as_deref().unwrap_or_default())?)
    }
}

async fn list_freets(
    State(state): State<AppState>,
    Query(query): Query<FreetQuery>,
) -> Result<Json<Listing<FreetResponse>>, ServerError> {
    let db = state.db.lock().await;

    let listing: Listing<FreetResponse> = match FreetFilter::from(query) {
        FreetFilter::All => Listing::Items(all(db.find_all_freets()?)),
        FreetFilter::Author(username) => {
            let author = require_author(&db, &username)?;
            Listing::Items(all(db.find_freets_by_username(&author.username)?))
        }
        FreetFilter::Topic(topic) => Listing::or_message(db.find_freets_by_topic(&topic)?, || {
            format!("There are no freets associated with topic {topic}.")
        }),
        FreetFilter::Country(country) => {
            Listing::or_message(db.find_freets_by_country(&country)?, || {
                format!("There are no freets associated with country {country}.")
            })
        }
    };
    Ok(Json(listing))
}

async fn get_freet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FreetResponse>, ServerError> {
    let db = state.db.lock().await;
    let freet = require_freet(&db, &id)?;
    Ok(Json(freet.into()))
}

async fn create_freet(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<FreetBody>,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    let content = body.content()?;
    let topic = optional_label(body.topic.as_deref());
    let country = optional_label(body.country.as_deref());

    let db = state.db.lock().await;
    let freet = db.create_freet(user.id, &content, topic.as_deref(), country.as_deref())?;

    info!(freet_id = %freet.freet.id, author = %user.username, "Freet created");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Your freet was created successfully.",
            "freet": FreetResponse::from(freet),
        })),
    ))
}

async fn update_freet(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<FreetBody>,
) -> Result<Json<Value>, ServerError> {
    let db = state.db.lock().await;
    let freet = require_freet(&db, &id)?;
    require_freet_author(&freet, &user)?;
    let content = body.content()?;

    let topic = optional_label(body.topic.as_deref());
    let country = optional_label(body.country.as_deref());
    let freet = db.update_freet(
        freet.freet.id,
        &content,
        topic.as_deref(),
        country.as_deref(),
    )?;

    info!(freet_id = %freet.freet.id, "Freet updated");
    Ok(Json(json!({
        "message": "Your freet was updated successfully.",
        "freet": FreetResponse::from(freet),
    })))
}

async fn delete_freet(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ServerError> {
    let db = state.db.lock().await;
    let freet = require_freet(&db, &id)?;
    require_freet_author(&freet, &user)?;

    db.remove_freet(freet.freet.id)?;

    info!(freet_id = %freet.freet.id, "Freet deleted");
    Ok(Json(json!({
        "message": "Your freet was deleted successfully.",
    })))
}
