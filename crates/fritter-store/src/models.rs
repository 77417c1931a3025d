//! Domain model structs persisted in the SQLite database.
//!
//! The plain structs mirror the stored rows: references to other entities
//! are opaque UUIDs.  The `Populated*` structs are read models assembled by
//! the collections with a join, carrying the referenced records alongside.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered account.  Only the fields the social collections need.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Freet
// ---------------------------------------------------------------------------

/// A short post.  Content, topic and country are editable by the author.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Freet {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub topic: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Bumped on every update; listings sort on it.
    pub modified_at: DateTime<Utc>,
}

/// A freet joined with its author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulatedFreet {
    pub freet: Freet,
    pub author: User,
}

// ---------------------------------------------------------------------------
// Comment
// ---------------------------------------------------------------------------

/// A write-once reply to a freet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub id: Uuid,
    pub author_id: Uuid,
    pub freet_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A comment joined with its author and the freet it replies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulatedComment {
    pub comment: Comment,
    pub author: User,
    pub freet: Freet,
}

// ---------------------------------------------------------------------------
// Like
// ---------------------------------------------------------------------------

/// A user's like of a freet.  At most one per (author, freet).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Like {
    pub id: Uuid,
    pub author_id: Uuid,
    pub freet_id: Uuid,
}

/// A like joined with the liking user and the liked freet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulatedLike {
    pub like: Like,
    pub author: User,
    pub freet: Freet,
}

// ---------------------------------------------------------------------------
// Followee
// ---------------------------------------------------------------------------

/// Membership of one followed user in one of the author's named feeds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Followee {
    pub id: Uuid,
    /// The follower, owner of the feed.
    pub author_id: Uuid,
    /// The followed user.
    pub followee_id: Uuid,
    pub feed_name: String,
}

/// A followee row joined with both users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulatedFollowee {
    pub followee: Followee,
    pub author: User,
    pub followed: User,
}
