//! Request guards run by handlers before they touch a collection.
//!
//! Each guard either returns what it looked up or the error response the
//! request ends with, so handlers read as a straight line of `?` checks.
//! Guards take the already-locked [`Database`] so a check and the write that
//! follows it happen under the same lock.

use uuid::Uuid;

use fritter_store::{Database, Followee, PopulatedComment, PopulatedFollowee, PopulatedFreet, User};

use crate::error::ServerError;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Parse a path/body/query identifier.  A malformed id cannot name an
/// existing record, so it is answered the same way as an unknown one.
fn parse_id(raw: &str, missing: impl FnOnce() -> ServerError) -> Result<Uuid, ServerError> {
    Uuid::parse_str(raw.trim()).map_err(|_| missing())
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

fn no_such_user(username: &str) -> ServerError {
    ServerError::NotFound(format!("A user with username {username} does not exist."))
}

/// Resolve the `author` filter of a listing route.
pub fn require_author(db: &Database, username: &str) -> Result<User, ServerError> {
    if username.trim().is_empty() {
        return Err(ServerError::BadRequest(
            "Provided author username must be nonempty.".into(),
        ));
    }
    db.find_user_by_username(username)?
        .ok_or_else(|| no_such_user(username))
}

/// Resolve the user named in a follow request.
pub fn require_followee_user(db: &Database, username: Option<&str>) -> Result<User, ServerError> {
    let username = username.map(str::trim).unwrap_or_default();
    if username.is_empty() {
        return Err(ServerError::BadRequest(
            "Provided followee username must be nonempty.".into(),
        ));
    }
    db.find_user_by_username(username)?
        .ok_or_else(|| no_such_user(username))
}

// ---------------------------------------------------------------------------
// Freets
// ---------------------------------------------------------------------------

fn no_such_freet(raw: &str) -> ServerError {
    ServerError::NotFound(format!("Freet with freet ID {raw} does not exist."))
}

/// Parse a freet id, answering 404 when it is malformed.
pub fn freet_id(raw: &str) -> Result<Uuid, ServerError> {
    parse_id(raw, || no_such_freet(raw))
}

pub fn require_freet(db: &Database, raw: &str) -> Result<PopulatedFreet, ServerError> {
    let id = freet_id(raw)?;
    db.find_freet(id)?.ok_or_else(|| no_such_freet(raw))
}

/// Only a freet's author may change or delete it.
pub fn require_freet_author(freet: &PopulatedFreet, user: &User) -> Result<(), ServerError> {
    if freet.freet.author_id != user.id {
        return Err(ServerError::Forbidden(
            "Cannot modify other users' freets.".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

pub fn require_comment(db: &Database, raw: &str) -> Result<PopulatedComment, ServerError> {
    let missing = || ServerError::NotFound(format!("Comment with comment ID {raw} does not exist."));
    let id = parse_id(raw, missing)?;
    db.find_comment(id)?.ok_or_else(missing)
}

pub fn require_comment_author(comment: &PopulatedComment, user: &User) -> Result<(), ServerError> {
    if comment.comment.author_id != user.id {
        return Err(ServerError::Forbidden(
            "Cannot modify other users' comments.".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Likes
// ---------------------------------------------------------------------------

/// The session user must already like the freet.
pub fn require_liked(db: &Database, freet_id: Uuid, user: &User) -> Result<(), ServerError> {
    match db.find_like(freet_id, user.id)? {
        Some(_) => Ok(()),
        None => Err(ServerError::NotFound(format!(
            "Like with freet ID {freet_id} and user ID {} does not exist.",
            user.id
        ))),
    }
}

// ---------------------------------------------------------------------------
// Followees
// ---------------------------------------------------------------------------

pub fn require_followee(db: &Database, raw: &str) -> Result<PopulatedFollowee, ServerError> {
    let missing =
        || ServerError::NotFound(format!("Followee with followee ID {raw} does not exist."));
    let id = parse_id(raw, missing)?;
    db.find_followee(id)?.ok_or_else(missing)
}

/// Only the owner of a feed may change its members.
pub fn require_followee_owner(followee: &PopulatedFollowee, user: &User) -> Result<(), ServerError> {
    if followee.followee.author_id != user.id {
        return Err(ServerError::Forbidden(
            "Cannot modify other users' followees.".into(),
        ));
    }
    Ok(())
}

/// Outcome of looking up one of the session user's feeds.
#[derive(Debug)]
pub enum FeedLookup {
    /// The feed has at least one member; `member` is one of them.
    Found { feed_name: String, member: Followee },
    Missing { feed_name: String },
}

impl FeedLookup {
    /// The feed's name, or 404 if it has no members.
    pub fn require(self) -> Result<String, ServerError> {
        match self {
            FeedLookup::Found { feed_name, member } => {
                tracing::debug!(%feed_name, member = %member.id, "feed found");
                Ok(feed_name)
            }
            FeedLookup::Missing { feed_name } => {
                tracing::debug!(%feed_name, "feed has no members");
                Err(ServerError::NotFound(
                    "There is no followee under this feed.".into(),
                ))
            }
        }
    }
}

/// Check whether `author_id` has a feed with the name `extract` pulls out of
/// `request`.  Every route that addresses a feed by name goes through here,
/// whether the name arrives in the path, the query string or the body.
pub fn check_feed<R: ?Sized>(
    db: &Database,
    author_id: Uuid,
    request: &R,
    extract: impl for<'a> FnOnce(&'a R) -> Option<&'a str>,
) -> Result<FeedLookup, ServerError> {
    let feed_name = match extract(request).map(str::trim) {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => return Err(ServerError::BadRequest("Missing the feedName".into())),
    };

    Ok(match db.find_followee_by_feed_name(&feed_name, author_id)? {
        Some(member) => FeedLookup::Found { feed_name, member },
        None => FeedLookup::Missing { feed_name },
    })
}
