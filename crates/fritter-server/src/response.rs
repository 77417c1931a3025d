//! Wire shapes for the JSON API.
//!
//! Each response flattens the joined records of a `Populated*` read model
//! into plain strings (author username, freet content) and renders dates for
//! display.  Storage ids go out as `_id`.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use fritter_shared::constants::DATE_TAIL_FORMAT;
use fritter_store::{PopulatedComment, PopulatedFollowee, PopulatedFreet, PopulatedLike, User};

/// Render a timestamp as e.g. `October 19th 2026, 3:04:05 pm`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!(
        "{} {day}{suffix} {}",
        date.format("%B"),
        date.format(DATE_TAIL_FORMAT)
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreetResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub author: String,
    pub date_created: String,
    pub date_modified: String,
    pub content: String,
    pub topic: Option<String>,
    pub country: Option<String>,
}

impl From<PopulatedFreet> for FreetResponse {
    fn from(populated: PopulatedFreet) -> Self {
        let PopulatedFreet { freet, author } = populated;
        Self {
            id: freet.id.to_string(),
            author: author.username,
            date_created: format_date(&freet.created_at),
            date_modified: format_date(&freet.modified_at),
            content: freet.content,
            topic: freet.topic,
            country: freet.country,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub author: String,
    /// Content of the freet being replied to.
    pub freet: String,
    pub freet_id: String,
    pub date_created: String,
    pub content: String,
}

impl From<PopulatedComment> for CommentResponse {
    fn from(populated: PopulatedComment) -> Self {
        let PopulatedComment {
            comment,
            author,
            freet,
        } = populated;
        Self {
            id: comment.id.to_string(),
            author: author.username,
            freet: freet.content,
            freet_id: freet.id.to_string(),
            date_created: format_date(&comment.created_at),
            content: comment.content,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub author: String,
    pub freet: String,
}

impl From<PopulatedLike> for LikeResponse {
    fn from(populated: PopulatedLike) -> Self {
        Self {
            id: populated.like.id.to_string(),
            author: populated.author.username,
            freet: populated.freet.content,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolloweeResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub author: String,
    /// Username of the followed user.
    pub followee: String,
    pub feed_name: String,
}

impl From<PopulatedFollowee> for FolloweeResponse {
    fn from(populated: PopulatedFollowee) -> Self {
        let PopulatedFollowee {
            followee,
            author,
            followed,
        } = populated;
        Self {
            id: followee.id.to_string(),
            author: author.username,
            followee: followed.username,
            feed_name: followee.feed_name,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub date_joined: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            date_joined: format_date(&user.created_at),
        }
    }
}

/// Body of a filtered listing: the matches, or a message saying there are
/// none.  Both are 200 responses.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Items(Vec<T>),
    NoMatches(String),
}

impl<T> Listing<T> {
    /// Convert `records`, or answer `message` when there are none.
    pub fn or_message<R>(records: Vec<R>, message: impl FnOnce() -> String) -> Self
    where
        T: From<R>,
    {
        if records.is_empty() {
            Listing::NoMatches(message())
        } else {
            Listing::Items(records.into_iter().map(T::from).collect())
        }
    }
}

/// Convert every record of a listing.
pub fn all<T, R>(records: Vec<R>) -> Vec<T>
where
    T: From<R>,
{
    records.into_iter().map(T::from).collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use uuid::Uuid;

    use fritter_store::Freet;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn date_format() {
        assert_eq!(
            format_date(&at(2026, 10, 19, 15, 4, 5)),
            "October 19th 2026, 3:04:05 pm"
        );
        assert_eq!(
            format_date(&at(2022, 3, 1, 0, 30, 0)),
            "March 1st 2022, 12:30:00 am"
        );
        assert_eq!(format_date(&at(2022, 3, 22, 9, 0, 0)), "March 22nd 2022, 9:00:00 am");
        assert_eq!(format_date(&at(2022, 3, 23, 12, 0, 0)), "March 23rd 2022, 12:00:00 pm");
        assert_eq!(format_date(&at(2022, 3, 11, 1, 2, 3)), "March 11th 2022, 1:02:03 am");
        assert_eq!(format_date(&at(2022, 3, 13, 1, 2, 3)), "March 13th 2022, 1:02:03 am");
    }

    fn sample_freet() -> PopulatedFreet {
        let created = at(2022, 10, 2, 8, 0, 0);
        let author = User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            created_at: created,
        };
        PopulatedFreet {
            freet: Freet {
                id: Uuid::new_v4(),
                author_id: author.id,
                content: "hello world".into(),
                topic: Some("tech".into()),
                country: None,
                created_at: created,
                modified_at: created,
            },
            author,
        }
    }

    #[test]
    fn freet_keys() {
        let freet = sample_freet();
        let id = freet.freet.id.to_string();
        let json = serde_json::to_value(FreetResponse::from(freet)).unwrap();

        assert_eq!(json["_id"], id);
        assert_eq!(json["author"], "alice");
        assert_eq!(json["content"], "hello world");
        assert_eq!(json["topic"], "tech");
        assert!(json["country"].is_null());
        assert_eq!(json["dateCreated"], "October 2nd 2022, 8:00:00 am");
        assert_eq!(json["dateModified"], json["dateCreated"]);
    }

    #[test]
    fn listing_is_untagged() {
        let none: Listing<FreetResponse> =
            Listing::or_message(Vec::<PopulatedFreet>::new(), || "nothing here".into());
        assert_eq!(serde_json::to_value(none).unwrap(), "nothing here");

        let some: Listing<FreetResponse> = Listing::or_message(vec![sample_freet()], String::new);
        let json = serde_json::to_value(some).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(1));
    }
}
