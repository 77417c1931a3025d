//! Column conversions shared by the collections.
//!
//! Joined queries select whole entities side by side; the `read_*` helpers
//! take the index of an entity's first column so they can be composed.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use uuid::Uuid;

use crate::models::{Freet, User};

/// `users` columns in the order [`read_user`] expects.
pub(crate) const USER_WIDTH: usize = 3;

/// `freets` columns in the order [`read_freet`] expects.
pub(crate) const FREET_WIDTH: usize = 7;

pub(crate) fn user_columns(alias: &str) -> String {
    format!("{alias}.id, {alias}.username, {alias}.created_at")
}

pub(crate) fn freet_columns(alias: &str) -> String {
    format!(
        "{alias}.id, {alias}.author_id, {alias}.content, {alias}.topic, {alias}.country, \
         {alias}.created_at, {alias}.modified_at"
    )
}

/// Fixed-width RFC-3339 so that text ordering matches time ordering.
pub(crate) fn encode_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn uuid_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let s: String = row.get(idx)?;
    Uuid::parse_str(&s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let s: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn read_user(row: &Row<'_>, start: usize) -> rusqlite::Result<User> {
    Ok(User {
        id: uuid_at(row, start)?,
        username: row.get(start + 1)?,
        created_at: timestamp_at(row, start + 2)?,
    })
}

pub(crate) fn read_freet(row: &Row<'_>, start: usize) -> rusqlite::Result<Freet> {
    Ok(Freet {
        id: uuid_at(row, start)?,
        author_id: uuid_at(row, start + 1)?,
        content: row.get(start + 2)?,
        topic: row.get(start + 3)?,
        country: row.get(start + 4)?,
        created_at: timestamp_at(row, start + 5)?,
        modified_at: timestamp_at(row, start + 6)?,
    })
}
