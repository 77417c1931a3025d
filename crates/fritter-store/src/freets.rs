//! CRUD operations for [`Freet`] records.

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Params};
use uuid::Uuid;

use fritter_shared::FreetContent;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{Freet, PopulatedFreet};
use crate::rows::{
    encode_timestamp, freet_columns, read_freet, read_user, user_columns, uuid_at, FREET_WIDTH,
};

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new freet with server-assigned timestamps.
    ///
    /// Topic and country are stored as given; callers normalise blank
    /// labels to `None`.  Fails with [`StoreError::MissingReference`] if the
    /// author does not exist.
    pub fn create_freet(
        &self,
        author_id: Uuid,
        content: &FreetContent,
        topic: Option<&str>,
        country: Option<&str>,
    ) -> Result<PopulatedFreet> {
        let id = Uuid::new_v4();
        let now = encode_timestamp(Utc::now());

        self.conn()
            .execute(
                "INSERT INTO freets (id, author_id, content, topic, country, created_at, modified_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                params![
                    id.to_string(),
                    author_id.to_string(),
                    content.as_str(),
                    topic,
                    country,
                    now,
                ],
            )
            .map_err(StoreError::from_write)?;

        self.find_freet(id)?.ok_or(StoreError::NotFound)
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    pub fn find_freet(&self, id: Uuid) -> Result<Option<PopulatedFreet>> {
        let sql = select_populated("WHERE f.id = ?1");
        let freet = self
            .conn()
            .query_row(&sql, params![id.to_string()], row_to_populated_freet)
            .optional()?;
        Ok(freet)
    }

    /// Every freet, most recently modified first.
    pub fn find_all_freets(&self) -> Result<Vec<PopulatedFreet>> {
        self.query_freets("", [])
    }

    /// Freets written by `username`.  Fails with [`StoreError::NotFound`] if
    /// no user has that name.
    pub fn find_freets_by_username(&self, username: &str) -> Result<Vec<PopulatedFreet>> {
        let author = self.require_user_by_username(username)?;
        self.query_freets("WHERE f.author_id = ?1", params![author.id.to_string()])
    }

    pub fn find_freets_by_topic(&self, topic: &str) -> Result<Vec<PopulatedFreet>> {
        self.query_freets("WHERE f.topic = ?1", params![topic])
    }

    pub fn find_freets_by_country(&self, country: &str) -> Result<Vec<PopulatedFreet>> {
        self.query_freets("WHERE f.country = ?1", params![country])
    }

    /// Timeline of one of `author_id`'s feeds: freets written by the users
    /// the feed follows.
    pub fn find_freets_in_feed(
        &self,
        author_id: Uuid,
        feed_name: &str,
    ) -> Result<Vec<PopulatedFreet>> {
        self.query_freets(
            "WHERE f.author_id IN (
                 SELECT followee_id FROM followees WHERE author_id = ?1 AND feed_name = ?2
             )",
            params![author_id.to_string(), feed_name],
        )
    }

    pub(crate) fn freet_ids_by_author(&self, author_id: Uuid) -> Result<Vec<Uuid>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT id FROM freets WHERE author_id = ?1")?;
        let rows = stmt.query_map(params![author_id.to_string()], |row| uuid_at(row, 0))?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }

    fn query_freets<P: Params>(&self, filter: &str, params: P) -> Result<Vec<PopulatedFreet>> {
        let sql = select_populated(filter);
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(params, row_to_populated_freet)?;

        let mut freets = Vec::new();
        for row in rows {
            freets.push(row?);
        }
        tracing::debug!(count = freets.len(), filter, "queried freets");
        Ok(freets)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Replace a freet's content and bump its modification time.  A `None`
    /// topic or country keeps the stored value.
    pub fn update_freet(
        &self,
        id: Uuid,
        content: &FreetContent,
        topic: Option<&str>,
        country: Option<&str>,
    ) -> Result<PopulatedFreet> {
        let affected = self
            .conn()
            .execute(
                "UPDATE freets
                 SET content = ?2,
                     topic = COALESCE(?3, topic),
                     country = COALESCE(?4, country),
                     modified_at = ?5
                 WHERE id = ?1",
                params![
                    id.to_string(),
                    content.as_str(),
                    topic,
                    country,
                    encode_timestamp(Utc::now()),
                ],
            )
            .map_err(StoreError::from_write)?;

        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        self.find_freet(id)?.ok_or(StoreError::NotFound)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete the freet row alone.  Fails with
    /// [`StoreError::MissingReference`] while likes or comments point at it.
    pub fn delete_freet(&self, id: Uuid) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM freets WHERE id = ?1", params![id.to_string()])
            .map_err(StoreError::from_write)?;
        Ok(affected > 0)
    }

    /// Delete a freet with its likes and comments, in one transaction.
    pub fn remove_freet(&self, id: Uuid) -> Result<bool> {
        let tx = self.conn().unchecked_transaction()?;
        let likes = self.delete_likes_by_freet(id)?;
        let comments = self.delete_comments_by_freet(id)?;
        let removed = self.delete_freet(id)?;
        tx.commit()?;

        tracing::debug!(freet_id = %id, likes, comments, "freet removed with dependents");
        Ok(removed)
    }

    /// Delete every freet by `author_id`.  Their likes and comments must be
    /// gone first.
    pub fn delete_freets_by_author(&self, author_id: Uuid) -> Result<usize> {
        let affected = self
            .conn()
            .execute(
                "DELETE FROM freets WHERE author_id = ?1",
                params![author_id.to_string()],
            )
            .map_err(StoreError::from_write)?;
        Ok(affected)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn select_populated(filter: &str) -> String {
    format!(
        "SELECT {}, {}
         FROM freets f
         JOIN users u ON u.id = f.author_id
         {filter}
         ORDER BY f.modified_at DESC, f.rowid DESC",
        freet_columns("f"),
        user_columns("u"),
    )
}

fn row_to_populated_freet(row: &rusqlite::Row<'_>) -> rusqlite::Result<PopulatedFreet> {
    let freet: Freet = read_freet(row, 0)?;
    let author = read_user(row, FREET_WIDTH)?;
    Ok(PopulatedFreet { freet, author })
}
