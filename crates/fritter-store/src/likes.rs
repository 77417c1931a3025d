//! CRUD operations for [`Like`] records.
//!
//! Uniqueness of (author, freet) is a storage constraint: a second like
//! fails with [`StoreError::Duplicate`] instead of being checked for first.

use rusqlite::{params, OptionalExtension, Params};
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{Like, PopulatedLike};
use crate::rows::{freet_columns, read_freet, read_user, user_columns, uuid_at, USER_WIDTH};

const LIKE_WIDTH: usize = 3;

impl Database {
    /// Record that `author_id` likes `freet_id`.
    ///
    /// Fails with [`StoreError::Duplicate`] if the like already exists and
    /// with [`StoreError::MissingReference`] if the user or freet is missing.
    pub fn add_like(&self, author_id: Uuid, freet_id: Uuid) -> Result<PopulatedLike> {
        let id = Uuid::new_v4();

        self.conn()
            .execute(
                "INSERT INTO likes (id, author_id, freet_id) VALUES (?1, ?2, ?3)",
                params![id.to_string(), author_id.to_string(), freet_id.to_string()],
            )
            .map_err(StoreError::from_write)?;

        self.find_like(freet_id, author_id)?
            .ok_or(StoreError::NotFound)
    }

    /// Look up the like of `freet_id` by `author_id`.
    pub fn find_like(&self, freet_id: Uuid, author_id: Uuid) -> Result<Option<PopulatedLike>> {
        let sql = select_populated("WHERE l.freet_id = ?1 AND l.author_id = ?2");
        let like = self
            .conn()
            .query_row(
                &sql,
                params![freet_id.to_string(), author_id.to_string()],
                row_to_populated_like,
            )
            .optional()?;
        Ok(like)
    }

    /// Likes given by `username`.  Fails with [`StoreError::NotFound`] if no
    /// user has that name.
    pub fn find_likes_by_username(&self, username: &str) -> Result<Vec<PopulatedLike>> {
        let author = self.require_user_by_username(username)?;
        self.query_likes("WHERE l.author_id = ?1", params![author.id.to_string()])
    }

    pub fn find_likes_by_freet(&self, freet_id: Uuid) -> Result<Vec<PopulatedLike>> {
        self.query_likes("WHERE l.freet_id = ?1", params![freet_id.to_string()])
    }

    /// The rank of a freet: how many likes it has.
    pub fn like_rank(&self, freet_id: Uuid) -> Result<u64> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM likes WHERE freet_id = ?1",
            params![freet_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    fn query_likes<P: Params>(&self, filter: &str, params: P) -> Result<Vec<PopulatedLike>> {
        let sql = select_populated(filter);
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(params, row_to_populated_like)?;

        let mut likes = Vec::new();
        for row in rows {
            likes.push(row?);
        }
        Ok(likes)
    }

    /// Remove `author_id`'s like of `freet_id`.  Returns `true` if a row was
    /// deleted.
    pub fn delete_like(&self, author_id: Uuid, freet_id: Uuid) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM likes WHERE author_id = ?1 AND freet_id = ?2",
            params![author_id.to_string(), freet_id.to_string()],
        )?;
        Ok(affected > 0)
    }

    /// Delete every like of `freet_id`.
    pub fn delete_likes_by_freet(&self, freet_id: Uuid) -> Result<usize> {
        let affected = self.conn().execute(
            "DELETE FROM likes WHERE freet_id = ?1",
            params![freet_id.to_string()],
        )?;
        Ok(affected)
    }

    /// Delete every like given by `author_id`.
    pub fn delete_likes_by_user(&self, author_id: Uuid) -> Result<usize> {
        let affected = self.conn().execute(
            "DELETE FROM likes WHERE author_id = ?1",
            params![author_id.to_string()],
        )?;
        Ok(affected)
    }
}

fn select_populated(filter: &str) -> String {
    format!(
        "SELECT l.id, l.author_id, l.freet_id, {}, {}
         FROM likes l
         JOIN users u ON u.id = l.author_id
         JOIN freets f ON f.id = l.freet_id
         {filter}
         ORDER BY l.rowid ASC",
        user_columns("u"),
        freet_columns("f"),
    )
}

fn row_to_populated_like(row: &rusqlite::Row<'_>) -> rusqlite::Result<PopulatedLike> {
    let like = Like {
        id: uuid_at(row, 0)?,
        author_id: uuid_at(row, 1)?,
        freet_id: uuid_at(row, 2)?,
    };
    let author = read_user(row, LIKE_WIDTH)?;
    let freet = read_freet(row, LIKE_WIDTH + USER_WIDTH)?;

    Ok(PopulatedLike {
        like,
        author,
        freet,
    })
}
