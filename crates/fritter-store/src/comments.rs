//! CRUD operations for [`Comment`] records.  Comments are write-once: there
//! is no update.

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Params};
use uuid::Uuid;

use fritter_shared::CommentContent;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{Comment, PopulatedComment};
use crate::rows::{
    encode_timestamp, freet_columns, read_freet, read_user, timestamp_at, user_columns, uuid_at,
    USER_WIDTH,
};

const COMMENT_WIDTH: usize = 5;

impl Database {
    /// Insert a comment on `freet_id`.  Fails with
    /// [`StoreError::MissingReference`] if the author or freet is missing.
    pub fn create_comment(
        &self,
        author_id: Uuid,
        freet_id: Uuid,
        content: &CommentContent,
    ) -> Result<PopulatedComment> {
        let id = Uuid::new_v4();

        self.conn()
            .execute(
                "INSERT INTO comments (id, author_id, freet_id, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    id.to_string(),
                    author_id.to_string(),
                    freet_id.to_string(),
                    content.as_str(),
                    encode_timestamp(Utc::now()),
                ],
            )
            .map_err(StoreError::from_write)?;

        self.find_comment(id)?.ok_or(StoreError::NotFound)
    }

    pub fn find_comment(&self, id: Uuid) -> Result<Option<PopulatedComment>> {
        let sql = select_populated("WHERE c.id = ?1");
        let comment = self
            .conn()
            .query_row(&sql, params![id.to_string()], row_to_populated_comment)
            .optional()?;
        Ok(comment)
    }

    /// Every comment, newest first.
    pub fn find_all_comments(&self) -> Result<Vec<PopulatedComment>> {
        self.query_comments("", [])
    }

    /// Comments written by `username`.  Fails with [`StoreError::NotFound`]
    /// if no user has that name.
    pub fn find_comments_by_username(&self, username: &str) -> Result<Vec<PopulatedComment>> {
        let author = self.require_user_by_username(username)?;
        self.query_comments("WHERE c.author_id = ?1", params![author.id.to_string()])
    }

    pub fn find_comments_by_freet(&self, freet_id: Uuid) -> Result<Vec<PopulatedComment>> {
        self.query_comments("WHERE c.freet_id = ?1", params![freet_id.to_string()])
    }

    fn query_comments<P: Params>(
        &self,
        filter: &str,
        params: P,
    ) -> Result<Vec<PopulatedComment>> {
        let sql = select_populated(filter);
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(params, row_to_populated_comment)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }

    pub fn delete_comment(&self, id: Uuid) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM comments WHERE id = ?1", params![id.to_string()])?;
        Ok(affected > 0)
    }

    /// Delete every comment written by `author_id`.
    pub fn delete_comments_by_author(&self, author_id: Uuid) -> Result<usize> {
        let affected = self.conn().execute(
            "DELETE FROM comments WHERE author_id = ?1",
            params![author_id.to_string()],
        )?;
        Ok(affected)
    }

    /// Delete every comment under `freet_id`.
    pub fn delete_comments_by_freet(&self, freet_id: Uuid) -> Result<usize> {
        let affected = self.conn().execute(
            "DELETE FROM comments WHERE freet_id = ?1",
            params![freet_id.to_string()],
        )?;
        Ok(affected)
    }
}

fn select_populated(filter: &str) -> String {
    format!(
        "SELECT c.id, c.author_id, c.freet_id, c.content, c.created_at, {}, {}
         FROM comments c
         JOIN users u ON u.id = c.author_id
         JOIN freets f ON f.id = c.freet_id
         {filter}
         ORDER BY c.created_at DESC, c.rowid DESC",
        user_columns("u"),
        freet_columns("f"),
    )
}

fn row_to_populated_comment(row: &rusqlite::Row<'_>) -> rusqlite::Result<PopulatedComment> {
    let comment = Comment {
        id: uuid_at(row, 0)?,
        author_id: uuid_at(row, 1)?,
        freet_id: uuid_at(row, 2)?,
        content: row.get(3)?,
        created_at: timestamp_at(row, 4)?,
    };
    let author = read_user(row, COMMENT_WIDTH)?;
    let freet = read_freet(row, COMMENT_WIDTH + USER_WIDTH)?;

    Ok(PopulatedComment {
        comment,
        author,
        freet,
    })
}
