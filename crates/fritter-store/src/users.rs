//! CRUD operations for [`User`] records, plus account removal.
//!
//! Users are owned by the authentication side of the application; this
//! module only keeps what the social collections need to resolve usernames
//! and clean up after an account goes away.

use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use fritter_shared::Username;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::User;
use crate::rows::{encode_timestamp, read_user};

impl Database {
    /// Insert a new user.  Fails with [`StoreError::Duplicate`] if the
    /// username is taken.
    pub fn create_user(&self, username: &Username) -> Result<User> {
        let id = Uuid::new_v4();

        self.conn()
            .execute(
                "INSERT INTO users (id, username, created_at) VALUES (?1, ?2, ?3)",
                params![
                    id.to_string(),
                    username.as_str(),
                    encode_timestamp(Utc::now()),
                ],
            )
            .map_err(StoreError::from_write)?;

        self.find_user(id)?.ok_or(StoreError::NotFound)
    }

    pub fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        let user = self
            .conn()
            .query_row(
                "SELECT id, username, created_at FROM users WHERE id = ?1",
                params![id.to_string()],
                |row| read_user(row, 0),
            )
            .optional()?;
        Ok(user)
    }

    pub fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = self
            .conn()
            .query_row(
                "SELECT id, username, created_at FROM users WHERE username = ?1",
                params![username],
                |row| read_user(row, 0),
            )
            .optional()?;
        Ok(user)
    }

    /// Resolve a username to its user, failing with [`StoreError::NotFound`].
    pub(crate) fn require_user_by_username(&self, username: &str) -> Result<User> {
        self.find_user_by_username(username)?
            .ok_or(StoreError::NotFound)
    }

    /// Delete the user row alone.  Fails with [`StoreError::MissingReference`]
    /// while anything still points at the user; see
    /// [`Database::remove_user_account`].
    pub fn delete_user(&self, id: Uuid) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM users WHERE id = ?1", params![id.to_string()])
            .map_err(StoreError::from_write)?;
        Ok(affected > 0)
    }

    /// Remove a user together with everything that references them, in one
    /// transaction: their likes and comments, likes and comments on their
    /// freets, the feeds they own, feed entries following them, their
    /// freets, and finally the user row.
    ///
    /// Returns `false` if no such user existed.
    pub fn remove_user_account(&self, id: Uuid) -> Result<bool> {
        let tx = self.conn().unchecked_transaction()?;

        for freet_id in self.freet_ids_by_author(id)? {
            self.delete_likes_by_freet(freet_id)?;
            self.delete_comments_by_freet(freet_id)?;
        }
        let likes = self.delete_likes_by_user(id)?;
        let comments = self.delete_comments_by_author(id)?;
        let feeds = self.delete_followees_by_author(id)?;
        let followers = self.delete_followees_of_user(id)?;
        let freets = self.delete_freets_by_author(id)?;
        let removed = self.delete_user(id)?;

        tx.commit()?;

        tracing::info!(
            user_id = %id,
            removed,
            likes,
            comments,
            feeds,
            followers,
            freets,
            "user account removed"
        );
        Ok(removed)
    }
}
