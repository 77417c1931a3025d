//! CRUD operations for [`Followee`] records.
//!
//! A feed is not a table of its own: it is the set of followee rows sharing
//! an (author, feed name) pair.

use rusqlite::{params, OptionalExtension, Params};
use uuid::Uuid;

use fritter_shared::FeedName;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{Followee, PopulatedFollowee};
use crate::rows::{read_user, user_columns, uuid_at, USER_WIDTH};

const FOLLOWEE_WIDTH: usize = 4;

impl Database {
    /// Add the user called `followee_username` to `author_id`'s feed
    /// `feed_name`, creating the feed if this is its first member.
    ///
    /// Fails with [`StoreError::NotFound`] if the username does not resolve
    /// and with [`StoreError::Duplicate`] if the user is already in that feed.
    pub fn add_followee(
        &self,
        author_id: Uuid,
        followee_username: &str,
        feed_name: &FeedName,
    ) -> Result<PopulatedFollowee> {
        let followed = self.require_user_by_username(followee_username)?;
        let id = Uuid::new_v4();

        self.conn()
            .execute(
                "INSERT INTO followees (id, author_id, followee_id, feed_name)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    id.to_string(),
                    author_id.to_string(),
                    followed.id.to_string(),
                    feed_name.as_str(),
                ],
            )
            .map_err(StoreError::from_write)?;

        self.find_followee(id)?.ok_or(StoreError::NotFound)
    }

    pub fn find_followee(&self, id: Uuid) -> Result<Option<PopulatedFollowee>> {
        let sql = select_populated("WHERE fo.id = ?1");
        let followee = self
            .conn()
            .query_row(&sql, params![id.to_string()], row_to_populated_followee)
            .optional()?;
        Ok(followee)
    }

    /// Any one member of `author_id`'s feed `feed_name`, or `None` if the feed
    /// has no members (i.e. does not exist).
    pub fn find_followee_by_feed_name(
        &self,
        feed_name: &str,
        author_id: Uuid,
    ) -> Result<Option<Followee>> {
        let followee = self
            .conn()
            .query_row(
                "SELECT id, author_id, followee_id, feed_name
                 FROM followees
                 WHERE author_id = ?1 AND feed_name = ?2
                 ORDER BY rowid ASC
                 LIMIT 1",
                params![author_id.to_string(), feed_name],
                |row| {
                    Ok(Followee {
                        id: uuid_at(row, 0)?,
                        author_id: uuid_at(row, 1)?,
                        followee_id: uuid_at(row, 2)?,
                        feed_name: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(followee)
    }

    /// Every followee across all of `author_id`'s feeds.
    pub fn find_all_followees(&self, author_id: Uuid) -> Result<Vec<PopulatedFollowee>> {
        self.query_followees("WHERE fo.author_id = ?1", params![author_id.to_string()])
    }

    /// Members of one feed.
    pub fn find_followees_by_feed_name(
        &self,
        author_id: Uuid,
        feed_name: &str,
    ) -> Result<Vec<PopulatedFollowee>> {
        self.query_followees(
            "WHERE fo.author_id = ?1 AND fo.feed_name = ?2",
            params![author_id.to_string(), feed_name],
        )
    }

    fn query_followees<P: Params>(
        &self,
        filter: &str,
        params: P,
    ) -> Result<Vec<PopulatedFollowee>> {
        let sql = select_populated(filter);
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(params, row_to_populated_followee)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }

    pub fn delete_followee(&self, id: Uuid) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM followees WHERE id = ?1", params![id.to_string()])?;
        Ok(affected > 0)
    }

    /// Empty one feed.  Returns the number of members removed.
    pub fn delete_feed(&self, author_id: Uuid, feed_name: &str) -> Result<usize> {
        let affected = self.conn().execute(
            "DELETE FROM followees WHERE author_id = ?1 AND feed_name = ?2",
            params![author_id.to_string(), feed_name],
        )?;
        Ok(affected)
    }

    /// Remove all of `author_id`'s feeds.
    pub fn delete_followees_by_author(&self, author_id: Uuid) -> Result<usize> {
        let affected = self.conn().execute(
            "DELETE FROM followees WHERE author_id = ?1",
            params![author_id.to_string()],
        )?;
        Ok(affected)
    }

    /// Remove `followee_id` from every feed that follows them.
    pub fn delete_followees_of_user(&self, followee_id: Uuid) -> Result<usize> {
        let affected = self.conn().execute(
            "DELETE FROM followees WHERE followee_id = ?1",
            params![followee_id.to_string()],
        )?;
        Ok(affected)
    }
}

fn select_populated(filter: &str) -> String {
    format!(
        "SELECT fo.id, fo.author_id, fo.followee_id, fo.feed_name, {}, {}
         FROM followees fo
         JOIN users a ON a.id = fo.author_id
         JOIN users b ON b.id = fo.followee_id
         {filter}
         ORDER BY fo.rowid ASC",
        user_columns("a"),
        user_columns("b"),
    )
}

fn row_to_populated_followee(row: &rusqlite::Row<'_>) -> rusqlite::Result<PopulatedFollowee> {
    let followee = Followee {
        id: uuid_at(row, 0)?,
        author_id: uuid_at(row, 1)?,
        followee_id: uuid_at(row, 2)?,
        feed_name: row.get(3)?,
    };
    let author = read_user(row, FOLLOWEE_WIDTH)?;
    let followed = read_user(row, FOLLOWEE_WIDTH + USER_WIDTH)?;

    Ok(PopulatedFollowee {
        followee,
        author,
        followed,
    })
}
