//! v001 -- Initial schema creation.
//!
//! Creates `users`, `freets`, `comments`, `likes` and `followees`.  Foreign
//! keys have no ON DELETE action: dependent rows are removed explicitly by
//! the collections before their parent goes.

use rusqlite::Connection;

const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Users
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id         TEXT PRIMARY KEY NOT NULL,     -- UUID v4
    username   TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL                  -- RFC-3339, UTC, microseconds
);

-- ----------------------------------------------------------------
-- Freets
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS freets (
    id          TEXT PRIMARY KEY NOT NULL,    -- UUID v4
    author_id   TEXT NOT NULL,                -- FK -> users(id)
    content     TEXT NOT NULL,
    topic       TEXT,
    country     TEXT,
    created_at  TEXT NOT NULL,
    modified_at TEXT NOT NULL,

    FOREIGN KEY (author_id) REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_freets_author ON freets(author_id);
CREATE INDEX IF NOT EXISTS idx_freets_modified ON freets(modified_at DESC);
CREATE INDEX IF NOT EXISTS idx_freets_topic ON freets(topic);
CREATE INDEX IF NOT EXISTS idx_freets_country ON freets(country);

-- ----------------------------------------------------------------
-- Comments
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS comments (
    id         TEXT PRIMARY KEY NOT NULL,     -- UUID v4
    author_id  TEXT NOT NULL,                 -- FK -> users(id)
    freet_id   TEXT NOT NULL,                 -- FK -> freets(id)
    content    TEXT NOT NULL,
    created_at TEXT NOT NULL,

    FOREIGN KEY (author_id) REFERENCES users(id),
    FOREIGN KEY (freet_id) REFERENCES freets(id)
);

CREATE INDEX IF NOT EXISTS idx_comments_author ON comments(author_id);
CREATE INDEX IF NOT EXISTS idx_comments_freet ON comments(freet_id);

-- ----------------------------------------------------------------
-- Likes
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS likes (
    id        TEXT PRIMARY KEY NOT NULL,      -- UUID v4
    author_id TEXT NOT NULL,                  -- FK -> users(id)
    freet_id  TEXT NOT NULL,                  -- FK -> freets(id)

    FOREIGN KEY (author_id) REFERENCES users(id),
    FOREIGN KEY (freet_id) REFERENCES freets(id)
);

-- One like per (author, freet).
CREATE UNIQUE INDEX IF NOT EXISTS idx_likes_unique ON likes(author_id, freet_id);
CREATE INDEX IF NOT EXISTS idx_likes_freet ON likes(freet_id);

-- ----------------------------------------------------------------
-- Followees (named follow-feeds)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS followees (
    id          TEXT PRIMARY KEY NOT NULL,    -- UUID v4
    author_id   TEXT NOT NULL,                -- FK -> users(id), the follower
    followee_id TEXT NOT NULL,                -- FK -> users(id), the followed user
    feed_name   TEXT NOT NULL,

    FOREIGN KEY (author_id) REFERENCES users(id),
    FOREIGN KEY (followee_id) REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_followees_feed ON followees(author_id, feed_name);
CREATE INDEX IF NOT EXISTS idx_followees_followee ON followees(followee_id);
CREATE UNIQUE INDEX IF NOT EXISTS idx_followees_unique
    ON followees(author_id, followee_id, feed_name);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
