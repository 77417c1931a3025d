//! # fritter-store
//!
//! Persistence for the Fritter backend, backed by SQLite.
//!
//! The crate exposes a synchronous `Database` handle that wraps a
//! `rusqlite::Connection` and provides one typed collection per entity:
//! users, freets, comments, likes and followees.  Stored rows keep their
//! foreign keys as opaque UUIDs; the collections resolve them with explicit
//! joins into the `Populated*` read models.

pub mod comments;
pub mod database;
pub mod followees;
pub mod freets;
pub mod likes;
pub mod migrations;
pub mod models;
pub mod users;

mod error;
mod rows;

pub use database::Database;
pub use error::{Result, StoreError};
pub use models::*;
