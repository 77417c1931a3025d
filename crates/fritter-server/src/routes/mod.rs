//! HTTP handlers, one module per collection.  Each module exposes a
//! `router()` that `api::build_router` merges.

pub mod comments;
pub mod followees;
pub mod freets;
pub mod likes;
pub mod users;
