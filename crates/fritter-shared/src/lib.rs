//! # fritter-shared
//!
//! Types shared by the Fritter store and server crates: length limits,
//! validated text newtypes and the validation error they produce.

pub mod constants;
pub mod error;
pub mod types;

pub use error::ValidationError;
pub use types::{optional_label, CommentContent, FeedName, FreetContent, Username};
