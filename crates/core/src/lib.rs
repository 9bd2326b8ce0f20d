//! Persistence and authorization core of the quire blog backend.
//!
//! Articles and comments are records in a flat key-value namespace
//! ([`store`]); [`content`] lays out the key space and implements the
//! article/comment operations on top of it; [`auth`] resolves bearer
//! credentials into caller identities.

pub mod auth;
pub mod content;
pub mod error;
pub mod events;
pub mod store;

pub use content::ContentService;
pub use error::{ContentError, ContentResult};
