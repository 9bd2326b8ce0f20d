//! HTTP surface of the quire blog backend.
//! Exposed as a library so integration tests can build the router directly;
//! the binary entry point is in main.rs.

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;
