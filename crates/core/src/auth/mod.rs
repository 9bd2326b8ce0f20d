//! Authorization gate and the identity provider behind it.
//!
//! The gate turns an `Authorization` header value into an [`Identity`] or a
//! rejection. Token verification is delegated to an [`IdentityResolver`];
//! [`TokenAuthority`] is the HS256 JWT implementation used by the server.

pub mod accounts;
pub mod gate;
pub mod jwt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use accounts::{Account, AccountService};
pub use gate::AuthorizationGate;
pub use jwt::{Claims, IssuedToken, TokenAuthority};

/// A caller whose bearer credential resolved successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer credential")]
    MissingCredential,

    #[error("malformed bearer credential")]
    MalformedCredential,

    #[error("credential rejected: {0}")]
    Rejected(#[from] jsonwebtoken::errors::Error),

    #[error("invalid email or password")]
    InvalidLogin,
}

/// Resolves an opaque bearer token to the identity it asserts.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, token: &str) -> Result<Identity, AuthError>;
}
