use std::sync::Arc;

use super::{AuthError, Identity, IdentityResolver};

const BEARER_SCHEME: &str = "bearer";

/// Guards mutating operations: header value in, identity or rejection out.
#[derive(Clone)]
pub struct AuthorizationGate {
    resolver: Arc<dyn IdentityResolver>,
}

impl AuthorizationGate {
    pub fn new(resolver: Arc<dyn IdentityResolver>) -> Self {
        Self { resolver }
    }

    /// Resolve the raw `Authorization` header value, if any.
    pub fn authorize(&self, header: Option<&str>) -> Result<Identity, AuthError> {
        let header = header.ok_or(AuthError::MissingCredential)?;
        let token = bearer_token(header).ok_or(AuthError::MalformedCredential)?;

        let identity = self.resolver.resolve(token)?;
        tracing::debug!(user_id = %identity.user_id, "credential resolved");
        Ok(identity)
    }
}

/// Token from a `Bearer <token>` header. The scheme name is case-insensitive.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }
    Some(token.trim()).filter(|t| !t.is_empty())
}

impl std::fmt::Debug for AuthorizationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationGate").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticResolver;

    impl IdentityResolver for StaticResolver {
        fn resolve(&self, token: &str) -> Result<Identity, AuthError> {
            if token == "good" {
                Ok(Identity {
                    user_id: "admin".into(),
                    email: None,
                    name: None,
                })
            } else {
                Err(AuthError::InvalidLogin)
            }
        }
    }

    fn gate() -> AuthorizationGate {
        AuthorizationGate::new(Arc::new(StaticResolver))
    }

    #[test]
    fn resolves_valid_bearer() {
        let identity = gate().authorize(Some("Bearer good")).unwrap();
        assert_eq!(identity.user_id, "admin");
    }

    #[test]
    fn scheme_is_case_insensitive() {
        for header in ["bearer good", "BEARER good", "BeArEr good"] {
            let identity = gate().authorize(Some(header)).unwrap();
            assert_eq!(identity.user_id, "admin");
        }
    }

    #[test]
    fn missing_header_is_rejected() {
        assert!(matches!(
            gate().authorize(None),
            Err(AuthError::MissingCredential)
        ));
    }

    #[test]
    fn malformed_header_is_rejected() {
        for header in ["good", "Basic good", "Bearer ", "Bearer    ", "Bearergood"] {
            assert!(
                matches!(
                    gate().authorize(Some(header)),
                    Err(AuthError::MalformedCredential)
                ),
                "{header:?} should be malformed"
            );
        }
    }

    #[test]
    fn resolver_rejection_propagates() {
        assert!(gate().authorize(Some("Bearer bad")).is_err());
    }
}
