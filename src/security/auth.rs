//! HTTP Basic authentication and role checks.
//!
//! The middleware authenticates every API request and attaches a
//! [`Principal`]; handlers that mutate data additionally extract
//! [`RequireAdmin`].

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use subtle::ConstantTimeEq;

use crate::config::{AuthConfig, Role, UserConfig};
use crate::http::response::ApiError;

/// Realm used when no authenticator ran for the request.
pub const DEFAULT_REALM: &str = "employee-api";

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Checks Basic credentials against the configured users.
#[derive(Debug)]
pub struct Authenticator {
    realm: String,
    users: Vec<UserConfig>,
}

impl Authenticator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            realm: config.realm.clone(),
            users: config.users.clone(),
        }
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Resolve an `Authorization` header value to a principal.
    pub fn authenticate(&self, header: Option<&str>) -> Option<Principal> {
        let (username, password) = parse_basic(header?)?;

        // Compare against every user so timing does not reveal which matched.
        let mut matched = None;
        for user in &self.users {
            let name_ok = user.username.as_bytes().ct_eq(username.as_bytes());
            let pass_ok = user.password.as_bytes().ct_eq(password.as_bytes());
            if bool::from(name_ok & pass_ok) && matched.is_none() {
                matched = Some(Principal {
                    username: user.username.clone(),
                    role: user.role,
                });
            }
        }
        matched
    }
}

/// Split `Basic <base64(user:pass)>` into its parts.
fn parse_basic(header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Middleware rejecting requests without valid credentials.
pub async fn auth_middleware(
    State(auth): State<Arc<Authenticator>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match auth.authenticate(header) {
        Some(principal) => {
            tracing::debug!(user = %principal.username, role = ?principal.role, "Authenticated");
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        None => ApiError::Unauthorized {
            realm: auth.realm().to_string(),
        }
        .into_response(),
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized {
                realm: DEFAULT_REALM.to_string(),
            })
    }
}

/// Extractor that only succeeds for admin principals.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Principal);

impl<S: Send + Sync> FromRequestParts<S> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let principal = Principal::from_request_parts(parts, state).await?;
        if principal.is_admin() {
            Ok(RequireAdmin(principal))
        } else {
            tracing::warn!(user = %principal.username, path = %parts.uri.path(), "Admin role required");
            Err(ApiError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(user: &str, pass: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{user}:{pass}")))
    }

    fn authenticator() -> Authenticator {
        Authenticator::new(&AuthConfig::default())
    }

    #[test]
    fn test_parse_basic() {
        assert_eq!(
            parse_basic(&basic("admin", "se:cret")),
            Some(("admin".to_string(), "se:cret".to_string()))
        );
        assert_eq!(parse_basic("Bearer abc"), None);
        assert_eq!(parse_basic("Basic !!!notbase64"), None);
        assert_eq!(parse_basic(&format!("Basic {}", STANDARD.encode("nocolon"))), None);
    }

    #[test]
    fn test_authenticate_roles() {
        let auth = authenticator();
        let admin = auth.authenticate(Some(&basic("admin", "secure123"))).unwrap();
        assert!(admin.is_admin());

        let user = auth.authenticate(Some(&basic("user", "user123"))).unwrap();
        assert_eq!(user.role, Role::User);
        assert!(!user.is_admin());
    }

    #[test]
    fn test_authenticate_rejects() {
        let auth = authenticator();
        assert!(auth.authenticate(None).is_none());
        assert!(auth.authenticate(Some(&basic("admin", "wrong"))).is_none());
        assert!(auth.authenticate(Some(&basic("ghost", "secure123"))).is_none());
        assert!(auth.authenticate(Some(&basic("admin", "secure1234"))).is_none());
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let auth = authenticator();
        let header = basic("user", "user123").replacen("Basic", "basic", 1);
        assert!(auth.authenticate(Some(&header)).is_some());
    }
}
