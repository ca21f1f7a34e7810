//! Identity propagation between the gateway and internal services.
//!
//! After verifying a bearer token the gateway replaces the caller's identity
//! with three plain headers. Internal services read them back without any
//! further verification, so they must only ever be reachable through the
//! gateway.

use http::HeaderMap;
use http::HeaderName;
use http::HeaderValue;
use thiserror::Error;

use crate::jwt::Claims;

/// Authenticated subject (principal email).
pub const X_AUTH_USER: HeaderName = HeaderName::from_static("x-auth-user");

/// Comma-joined role names.
pub const X_AUTH_ROLES: HeaderName = HeaderName::from_static("x-auth-roles");

/// Principal identifier.
pub const X_AUTH_USER_ID: HeaderName = HeaderName::from_static("x-auth-userid");

const ROLE_SEPARATOR: char = ',';

/// Errors turning claims into forwardable identity headers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("Missing required claim: {0}")]
    MissingClaim(&'static str),

    #[error("Claim {0} cannot be carried in a header")]
    InvalidHeaderValue(&'static str),
}

/// Identity derived from a verified token and forwarded downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardedIdentity {
    pub user: String,
    pub roles: Vec<String>,
    pub user_id: String,
}

impl ForwardedIdentity {
    /// Extract the identity from verified claims.
    ///
    /// `sub` and `userId` are required. A missing `role` yields an empty
    /// role list.
    ///
    /// # Errors
    /// * `MissingClaim` - `sub` or `userId` is absent
    pub fn from_claims(claims: &Claims) -> Result<Self, IdentityError> {
        let user = claims
            .sub
            .clone()
            .ok_or(IdentityError::MissingClaim("sub"))?;
        let user_id = claims
            .user_id
            .clone()
            .ok_or(IdentityError::MissingClaim("userId"))?;
        let roles = claims.role.iter().cloned().collect();

        Ok(Self {
            user,
            roles,
            user_id,
        })
    }

    /// Render the identity as header values, in `X-Auth-User`,
    /// `X-Auth-Roles`, `X-Auth-UserId` order.
    ///
    /// # Errors
    /// * `InvalidHeaderValue` - A claim contains characters not allowed in headers
    pub fn header_values(&self) -> Result<[(HeaderName, HeaderValue); 3], IdentityError> {
        let roles = self.roles.join(&ROLE_SEPARATOR.to_string());

        Ok([
            (X_AUTH_USER, header_value(&self.user, "sub")?),
            (X_AUTH_ROLES, header_value(&roles, "role")?),
            (X_AUTH_USER_ID, header_value(&self.user_id, "userId")?),
        ])
    }

    /// Replace any identity headers in `headers` with this identity.
    ///
    /// # Errors
    /// * `InvalidHeaderValue` - A claim contains characters not allowed in headers
    pub fn apply_to(&self, headers: &mut HeaderMap) -> Result<(), IdentityError> {
        for (name, value) in self.header_values()? {
            headers.insert(name, value);
        }
        Ok(())
    }

    /// Read a forwarded identity back from request headers.
    ///
    /// Returns `None` unless both `X-Auth-User` and `X-Auth-UserId` are present
    /// and readable.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let read = |name: &HeaderName| headers.get(name).and_then(|v| v.to_str().ok());

        let user = read(&X_AUTH_USER)?.to_string();
        let user_id = read(&X_AUTH_USER_ID)?.to_string();
        let roles = read(&X_AUTH_ROLES)
            .map(|roles| {
                roles
                    .split(ROLE_SEPARATOR)
                    .map(str::trim)
                    .filter(|role| !role.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            user,
            roles,
            user_id,
        })
    }
}

fn header_value(value: &str, claim: &'static str) -> Result<HeaderValue, IdentityError> {
    HeaderValue::from_str(value).map_err(|_| IdentityError::InvalidHeaderValue(claim))
}
