//! Bearer-token verification applied to every request entering the gateway.
//!
//! A request either targets a public prefix and is forwarded untouched, or it
//! must carry `Authorization: Bearer <token>` signed with the shared key. A
//! verified token is replaced downstream by the `X-Auth-*` identity headers.

use std::sync::Arc;

use auth::ForwardedIdentity;
use auth::IdentityError;
use auth::JwtError;
use auth::JwtHandler;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use thiserror::Error;

use super::handlers::ApiError;
use super::router::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Reasons a request is rejected. Logged, never shown to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Authorization header is missing")]
    MissingHeader,

    #[error("Authorization header is not a bearer token")]
    MalformedHeader,

    #[error("Token rejected: {0}")]
    InvalidToken(#[from] JwtError),

    #[error("Claim extraction failed: {0}")]
    ClaimExtraction(#[from] IdentityError),
}

/// Outcome of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Path is public, forward unchanged
    Public,
    /// Token verified, forward with this identity
    Authenticated(ForwardedIdentity),
}

pub struct GatewayVerifier {
    jwt_handler: Arc<JwtHandler>,
    public_prefixes: Vec<String>,
}

impl GatewayVerifier {
    pub fn new(jwt_handler: Arc<JwtHandler>, public_prefixes: Vec<String>) -> Self {
        Self {
            jwt_handler,
            public_prefixes,
        }
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Decide whether a request may pass.
    ///
    /// # Errors
    /// * `MissingHeader` - No `Authorization` header on a protected path
    /// * `MalformedHeader` - Header is not visible ASCII or lacks the `Bearer ` prefix
    /// * `InvalidToken` - Signature, structure or expiry check failed
    /// * `ClaimExtraction` - Required claims absent or not header-safe
    pub fn verify(&self, path: &str, headers: &HeaderMap) -> Result<Verdict, GatewayError> {
        if self.is_public(path) {
            return Ok(Verdict::Public);
        }

        let header = headers
            .get(AUTHORIZATION)
            .ok_or(GatewayError::MissingHeader)?
            .to_str()
            .map_err(|_| GatewayError::MalformedHeader)?;

        let token = header
            .strip_prefix(BEARER_PREFIX)
            .ok_or(GatewayError::MalformedHeader)?;

        let claims = self.jwt_handler.decode(token)?;
        let identity = ForwardedIdentity::from_claims(&claims)?;

        // Reject claims that cannot travel as headers before forwarding anything
        identity.header_values()?;

        Ok(Verdict::Authenticated(identity))
    }
}

/// Middleware that verifies the bearer token and injects identity headers
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let verdict = state
        .verifier
        .verify(req.uri().path(), req.headers())
        .map_err(|e| {
            tracing::warn!(
                path = %req.uri().path(),
                reason = %e,
                "Request rejected"
            );
            ApiError::from(e)
        })?;

    if let Verdict::Authenticated(identity) = verdict {
        identity
            .apply_to(req.headers_mut())
            .map_err(|e| ApiError::from(GatewayError::from(e)))?;
        tracing::debug!(
            user = %identity.user,
            user_id = %identity.user_id,
            "Request authenticated"
        );
    }

    Ok(next.run(req).await)
}
