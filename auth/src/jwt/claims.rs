use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Token claims shared by the auth service (issuer) and the gateway (verifier).
///
/// Every field is optional on the wire so that a token missing an identity
/// claim still decodes and can be rejected at claim extraction instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (principal email)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Principal identifier
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Single role name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create claims for an authenticated principal, valid for `ttl` from now.
    ///
    /// # Arguments
    /// * `subject` - Principal email
    /// * `user_id` - Principal identifier
    /// * `role` - Role name
    /// * `ttl` - Lifetime of the token
    ///
    /// # Errors
    /// * `EncodingFailed` - `ttl` is not positive or the expiry overflows
    pub fn for_principal(
        subject: impl ToString,
        user_id: impl ToString,
        role: impl ToString,
        ttl: Duration,
    ) -> Result<Self, JwtError> {
        if ttl <= Duration::zero() {
            return Err(JwtError::EncodingFailed(format!(
                "token lifetime must be positive, got {}s",
                ttl.num_seconds()
            )));
        }

        let now = Utc::now();
        let exp = now.checked_add_signed(ttl).ok_or_else(|| {
            JwtError::EncodingFailed("token expiry is out of range".to_string())
        })?;

        Ok(Self {
            sub: Some(subject.to_string()),
            user_id: Some(user_id.to_string()),
            role: Some(role.to_string()),
            iat: Some(now.timestamp()),
            exp: Some(exp.timestamp()),
        })
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set user identifier.
    pub fn with_user_id(mut self, user_id: impl ToString) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }

    /// Set role.
    pub fn with_role(mut self, role: impl ToString) -> Self {
        self.role = Some(role.to_string());
        self
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Check if the claims are expired at `current_timestamp`.
    ///
    /// A token is only valid strictly before its expiry, and claims without
    /// an `exp` are treated as expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp.map_or(true, |exp| current_timestamp >= exp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_principal() {
        let claims =
            Claims::for_principal("a@x.com", "42", "STUDENT", Duration::hours(24)).unwrap();

        assert_eq!(claims.sub.as_deref(), Some("a@x.com"));
        assert_eq!(claims.user_id.as_deref(), Some("42"));
        assert_eq!(claims.role.as_deref(), Some("STUDENT"));

        let exp = claims.exp.unwrap();
        let iat = claims.iat.unwrap();
        assert_eq!(exp - iat, 24 * 60 * 60);
    }

    #[test]
    fn test_for_principal_rejects_unusable_lifetime() {
        assert!(matches!(
            Claims::for_principal("a@x.com", "42", "STUDENT", Duration::zero()),
            Err(JwtError::EncodingFailed(_))
        ));
        assert!(matches!(
            Claims::for_principal("a@x.com", "42", "STUDENT", Duration::hours(-1)),
            Err(JwtError::EncodingFailed(_))
        ));
        // Far past the largest representable date
        assert!(matches!(
            Claims::for_principal("a@x.com", "42", "STUDENT", Duration::days(365 * 300_000)),
            Err(JwtError::EncodingFailed(_))
        ));
    }

    #[test]
    fn test_user_id_serialized_as_camel_case() {
        let claims = Claims::new().with_subject("a@x.com").with_user_id("42");
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["userId"], "42");
        assert!(json.get("user_id").is_none());
        assert!(json.get("role").is_none());
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims::new().with_expiration(1000);

        assert!(!claims.is_expired(999));
        assert!(claims.is_expired(1000)); // Expiry instant is no longer valid
        assert!(claims.is_expired(1001));
    }

    #[test]
    fn test_is_expired_no_exp_claim() {
        assert!(Claims::new().is_expired(0));
    }
}
