use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token issuing.
///
/// Owns the signing handler and the fixed token lifetime, so every token
/// issued by one authenticator carries the same expiry window.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_ttl: Duration,
}

/// Authentication operation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl From<PasswordError> for AuthenticationError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::Mismatch => AuthenticationError::InvalidCredentials,
            other => AuthenticationError::PasswordError(other),
        }
    }
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_handler` - Token codec built from the shared secret
    /// * `token_ttl` - Lifetime of every issued token
    pub fn new(jwt_handler: JwtHandler, token_ttl: Duration) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler,
            token_ttl,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is unusable
    pub fn verify_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<(), AuthenticationError> {
        Ok(self.password_hasher.verify(password, stored_hash)?)
    }

    /// Issue a token for an already authenticated principal.
    ///
    /// # Arguments
    /// * `subject` - Principal email, carried as `sub`
    /// * `user_id` - Principal identifier, carried as `userId`
    /// * `role` - Role name
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed or the lifetime is unusable
    pub fn issue_token(
        &self,
        subject: &str,
        user_id: impl ToString,
        role: &str,
    ) -> Result<String, JwtError> {
        let claims = Claims::for_principal(subject, user_id, role, self.token_ttl)?;
        self.jwt_handler.encode(&claims)
    }

    /// Validate and decode a token.
    ///
    /// # Errors
    /// * `JwtError` - Token validation or decoding failed
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }
}
