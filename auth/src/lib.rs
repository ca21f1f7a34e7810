//! Authentication utilities library
//!
//! Provides the authentication core shared by the transport services:
//! - Token codec (HS256 JWT signed with a base64 shared secret)
//! - Password hashing (Argon2id)
//! - Token issuing with a fixed expiry window
//! - Identity header protocol between the gateway and internal services
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).is_ok());
//! ```
//!
//! ## Issuing and verifying tokens
//! ```
//! use auth::{Authenticator, JwtHandler};
//! use chrono::Duration;
//!
//! let handler = JwtHandler::from_base64_secret("uXceU/Fkk7ofRCjf2ZZTat1yjB590H0hAcbFHcSwUO0=").unwrap();
//! let auth = Authenticator::new(handler, Duration::hours(24));
//!
//! let token = auth.issue_token("a@x.com", 42, "STUDENT").unwrap();
//! let claims = auth.validate_token(&token).unwrap();
//! assert_eq!(claims.sub.as_deref(), Some("a@x.com"));
//! ```

pub mod authenticator;
pub mod identity;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use identity::ForwardedIdentity;
pub use identity::IdentityError;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
