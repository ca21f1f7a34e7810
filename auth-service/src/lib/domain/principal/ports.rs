use async_trait::async_trait;

use crate::domain::principal::models::AuthenticatedPrincipal;
use crate::domain::principal::models::EmailAddress;
use crate::domain::principal::models::Principal;
use crate::domain::principal::models::RegisterCommand;
use crate::principal::errors::AuthError;

/// Port for authentication domain service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new principal and issue its first token.
    ///
    /// # Arguments
    /// * `command` - Validated registration data with plaintext password
    ///
    /// # Returns
    /// Created principal with an access token
    ///
    /// # Errors
    /// * `Conflict` - Email is already registered
    /// * `Password` - Password hashing failed
    /// * `Token` - Token generation failed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand)
        -> Result<AuthenticatedPrincipal, AuthError>;

    /// Verify credentials and issue a token.
    ///
    /// # Errors
    /// * `NotFound` - No principal with this email
    /// * `InvalidCredentials` - Wrong password or disabled account
    /// * `Token` - Token generation failed
    /// * `DatabaseError` - Database operation failed
    async fn login(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<AuthenticatedPrincipal, AuthError>;

    /// Check an email/password pair against stored credentials.
    ///
    /// # Returns
    /// The authenticated principal
    ///
    /// # Errors
    /// * `NotFound` - No principal with this email (exact match)
    /// * `InvalidCredentials` - Wrong password or disabled account
    /// * `Password` - Stored hash is unusable
    /// * `DatabaseError` - Database operation failed
    async fn verify_credentials(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<Principal, AuthError>;

    /// Issue a token for an authenticated principal. Nothing is persisted.
    ///
    /// # Errors
    /// * `Token` - Token generation failed
    fn issue_token(&self, principal: &Principal) -> Result<String, AuthError>;
}

/// Persistence operations for principal aggregate.
#[async_trait]
pub trait PrincipalRepository: Send + Sync + 'static {
    /// Persist new principal to storage.
    ///
    /// # Errors
    /// * `Conflict` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, principal: Principal) -> Result<Principal, AuthError>;

    /// Retrieve principal by exact email address.
    ///
    /// # Returns
    /// Optional principal (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Principal>, AuthError>;
}
