use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::principal::models::AuthenticatedPrincipal;
use crate::domain::principal::models::EmailAddress;
use crate::domain::principal::models::Principal;
use crate::domain::principal::models::PrincipalId;
use crate::domain::principal::models::RegisterCommand;
use crate::principal::errors::AuthError;
use crate::principal::ports::AuthServicePort;
use crate::principal::ports::PrincipalRepository;

/// Domain service implementation for registration and login.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct AuthService<PR>
where
    PR: PrincipalRepository,
{
    repository: Arc<PR>,
    authenticator: Arc<Authenticator>,
}

impl<PR> AuthService<PR>
where
    PR: PrincipalRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Principal persistence implementation
    /// * `authenticator` - Password hashing and token issuing
    pub fn new(repository: Arc<PR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<PR> AuthServicePort for AuthService<PR>
where
    PR: PrincipalRepository,
{
    async fn register(
        &self,
        command: RegisterCommand,
    ) -> Result<AuthenticatedPrincipal, AuthError> {
        if self
            .repository
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            return Err(AuthError::Conflict(command.email.to_string()));
        }

        let password_hash = self
            .authenticator
            .hash_password(&command.password)
            .map_err(|e| AuthError::Password(e.to_string()))?;

        let now = Utc::now();
        let principal = Principal {
            id: PrincipalId::new(),
            email: command.email,
            password_hash,
            full_name: command.full_name,
            role: command.role,
            enabled: true,
            location: command.location,
            created_at: now,
            updated_at: now,
        };

        let principal = self.repository.create(principal).await?;
        tracing::info!(
            principal_id = %principal.id,
            role = %principal.role,
            "Principal registered"
        );

        let access_token = self.issue_token(&principal)?;

        Ok(AuthenticatedPrincipal {
            principal,
            access_token,
        })
    }

    async fn login(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<AuthenticatedPrincipal, AuthError> {
        let principal = self.verify_credentials(email, password).await?;
        let access_token = self.issue_token(&principal)?;

        tracing::info!(principal_id = %principal.id, "Principal logged in");

        Ok(AuthenticatedPrincipal {
            principal,
            access_token,
        })
    }

    async fn verify_credentials(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<Principal, AuthError> {
        let principal = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| AuthError::NotFound(email.to_string()))?;

        self.authenticator
            .verify_password(password, &principal.password_hash)?;

        if !principal.enabled {
            tracing::warn!(principal_id = %principal.id, "Login attempt on disabled account");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(principal)
    }

    fn issue_token(&self, principal: &Principal) -> Result<String, AuthError> {
        self.authenticator
            .issue_token(principal.email.as_str(), principal.id, principal.role.as_str())
            .map_err(|e| AuthError::Token(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use auth::JwtHandler;
    use chrono::Duration;
    use mockall::mock;

    use super::*;
    use crate::domain::principal::models::Role;

    const SECRET: &str = "uXceU/Fkk7ofRCjf2ZZTat1yjB590H0hAcbFHcSwUO0=";

    mock! {
        pub TestPrincipalRepository {}

        #[async_trait]
        impl PrincipalRepository for TestPrincipalRepository {
            async fn create(&self, principal: Principal) -> Result<Principal, AuthError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Principal>, AuthError>;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        let handler = JwtHandler::from_base64_secret(SECRET).unwrap();
        Arc::new(Authenticator::new(handler, Duration::hours(24)))
    }

    fn email(value: &str) -> EmailAddress {
        EmailAddress::new(value.to_string()).unwrap()
    }

    fn stored_principal(authenticator: &Authenticator, password: &str) -> Principal {
        let now = Utc::now();
        Principal {
            id: PrincipalId::new(),
            email: email("a@x.com"),
            password_hash: authenticator.hash_password(password).unwrap(),
            full_name: "Amira Ben Salah".to_string(),
            role: Role::Student,
            enabled: true,
            location: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn register_command() -> RegisterCommand {
        RegisterCommand {
            email: email("a@x.com"),
            password: "pw".to_string(),
            full_name: "Amira Ben Salah".to_string(),
            role: Role::Student,
            location: None,
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repository = MockTestPrincipalRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .withf(|principal| {
                principal.email.as_str() == "a@x.com"
                    && principal.enabled
                    && principal.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|principal| Ok(principal));

        let authenticator = authenticator();
        let service = AuthService::new(Arc::new(repository), Arc::clone(&authenticator));

        let result = service.register(register_command()).await.unwrap();
        assert_eq!(result.principal.role, Role::Student);

        let claims = authenticator.validate_token(&result.access_token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("a@x.com"));
        assert_eq!(claims.user_id, Some(result.principal.id.to_string()));
        assert_eq!(claims.role.as_deref(), Some("STUDENT"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let authenticator = authenticator();
        let existing = stored_principal(&authenticator, "pw");

        let mut repository = MockTestPrincipalRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository.expect_create().times(0);

        let service = AuthService::new(Arc::new(repository), authenticator);

        let result = service.register(register_command()).await;
        assert!(matches!(result, Err(AuthError::Conflict(email)) if email == "a@x.com"));
    }

    #[tokio::test]
    async fn test_register_conflict_detected_by_storage() {
        let mut repository = MockTestPrincipalRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .times(1)
            .returning(|principal| Err(AuthError::Conflict(principal.email.to_string())));

        let service = AuthService::new(Arc::new(repository), authenticator());

        let result = service.register(register_command()).await;
        assert!(matches!(result, Err(AuthError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login_success() {
        let authenticator = authenticator();
        let principal = stored_principal(&authenticator, "pw");
        let principal_id = principal.id;

        let mut repository = MockTestPrincipalRepository::new();
        repository
            .expect_find_by_email()
            .withf(|email| email.as_str() == "a@x.com")
            .times(1)
            .returning(move |_| Ok(Some(principal.clone())));

        let service = AuthService::new(Arc::new(repository), Arc::clone(&authenticator));

        let result = service.login(&email("a@x.com"), "pw").await.unwrap();
        assert_eq!(result.principal.id, principal_id);

        let claims = authenticator.validate_token(&result.access_token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("a@x.com"));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let authenticator = authenticator();
        let principal = stored_principal(&authenticator, "pw");

        let mut repository = MockTestPrincipalRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(principal.clone())));

        let service = AuthService::new(Arc::new(repository), authenticator);

        let result = service.login(&email("a@x.com"), "wrong").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut repository = MockTestPrincipalRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(repository), authenticator());

        let result = service.login(&email("nobody@x.com"), "pw").await;
        assert!(matches!(result, Err(AuthError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_login_disabled_account() {
        let authenticator = authenticator();
        let mut principal = stored_principal(&authenticator, "pw");
        principal.enabled = false;

        let mut repository = MockTestPrincipalRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(principal.clone())));

        let service = AuthService::new(Arc::new(repository), authenticator);

        let result = service.verify_credentials(&email("a@x.com"), "pw").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_database_error() {
        let mut repository = MockTestPrincipalRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Err(AuthError::DatabaseError("connection reset".to_string())));

        let service = AuthService::new(Arc::new(repository), authenticator());

        let result = service.login(&email("a@x.com"), "pw").await;
        assert!(matches!(result, Err(AuthError::DatabaseError(_))));
    }
}
