use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::JwtHandler;
use auth_service::domain::principal::errors::AuthError;
use auth_service::domain::principal::models::EmailAddress;
use auth_service::domain::principal::models::Principal;
use auth_service::domain::principal::ports::PrincipalRepository;
use auth_service::domain::principal::service::AuthService;
use auth_service::inbound::http::router::create_router;
use chrono::Duration;

pub const TEST_SECRET: &str = "uXceU/Fkk7ofRCjf2ZZTat1yjB590H0hAcbFHcSwUO0=";

/// Principal storage keyed by exact email, standing in for Postgres
#[derive(Default)]
pub struct InMemoryPrincipalRepository {
    principals: Mutex<HashMap<String, Principal>>,
}

impl InMemoryPrincipalRepository {
    pub fn disable(&self, email: &str) {
        if let Some(principal) = self.principals.lock().unwrap().get_mut(email) {
            principal.enabled = false;
        }
    }
}

#[async_trait]
impl PrincipalRepository for InMemoryPrincipalRepository {
    async fn create(&self, principal: Principal) -> Result<Principal, AuthError> {
        let mut principals = self.principals.lock().unwrap();
        let key = principal.email.as_str().to_string();
        if principals.contains_key(&key) {
            return Err(AuthError::Conflict(key));
        }
        principals.insert(key, principal.clone());
        Ok(principal)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Principal>, AuthError> {
        Ok(self.principals.lock().unwrap().get(email.as_str()).cloned())
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
    pub repository: Arc<InMemoryPrincipalRepository>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryPrincipalRepository::default());
        let authenticator = Arc::new(Authenticator::new(
            JwtHandler::from_base64_secret(TEST_SECRET).expect("Invalid test secret"),
            Duration::hours(24),
        ));
        let auth_service = Arc::new(AuthService::new(Arc::clone(&repository), authenticator));

        let router = create_router(auth_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::from_base64_secret(TEST_SECRET).expect("Invalid test secret"),
            repository,
        }
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }
}
