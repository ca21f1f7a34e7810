use std::sync::Arc;

use api_gateway::inbound::http::filter::GatewayVerifier;
use api_gateway::inbound::http::router::create_router;
use api_gateway::outbound::proxy::Route;
use api_gateway::outbound::proxy::UpstreamProxy;
use auth::Claims;
use auth::JwtHandler;
use axum::extract::Request;
use axum::Json;
use axum::Router;
use chrono::Duration;
use serde_json::json;
use serde_json::Value;

pub const TEST_SECRET: &str = "uXceU/Fkk7ofRCjf2ZZTat1yjB590H0hAcbFHcSwUO0=";
pub const USER_ID: &str = "8d4c7f9e-0b7a-4c53-9f0e-5a1f2d3c4b5a";

/// Upstream stand-in that describes the request it received
async fn echo(req: Request) -> Json<Value> {
    let (parts, body) = req.into_parts();
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");

    Json(json!({
        "method": parts.method.as_str(),
        "uri": parts.uri.to_string(),
        "authorization": header("authorization"),
        "x_auth_user": header("x-auth-user"),
        "x_auth_roles": header("x-auth-roles"),
        "x_auth_userid": header("x-auth-userid"),
        "body": String::from_utf8_lossy(&body),
    }))
}

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server error");
    });

    format!("http://127.0.0.1:{}", port)
}

/// Address on which nothing is listening
async fn unused_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Build the gateway router in front of an echo upstream
pub async fn gateway_router() -> Router {
    let upstream = spawn_server(Router::new().fallback(echo)).await;
    let unreachable = unused_address().await;

    let verifier = Arc::new(GatewayVerifier::new(
        Arc::new(JwtHandler::from_base64_secret(TEST_SECRET).expect("Invalid test secret")),
        vec!["/auth/".to_string()],
    ));
    let proxy = Arc::new(
        UpstreamProxy::new(vec![
            Route::new("/auth", upstream.as_str()),
            Route::new("/students", upstream.as_str()),
            Route::new("/drivers", unreachable),
        ])
        .expect("Failed to build proxy"),
    );

    create_router(verifier, proxy)
}

/// Gateway spawned on a random port, in front of an echo upstream
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let address = spawn_server(gateway_router().await).await;

        Self {
            address,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::from_base64_secret(TEST_SECRET)
                .expect("Invalid test secret"),
        }
    }

    pub fn token(&self, role: &str) -> String {
        let claims = Claims::for_principal("a@x.com", USER_ID, role, Duration::hours(1))
            .expect("Failed to build claims");
        self.jwt_handler
            .encode(&claims)
            .expect("Failed to sign token")
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }
}
