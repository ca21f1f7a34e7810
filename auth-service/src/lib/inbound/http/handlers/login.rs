use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::AuthResponseData;
use crate::domain::principal::models::EmailAddress;
use crate::inbound::http::router::AppState;
use crate::principal::errors::AuthError;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Log a principal in.
///
/// Unknown email, malformed email and wrong password all answer with the same
/// 401 so that the endpoint cannot be used to probe which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    let email = EmailAddress::new(body.email)
        .map_err(|_| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    state
        .auth_service
        .login(&email, &body.password)
        .await
        .map_err(|e| match e {
            AuthError::NotFound(_) | AuthError::InvalidCredentials => {
                tracing::debug!(reason = %e, "Login rejected");
                ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())
            }
            _ => ApiError::from(e),
        })
        .map(|authenticated| ApiSuccess::new(StatusCode::OK, authenticated.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}
