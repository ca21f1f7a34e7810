use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::AuthResponseData;
use crate::domain::principal::models::EmailAddress;
use crate::domain::principal::models::GeoLocation;
use crate::domain::principal::models::RegisterCommand;
use crate::domain::principal::models::Role;
use crate::inbound::http::router::AppState;
use crate::principal::errors::AuthError;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|authenticated| ApiSuccess::new(StatusCode::CREATED, authenticated.into()))
}

/// HTTP request body for registering a principal (raw JSON)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    email: String,
    password: String,
    full_name: String,
    role: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, AuthError> {
        if self.password.is_empty() {
            return Err(AuthError::InvalidRegistration(
                "password must not be empty".to_string(),
            ));
        }

        let full_name = self.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(AuthError::InvalidRegistration(
                "full name must not be blank".to_string(),
            ));
        }

        Ok(RegisterCommand {
            email: EmailAddress::new(self.email)?,
            password: self.password,
            full_name,
            role: self.role.parse::<Role>()?,
            location: GeoLocation::from_parts(self.latitude, self.longitude)?,
        })
    }
}
