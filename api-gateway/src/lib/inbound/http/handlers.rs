use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use super::filter::GatewayError;
use super::router::AppState;
use crate::outbound::proxy::ProxyError;

/// Relay any request that passed verification to its upstream service
pub async fn forward(State(state): State<AppState>, req: Request) -> Result<Response, ApiError> {
    state.proxy.forward(req).await.map_err(ApiError::from)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Unauthorized,
    BadRequest(String),
    NotFound(String),
    BadGateway(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadGateway(msg) => {
                tracing::error!(error = %msg, "Upstream request failed");
                (StatusCode::BAD_GATEWAY, "Upstream unavailable".to_string())
            }
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<GatewayError> for ApiError {
    fn from(_: GatewayError) -> Self {
        // Every verification failure looks the same to the caller
        ApiError::Unauthorized
    }
}

impl From<ProxyError> for ApiError {
    fn from(err: ProxyError) -> Self {
        match err {
            ProxyError::NoRoute(_) => ApiError::NotFound(err.to_string()),
            ProxyError::Body(_) => ApiError::BadRequest(err.to_string()),
            ProxyError::Upstream(_) => ApiError::BadGateway(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use auth::JwtError;

    use super::*;

    #[test]
    fn test_gateway_errors_are_indistinguishable() {
        let errors = [
            GatewayError::MissingHeader,
            GatewayError::MalformedHeader,
            GatewayError::InvalidToken(JwtError::InvalidSignature),
            GatewayError::InvalidToken(JwtError::Expired),
        ];

        for error in errors {
            assert_eq!(ApiError::from(error), ApiError::Unauthorized);
        }
    }

    #[test]
    fn test_proxy_error_status_mapping() {
        let response = ApiError::from(ProxyError::NoRoute("/nowhere".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response =
            ApiError::from(ProxyError::Upstream("connection refused".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
