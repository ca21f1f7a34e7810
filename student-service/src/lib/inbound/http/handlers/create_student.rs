use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::ApiError;
use super::ApiSuccess;
use super::StudentData;
use super::StudentRequest;
use crate::inbound::http::router::AppState;

pub async fn create_student(
    State(state): State<AppState>,
    Json(body): Json<StudentRequest>,
) -> Result<ApiSuccess<StudentData>, ApiError> {
    state
        .student_service
        .create_student(body.try_into_details()?)
        .await
        .map_err(ApiError::from)
        .map(|ref student| ApiSuccess::new(StatusCode::CREATED, student.into()))
}
