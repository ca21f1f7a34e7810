use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::ApiError;
use super::ApiSuccess;
use super::StudentData;
use super::StudentRequest;
use crate::domain::student::models::StudentId;
use crate::inbound::http::router::AppState;
use crate::student::errors::StudentError;

/// Replace every field of a student; omitted coordinates clear the location.
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StudentRequest>,
) -> Result<ApiSuccess<StudentData>, ApiError> {
    let student_id = StudentId::from_string(&id).map_err(StudentError::from)?;

    state
        .student_service
        .update_student(student_id, body.try_into_details()?)
        .await
        .map_err(ApiError::from)
        .map(|ref student| ApiSuccess::new(StatusCode::OK, student.into()))
}
