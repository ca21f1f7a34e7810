use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::StudentData;
use crate::domain::student::models::StudentId;
use crate::inbound::http::router::AppState;
use crate::student::errors::StudentError;

pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<StudentData>, ApiError> {
    let student_id = StudentId::from_string(&id).map_err(StudentError::from)?;

    state
        .student_service
        .get_student(student_id)
        .await
        .map_err(ApiError::from)
        .map(|ref student| ApiSuccess::new(StatusCode::OK, student.into()))
}
