use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::student::models::StudentId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::student::errors::StudentError;

pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let student_id = StudentId::from_string(&id).map_err(StudentError::from)?;

    state
        .student_service
        .delete_student(student_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}
