use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::StudentData;
use crate::inbound::http::middleware::CallerIdentity;
use crate::inbound::http::router::AppState;

pub async fn list_students(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
) -> Result<ApiSuccess<Vec<StudentData>>, ApiError> {
    match &caller.0 {
        Some(identity) => tracing::info!(
            user = %identity.user,
            roles = %identity.roles.join(","),
            user_id = %identity.user_id,
            "Listing students"
        ),
        None => tracing::info!("Listing students without forwarded identity"),
    }

    state
        .student_service
        .list_students()
        .await
        .map_err(ApiError::from)
        .map(|students| {
            ApiSuccess::new(
                StatusCode::OK,
                students.iter().map(StudentData::from).collect(),
            )
        })
}
