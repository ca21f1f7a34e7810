use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::student::models::Location;
use crate::domain::student::models::PersonName;
use crate::domain::student::models::Student;
use crate::domain::student::models::StudentDetails;
use crate::student::errors::StudentError;

pub mod create_student;
pub mod delete_student;
pub mod get_student;
pub mod list_students;
pub mod update_student;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        // 204 carries no body
        if self.0 == StatusCode::NO_CONTENT {
            return self.0.into_response();
        }
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    UnprocessableEntity(String),
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<StudentError> for ApiError {
    fn from(err: StudentError) -> Self {
        match err {
            StudentError::InvalidStudentId(_) => ApiError::BadRequest(err.to_string()),
            StudentError::InvalidName(_) | StudentError::InvalidLocation(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            StudentError::NotFound(_) => ApiError::NotFound(err.to_string()),
            StudentError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
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

/// Student representation shared by every read and write endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentData {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<&Student> for StudentData {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id.0,
            first_name: student.first_name.as_str().to_string(),
            last_name: student.last_name.as_str().to_string(),
            latitude: student.location.map(|l| l.latitude),
            longitude: student.location.map(|l| l.longitude),
        }
    }
}

/// HTTP request body for creating or replacing a student (raw JSON)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRequest {
    first_name: String,
    last_name: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl StudentRequest {
    fn try_into_details(self) -> Result<StudentDetails, StudentError> {
        Ok(StudentDetails {
            first_name: PersonName::new("first_name", self.first_name)?,
            last_name: PersonName::new("last_name", self.last_name)?,
            location: Location::from_parts(self.latitude, self.longitude)?,
        })
    }
}
