use thiserror::Error;

/// Error for StudentId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StudentIdError {
    #[error("Invalid student id: {0}")]
    InvalidFormat(String),
}

/// Error for PersonName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("{field} must not be blank")]
    Blank { field: &'static str },

    #[error("{field} too long: maximum {max} characters, got {actual}")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

/// Error for Location validation failures
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LocationError {
    #[error("Latitude out of range [-90, 90]: {0}")]
    LatitudeOutOfRange(f64),

    #[error("Longitude out of range [-180, 180]: {0}")]
    LongitudeOutOfRange(f64),

    #[error("Latitude and longitude must be provided together")]
    Incomplete,
}

/// Top-level error for all student operations
#[derive(Debug, Clone, Error)]
pub enum StudentError {
    #[error("Invalid student ID: {0}")]
    InvalidStudentId(#[from] StudentIdError),

    #[error("Invalid name: {0}")]
    InvalidName(#[from] NameError),

    #[error("Invalid location: {0}")]
    InvalidLocation(#[from] LocationError),

    #[error("Student not found with id: {0}")]
    NotFound(i64),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
