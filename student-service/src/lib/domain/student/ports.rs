use async_trait::async_trait;

use crate::domain::student::models::Student;
use crate::domain::student::models::StudentDetails;
use crate::domain::student::models::StudentId;
use crate::student::errors::StudentError;

/// Port for student domain service operations.
#[async_trait]
pub trait StudentServicePort: Send + Sync + 'static {
    /// Create a student record.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create_student(&self, details: StudentDetails) -> Result<Student, StudentError>;

    /// List every student record.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_students(&self) -> Result<Vec<Student>, StudentError>;

    /// Retrieve a student by identifier.
    ///
    /// # Errors
    /// * `NotFound` - Student does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_student(&self, id: StudentId) -> Result<Student, StudentError>;

    /// Replace every field of an existing student.
    ///
    /// # Errors
    /// * `NotFound` - Student does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update_student(
        &self,
        id: StudentId,
        details: StudentDetails,
    ) -> Result<Student, StudentError>;

    /// Delete a student.
    ///
    /// # Errors
    /// * `NotFound` - Student does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_student(&self, id: StudentId) -> Result<(), StudentError>;
}

/// Persistence operations for student records.
#[async_trait]
pub trait StudentRepository: Send + Sync + 'static {
    /// Insert a record; storage assigns the identifier.
    async fn create(&self, details: StudentDetails) -> Result<Student, StudentError>;

    /// All records ordered by identifier.
    async fn list_all(&self) -> Result<Vec<Student>, StudentError>;

    /// Retrieve a record, `None` if absent.
    async fn find_by_id(&self, id: StudentId) -> Result<Option<Student>, StudentError>;

    /// Overwrite a record.
    ///
    /// # Errors
    /// * `NotFound` - No row with this identifier
    async fn update(&self, student: Student) -> Result<Student, StudentError>;

    /// Remove a record.
    ///
    /// # Errors
    /// * `NotFound` - No row with this identifier
    async fn delete(&self, id: StudentId) -> Result<(), StudentError>;
}
