use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::student::models::Student;
use crate::domain::student::models::StudentDetails;
use crate::domain::student::models::StudentId;
use crate::student::errors::StudentError;
use crate::student::ports::StudentRepository;
use crate::student::ports::StudentServicePort;

/// Domain service implementation for student operations.
pub struct StudentService<SR>
where
    SR: StudentRepository,
{
    repository: Arc<SR>,
}

impl<SR> StudentService<SR>
where
    SR: StudentRepository,
{
    pub fn new(repository: Arc<SR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<SR> StudentServicePort for StudentService<SR>
where
    SR: StudentRepository,
{
    async fn create_student(&self, details: StudentDetails) -> Result<Student, StudentError> {
        let student = self.repository.create(details).await?;
        tracing::info!(student_id = %student.id, "Student created");
        Ok(student)
    }

    async fn list_students(&self) -> Result<Vec<Student>, StudentError> {
        self.repository.list_all().await
    }

    async fn get_student(&self, id: StudentId) -> Result<Student, StudentError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(StudentError::NotFound(id.0))
    }

    async fn update_student(
        &self,
        id: StudentId,
        details: StudentDetails,
    ) -> Result<Student, StudentError> {
        let student = self.repository.update(details.with_id(id)).await?;
        tracing::info!(student_id = %student.id, "Student updated");
        Ok(student)
    }

    async fn delete_student(&self, id: StudentId) -> Result<(), StudentError> {
        self.repository.delete(id).await?;
        tracing::info!(student_id = %id, "Student deleted");
        Ok(())
    }
}
