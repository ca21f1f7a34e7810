use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::student::models::Location;
use crate::domain::student::models::PersonName;
use crate::domain::student::models::Student;
use crate::domain::student::models::StudentDetails;
use crate::domain::student::models::StudentId;
use crate::domain::student::ports::StudentRepository;
use crate::student::errors::StudentError;

pub struct PostgresStudentRepository {
    pool: PgPool,
}

impl PostgresStudentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct StudentRow {
    id: i64,
    first_name: String,
    last_name: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl TryFrom<StudentRow> for Student {
    type Error = StudentError;

    fn try_from(row: StudentRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = move |e: &dyn std::fmt::Display| {
            StudentError::DatabaseError(format!("Corrupt student row {}: {}", id, e))
        };

        Ok(Student {
            id: StudentId(id),
            first_name: PersonName::new("first_name", row.first_name).map_err(|e| corrupt(&e))?,
            last_name: PersonName::new("last_name", row.last_name).map_err(|e| corrupt(&e))?,
            location: Location::from_parts(row.latitude, row.longitude)
                .map_err(|e| corrupt(&e))?,
        })
    }
}

fn database_error(e: sqlx::Error) -> StudentError {
    StudentError::DatabaseError(e.to_string())
}

#[async_trait]
impl StudentRepository for PostgresStudentRepository {
    async fn create(&self, details: StudentDetails) -> Result<Student, StudentError> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO students (first_name, last_name, latitude, longitude)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(details.first_name.as_str())
        .bind(details.last_name.as_str())
        .bind(details.location.map(|l| l.latitude))
        .bind(details.location.map(|l| l.longitude))
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(details.with_id(StudentId(id)))
    }

    async fn list_all(&self) -> Result<Vec<Student>, StudentError> {
        let rows = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, first_name, last_name, latitude, longitude
            FROM students
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.into_iter().map(Student::try_from).collect()
    }

    async fn find_by_id(&self, id: StudentId) -> Result<Option<Student>, StudentError> {
        let row = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, first_name, last_name, latitude, longitude
            FROM students
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(Student::try_from).transpose()
    }

    async fn update(&self, student: Student) -> Result<Student, StudentError> {
        let result = sqlx::query(
            r#"
            UPDATE students
            SET first_name = $2, last_name = $3, latitude = $4, longitude = $5
            WHERE id = $1
            "#,
        )
        .bind(student.id.0)
        .bind(student.first_name.as_str())
        .bind(student.last_name.as_str())
        .bind(student.location.map(|l| l.latitude))
        .bind(student.location.map(|l| l.longitude))
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(StudentError::NotFound(student.id.0));
        }

        Ok(student)
    }

    async fn delete(&self, id: StudentId) -> Result<(), StudentError> {
        let result = sqlx::query(
            r#"
            DELETE FROM students
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(StudentError::NotFound(id.0));
        }

        Ok(())
    }
}
