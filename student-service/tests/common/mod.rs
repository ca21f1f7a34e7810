use std::collections::BTreeMap;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use student_service::domain::student::errors::StudentError;
use student_service::domain::student::models::Student;
use student_service::domain::student::models::StudentDetails;
use student_service::domain::student::models::StudentId;
use student_service::domain::student::ports::StudentRepository;
use student_service::domain::student::service::StudentService;
use student_service::inbound::http::router::create_router;

/// Student storage ordered by id, standing in for Postgres
pub struct InMemoryStudentRepository {
    students: Mutex<BTreeMap<i64, Student>>,
    next_id: AtomicI64,
}

impl Default for InMemoryStudentRepository {
    fn default() -> Self {
        Self {
            students: Mutex::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn create(&self, details: StudentDetails) -> Result<Student, StudentError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let student = details.with_id(StudentId(id));
        self.students
            .lock()
            .unwrap()
            .insert(id, student.clone());
        Ok(student)
    }

    async fn list_all(&self) -> Result<Vec<Student>, StudentError> {
        Ok(self.students.lock().unwrap().values().cloned().collect())
    }

    async fn find_by_id(&self, id: StudentId) -> Result<Option<Student>, StudentError> {
        Ok(self.students.lock().unwrap().get(&id.0).cloned())
    }

    async fn update(&self, student: Student) -> Result<Student, StudentError> {
        let mut students = self.students.lock().unwrap();
        match students.get_mut(&student.id.0) {
            Some(stored) => {
                *stored = student.clone();
                Ok(student)
            }
            None => Err(StudentError::NotFound(student.id.0)),
        }
    }

    async fn delete(&self, id: StudentId) -> Result<(), StudentError> {
        self.students
            .lock()
            .unwrap()
            .remove(&id.0)
            .map(|_| ())
            .ok_or(StudentError::NotFound(id.0))
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryStudentRepository::default());
        let student_service = Arc::new(StudentService::new(repository));
        let router = create_router(student_service);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.put(format!("{}{}", self.address, path))
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }
}
