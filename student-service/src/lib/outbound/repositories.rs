pub mod student;

pub use student::PostgresStudentRepository;
