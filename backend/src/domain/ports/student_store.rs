//! Driven port for the hosted `students` table.
//!
//! Four calls, one per remote operation: `select(*) order by id`,
//! `insert({name, age})`, `update({age}) where id = X`, and
//! `delete() where id = X`. Identifier assignment and ordering belong to
//! the implementation, never to callers.

use std::sync::Mutex;

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Age, Error, NewStudent, Student, StudentId};

define_port_error! {
    /// Failures reported by a [`StudentStore`] adapter.
    pub enum StudentStoreError {
        /// The remote service could not be reached or timed out.
        Connection => "student store connection failed: {message}",
        /// The remote service answered with an error for this request.
        Rejected => "student store rejected the request: {message}",
        /// The response could not be decoded into student rows.
        Decode => "student store response was malformed: {message}",
    }
}

impl From<StudentStoreError> for Error {
    fn from(value: StudentStoreError) -> Self {
        match value {
            StudentStoreError::Connection { .. } => {
                Self::service_unavailable("student records are temporarily unavailable")
            }
            StudentStoreError::Rejected { message } => Self::invalid_request(message),
            StudentStoreError::Decode { message } => Self::internal(message),
        }
    }
}

/// Remote collection of student records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Fetch every record, ordered by identifier.
    async fn list(&self) -> Result<Vec<Student>, StudentStoreError>;

    /// Insert one record; the service assigns the identifier.
    async fn add(&self, student: &NewStudent) -> Result<(), StudentStoreError>;

    /// Set the age of the record with `id`. Matching no row is not an error.
    async fn update_age(&self, id: StudentId, age: Age) -> Result<(), StudentStoreError>;

    /// Remove the record with `id`. Matching no row is not an error.
    async fn delete(&self, id: StudentId) -> Result<(), StudentStoreError>;
}

/// In-process table used when no remote service is configured, and in tests.
///
/// Rows are listed newest first, matching the remote `order=id.desc` query.
#[derive(Debug, Default)]
pub struct FixtureStudentStore {
    table: Mutex<FixtureTable>,
}

#[derive(Debug, Default)]
struct FixtureTable {
    last_id: i64,
    rows: Vec<Student>,
}

impl FixtureStudentStore {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_table<T>(
        &self,
        f: impl FnOnce(&mut FixtureTable) -> Result<T, StudentStoreError>,
    ) -> Result<T, StudentStoreError> {
        let mut table = self
            .table
            .lock()
            .map_err(|_| StudentStoreError::connection("fixture table lock poisoned"))?;
        f(&mut table)
    }
}

#[async_trait]
impl StudentStore for FixtureStudentStore {
    async fn list(&self) -> Result<Vec<Student>, StudentStoreError> {
        self.with_table(|table| {
            let mut rows = table.rows.clone();
            rows.sort_by_key(|row| std::cmp::Reverse(row.id()));
            Ok(rows)
        })
    }

    async fn add(&self, student: &NewStudent) -> Result<(), StudentStoreError> {
        self.with_table(|table| {
            let id = StudentId::new(table.last_id + 1)
                .map_err(|err| StudentStoreError::rejected(err.to_string()))?;
            table.last_id = id.get();
            table
                .rows
                .push(Student::new(id, student.name().clone(), student.age()));
            Ok(())
        })
    }

    async fn update_age(&self, id: StudentId, age: Age) -> Result<(), StudentStoreError> {
        self.with_table(|table| {
            if let Some(row) = table.rows.iter_mut().find(|row| row.id() == id) {
                *row = Student::new(id, row.name().clone(), age);
            }
            Ok(())
        })
    }

    async fn delete(&self, id: StudentId) -> Result<(), StudentStoreError> {
        self.with_table(|table| {
            table.rows.retain(|row| row.id() != id);
            Ok(())
        })
    }
}
