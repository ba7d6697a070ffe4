//! Reqwest-backed student table adapter.
//!
//! Speaks the PostgREST dialect: `select=*&order=id.desc` for listing,
//! `id=eq.X` filters for updates and deletes, and `Prefer: return=minimal`
//! on writes since callers re-list afterwards.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::dto::{AgeUpdateDto, InsertStudentDto, StudentRowDto};
use super::{API_KEY_HEADER, RemoteServiceConfig, RemoteSetupError, error_message};
use crate::domain::ports::{StudentStore, StudentStoreError};
use crate::domain::{Age, NewStudent, Student, StudentId};

const PREFER_MINIMAL: &str = "return=minimal";

/// Student store backed by one remote table.
pub struct HttpStudentStore {
    client: Client,
    table_url: Url,
    api_key: Zeroizing<String>,
}

impl HttpStudentStore {
    /// Adapter for `table` in the project described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error when the table URL cannot be formed or the reqwest
    /// client cannot be constructed.
    pub fn new(config: &RemoteServiceConfig, table: &str) -> Result<Self, RemoteSetupError> {
        let table_url = config.endpoint(&format!("rest/v1/{table}"))?;
        Ok(Self {
            client: config.client()?,
            table_url,
            api_key: Zeroizing::new(config.api_key().to_owned()),
        })
    }

    fn authorised(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(API_KEY_HEADER, self.api_key.as_str())
            .bearer_auth(self.api_key.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Vec<u8>, StudentStoreError> {
        let response = self
            .authorised(builder)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl StudentStore for HttpStudentStore {
    async fn list(&self) -> Result<Vec<Student>, StudentStoreError> {
        let body = self
            .execute(
                self.client
                    .get(self.table_url.clone())
                    .query(&[("select", "*"), ("order", "id.desc")]),
            )
            .await?;
        let students = parse_students(&body)?;
        debug!(count = students.len(), "listed students");
        Ok(students)
    }

    async fn add(&self, student: &NewStudent) -> Result<(), StudentStoreError> {
        self.execute(
            self.client
                .post(self.table_url.clone())
                .header("Prefer", PREFER_MINIMAL)
                .json(&[InsertStudentDto::from(student)]),
        )
        .await?;
        Ok(())
    }

    async fn update_age(&self, id: StudentId, age: Age) -> Result<(), StudentStoreError> {
        self.execute(
            self.client
                .patch(self.table_url.clone())
                .query(&[("id", id_filter(id))])
                .header("Prefer", PREFER_MINIMAL)
                .json(&AgeUpdateDto { age: age.get() }),
        )
        .await?;
        Ok(())
    }

    async fn delete(&self, id: StudentId) -> Result<(), StudentStoreError> {
        self.execute(
            self.client
                .delete(self.table_url.clone())
                .query(&[("id", id_filter(id))])
                .header("Prefer", PREFER_MINIMAL),
        )
        .await?;
        Ok(())
    }
}

fn id_filter(id: StudentId) -> String {
    format!("eq.{id}")
}

fn parse_students(body: &[u8]) -> Result<Vec<Student>, StudentStoreError> {
    let rows: Vec<StudentRowDto> = serde_json::from_slice(body).map_err(|error| {
        StudentStoreError::decode(format!("invalid student rows payload: {error}"))
    })?;
    Ok(rows
        .into_iter()
        .filter_map(|row| match row.into_domain() {
            Ok(student) => Some(student),
            Err(reason) => {
                warn!(%reason, "skipping unaddressable student row");
                None
            }
        })
        .collect())
}

fn map_transport_error(error: reqwest::Error) -> StudentStoreError {
    if error.is_timeout() {
        StudentStoreError::connection(format!("request timed out: {error}"))
    } else {
        StudentStoreError::connection(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> StudentStoreError {
    let message = error_message(status, body);
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            StudentStoreError::connection(message)
        }
        _ if status.is_client_error() => StudentStoreError::rejected(message),
        _ => StudentStoreError::connection(message),
    }
}
