//! Wire shapes for the hosted REST and auth endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::{
    AccessToken, Age, AuthSession, AuthUser, NewStudent, Student, StudentId, StudentName,
};

/// One row of `GET /rest/v1/{table}?select=*`.
///
/// `name` and `age` are nullable columns; stored values are taken as they
/// are so old rows stay listable.
#[derive(Debug, Deserialize)]
pub(super) struct StudentRowDto {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
}

impl StudentRowDto {
    /// Fails only when the row has no usable key.
    pub(super) fn into_domain(self) -> Result<Student, String> {
        let id = StudentId::new(self.id).map_err(|err| format!("row {}: {err}", self.id))?;
        let name = StudentName::from_remote(self.name.unwrap_or_default());
        Ok(Student::from_remote(id, name, self.age.map(Age::new)))
    }
}

/// Body of an insert; the table assigns `id`.
#[derive(Debug, Serialize)]
pub(super) struct InsertStudentDto<'a> {
    pub name: &'a str,
    pub age: i32,
}

impl<'a> From<&'a NewStudent> for InsertStudentDto<'a> {
    fn from(student: &'a NewStudent) -> Self {
        Self {
            name: student.name().as_str(),
            age: student.age().get(),
        }
    }
}

/// Body of `PATCH ?id=eq.X`.
#[derive(Debug, Serialize)]
pub(super) struct AgeUpdateDto {
    pub age: i32,
}

/// Body of the password grant and signup calls.
#[derive(Serialize)]
pub(super) struct CredentialsDto<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// User object returned by `/auth/v1/user` and inside session responses.
#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserDto {
    pub(super) fn into_domain(self) -> AuthUser {
        AuthUser::new(self.id, self.email.unwrap_or_default())
    }
}

/// Session response from the password grant, and from signup when the
/// project confirms accounts immediately.
#[derive(Debug, Deserialize)]
pub(super) struct SessionDto {
    pub access_token: String,
    pub user: UserDto,
}

impl SessionDto {
    pub(super) fn into_domain(self) -> Result<AuthSession, String> {
        let token = AccessToken::new(self.access_token)
            .ok_or_else(|| "session response carried an empty access token".to_owned())?;
        Ok(AuthSession::new(token, self.user.into_domain()))
    }
}

/// Signup answers either with a session or, while confirmation is pending,
/// with the bare user object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum SignUpResponseDto {
    Session(SessionDto),
    Pending(UserDto),
}

/// Error bodies. The auth service uses `msg` or `error_description`; the
/// REST layer uses `message`.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBodyDto {
    pub(super) fn message_from(body: &[u8]) -> Option<String> {
        let parsed: Self = serde_json::from_slice(body).ok()?;
        [
            parsed.msg,
            parsed.message,
            parsed.error_description,
            parsed.error,
        ]
        .into_iter()
        .flatten()
        .map(|text| text.trim().to_owned())
        .find(|text| !text.is_empty())
    }
}
