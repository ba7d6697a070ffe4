//! Student ledger JSON API.
//!
//! ```text
//! GET    /api/v1/students
//! POST   /api/v1/students        {"name":"Ada","age":30}
//! PATCH  /api/v1/students/{id}   {"age":31}
//! DELETE /api/v1/students/{id}
//! ```
//!
//! Each mutation answers with the re-fetched list, exactly as the HTML
//! ledger re-renders after every change.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{Error, LedgerView, Student, StudentId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, StudentSchema};
use crate::inbound::http::state::HttpState;

/// Age as sent by clients: a JSON number or the raw text of a form field.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum AgeInput {
    /// `30`
    Number(i64),
    /// `"30"`
    Text(String),
}

impl AgeInput {
    fn into_text(self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(text) => text,
        }
    }
}

/// Request body for `POST /api/v1/students`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct NewStudentRequest {
    /// Student name; blank is rejected.
    #[serde(default)]
    pub name: String,
    /// Student age; missing or blank is rejected.
    #[serde(default)]
    pub age: Option<AgeInput>,
}

/// Request body for `PATCH /api/v1/students/{id}`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AgeUpdateRequest {
    /// Replacement age.
    pub age: AgeInput,
}

fn parse_id(raw: i64) -> Result<StudentId, Error> {
    StudentId::new(raw).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({ "field": "id" }))
    })
}

/// List every student, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/students",
    responses(
        (status = 200, description = "Student rows", body = [StudentSchema]),
        (status = 503, description = "Data service unavailable", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "listStudents"
)]
#[get("/students")]
pub async fn list_students(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Student>>> {
    let mut view = LedgerView::new();
    view.refresh(state.students.as_ref()).await.into_result()?;
    Ok(web::Json(view.students().to_vec()))
}

/// Add a student and return the refreshed list.
#[utoipa::path(
    post,
    path = "/api/v1/students",
    request_body = NewStudentRequest,
    responses(
        (status = 201, description = "Student added; refreshed rows", body = [StudentSchema]),
        (status = 400, description = "Missing fields or invalid age", body = ErrorSchema),
        (status = 503, description = "Data service unavailable", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "addStudent"
)]
#[post("/students")]
pub async fn add_student(
    state: web::Data<HttpState>,
    payload: web::Json<NewStudentRequest>,
) -> ApiResult<HttpResponse> {
    let NewStudentRequest { name, age } = payload.into_inner();
    let mut view = LedgerView::new();
    view.set_inputs(name, age.map(AgeInput::into_text).unwrap_or_default());
    view.submit_add(state.students.as_ref())
        .await
        .into_result()?;
    Ok(HttpResponse::Created().json(view.students()))
}

/// Replace a student's age and return the refreshed list.
#[utoipa::path(
    patch,
    path = "/api/v1/students/{id}",
    params(("id" = i64, Path, description = "Student identifier")),
    request_body = AgeUpdateRequest,
    responses(
        (status = 200, description = "Age updated; refreshed rows", body = [StudentSchema]),
        (status = 400, description = "Invalid age or identifier", body = ErrorSchema),
        (status = 503, description = "Data service unavailable", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "updateStudentAge"
)]
#[patch("/students/{id}")]
pub async fn update_student_age(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<AgeUpdateRequest>,
) -> ApiResult<web::Json<Vec<Student>>> {
    let id = parse_id(path.into_inner())?;
    let age = payload.into_inner().age.into_text();
    let mut view = LedgerView::new();
    view.submit_edit(state.students.as_ref(), id, Some(&age))
        .await
        .into_result()?;
    Ok(web::Json(view.students().to_vec()))
}

/// Delete a student and return the refreshed list.
#[utoipa::path(
    delete,
    path = "/api/v1/students/{id}",
    params(("id" = i64, Path, description = "Student identifier")),
    responses(
        (status = 200, description = "Student deleted; refreshed rows", body = [StudentSchema]),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 503, description = "Data service unavailable", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "deleteStudent"
)]
#[delete("/students/{id}")]
pub async fn delete_student(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<Student>>> {
    let id = parse_id(path.into_inner())?;
    let mut view = LedgerView::new();
    view.confirm_delete(state.students.as_ref(), id, true)
        .await
        .into_result()?;
    Ok(web::Json(view.students().to_vec()))
}
