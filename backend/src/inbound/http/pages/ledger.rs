//! The student ledger page.
//!
//! ```text
//! GET  /                      list (?edit={id} or ?delete={id} opens a dialog)
//! POST /students              add            name, age
//! POST /students/{id}/age     update age     age | dismiss=1
//! POST /students/{id}/delete  delete         confirm=yes|no
//! ```
//!
//! Each request builds a fresh [`LedgerView`] and runs one action. Completed
//! mutations, dismissed prompts and declined confirmations answer `303 /`,
//! so a browser reload never repeats a write. Rejected or failed actions
//! render the page in place with the message.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, get, post, web};
use serde::Deserialize;

use super::{escape, render, see_other};
use crate::inbound::http::error::visible_message;
use crate::domain::{LedgerDialog, LedgerOutcome, LedgerView, StudentId};
use crate::inbound::http::state::HttpState;

const TITLE: &str = "Arcane Student Ledger";
const EMPTY_LIST_TEXT: &str = "No students yet. The grimoire is empty... for now.";
const DELETE_QUESTION: &str = "Are you sure you want to delete this student?";
const UNKNOWN_AGE_TEXT: &str = "unknown";

/// Query for `GET /`.
#[derive(Debug, Default, Deserialize)]
pub struct LedgerQuery {
    /// Open the age prompt for this identifier.
    pub edit: Option<i64>,
    /// Open the delete confirmation for this identifier.
    pub delete: Option<i64>,
}

/// Form for `POST /students`.
#[derive(Debug, Default, Deserialize)]
pub struct AddForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    age: String,
}

/// Form for `POST /students/{id}/age`.
#[derive(Debug, Default, Deserialize)]
pub struct AgeForm {
    #[serde(default)]
    age: String,
    #[serde(default)]
    dismiss: Option<String>,
}

/// Form for `POST /students/{id}/delete`.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    confirm: String,
}

fn status_for(outcome: &LedgerOutcome) -> StatusCode {
    outcome
        .clone()
        .into_result()
        .err()
        .map_or(StatusCode::OK, |err| err.status_code())
}

/// Render the list page.
#[get("/")]
pub async fn ledger_page(
    state: web::Data<HttpState>,
    query: web::Query<LedgerQuery>,
) -> HttpResponse {
    let mut view = LedgerView::new();
    let outcome = view.refresh(state.students.as_ref()).await;
    if let Some(id) = query.edit.and_then(|raw| StudentId::new(raw).ok()) {
        view.begin_edit(id);
    } else if let Some(id) = query.delete.and_then(|raw| StudentId::new(raw).ok()) {
        view.request_delete(id);
    }
    render(status_for(&outcome), TITLE, &ledger_body(&view))
}

/// Add a student.
#[post("/students")]
pub async fn add_student_form(
    state: web::Data<HttpState>,
    form: web::Form<AddForm>,
) -> HttpResponse {
    let AddForm { name, age } = form.into_inner();
    let mut view = LedgerView::new();
    view.set_inputs(name, age);
    let outcome = view.submit_add(state.students.as_ref()).await;
    finish(&state, view, outcome).await
}

/// Answer the age prompt.
#[post("/students/{id}/age")]
pub async fn update_age_form(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    form: web::Form<AgeForm>,
) -> HttpResponse {
    let Ok(id) = StudentId::new(path.into_inner()) else {
        return see_other("/");
    };
    let AgeForm { age, dismiss } = form.into_inner();
    let input = if dismiss.is_some() {
        None
    } else {
        Some(age.as_str())
    };
    let mut view = LedgerView::new();
    let outcome = view
        .submit_edit(state.students.as_ref(), id, input)
        .await;
    finish(&state, view, outcome).await
}

/// Answer the delete confirmation.
#[post("/students/{id}/delete")]
pub async fn delete_student_form(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    form: web::Form<DeleteForm>,
) -> HttpResponse {
    let Ok(id) = StudentId::new(path.into_inner()) else {
        return see_other("/");
    };
    let confirmed = form.confirm.eq_ignore_ascii_case("yes");
    let mut view = LedgerView::new();
    let outcome = view
        .confirm_delete(state.students.as_ref(), id, confirmed)
        .await;
    finish(&state, view, outcome).await
}

async fn finish(state: &HttpState, mut view: LedgerView, outcome: LedgerOutcome) -> HttpResponse {
    match outcome {
        LedgerOutcome::Cancelled | LedgerOutcome::Completed => see_other("/"),
        LedgerOutcome::Rejected(_) => {
            // Nothing was sent; list so the rows sit alongside the message.
            view.refresh(state.students.as_ref()).await;
            render(status_for(&outcome), TITLE, &ledger_body(&view))
        }
        // The service just failed; another call would only fail again.
        LedgerOutcome::Failed(_) => render(status_for(&outcome), TITLE, &ledger_body(&view)),
    }
}

/// Page body for `view`.
pub fn ledger_body(view: &LedgerView) -> String {
    let mut html = format!("<h1>{}</h1>", escape(TITLE));
    if let Some(error) = view.error() {
        html.push_str(&format!(
            r#"<p class="error" role="alert">{}</p>"#,
            escape(visible_message(error))
        ));
    }
    html.push_str(&format!(
        concat!(
            r#"<form class="add" method="post" action="/students">"#,
            r#"<input type="text" name="name" placeholder="Name" value="{name}">"#,
            r#"<input type="number" name="age" placeholder="Age" value="{age}">"#,
            r#"<button type="submit">Add</button></form>"#
        ),
        name = escape(view.name_input()),
        age = escape(view.age_input()),
    ));
    html.push_str(&dialog(view));
    html.push_str(&rows(view));
    html
}

fn dialog(view: &LedgerView) -> String {
    match view.dialog() {
        LedgerDialog::Closed => String::new(),
        LedgerDialog::EditAge { id, draft } => format!(
            concat!(
                r#"<dialog open class="prompt"><form method="post" action="/students/{id}/age">"#,
                r#"<label for="new-age">Enter new age:</label>"#,
                r#"<input id="new-age" type="text" name="age" value="{draft}" autofocus>"#,
                r#"<button type="submit">OK</button>"#,
                r#"<button type="submit" name="dismiss" value="1">Cancel</button>"#,
                r#"</form></dialog>"#
            ),
            id = id,
            draft = escape(draft),
        ),
        LedgerDialog::ConfirmDelete { id } => format!(
            concat!(
                r#"<dialog open class="confirm"><form method="post" action="/students/{id}/delete">"#,
                "<p>{question}</p>",
                r#"<button type="submit" name="confirm" value="yes">OK</button>"#,
                r#"<button type="submit" name="confirm" value="no">Cancel</button>"#,
                r#"</form></dialog>"#
            ),
            id = id,
            question = DELETE_QUESTION,
        ),
    }
}

fn rows(view: &LedgerView) -> String {
    if view.students().is_empty() {
        return format!(r#"<div class="empty"><p>{EMPTY_LIST_TEXT}</p></div>"#);
    }
    let items: String = view
        .students()
        .iter()
        .map(|student| {
            format!(
                concat!(
                    r#"<li class="student" data-id="{id}"><div>"#,
                    "<h2>{name}</h2><p>Age: {age}</p></div>",
                    r#"<a class="edit" href="/?edit={id}">Edit</a>"#,
                    r#"<a class="delete" href="/?delete={id}">Delete</a></li>"#
                ),
                id = student.id(),
                name = escape(student.name().as_str()),
                age = student
                    .age()
                    .map_or_else(|| UNKNOWN_AGE_TEXT.to_owned(), |age| age.to_string()),
            )
        })
        .collect();
    format!(r#"<ul class="students">{items}</ul>"#)
}
