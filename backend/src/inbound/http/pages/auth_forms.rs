//! Login and signup pages.
//!
//! Failures re-render the form with the message in an error field; the
//! email is kept, the password never is.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, get, post, web};
use serde::Deserialize;

use super::{escape, render, see_other};
use crate::domain::{Credentials, Error, SIGN_UP_PASSWORD_MIN};
use crate::inbound::http::auth::{map_credentials_error, sign_in, sign_up};
use crate::inbound::http::error::visible_message;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Query value that asks the login page to show the confirmation notice.
pub const CONFIRM_EMAIL_NOTICE: &str = "confirm-email";
const CONFIRM_EMAIL_TEXT: &str = "Check your email to confirm your account";

/// Query for `GET /login`.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    notice: Option<String>,
}

/// Form posted by both pages.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Clone, Copy)]
enum FormKind {
    Login,
    Signup,
}

impl FormKind {
    fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Signup => "Sign up",
        }
    }

    fn action(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Signup => "/signup",
        }
    }
}

/// What the form shows besides its fields.
#[derive(Default)]
struct FormState<'a> {
    email: &'a str,
    error: Option<&'a str>,
    notice: Option<&'a str>,
}

fn form_body(kind: FormKind, state: &FormState<'_>) -> String {
    let mut html = format!("<h1>{}</h1>", kind.title());
    if let Some(notice) = state.notice {
        html.push_str(&format!(
            r#"<p class="notice" role="status">{}</p>"#,
            escape(notice)
        ));
    }
    if let Some(error) = state.error {
        html.push_str(&format!(
            r#"<p class="error" role="alert">{}</p>"#,
            escape(error)
        ));
    }
    let min_length = match kind {
        FormKind::Login => String::new(),
        FormKind::Signup => format!(r#" minlength="{SIGN_UP_PASSWORD_MIN}""#),
    };
    html.push_str(&format!(
        concat!(
            r#"<form method="post" action="{action}">"#,
            r#"<label for="email">Email</label>"#,
            r#"<input id="email" type="email" name="email" value="{email}" placeholder="you@example.com" required>"#,
            r#"<label for="password">Password</label>"#,
            r#"<input id="password" type="password" name="password" required{min_length}>"#,
            r#"<button type="submit">{title}</button></form>"#
        ),
        action = kind.action(),
        email = escape(state.email),
        min_length = min_length,
        title = kind.title(),
    ));
    html.push_str(match kind {
        FormKind::Login => r#"<p>Don't have an account? <a href="/signup">Sign up</a></p>"#,
        FormKind::Signup => r#"<p>Already have an account? <a href="/login">Log in</a></p>"#,
    });
    html
}

fn form_page(kind: FormKind, status: StatusCode, state: &FormState<'_>) -> HttpResponse {
    render(status, kind.title(), &form_body(kind, state))
}

fn form_error(kind: FormKind, email: &str, error: &Error) -> HttpResponse {
    form_page(
        kind,
        error.status_code(),
        &FormState {
            email,
            error: Some(visible_message(error)),
            notice: None,
        },
    )
}

/// Render the login form.
#[get("/login")]
pub async fn login_page(query: web::Query<LoginQuery>) -> HttpResponse {
    let notice = (query.notice.as_deref() == Some(CONFIRM_EMAIL_NOTICE)).then_some(CONFIRM_EMAIL_TEXT);
    form_page(
        FormKind::Login,
        StatusCode::OK,
        &FormState {
            notice,
            ..FormState::default()
        },
    )
}

/// Sign in, then go to the dashboard.
#[post("/login")]
pub async fn login_submit(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<CredentialsForm>,
) -> HttpResponse {
    let result = match Credentials::try_from_parts(&form.email, &form.password) {
        Ok(credentials) => sign_in(&state, &session, &credentials).await.map(|_| ()),
        Err(err) => Err(map_credentials_error(err)),
    };
    match result {
        Ok(()) => see_other("/dashboard"),
        Err(error) => form_error(FormKind::Login, form.email.trim(), &error),
    }
}

/// Render the signup form.
#[get("/signup")]
pub async fn signup_page() -> HttpResponse {
    form_page(FormKind::Signup, StatusCode::OK, &FormState::default())
}

/// Register, then ask the visitor to confirm their email.
#[post("/signup")]
pub async fn signup_submit(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<CredentialsForm>,
) -> HttpResponse {
    let result = match Credentials::try_for_sign_up(&form.email, &form.password) {
        Ok(credentials) => sign_up(&state, &session, &credentials).await,
        Err(err) => Err(map_credentials_error(err)),
    };
    match result {
        Ok(None) => see_other(&format!("/login?notice={CONFIRM_EMAIL_NOTICE}")),
        Ok(Some(_)) => see_other("/dashboard"),
        Err(error) => form_error(FormKind::Signup, form.email.trim(), &error),
    }
}
