//! The guarded dashboard and the logout action.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, web};

use super::{escape, render, see_other};
use crate::domain::GuardDecision;
use crate::inbound::http::auth::{guard, sign_out};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Show the signed-in user's email, or send the visitor to `/login`.
#[get("/dashboard")]
pub async fn dashboard_page(state: web::Data<HttpState>, session: SessionContext) -> HttpResponse {
    let user = match guard(&state, &session).await {
        GuardDecision::Allow(user) => user,
        GuardDecision::RedirectToLogin => return see_other("/login"),
    };
    let body = format!(
        concat!(
            "<h1>Welcome to Dashboard</h1>",
            "<p>Email: {email}</p>",
            r#"<form action="/logout" method="post"><button type="submit">Logout</button></form>"#
        ),
        email = escape(user.email()),
    );
    render(StatusCode::OK, "Dashboard", &body)
}

/// Sign out and return to the login page.
#[post("/logout")]
pub async fn logout_submit(state: web::Data<HttpState>, session: SessionContext) -> HttpResponse {
    sign_out(&state, &session).await;
    see_other("/login")
}
