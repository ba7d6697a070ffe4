//! HTTP inbound adapter: HTML pages, the JSON API, and health probes.

pub mod auth;
pub mod error;
pub mod health;
pub mod pages;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
pub mod students;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;

use actix_web::web;

/// Register the pages at the root and the JSON API under `/api/v1`.
///
/// Callers provide [`state::HttpState`] as app data and wrap the app in a
/// session middleware.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use ledger::inbound::http::{configure, state::HttpState};
///
/// let _app = App::new()
///     .app_data(web::Data::new(HttpState::fixtures()))
///     .configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(students::list_students)
            .service(students::add_student)
            .service(students::update_student_age)
            .service(students::delete_student)
            .service(users::login)
            .service(users::signup)
            .service(users::logout)
            .service(users::current_user),
    )
    .service(pages::ledger::ledger_page)
    .service(pages::ledger::add_student_form)
    .service(pages::ledger::update_age_form)
    .service(pages::ledger::delete_student_form)
    .service(pages::auth_forms::login_page)
    .service(pages::auth_forms::login_submit)
    .service(pages::auth_forms::signup_page)
    .service(pages::auth_forms::signup_submit)
    .service(pages::dashboard::dashboard_page)
    .service(pages::dashboard::logout_submit);
}
