//! Server-rendered HTML pages.
//!
//! Every page is wrapped in the navigation shell from [`shell`]. Markup is
//! assembled by hand; every piece of user or remote text goes through
//! [`escape`] first.

pub mod auth_forms;
pub mod dashboard;
pub mod ledger;
pub mod shell;

use actix_web::http::StatusCode;
use actix_web::http::header::{self, ContentType};
use actix_web::HttpResponse;

/// Escape text for use in element content and quoted attribute values.
///
/// # Examples
/// ```
/// use ledger::inbound::http::pages::escape;
///
/// assert_eq!(escape("<b>\"Ada\" & co</b>"), "&lt;b&gt;&quot;Ada&quot; &amp; co&lt;/b&gt;");
/// ```
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Wrap `body` in the shell and answer with `status`.
pub(crate) fn render(status: StatusCode, title: &str, body: &str) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .body(shell::document(title, body))
}

/// `303 See Other` to `location`.
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}
