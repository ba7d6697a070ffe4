//! What a client may learn from a domain [`Error`].
//!
//! Both surfaces share one policy: internal failures (decode errors, broken
//! adapters) are logged where they happen and reach clients only as
//! [`WITHHELD_MESSAGE`]. Remote rejections and local validation keep their
//! text, since it tells the user what to fix. JSON answers carry the trace
//! identifier in both the body and the `trace-id` header; pages show the
//! message alone.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Shown in place of any internal error message.
pub const WITHHELD_MESSAGE: &str = "Something went wrong. Please try again.";

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn is_withheld(error: &Error) -> bool {
    matches!(error.code(), ErrorCode::InternalError)
}

/// Text safe to show a user for `error`.
///
/// # Examples
/// ```
/// use ledger::domain::Error;
/// use ledger::inbound::http::error::{WITHHELD_MESSAGE, visible_message};
///
/// assert_eq!(visible_message(&Error::invalid_request("Invalid age")), "Invalid age");
/// assert_eq!(visible_message(&Error::internal("row 7: bad json")), WITHHELD_MESSAGE);
/// ```
pub fn visible_message(error: &Error) -> &str {
    if is_withheld(error) {
        WITHHELD_MESSAGE
    } else {
        error.message()
    }
}

/// JSON body for `error`: internal errors lose their message and details
/// but keep the trace identifier.
fn client_payload(error: &Error) -> Error {
    if !is_withheld(error) {
        return error.clone();
    }
    let redacted = Error::internal(WITHHELD_MESSAGE);
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id.to_owned()),
        None => redacted,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(client_payload(self))
    }
}
