//! Domain primitives, the ledger view, and the ports it drives.
//!
//! Purpose: Define strongly typed entities used by the HTTP adapters and the
//! remote-service adapters. Keep types immutable where possible and document
//! invariants and serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - Student, StudentId, StudentName, Age, NewStudent — ledger records.
//! - Credentials, AccessToken, AuthUser, AuthSession — identity values.
//! - LedgerView — list/create/update/delete state machine.
//! - check_access — session guard for protected pages.
//! - TraceId — per-request correlation identifier.

pub mod access;
pub mod auth;
pub mod error;
pub mod ledger;
pub mod ports;
pub mod student;
pub mod trace_id;

pub use self::access::{GuardDecision, check_access};
pub use self::auth::{
    AccessToken, AuthSession, AuthUser, Credentials, CredentialsValidationError,
    SIGN_UP_PASSWORD_MIN, SignUpOutcome,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ledger::{
    INVALID_AGE_MESSAGE, LedgerDialog, LedgerOutcome, LedgerRejection, LedgerView,
    MISSING_FIELDS_MESSAGE,
};
pub use self::student::{Age, NewStudent, Student, StudentId, StudentName, StudentValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

