//! Student ledger backend.
//!
//! An actix-web application that keeps a list of students in a hosted data
//! service and authenticates visitors against the same service. The
//! [`domain`] holds the ledger state machine and port traits, [`inbound`]
//! serves HTML pages plus a JSON API, and [`outbound`] talks to the remote
//! service over HTTP.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
