//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AuthService, FixtureAuthService, FixtureStudentStore, StudentStore};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// The remote `students` table.
    pub students: Arc<dyn StudentStore>,
    /// The remote identity service.
    pub auth: Arc<dyn AuthService>,
}

impl HttpState {
    /// Bundle the two ports.
    pub fn new(students: Arc<dyn StudentStore>, auth: Arc<dyn AuthService>) -> Self {
        Self { students, auth }
    }

    /// State backed by the in-process fixtures.
    pub fn fixtures() -> Self {
        Self::new(
            Arc::new(FixtureStudentStore::new()),
            Arc::new(FixtureAuthService::new()),
        )
    }
}
