//! Domain ports: the two remote collaborators the application talks to.
//!
//! Inbound adapters depend only on these traits, so handlers and views can be
//! exercised against in-memory fixtures or mocks instead of the hosted
//! service.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_service;
mod student_store;

#[cfg(test)]
pub use auth_service::MockAuthService;
pub use auth_service::{
    ALREADY_REGISTERED_MESSAGE, AuthService, AuthServiceError, EMAIL_NOT_CONFIRMED_MESSAGE,
    FixtureAuthService, INVALID_LOGIN_MESSAGE,
};
#[cfg(test)]
pub use student_store::MockStudentStore;
pub use student_store::{FixtureStudentStore, StudentStore, StudentStoreError};
