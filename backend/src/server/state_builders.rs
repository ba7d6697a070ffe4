//! Choose remote adapters or fixtures for the HTTP state.

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use ledger::domain::ports::{AuthService, StudentStore};
use ledger::inbound::http::state::HttpState;
use ledger::outbound::remote::{HttpAuthService, HttpStudentStore, RemoteSetupError};

use super::ServerConfig;

/// Build handler state: reqwest adapters when a remote service is
/// configured, otherwise the in-process fixtures.
///
/// # Errors
///
/// Returns an error when an adapter cannot be constructed.
pub(super) fn build_http_state(
    config: &ServerConfig,
) -> Result<web::Data<HttpState>, RemoteSetupError> {
    let state = match &config.remote {
        Some(remote) => {
            let students: Arc<dyn StudentStore> =
                Arc::new(HttpStudentStore::new(remote, &config.students_table)?);
            let auth: Arc<dyn AuthService> = Arc::new(HttpAuthService::new(remote)?);
            info!(table = %config.students_table, "using hosted data service");
            HttpState::new(students, auth)
        }
        None => {
            warn!("no remote service configured; serving in-memory fixtures");
            HttpState::fixtures()
        }
    };
    Ok(web::Data::new(state))
}
