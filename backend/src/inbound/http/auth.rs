//! Authentication helpers shared by the JSON and HTML handlers.
//!
//! Keep the HTTP modules focused on request/response mapping by concentrating
//! credential validation, session bookkeeping and identity lookup here.

use serde_json::json;
use tracing::{info, warn};

use crate::domain::{
    AuthSession, AuthUser, Credentials, CredentialsValidationError, Error, GuardDecision,
    SignUpOutcome, check_access,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

use super::ApiResult;

/// Turn a credentials validation failure into a `400` with field details.
pub fn map_credentials_error(err: CredentialsValidationError) -> Error {
    let (field, code) = match err {
        CredentialsValidationError::EmptyEmail => ("email", "empty_email"),
        CredentialsValidationError::EmptyPassword => ("password", "empty_password"),
        CredentialsValidationError::PasswordTooShort { .. } => ("password", "password_too_short"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Sign in and remember the token in the session cookie.
pub async fn sign_in(
    state: &HttpState,
    session: &SessionContext,
    credentials: &Credentials,
) -> ApiResult<AuthUser> {
    let auth_session = state.auth.sign_in(credentials).await?;
    session.persist(&auth_session)?;
    info!(user_id = %auth_session.user().id(), "user signed in");
    Ok(auth_session.user().clone())
}

/// Register an account; a service that confirms immediately also signs in.
pub async fn sign_up(
    state: &HttpState,
    session: &SessionContext,
    credentials: &Credentials,
) -> ApiResult<Option<AuthUser>> {
    match state.auth.sign_up(credentials).await? {
        SignUpOutcome::ConfirmationRequired => {
            info!("account registered; awaiting email confirmation");
            Ok(None)
        }
        SignUpOutcome::SignedIn(auth_session) => {
            remember(session, &auth_session)?;
            Ok(Some(auth_session.user().clone()))
        }
    }
}

fn remember(session: &SessionContext, auth_session: &AuthSession) -> ApiResult<()> {
    session.persist(auth_session)?;
    info!(user_id = %auth_session.user().id(), "user signed in after signup");
    Ok(())
}

/// Revoke the remote session, if any, and purge the cookie.
///
/// Remote failures are logged only; the visitor is signed out locally either
/// way.
pub async fn sign_out(state: &HttpState, session: &SessionContext) {
    match session.access_token() {
        Ok(Some(token)) => {
            if let Err(err) = state.auth.sign_out(&token).await {
                warn!(error = %err, "remote sign-out failed");
            }
        }
        Ok(None) => {}
        Err(err) => warn!(error = %err, "unreadable session during sign-out"),
    }
    session.clear();
}

/// Run the session guard for the current request.
pub async fn guard(state: &HttpState, session: &SessionContext) -> GuardDecision {
    let token = match session.access_token() {
        Ok(token) => token,
        Err(err) => {
            warn!(error = %err, "unreadable session; treating visitor as signed out");
            None
        }
    };
    check_access(state.auth.as_ref(), token.as_ref()).await
}
