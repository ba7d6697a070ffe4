//! Driven port for the hosted identity service.
//!
//! Mirrors the remote auth contract: `signUp`, `signInWithPassword`,
//! `signOut`, and `getUser`. Adapters surface the service's own failure text
//! in [`AuthServiceError::InvalidCredentials`] and
//! [`AuthServiceError::Rejected`] so forms can show it verbatim.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::define_port_error;
use crate::domain::{AccessToken, AuthSession, AuthUser, Credentials, Error, SignUpOutcome};

define_port_error! {
    /// Failures reported by an [`AuthService`] adapter.
    pub enum AuthServiceError {
        /// Email/password pair was refused.
        InvalidCredentials => "{message}",
        /// The service refused the request for another reason.
        Rejected => "{message}",
        /// The service could not be reached or timed out.
        Connection => "auth service connection failed: {message}",
        /// The response could not be decoded.
        Decode => "auth service response was malformed: {message}",
    }
}

impl From<AuthServiceError> for Error {
    fn from(value: AuthServiceError) -> Self {
        match value {
            AuthServiceError::InvalidCredentials { message } => Self::unauthorized(message),
            AuthServiceError::Rejected { message } => Self::invalid_request(message),
            AuthServiceError::Connection { .. } => {
                Self::service_unavailable("sign-in is temporarily unavailable")
            }
            AuthServiceError::Decode { message } => Self::internal(message),
        }
    }
}

/// Remote identity operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new account.
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, AuthServiceError>;

    /// Exchange an email/password pair for a session.
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, AuthServiceError>;

    /// Revoke the session behind `token`.
    async fn sign_out(&self, token: &AccessToken) -> Result<(), AuthServiceError>;

    /// Resolve `token` to its user; `None` when the token is no longer valid.
    async fn current_user(&self, token: &AccessToken)
    -> Result<Option<AuthUser>, AuthServiceError>;
}

/// Message the hosted service returns for a wrong email or password.
pub const INVALID_LOGIN_MESSAGE: &str = "Invalid login credentials";
/// Message the hosted service returns for an unconfirmed account.
pub const EMAIL_NOT_CONFIRMED_MESSAGE: &str = "Email not confirmed";
/// Message the hosted service returns for a duplicate signup.
pub const ALREADY_REGISTERED_MESSAGE: &str = "User already registered";

struct FixtureAccount {
    user: AuthUser,
    password: Zeroizing<String>,
    confirmed: bool,
}

/// In-process identity service used when no remote service is configured.
///
/// By default accounts are usable straight after signup, though signup still
/// reports [`SignUpOutcome::ConfirmationRequired`] so the form flow matches
/// the hosted service. [`FixtureAuthService::requiring_confirmation`] keeps
/// new accounts locked until [`FixtureAuthService::confirm_email`] runs.
#[derive(Default)]
pub struct FixtureAuthService {
    accounts: Mutex<HashMap<String, FixtureAccount>>,
    sessions: Mutex<HashMap<String, AuthUser>>,
    hold_until_confirmed: bool,
}

impl FixtureAuthService {
    /// Service whose accounts are confirmed on signup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Service whose accounts need [`Self::confirm_email`] before login.
    pub fn requiring_confirmation() -> Self {
        Self {
            hold_until_confirmed: true,
            ..Self::default()
        }
    }

    /// Mark the account for `email` as confirmed.
    pub fn confirm_email(&self, email: &str) -> Result<(), AuthServiceError> {
        let mut accounts = self.accounts()?;
        match accounts.get_mut(email) {
            Some(account) => {
                account.confirmed = true;
                Ok(())
            }
            None => Err(AuthServiceError::rejected("User not found")),
        }
    }

    fn accounts(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, FixtureAccount>>, AuthServiceError> {
        self.accounts
            .lock()
            .map_err(|_| AuthServiceError::connection("fixture accounts lock poisoned"))
    }

    fn sessions(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, AuthUser>>, AuthServiceError> {
        self.sessions
            .lock()
            .map_err(|_| AuthServiceError::connection("fixture sessions lock poisoned"))
    }

    fn open_session(&self, user: AuthUser) -> Result<AuthSession, AuthServiceError> {
        let raw = Uuid::new_v4().to_string();
        let token = AccessToken::new(raw.clone())
            .ok_or_else(|| AuthServiceError::decode("generated an empty token"))?;
        self.sessions()?.insert(raw, user.clone());
        Ok(AuthSession::new(token, user))
    }
}

#[async_trait]
impl AuthService for FixtureAuthService {
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, AuthServiceError> {
        let mut accounts = self.accounts()?;
        if accounts.contains_key(credentials.email()) {
            return Err(AuthServiceError::rejected(ALREADY_REGISTERED_MESSAGE));
        }
        let user = AuthUser::new(Uuid::new_v4().to_string(), credentials.email());
        accounts.insert(
            credentials.email().to_owned(),
            FixtureAccount {
                user,
                password: Zeroizing::new(credentials.password().to_owned()),
                confirmed: !self.hold_until_confirmed,
            },
        );
        Ok(SignUpOutcome::ConfirmationRequired)
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, AuthServiceError> {
        let user = {
            let accounts = self.accounts()?;
            let account = accounts
                .get(credentials.email())
                .filter(|account| account.password.as_str() == credentials.password())
                .ok_or_else(|| AuthServiceError::invalid_credentials(INVALID_LOGIN_MESSAGE))?;
            if !account.confirmed {
                return Err(AuthServiceError::invalid_credentials(
                    EMAIL_NOT_CONFIRMED_MESSAGE,
                ));
            }
            account.user.clone()
        };
        self.open_session(user)
    }

    async fn sign_out(&self, token: &AccessToken) -> Result<(), AuthServiceError> {
        self.sessions()?.remove(token.expose());
        Ok(())
    }

    async fn current_user(
        &self,
        token: &AccessToken,
    ) -> Result<Option<AuthUser>, AuthServiceError> {
        Ok(self.sessions()?.get(token.expose()).cloned())
    }
}
