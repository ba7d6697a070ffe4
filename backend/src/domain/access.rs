//! Session guard for protected pages.
//!
//! Identity is looked up afresh on every protected request; nothing is
//! cached between requests. A missing token, a token the service no longer
//! recognises, and a failed lookup all deny access.

use tracing::warn;

use super::ports::AuthService;
use super::{AccessToken, AuthUser};

/// Outcome of checking the current visitor against the auth service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the protected content for this user.
    Allow(AuthUser),
    /// Send the visitor to the login page before rendering anything.
    RedirectToLogin,
}

impl GuardDecision {
    /// The admitted user, if any.
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            Self::Allow(user) => Some(user),
            Self::RedirectToLogin => None,
        }
    }
}

/// Resolve the visitor behind `token`.
///
/// # Examples
/// ```
/// use ledger::domain::{GuardDecision, check_access};
/// use ledger::domain::ports::FixtureAuthService;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let auth = FixtureAuthService::new();
/// assert_eq!(check_access(&auth, None).await, GuardDecision::RedirectToLogin);
/// # });
/// ```
pub async fn check_access(auth: &dyn AuthService, token: Option<&AccessToken>) -> GuardDecision {
    let Some(token) = token else {
        return GuardDecision::RedirectToLogin;
    };
    match auth.current_user(token).await {
        Ok(Some(user)) => GuardDecision::Allow(user),
        Ok(None) => GuardDecision::RedirectToLogin,
        Err(err) => {
            warn!(error = %err, "current user lookup failed; treating visitor as signed out");
            GuardDecision::RedirectToLogin
        }
    }
}
