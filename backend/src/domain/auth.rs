//! Identity primitives issued by the hosted auth service.
//!
//! The application never mints identities. It validates the credentials a
//! visitor types in, hands them to [`crate::domain::ports::AuthService`], and
//! keeps the returned access token in the session cookie.

use std::fmt;

use serde::Serialize;
use zeroize::Zeroizing;

/// Minimum password length enforced by the signup form.
pub const SIGN_UP_PASSWORD_MIN: usize = 6;

/// Validation errors for credential form input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password shorter than the signup minimum.
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Required minimum length.
        min: usize,
    },
}

/// Email and password typed into the login or signup form.
///
/// ## Invariants
/// - `email` is trimmed and non-empty.
/// - `password` is non-empty; surrounding whitespace is preserved.
///
/// # Examples
/// ```
/// use ledger::domain::Credentials;
///
/// let creds = Credentials::try_from_parts(" ada@example.com ", "secret").unwrap();
/// assert_eq!(creds.email(), "ada@example.com");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Validate sign-in input.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(CredentialsValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Validate signup input, which additionally enforces
    /// [`SIGN_UP_PASSWORD_MIN`].
    pub fn try_for_sign_up(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let credentials = Self::try_from_parts(email, password)?;
        if credentials.password.chars().count() < SIGN_UP_PASSWORD_MIN {
            return Err(CredentialsValidationError::PasswordTooShort {
                min: SIGN_UP_PASSWORD_MIN,
            });
        }
        Ok(credentials)
    }

    /// Email used as the login identifier.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password exactly as typed.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opaque bearer token returned by a successful sign-in.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wrap a raw token; blank tokens are treated as absent.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self(Zeroizing::new(raw)))
    }

    /// Raw token for the `Authorization` header and the session cookie.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Identity reported by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    id: String,
    email: String,
}

impl AuthUser {
    /// Build from the remote service's fields.
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }

    /// Remote user identifier.
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Email attribute shown on the dashboard.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }
}

/// Result of a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    access_token: AccessToken,
    user: AuthUser,
}

impl AuthSession {
    /// Pair a token with its user.
    pub fn new(access_token: AccessToken, user: AuthUser) -> Self {
        Self { access_token, user }
    }

    /// Token to persist in the session cookie.
    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    /// Signed-in user.
    pub fn user(&self) -> &AuthUser {
        &self.user
    }
}

/// What the auth service did with a signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The account exists but the email must be confirmed before login.
    ConfirmationRequired,
    /// The service confirmed the account immediately and opened a session.
    SignedIn(AuthSession),
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialsValidationError::EmptyEmail)]
    #[case("   ", "pw", CredentialsValidationError::EmptyEmail)]
    #[case("ada@example.com", "", CredentialsValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = Credentials::try_from_parts(email, password).expect_err("invalid inputs");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn password_whitespace_is_preserved() {
        let creds = Credentials::try_from_parts("ada@example.com", " pw ").expect("valid");
        assert_eq!(creds.password(), " pw ");
    }

    #[rstest]
    #[case("12345", false)]
    #[case("123456", true)]
    fn sign_up_enforces_minimum_length(#[case] password: &str, #[case] accepted: bool) {
        let result = Credentials::try_for_sign_up("ada@example.com", password);
        assert_eq!(result.is_ok(), accepted);
    }

    #[rstest]
    fn debug_output_redacts_secrets() {
        let creds = Credentials::try_from_parts("ada@example.com", "hunter2").expect("valid");
        let token = AccessToken::new("token-value").expect("token");
        assert!(!format!("{creds:?}").contains("hunter2"));
        assert!(!format!("{token:?}").contains("token-value"));
    }

    #[rstest]
    fn blank_tokens_are_absent() {
        assert!(AccessToken::new("  ").is_none());
    }
}
