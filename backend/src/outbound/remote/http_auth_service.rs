//! Reqwest-backed identity adapter for the hosted auth endpoints.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use zeroize::Zeroizing;

use super::dto::{CredentialsDto, SessionDto, SignUpResponseDto, UserDto};
use super::{API_KEY_HEADER, RemoteServiceConfig, RemoteSetupError, error_message};
use crate::domain::ports::{AuthService, AuthServiceError};
use crate::domain::{AccessToken, AuthSession, AuthUser, Credentials, SignUpOutcome};

/// Auth service backed by the project's `/auth/v1` endpoints.
pub struct HttpAuthService {
    client: Client,
    token_url: Url,
    signup_url: Url,
    logout_url: Url,
    user_url: Url,
    api_key: Zeroizing<String>,
}

/// Which call produced a failure; they read status codes differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthCall {
    SignIn,
    SignUp,
    SignOut,
    User,
}

impl HttpAuthService {
    /// Adapter for the project described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error when an endpoint URL cannot be formed or the reqwest
    /// client cannot be constructed.
    pub fn new(config: &RemoteServiceConfig) -> Result<Self, RemoteSetupError> {
        let mut token_url = config.endpoint("auth/v1/token")?;
        token_url
            .query_pairs_mut()
            .append_pair("grant_type", "password");
        Ok(Self {
            client: config.client()?,
            token_url,
            signup_url: config.endpoint("auth/v1/signup")?,
            logout_url: config.endpoint("auth/v1/logout")?,
            user_url: config.endpoint("auth/v1/user")?,
            api_key: Zeroizing::new(config.api_key().to_owned()),
        })
    }

    async fn execute(
        &self,
        call: AuthCall,
        builder: RequestBuilder,
    ) -> Result<Result<Vec<u8>, AuthServiceError>, AuthServiceError> {
        let response = builder
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if status.is_success() {
            Ok(Ok(body.to_vec()))
        } else {
            Ok(Err(map_status_error(call, status, body.as_ref())))
        }
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, AuthServiceError> {
        let body = self
            .execute(
                AuthCall::SignUp,
                self.client
                    .post(self.signup_url.clone())
                    .json(&credentials_body(credentials)),
            )
            .await??;
        parse_sign_up(&body)
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, AuthServiceError> {
        let body = self
            .execute(
                AuthCall::SignIn,
                self.client
                    .post(self.token_url.clone())
                    .json(&credentials_body(credentials)),
            )
            .await??;
        parse_session(&body)
    }

    async fn sign_out(&self, token: &AccessToken) -> Result<(), AuthServiceError> {
        let outcome = self
            .execute(
                AuthCall::SignOut,
                self.client
                    .post(self.logout_url.clone())
                    .bearer_auth(token.expose()),
            )
            .await?;
        match outcome {
            Ok(_) => Ok(()),
            Err(err) if is_stale_token(&err) => Ok(()),
            Err(err) => Err(err),
        }
    }

    async fn current_user(
        &self,
        token: &AccessToken,
    ) -> Result<Option<AuthUser>, AuthServiceError> {
        let outcome = self
            .execute(
                AuthCall::User,
                self.client
                    .get(self.user_url.clone())
                    .bearer_auth(token.expose()),
            )
            .await?;
        match outcome {
            Ok(body) => parse_user(&body).map(Some),
            Err(err) if is_stale_token(&err) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

fn credentials_body(credentials: &Credentials) -> CredentialsDto<'_> {
    CredentialsDto {
        email: credentials.email(),
        password: credentials.password(),
    }
}

fn parse_session(body: &[u8]) -> Result<AuthSession, AuthServiceError> {
    let dto: SessionDto = serde_json::from_slice(body).map_err(|error| {
        AuthServiceError::decode(format!("invalid session payload: {error}"))
    })?;
    dto.into_domain().map_err(AuthServiceError::decode)
}

fn parse_sign_up(body: &[u8]) -> Result<SignUpOutcome, AuthServiceError> {
    let dto: SignUpResponseDto = serde_json::from_slice(body).map_err(|error| {
        AuthServiceError::decode(format!("invalid signup payload: {error}"))
    })?;
    match dto {
        SignUpResponseDto::Session(session) => session
            .into_domain()
            .map(SignUpOutcome::SignedIn)
            .map_err(AuthServiceError::decode),
        SignUpResponseDto::Pending(_) => Ok(SignUpOutcome::ConfirmationRequired),
    }
}

fn parse_user(body: &[u8]) -> Result<AuthUser, AuthServiceError> {
    let dto: UserDto = serde_json::from_slice(body)
        .map_err(|error| AuthServiceError::decode(format!("invalid user payload: {error}")))?;
    Ok(dto.into_domain())
}

/// Token-bound calls report an expired or revoked token as `InvalidCredentials`.
fn is_stale_token(err: &AuthServiceError) -> bool {
    matches!(err, AuthServiceError::InvalidCredentials { .. })
}

fn map_transport_error(error: reqwest::Error) -> AuthServiceError {
    if error.is_timeout() {
        AuthServiceError::connection(format!("request timed out: {error}"))
    } else {
        AuthServiceError::connection(error.to_string())
    }
}

fn map_status_error(call: AuthCall, status: StatusCode, body: &[u8]) -> AuthServiceError {
    let message = error_message(status, body);
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            AuthServiceError::connection(message)
        }
        StatusCode::BAD_REQUEST if call == AuthCall::SignIn => {
            AuthServiceError::invalid_credentials(message)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            AuthServiceError::invalid_credentials(message)
        }
        StatusCode::NOT_FOUND if call == AuthCall::SignOut => {
            AuthServiceError::invalid_credentials(message)
        }
        _ if status.is_client_error() => AuthServiceError::rejected(message),
        _ => AuthServiceError::connection(message),
    }
}
