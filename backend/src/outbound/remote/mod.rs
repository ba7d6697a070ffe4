//! Adapters for the hosted data service (PostgREST tables plus GoTrue auth).
//!
//! Both adapters share one [`RemoteServiceConfig`]: the project base URL, the
//! public API key sent as `apikey` on every call, and a single per-request
//! timeout. Transport details stay here; the domain only sees
//! [`crate::domain::ports::StudentStore`] and
//! [`crate::domain::ports::AuthService`].

mod dto;
mod http_auth_service;
mod http_student_store;

use std::time::Duration;

use reqwest::{Client, Url};
use zeroize::Zeroizing;

pub use http_auth_service::HttpAuthService;
pub use http_student_store::HttpStudentStore;

const API_KEY_HEADER: &str = "apikey";

/// Failures while constructing an adapter.
#[derive(Debug, thiserror::Error)]
pub enum RemoteSetupError {
    /// The configured base URL cannot carry the endpoint path.
    #[error("invalid remote endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Connection settings for the hosted service.
#[derive(Clone)]
pub struct RemoteServiceConfig {
    base_url: Url,
    api_key: Zeroizing<String>,
    timeout: Duration,
}

impl RemoteServiceConfig {
    /// Settings for the project at `base_url`.
    pub fn new(base_url: Url, api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url,
            api_key: Zeroizing::new(api_key.into()),
            timeout,
        }
    }

    /// URL of `path` beneath the project base, keeping any base path prefix.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path.trim_start_matches('/'))
    }

    pub(crate) fn api_key(&self) -> &str {
        self.api_key.as_str()
    }

    /// Reqwest client with the configured timeout applied to every request.
    pub(crate) fn client(&self) -> Result<Client, reqwest::Error> {
        Client::builder().timeout(self.timeout).build()
    }
}

impl std::fmt::Debug for RemoteServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteServiceConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// First part of an error body, whitespace collapsed, for log-friendly messages.
fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

/// Human-readable message from an error body, falling back to the status.
fn error_message(status: reqwest::StatusCode, body: &[u8]) -> String {
    if let Some(message) = dto::ErrorBodyDto::message_from(body) {
        return message;
    }
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use rstest::rstest;

    fn config(base: &str) -> RemoteServiceConfig {
        RemoteServiceConfig::new(
            Url::parse(base).expect("base url"),
            "anon-key",
            Duration::from_secs(5),
        )
    }

    #[rstest]
    #[case("https://demo.supabase.co", "https://demo.supabase.co/rest/v1/students")]
    #[case("https://demo.supabase.co/", "https://demo.supabase.co/rest/v1/students")]
    #[case("http://localhost:54321/proxy", "http://localhost:54321/proxy/rest/v1/students")]
    fn endpoints_keep_base_prefix(#[case] base: &str, #[case] expected: &str) {
        let url = config(base)
            .endpoint("/rest/v1/students")
            .expect("endpoint");
        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn debug_output_hides_the_key() {
        let rendered = format!("{:?}", config("https://demo.supabase.co"));
        assert!(!rendered.contains("anon-key"));
    }

    #[rstest]
    #[case(br#"{"msg":"Invalid login credentials"}"#.as_slice(), "Invalid login credentials")]
    #[case(br#"{"message":"duplicate key"}"#.as_slice(), "duplicate key")]
    #[case(b"".as_slice(), "status 502")]
    #[case(b"<html> bad   gateway </html>".as_slice(), "status 502: <html> bad gateway </html>")]
    fn error_messages_prefer_the_body(#[case] body: &[u8], #[case] expected: &str) {
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, body), expected);
    }

    #[test]
    fn long_previews_are_truncated() {
        let body = "x".repeat(400);
        let preview = body_preview(body.as_bytes());
        assert_eq!(preview.chars().count(), 163);
        assert!(preview.ends_with("..."));
    }
}
