//! Shared harness for the integration suites.
//!
//! Recording doubles wrap the in-process fixtures so tests can assert which
//! remote calls a request made, and can switch individual calls to failure.

#![allow(dead_code, reason = "each suite uses a different subset of the harness")]

use std::sync::{Arc, Mutex};

use actix_session::SessionMiddleware;
use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key, SameSite, time::Duration as CookieDuration};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, web};
use async_trait::async_trait;

use ledger::Trace;
use ledger::domain::ports::{
    AuthService, AuthServiceError, FixtureAuthService, FixtureStudentStore, StudentStore,
    StudentStoreError,
};
use ledger::domain::{
    AccessToken, Age, AuthSession, AuthUser, Credentials, NewStudent, SignUpOutcome, Student,
    StudentId,
};
use ledger::inbound::http::configure;
use ledger::inbound::http::health::{HealthState, live, ready};
use ledger::inbound::http::state::HttpState;

pub const SESSION_COOKIE: &str = "session";

/// One call made against the student table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List,
    Add { name: String, age: i32 },
    UpdateAge { id: i64, age: i32 },
    Delete { id: i64 },
}

impl StoreCall {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::List)
    }
}

/// Student store that records every call before delegating to a fixture.
#[derive(Clone, Default)]
pub struct RecordingStudentStore {
    inner: Arc<FixtureStudentStore>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    failing_list: Arc<Mutex<Option<StudentStoreError>>>,
}

impl RecordingStudentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().expect("store calls lock").clone()
    }

    pub fn mutations(&self) -> Vec<StoreCall> {
        self.calls()
            .into_iter()
            .filter(StoreCall::is_mutation)
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().expect("store calls lock").clear();
    }

    /// Make every subsequent `list` fail with `error`.
    pub fn fail_list_with(&self, error: StudentStoreError) {
        *self.failing_list.lock().expect("list failure lock") = Some(error);
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().expect("store calls lock").push(call);
    }
}

#[async_trait]
impl StudentStore for RecordingStudentStore {
    async fn list(&self) -> Result<Vec<Student>, StudentStoreError> {
        self.record(StoreCall::List);
        let failure = self.failing_list.lock().expect("list failure lock").clone();
        match failure {
            Some(error) => Err(error),
            None => self.inner.list().await,
        }
    }

    async fn add(&self, student: &NewStudent) -> Result<(), StudentStoreError> {
        self.record(StoreCall::Add {
            name: student.name().as_str().to_owned(),
            age: student.age().get(),
        });
        self.inner.add(student).await
    }

    async fn update_age(&self, id: StudentId, age: Age) -> Result<(), StudentStoreError> {
        self.record(StoreCall::UpdateAge {
            id: id.get(),
            age: age.get(),
        });
        self.inner.update_age(id, age).await
    }

    async fn delete(&self, id: StudentId) -> Result<(), StudentStoreError> {
        self.record(StoreCall::Delete { id: id.get() });
        self.inner.delete(id).await
    }
}

/// One call made against the identity service; credentials are reduced to
/// the email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthCall {
    SignUp(String),
    SignIn(String),
    SignOut,
    CurrentUser,
}

/// Auth service that records every call before delegating to a fixture.
#[derive(Clone)]
pub struct RecordingAuthService {
    inner: Arc<FixtureAuthService>,
    calls: Arc<Mutex<Vec<AuthCall>>>,
}

impl RecordingAuthService {
    pub fn new(inner: FixtureAuthService) -> Self {
        Self {
            inner: Arc::new(inner),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn fixture(&self) -> &FixtureAuthService {
        &self.inner
    }

    pub fn calls(&self) -> Vec<AuthCall> {
        self.calls.lock().expect("auth calls lock").clone()
    }

    fn record(&self, call: AuthCall) {
        self.calls.lock().expect("auth calls lock").push(call);
    }
}

#[async_trait]
impl AuthService for RecordingAuthService {
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, AuthServiceError> {
        self.record(AuthCall::SignUp(credentials.email().to_owned()));
        self.inner.sign_up(credentials).await
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, AuthServiceError> {
        self.record(AuthCall::SignIn(credentials.email().to_owned()));
        self.inner.sign_in(credentials).await
    }

    async fn sign_out(&self, token: &AccessToken) -> Result<(), AuthServiceError> {
        self.record(AuthCall::SignOut);
        self.inner.sign_out(token).await
    }

    async fn current_user(
        &self,
        token: &AccessToken,
    ) -> Result<Option<AuthUser>, AuthServiceError> {
        self.record(AuthCall::CurrentUser);
        self.inner.current_user(token).await
    }
}

/// Doubles shared between a test and the app under test.
pub struct Harness {
    pub store: RecordingStudentStore,
    pub auth: RecordingAuthService,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_auth(FixtureAuthService::new())
    }

    pub fn with_auth(auth: FixtureAuthService) -> Self {
        Self {
            store: RecordingStudentStore::new(),
            auth: RecordingAuthService::new(auth),
        }
    }

    fn state(&self) -> HttpState {
        HttpState::new(Arc::new(self.store.clone()), Arc::new(self.auth.clone()))
    }

    /// The production middleware stack over these doubles.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
            .cookie_name(SESSION_COOKIE.to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(false)
            .cookie_http_only(true)
            .cookie_content_security(CookieContentSecurity::Private)
            .cookie_same_site(SameSite::Lax)
            .session_lifecycle(PersistentSession::default().session_ttl(CookieDuration::hours(2)))
            .build();
        let health = web::Data::new(HealthState::new());
        health.mark_ready();

        App::new()
            .app_data(health)
            .app_data(web::Data::new(self.state()))
            .wrap(session)
            .wrap(Trace)
            .service(ready)
            .service(live)
            .configure(configure)
    }
}

/// The session cookie set by `res`, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
}

/// Value of the `Location` header.
pub fn location<B>(res: &ServiceResponse<B>) -> Option<String> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Read a response body as UTF-8 HTML.
pub async fn html(res: ServiceResponse) -> String {
    let bytes = actix_web::test::read_body(res).await;
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}
