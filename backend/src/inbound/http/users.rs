//! Account API handlers.
//!
//! ```text
//! POST /api/v1/signup {"email":"ada@example.com","password":"secret1"}
//! POST /api/v1/login  {"email":"ada@example.com","password":"secret1"}
//! POST /api/v1/logout
//! GET  /api/v1/users/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthUser, Credentials, Error, GuardDecision};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{guard, map_credentials_error, sign_in, sign_out, sign_up};
use crate::inbound::http::schemas::{AuthUserSchema, ErrorSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body for `POST /api/v1/login` and `POST /api/v1/signup`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct CredentialsRequest {
    /// Account email.
    #[serde(default)]
    pub email: String,
    /// Account password.
    #[serde(default)]
    pub password: String,
}

/// Authenticate and establish a session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthUserSchema,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Auth service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<AuthUser>> {
    let credentials = Credentials::try_from_parts(&payload.email, &payload.password)
        .map_err(map_credentials_error)?;
    let user = sign_in(&state, &session, &credentials).await?;
    Ok(web::Json(user))
}

/// Register an account.
///
/// Answers `202` while the email awaits confirmation, or `201` with the user
/// when the service signs the account in straight away.
#[utoipa::path(
    post,
    path = "/api/v1/signup",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Registered and signed in", body = AuthUserSchema),
        (status = 202, description = "Registered; confirm the email before signing in"),
        (status = 400, description = "Invalid request or already registered", body = ErrorSchema),
        (status = 503, description = "Auth service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = Credentials::try_for_sign_up(&payload.email, &payload.password)
        .map_err(map_credentials_error)?;
    Ok(match sign_up(&state, &session, &credentials).await? {
        Some(user) => HttpResponse::Created().json(user),
        None => HttpResponse::Accepted().finish(),
    })
}

/// Revoke the session and clear the cookie.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["users"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(state: web::Data<HttpState>, session: SessionContext) -> HttpResponse {
    sign_out(&state, &session).await;
    HttpResponse::NoContent().finish()
}

/// The signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = AuthUserSchema),
        (status = 401, description = "No active session", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AuthUser>> {
    match guard(&state, &session).await {
        GuardDecision::Allow(user) => Ok(web::Json(user)),
        GuardDecision::RedirectToLogin => Err(Error::unauthorized("login required")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        AuthServiceError, FixtureAuthService, FixtureStudentStore, INVALID_LOGIN_MESSAGE,
        MockAuthService,
    };
    use crate::domain::{AccessToken, AuthSession, SignUpOutcome};
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn state_with(auth: impl crate::domain::ports::AuthService + 'static) -> HttpState {
        HttpState::new(Arc::new(FixtureStudentStore::new()), Arc::new(auth))
    }

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(test_session_middleware())
            .app_data(web::Data::new(state))
            .service(
                web::scope("/api/v1")
                    .service(login)
                    .service(signup)
                    .service(logout)
                    .service(current_user),
            )
    }

    fn creds(email: &str, password: &str) -> Value {
        json!({ "email": email, "password": password })
    }

    #[actix_web::test]
    async fn signup_login_me_logout_round() {
        let app = test::init_service(test_app(state_with(FixtureAuthService::new()))).await;

        let signed_up = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/signup")
                .set_json(creds("ada@example.com", "secret1"))
                .to_request(),
        )
        .await;
        assert_eq!(signed_up.status(), StatusCode::ACCEPTED);

        let logged_in = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(creds("ada@example.com", "secret1"))
                .to_request(),
        )
        .await;
        assert_eq!(logged_in.status(), StatusCode::OK);
        let cookie = session_cookie(&logged_in).expect("session cookie");

        let me: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/users/me")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(me["email"], "ada@example.com");

        let logged_out = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/logout")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(logged_out.status(), StatusCode::NO_CONTENT);

        // The old cookie still carries the token, but the service revoked it.
        let after = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/users/me")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[case("/api/v1/login", creds("  ", "secret1"), "empty_email")]
    #[case("/api/v1/login", creds("ada@example.com", ""), "empty_password")]
    #[case("/api/v1/signup", creds("ada@example.com", "12345"), "password_too_short")]
    #[actix_web::test]
    async fn malformed_credentials_never_reach_the_service(
        #[case] uri: &str,
        #[case] body: Value,
        #[case] code: &str,
    ) {
        let mut auth = MockAuthService::new();
        auth.expect_sign_in().never();
        auth.expect_sign_up().never();
        let app = test::init_service(test_app(state_with(auth))).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post().uri(uri).set_json(body).to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let err: Value = test::read_body_json(res).await;
        assert_eq!(err["details"]["code"], code);
    }

    #[actix_web::test]
    async fn refused_login_surfaces_service_message() {
        let mut auth = MockAuthService::new();
        auth.expect_sign_in()
            .returning(|_| Err(AuthServiceError::invalid_credentials(INVALID_LOGIN_MESSAGE)));
        let app = test::init_service(test_app(state_with(auth))).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(creds("ada@example.com", "wrong1"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let err: Value = test::read_body_json(res).await;
        assert_eq!(err["message"], INVALID_LOGIN_MESSAGE);
    }

    #[actix_web::test]
    async fn auto_confirmed_signup_opens_a_session() {
        let mut auth = MockAuthService::new();
        auth.expect_sign_up().returning(|_| {
            let token = AccessToken::new("t-1").expect("token");
            Ok(SignUpOutcome::SignedIn(AuthSession::new(
                token,
                crate::domain::AuthUser::new("u-1", "ada@example.com"),
            )))
        });
        let app = test::init_service(test_app(state_with(auth))).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/signup")
                .set_json(creds("ada@example.com", "secret1"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        assert!(session_cookie(&res).is_some());
    }

    #[actix_web::test]
    async fn anonymous_me_is_unauthorised() {
        let mut auth = MockAuthService::new();
        auth.expect_current_user().never();
        let app = test::init_service(test_app(state_with(auth))).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/users/me").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn logout_without_session_still_succeeds() {
        let mut auth = MockAuthService::new();
        auth.expect_sign_out().never();
        let app = test::init_service(test_app(state_with(auth))).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post().uri("/api/v1/logout").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }
}
