//! Signup, login, dashboard guard and logout through the HTML forms.

mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use ledger::domain::ports::{EMAIL_NOT_CONFIRMED_MESSAGE, FixtureAuthService, INVALID_LOGIN_MESSAGE};
use support::{AuthCall, Harness, html, location, session_cookie};

const EMAIL: &str = "ada@example.com";
const PASSWORD: &str = "secret1";

#[actix_web::test]
async fn dashboard_redirects_anonymous_visitors() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;

    let res =
        test::call_service(&app, test::TestRequest::get().uri("/dashboard").to_request()).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res).as_deref(), Some("/login"));
    assert!(!html(res).await.contains("Welcome to Dashboard"));
    assert!(harness.auth.calls().is_empty());
}

#[actix_web::test]
async fn signup_login_dashboard_logout() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;

    let signed_up = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/signup")
            .set_form([("email", EMAIL), ("password", PASSWORD)])
            .to_request(),
    )
    .await;
    assert_eq!(signed_up.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&signed_up).as_deref(),
        Some("/login?notice=confirm-email")
    );

    let logged_in = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/login")
            .set_form([("email", EMAIL), ("password", PASSWORD)])
            .to_request(),
    )
    .await;
    assert_eq!(location(&logged_in).as_deref(), Some("/dashboard"));
    let cookie = session_cookie(&logged_in).expect("session cookie");

    let dashboard = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/dashboard")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(dashboard.status(), StatusCode::OK);
    let page = html(dashboard).await;
    assert!(page.contains("Welcome to Dashboard"));
    assert!(page.contains(&format!("Email: {EMAIL}")));

    let logged_out = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/logout")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(location(&logged_out).as_deref(), Some("/login"));

    // Replaying the old cookie fails: the fixture revoked the token.
    let replay = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/dashboard")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(location(&replay).as_deref(), Some("/login"));

    assert_eq!(
        harness.auth.calls(),
        vec![
            AuthCall::SignUp(EMAIL.to_owned()),
            AuthCall::SignIn(EMAIL.to_owned()),
            AuthCall::CurrentUser,
            AuthCall::SignOut,
            AuthCall::CurrentUser,
        ]
    );
}

#[actix_web::test]
async fn unconfirmed_accounts_cannot_sign_in_until_confirmed() {
    let harness = Harness::with_auth(FixtureAuthService::requiring_confirmation());
    let app = test::init_service(harness.app()).await;
    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/signup")
            .set_form([("email", EMAIL), ("password", PASSWORD)])
            .to_request(),
    )
    .await;

    let refused = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/login")
            .set_form([("email", EMAIL), ("password", PASSWORD)])
            .to_request(),
    )
    .await;
    assert_eq!(refused.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie(&refused).is_none());
    assert!(html(refused).await.contains(EMAIL_NOT_CONFIRMED_MESSAGE));

    harness
        .auth
        .fixture()
        .confirm_email(EMAIL)
        .expect("confirm account");
    let accepted = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/login")
            .set_form([("email", EMAIL), ("password", PASSWORD)])
            .to_request(),
    )
    .await;
    assert_eq!(location(&accepted).as_deref(), Some("/dashboard"));
}

#[actix_web::test]
async fn wrong_password_shows_the_service_message() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/login")
            .set_form([("email", EMAIL), ("password", "nope")])
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let page = html(res).await;
    assert!(page.contains(INVALID_LOGIN_MESSAGE));
    assert!(page.contains(&format!(r#"value="{EMAIL}""#)));
}

#[actix_web::test]
async fn ledger_page_is_open_to_anonymous_visitors() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
    let page = html(res).await;
    assert!(page.contains("Arcane Student Ledger"));
    assert!(page.contains(r#"href="/login""#));
    assert!(harness.auth.calls().is_empty());
}
