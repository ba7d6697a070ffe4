//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] covers the JSON surface only: the students API, the account
//! API and the health probes. HTML pages are not described. Domain types are
//! represented by the wrapper schemas in
//! [`crate::inbound::http::schemas`] so the domain stays free of utoipa.
//!
//! The document is served by Swagger UI in debug builds and printed by the
//! `openapi-dump` binary.

use crate::inbound::http::schemas::{
    AuthUserSchema, ErrorCodeSchema, ErrorSchema, StudentSchema,
};
use crate::inbound::http::students::{AgeInput, AgeUpdateRequest, NewStudentRequest};
use crate::inbound::http::users::CredentialsRequest;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the JSON API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Student ledger API",
        description = "Student records and account sessions backed by a hosted data service."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::students::list_students,
        crate::inbound::http::students::add_student,
        crate::inbound::http::students::update_student_age,
        crate::inbound::http::students::delete_student,
        crate::inbound::http::users::login,
        crate::inbound::http::users::signup,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        StudentSchema,
        AuthUserSchema,
        ErrorSchema,
        ErrorCodeSchema,
        AgeInput,
        NewStudentRequest,
        AgeUpdateRequest,
        CredentialsRequest
    )),
    tags(
        (name = "students", description = "Student records"),
        (name = "users", description = "Sign up, sign in and session lookup"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
