//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every `/api/v1` handler plus the health probes. Domain
//! types are described through the wrappers in
//! [`crate::inbound::http::schemas`] so the domain stays free of utoipa.
//!
//! The document backs Swagger UI in debug builds and is exported by
//! `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::admin::{
    AdminSwapList, AdminUserList, BanResponse, BanState, SkillApprovalResponse, SkillList,
    SkillResponse,
};
use crate::inbound::http::auth::{
    LoginRequest, MessageResponse, RegisterRequest, UserEnvelope, UserResponse,
};
use crate::inbound::http::feedback::{FeedbackEnvelope, LeaveFeedbackRequest, UserFeedbackSchema};
use crate::inbound::http::profile::{
    AddSkillRequest, ProfileChangeResponse, ProfileEnvelope, ProfileUpdateRequest,
};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, FeedbackViewSchema, ProfileOwnerSchema, ProfileViewSchema,
    RaterSummarySchema, SkillSummarySchema, SwapStatusSchema, SwapViewSchema, UserSummarySchema,
};
use crate::inbound::http::swaps::{
    CreateSwapRequest, SwapEnvelope, SwapList, UpdateSwapStatusRequest,
};
use crate::inbound::http::users::{DirectoryPage, PublicProfileSchema};

/// Cookie name set by the session middleware.
pub const SESSION_COOKIE_NAME: &str = "session";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Session cookie issued by POST /api/v1/auth/login or /api/v1/auth/register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Skill swap API",
        description = "Profiles, skill swaps, feedback, and moderation behind a session cookie."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::profile::my_profile,
        crate::inbound::http::profile::update_profile,
        crate::inbound::http::profile::add_skill,
        crate::inbound::http::profile::remove_skill,
        crate::inbound::http::users::list_profiles,
        crate::inbound::http::users::public_profile,
        crate::inbound::http::swaps::create_swap,
        crate::inbound::http::swaps::list_swaps,
        crate::inbound::http::swaps::get_swap,
        crate::inbound::http::swaps::update_swap_status,
        crate::inbound::http::feedback::leave_feedback,
        crate::inbound::http::feedback::user_feedback,
        crate::inbound::http::admin::list_users,
        crate::inbound::http::admin::toggle_ban,
        crate::inbound::http::admin::list_swaps,
        crate::inbound::http::admin::list_skills,
        crate::inbound::http::admin::toggle_skill_approval,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserSummarySchema,
        SkillSummarySchema,
        ProfileOwnerSchema,
        ProfileViewSchema,
        SwapStatusSchema,
        SwapViewSchema,
        RaterSummarySchema,
        FeedbackViewSchema,
        PublicProfileSchema,
        UserFeedbackSchema,
        RegisterRequest,
        LoginRequest,
        UserResponse,
        UserEnvelope,
        MessageResponse,
        ProfileUpdateRequest,
        AddSkillRequest,
        ProfileEnvelope,
        ProfileChangeResponse,
        DirectoryPage,
        CreateSwapRequest,
        UpdateSwapStatusRequest,
        SwapEnvelope,
        SwapList,
        LeaveFeedbackRequest,
        FeedbackEnvelope,
        AdminUserList,
        BanState,
        BanResponse,
        SkillResponse,
        SkillList,
        SkillApprovalResponse,
        AdminSwapList,
    )),
    tags(
        (name = "auth", description = "Registration and session management"),
        (name = "profile", description = "The signed-in user's own profile"),
        (name = "users", description = "Public profile directory"),
        (name = "swaps", description = "Skill swap requests and their lifecycle"),
        (name = "feedback", description = "Ratings left after completed swaps"),
        (name = "admin", description = "Moderation for administrators"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    fn object_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.expect("components").schemas;
        match schemas.get(name) {
            Some(RefOr::T(Schema::Object(object))) => object.properties.keys().cloned().collect(),
            _ => panic!("expected object schema for {name}"),
        }
    }

    // utoipa replaces :: with . in schema names
    #[rstest]
    #[case("crate.domain.Error", &["code", "message", "traceId", "details"])]
    #[case("crate.domain.SwapView", &["id", "requester", "receiver", "skillOffered", "skillWanted", "status"])]
    #[case("crate.domain.ports.UserFeedback", &["feedback", "count", "averageRating"])]
    fn schemas_expose_wire_field_names(#[case] name: &str, #[case] expected: &[&str]) {
        let fields = object_fields(name);
        for field in expected {
            assert!(fields.iter().any(|f| f == field), "{name} lacks {field}");
        }
    }

    #[rstest]
    #[case("/api/v1/auth/register")]
    #[case("/api/v1/profile/me/skills/{skillId}")]
    #[case("/api/v1/swaps/{id}")]
    #[case("/api/v1/feedback/{userId}")]
    #[case("/api/v1/admin/skills/{id}/toggle-approval")]
    #[case("/health/ready")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
