//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror the serialised shape of their domain counterparts
//! and are registered under the domain type's name.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    #[schema(rename = "conflict")]
    Conflict,
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "Please provide a valid status")]
    message: String,
    #[schema(example = "01HZY8B2W6X5Y7Z9ABCD1234")]
    trace_id: Option<String>,
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::SwapStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::SwapStatus)]
pub enum SwapStatusSchema {
    #[schema(rename = "pending")]
    Pending,
    #[schema(rename = "accepted")]
    Accepted,
    #[schema(rename = "rejected")]
    Rejected,
    #[schema(rename = "cancelled")]
    Cancelled,
    #[schema(rename = "completed")]
    Completed,
}

/// OpenAPI schema for [`crate::domain::UserSummary`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UserSummary)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSummarySchema {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    #[schema(example = "Ada Lovelace")]
    name: String,
    #[schema(example = "ada@example.com")]
    email: String,
}

/// OpenAPI schema for [`crate::domain::SkillSummary`].
#[derive(ToSchema)]
#[schema(as = crate::domain::SkillSummary)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SkillSummarySchema {
    #[schema(example = "8d3e1c1a-9f0b-4d6e-a0a4-2b8f4f6c1d2e")]
    id: String,
    #[schema(example = "Woodworking")]
    name: String,
}

/// OpenAPI schema for [`crate::domain::ProfileOwner`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ProfileOwner)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ProfileOwnerSchema {
    id: String,
    name: String,
    email: String,
    #[schema(format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::ProfileView`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ProfileView)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ProfileViewSchema {
    user: ProfileOwnerSchema,
    #[schema(example = "Lisbon")]
    location: String,
    #[schema(example = "/uploads/default-avatar.png")]
    profile_photo_url: String,
    #[schema(example = "Weekends")]
    availability: String,
    is_public: bool,
    skills_offered: Vec<SkillSummarySchema>,
    skills_wanted: Vec<SkillSummarySchema>,
}

/// OpenAPI schema for [`crate::domain::SwapView`].
#[derive(ToSchema)]
#[schema(as = crate::domain::SwapView)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SwapViewSchema {
    id: String,
    requester: UserSummarySchema,
    receiver: UserSummarySchema,
    skill_offered: SkillSummarySchema,
    skill_wanted: SkillSummarySchema,
    status: SwapStatusSchema,
    #[schema(example = "Happy to trade an afternoon of joinery for Spanish.")]
    message: Option<String>,
    #[schema(format = DateTime)]
    created_at: String,
    #[schema(format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::RaterSummary`].
#[derive(ToSchema)]
#[schema(as = crate::domain::RaterSummary)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RaterSummarySchema {
    id: String,
    name: String,
}

/// OpenAPI schema for [`crate::domain::FeedbackView`].
#[derive(ToSchema)]
#[schema(as = crate::domain::FeedbackView)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct FeedbackViewSchema {
    id: String,
    swap: String,
    rater: RaterSummarySchema,
    rated_user: String,
    #[schema(minimum = 1, maximum = 5, example = 5)]
    rating: u8,
    comment: Option<String>,
    #[schema(format = DateTime)]
    created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[rstest]
    fn schemas_are_registered_under_domain_names() {
        // utoipa replaces :: with . in schema names
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert_eq!(SwapViewSchema::name(), "crate.domain.SwapView");
        assert_eq!(ProfileViewSchema::name(), "crate.domain.ProfileView");
    }

    #[rstest]
    fn error_code_schema_lists_every_code() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "conflict",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[rstest]
    fn wire_field_names_are_camel_case() {
        let swap = schema_to_json::<SwapViewSchema>();
        assert!(swap.contains("skillOffered"));
        assert!(!swap.contains("skill_offered"));
        let error = schema_to_json::<ErrorSchema>();
        assert!(error.contains("traceId"));
    }
}
