//! Handlers for the signed-in user's own profile.
//!
//! ```text
//! GET /api/v1/profile/me
//! PATCH /api/v1/profile/me {"location":"Lisbon","isPublic":false}
//! POST /api/v1/profile/me/skills {"skillName":"Woodworking","type":"offered"}
//! DELETE /api/v1/profile/me/skills/{skillId}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ProfileUpdate, ProfileView, SkillId, SkillListKind, SkillName};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, ProfileViewSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, RequiredFields, invalid_field_error, parse_uuid,
};

const SKILL_NAME: FieldName = FieldName::new("skillName");
const SKILL_TYPE: FieldName = FieldName::new("type");
const SKILL_ID: FieldName = FieldName::new("skillId");

/// Partial profile edit. Absent and blank text fields leave the stored value
/// untouched.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    #[schema(example = "Lisbon")]
    pub location: Option<String>,
    #[schema(example = "Weekends")]
    pub availability: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddSkillRequest {
    #[schema(example = "Woodworking")]
    pub skill_name: Option<String>,
    #[serde(rename = "type")]
    #[schema(example = "offered")]
    pub kind: Option<String>,
}

/// `{profile}` envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileEnvelope {
    #[schema(value_type = ProfileViewSchema)]
    pub profile: ProfileView,
}

/// `{msg, profile}` envelope returned by skill edits.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileChangeResponse {
    pub msg: String,
    #[schema(value_type = ProfileViewSchema)]
    pub profile: ProfileView,
}

/// Profile of the signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/profile/me",
    responses(
        (status = 200, description = "Own profile", body = ProfileEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Profile not found", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "getMyProfile"
)]
#[get("/profile/me")]
pub async fn my_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ProfileEnvelope>> {
    let user_id = session.require_user_id()?;
    let profile = state.profiles.my_profile(&user_id).await?;
    Ok(web::Json(ProfileEnvelope { profile }))
}

/// Edit location, availability, or visibility.
#[utoipa::path(
    patch,
    path = "/api/v1/profile/me",
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileEnvelope),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "updateMyProfile"
)]
#[patch("/profile/me")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProfileUpdateRequest>,
) -> ApiResult<web::Json<ProfileEnvelope>> {
    let user_id = session.require_user_id()?;
    let ProfileUpdateRequest {
        location,
        availability,
        is_public,
    } = payload.into_inner();
    let update = ProfileUpdate::try_new(location.as_deref(), availability.as_deref(), is_public)
        .map_err(|err| crate::domain::Error::invalid_request(err.to_string()))?;
    let profile = state.profiles.update_profile(&user_id, update).await?;
    Ok(web::Json(ProfileEnvelope { profile }))
}

/// Add a catalogue skill to the offered or wanted list, creating it on
/// first use.
#[utoipa::path(
    post,
    path = "/api/v1/profile/me/skills",
    request_body = AddSkillRequest,
    responses(
        (status = 200, description = "Skill added", body = ProfileChangeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "addSkill"
)]
#[post("/profile/me/skills")]
pub async fn add_skill(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AddSkillRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let AddSkillRequest { skill_name, kind } = payload.into_inner();
    RequiredFields::default()
        .check(SKILL_NAME, &skill_name)
        .check(SKILL_TYPE, &kind)
        .finish("Please provide skill name and type (offered/wanted)")?;

    let name = SkillName::new(skill_name.unwrap_or_default())
        .map_err(|err| invalid_field_error(SKILL_NAME, err))?;
    let kind: SkillListKind = kind
        .unwrap_or_default()
        .trim()
        .parse()
        .map_err(|err| invalid_field_error(SKILL_TYPE, err))?;

    let profile = state.profiles.add_skill(&user_id, name, kind).await?;
    Ok(HttpResponse::Ok().json(ProfileChangeResponse {
        msg: "Skill added successfully!".to_owned(),
        profile,
    }))
}

/// Remove a skill from both lists.
#[utoipa::path(
    delete,
    path = "/api/v1/profile/me/skills/{skillId}",
    params(("skillId" = String, Path, description = "Skill identifier")),
    responses(
        (status = 200, description = "Skill removed", body = ProfileChangeResponse),
        (status = 400, description = "Invalid skill id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "removeSkill"
)]
#[delete("/profile/me/skills/{skill_id}")]
pub async fn remove_skill(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let skill = SkillId::from_uuid(parse_uuid(&path.into_inner(), SKILL_ID)?);
    let profile = state.profiles.remove_skill(&user_id, &skill).await?;
    Ok(HttpResponse::Ok().json(ProfileChangeResponse {
        msg: "Skill removed successfully!".to_owned(),
        profile,
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::domain::SkillListKind;
    use crate::inbound::http::test_utils::{body_json, init_in_memory_api, login_as};
    use crate::test_support::seed_user;

    #[rstest]
    #[actix_web::test]
    async fn anonymous_requests_are_rejected() {
        let (_store, app) = init_in_memory_api().await;
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/profile/me").to_request())
                .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(res).await["message"], "Authentication invalid");
    }

    #[rstest]
    #[actix_web::test]
    async fn new_profiles_carry_defaults() {
        let (store, app) = init_in_memory_api().await;
        seed_user(&store, "Ada Lovelace", "ada@example.com");
        let cookie = login_as(&app, "ada@example.com").await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/profile/me")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let profile = &body_json(res).await["profile"];
        assert_eq!(profile["user"]["name"], "Ada Lovelace");
        assert_eq!(profile["isPublic"], true);
        assert_eq!(profile["skillsOffered"], json!([]));
    }

    #[rstest]
    #[actix_web::test]
    async fn patch_applies_only_provided_fields() {
        let (store, app) = init_in_memory_api().await;
        seed_user(&store, "Ada Lovelace", "ada@example.com");
        let cookie = login_as(&app, "ada@example.com").await;

        let patch = |body: Value| {
            test::TestRequest::patch()
                .uri("/profile/me")
                .cookie(cookie.clone())
                .set_json(body)
                .to_request()
        };
        let first = body_json(
            test::call_service(&app, patch(json!({"location": "Lisbon", "isPublic": false})))
                .await,
        )
        .await;
        assert_eq!(first["profile"]["location"], "Lisbon");
        assert_eq!(first["profile"]["isPublic"], false);

        let second = body_json(
            test::call_service(&app, patch(json!({"location": "  ", "availability": "Evenings"})))
                .await,
        )
        .await;
        assert_eq!(second["profile"]["location"], "Lisbon");
        assert_eq!(second["profile"]["availability"], "Evenings");
        assert_eq!(second["profile"]["isPublic"], false);
    }

    #[rstest]
    #[actix_web::test]
    async fn skills_are_added_once_and_removed() {
        let (store, app) = init_in_memory_api().await;
        seed_user(&store, "Ada Lovelace", "ada@example.com");
        let cookie = login_as(&app, "ada@example.com").await;

        let add = || {
            test::TestRequest::post()
                .uri("/profile/me/skills")
                .cookie(cookie.clone())
                .set_json(json!({"skillName": "Woodworking", "type": "offered"}))
                .to_request()
        };
        let first = test::call_service(&app, add()).await;
        assert_eq!(first.status(), StatusCode::OK);
        let body = body_json(test::call_service(&app, add()).await).await;
        assert_eq!(body["msg"], "Skill added successfully!");
        let offered = body["profile"]["skillsOffered"]
            .as_array()
            .expect("offered list")
            .clone();
        assert_eq!(offered.len(), 1);
        assert_eq!(store.skill_count(), 1);

        let skill_id = offered[0]["id"].as_str().expect("skill id").to_owned();
        let removed = body_json(
            test::call_service(
                &app,
                test::TestRequest::delete()
                    .uri(&format!("/profile/me/skills/{skill_id}"))
                    .cookie(cookie.clone())
                    .to_request(),
            )
            .await,
        )
        .await;
        assert_eq!(removed["msg"], "Skill removed successfully!");
        assert_eq!(removed["profile"]["skillsOffered"], json!([]));
    }

    #[rstest]
    #[actix_web::test]
    async fn existing_skills_are_matched_case_insensitively() {
        let (store, app) = init_in_memory_api().await;
        seed_user(&store, "Admin", "admin@example.com");
        let ada = seed_user(&store, "Ada Lovelace", "ada@example.com");
        store.give_skill(ada.id(), SkillListKind::Offered, "Spanish");
        let cookie = login_as(&app, "ada@example.com").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/profile/me/skills")
                .cookie(cookie)
                .set_json(json!({"skillName": "spanish", "type": "wanted"}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(store.skill_count(), 1);
        let body = body_json(res).await;
        assert_eq!(body["profile"]["skillsWanted"][0]["name"], "Spanish");
    }

    #[rstest]
    #[case(json!({"skillName": "Woodworking"}), "Please provide skill name and type (offered/wanted)")]
    #[case(json!({"skillName": "Woodworking", "type": "taught"}), "Type must be either \"offered\" or \"wanted\"")]
    #[actix_web::test]
    async fn invalid_skill_requests_are_rejected(#[case] body: Value, #[case] message: &str) {
        let (store, app) = init_in_memory_api().await;
        seed_user(&store, "Ada Lovelace", "ada@example.com");
        let cookie = login_as(&app, "ada@example.com").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/profile/me/skills")
                .cookie(cookie)
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["message"], message);
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_skill_ids_are_rejected() {
        let (store, app) = init_in_memory_api().await;
        seed_user(&store, "Ada Lovelace", "ada@example.com");
        let cookie = login_as(&app, "ada@example.com").await;

        let res = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri("/profile/me/skills/woodworking")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(res).await["message"],
            "skillId must be a valid UUID"
        );
    }
}
