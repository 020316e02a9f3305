//! Public user directory handlers.
//!
//! ```text
//! GET /api/v1/users?search=ada&skill=woodworking&page=1&limit=10
//! GET /api/v1/users/{id}
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{DirectoryRequest, PublicProfile};
use crate::domain::{Error, ProfileView, SkillName, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, FeedbackViewSchema, ProfileViewSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error, non_blank, parse_uuid};
use pagination::PageRequest;

const SKILL: FieldName = FieldName::new("skill");
const ID: FieldName = FieldName::new("id");

/// Directory filters. Blank values are ignored.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DirectoryParams {
    /// Case-insensitive substring of the user name.
    pub search: Option<String>,
    /// Skill name offered or wanted, matched ignoring case.
    pub skill: Option<String>,
    /// 1-based page number.
    #[param(minimum = 1, example = 1)]
    pub page: Option<u32>,
    #[param(minimum = 1, maximum = 100, example = 10)]
    pub limit: Option<u32>,
}

impl TryFrom<DirectoryParams> for DirectoryRequest {
    type Error = Error;

    fn try_from(params: DirectoryParams) -> Result<Self, Self::Error> {
        let skill = non_blank(params.skill)
            .map(SkillName::new)
            .transpose()
            .map_err(|err| invalid_field_error(SKILL, err))?;
        let page = PageRequest::new(params.page, params.limit)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        Ok(Self {
            search: non_blank(params.search),
            skill,
            page,
        })
    }
}

/// One page of public profiles.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryPage {
    #[schema(value_type = Vec<ProfileViewSchema>)]
    pub profiles: Vec<ProfileView>,
    /// Matches across every page.
    pub count: u64,
    pub num_of_pages: u64,
}

/// OpenAPI schema for [`PublicProfile`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::PublicProfile)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PublicProfileSchema {
    profile: ProfileViewSchema,
    feedback: Vec<FeedbackViewSchema>,
}

/// Search public profiles of non-banned users.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(DirectoryParams),
    responses(
        (status = 200, description = "Matching profiles", body = DirectoryPage),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listProfiles",
    security([])
)]
#[get("/users")]
pub async fn list_profiles(
    state: web::Data<HttpState>,
    params: web::Query<DirectoryParams>,
) -> ApiResult<web::Json<DirectoryPage>> {
    let request = DirectoryRequest::try_from(params.into_inner())?;
    let page = state.directory.search(request).await?;
    let num_of_pages = page.num_of_pages();
    let (profiles, count) = page.into_parts();
    Ok(web::Json(DirectoryPage {
        profiles,
        count,
        num_of_pages,
    }))
}

/// A single public profile and its feedback, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Public profile", body = PublicProfileSchema),
        (status = 400, description = "Invalid user id", body = ErrorSchema),
        (status = 401, description = "Profile is private", body = ErrorSchema),
        (status = 404, description = "No such user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getPublicProfile",
    security([])
)]
#[get("/users/{id}")]
pub async fn public_profile(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PublicProfile>> {
    let user_id = UserId::from_uuid(parse_uuid(&path.into_inner(), ID)?);
    let profile = state.directory.public_profile(&user_id).await?;
    Ok(web::Json(profile))
}

#[cfg(test)]
mod tests;
