//! Moderation handlers. Every route requires an admin session; the role is
//! re-checked against storage on each request.
//!
//! ```text
//! GET /api/v1/admin/users
//! PATCH /api/v1/admin/users/{id}/ban
//! GET /api/v1/admin/swaps?status=pending
//! GET /api/v1/admin/skills
//! PATCH /api/v1/admin/skills/{id}/toggle-approval
//! ```

use actix_web::{get, patch, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Skill, SkillId, SwapStatus, SwapView, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::UserResponse;
use crate::inbound::http::schemas::{ErrorSchema, SwapViewSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error, non_blank, parse_uuid};

const ID: FieldName = FieldName::new("id");
const STATUS: FieldName = FieldName::new("status");

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminUserList {
    pub users: Vec<UserResponse>,
    pub count: usize,
}

/// Ban state of the user that was just toggled.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BanState {
    pub id: String,
    pub name: String,
    pub is_banned: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BanResponse {
    #[schema(example = "User has been banned")]
    pub msg: String,
    pub user: BanState,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkillResponse {
    pub id: String,
    #[schema(example = "Woodworking")]
    pub name: String,
    pub is_approved: bool,
    #[schema(format = DateTime)]
    pub created_at: String,
}

impl From<&Skill> for SkillResponse {
    fn from(skill: &Skill) -> Self {
        Self {
            id: skill.id.to_string(),
            name: skill.name.to_string(),
            is_approved: skill.is_approved,
            created_at: skill.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SkillList {
    pub skills: Vec<SkillResponse>,
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SkillApprovalResponse {
    #[schema(example = "Skill has been approved")]
    pub msg: String,
    pub skill: SkillResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminSwapList {
    #[schema(value_type = Vec<SwapViewSchema>)]
    pub swaps: Vec<SwapView>,
    pub count: usize,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SwapFilter {
    /// Only swaps currently in this state.
    #[param(example = "pending")]
    pub status: Option<String>,
}

/// Every account, without credentials.
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    responses(
        (status = 200, description = "All users", body = AdminUserList),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not an admin", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminListUsers"
)]
#[get("/admin/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AdminUserList>> {
    let actor = session.require_user_id()?;
    let users: Vec<UserResponse> = state
        .admin
        .list_users(&actor)
        .await?
        .iter()
        .map(UserResponse::from)
        .collect();
    Ok(web::Json(AdminUserList {
        count: users.len(),
        users,
    }))
}

/// Flip a user's ban flag.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/users/{id}/ban",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Ban toggled", body = BanResponse),
        (status = 400, description = "Invalid id or self-ban", body = ErrorSchema),
        (status = 403, description = "Not an admin", body = ErrorSchema),
        (status = 404, description = "No such user", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminToggleBan"
)]
#[patch("/admin/users/{id}/ban")]
pub async fn toggle_ban(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<BanResponse>> {
    let actor = session.require_user_id()?;
    let target = UserId::from_uuid(parse_uuid(&path.into_inner(), ID)?);
    let user: User = state.admin.toggle_ban(&actor, &target).await?;
    let msg = if user.is_banned() {
        "User has been banned"
    } else {
        "User has been un-banned"
    };
    Ok(web::Json(BanResponse {
        msg: msg.to_owned(),
        user: BanState {
            id: user.id().to_string(),
            name: user.name().to_string(),
            is_banned: user.is_banned(),
        },
    }))
}

/// Every swap on the platform, optionally filtered by status.
#[utoipa::path(
    get,
    path = "/api/v1/admin/swaps",
    params(SwapFilter),
    responses(
        (status = 200, description = "Swaps", body = AdminSwapList),
        (status = 400, description = "Unknown status filter", body = ErrorSchema),
        (status = 403, description = "Not an admin", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminListSwaps"
)]
#[get("/admin/swaps")]
pub async fn list_swaps(
    state: web::Data<HttpState>,
    session: SessionContext,
    filter: web::Query<SwapFilter>,
) -> ApiResult<web::Json<AdminSwapList>> {
    let actor = session.require_user_id()?;
    let status = non_blank(filter.into_inner().status)
        .map(|raw| raw.trim().parse::<SwapStatus>())
        .transpose()
        .map_err(|err| invalid_field_error(STATUS, err))?;
    let swaps = state.admin.list_swaps(&actor, status).await?;
    Ok(web::Json(AdminSwapList {
        count: swaps.len(),
        swaps,
    }))
}

/// The skill catalogue, including rejected entries.
#[utoipa::path(
    get,
    path = "/api/v1/admin/skills",
    responses(
        (status = 200, description = "Skills", body = SkillList),
        (status = 403, description = "Not an admin", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminListSkills"
)]
#[get("/admin/skills")]
pub async fn list_skills(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SkillList>> {
    let actor = session.require_user_id()?;
    let skills: Vec<SkillResponse> = state
        .admin
        .list_skills(&actor)
        .await?
        .iter()
        .map(SkillResponse::from)
        .collect();
    Ok(web::Json(SkillList {
        count: skills.len(),
        skills,
    }))
}

/// Approve a rejected skill or reject an approved one.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/skills/{id}/toggle-approval",
    params(("id" = String, Path, description = "Skill identifier")),
    responses(
        (status = 200, description = "Approval toggled", body = SkillApprovalResponse),
        (status = 400, description = "Invalid skill id", body = ErrorSchema),
        (status = 403, description = "Not an admin", body = ErrorSchema),
        (status = 404, description = "No such skill", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminToggleSkillApproval"
)]
#[patch("/admin/skills/{id}/toggle-approval")]
pub async fn toggle_skill_approval(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<SkillApprovalResponse>> {
    let actor = session.require_user_id()?;
    let skill_id = SkillId::from_uuid(parse_uuid(&path.into_inner(), ID)?);
    let skill = state.admin.toggle_skill_approval(&actor, &skill_id).await?;
    let msg = if skill.is_approved {
        "Skill has been approved"
    } else {
        "Skill has been rejected"
    };
    Ok(web::Json(SkillApprovalResponse {
        msg: msg.to_owned(),
        skill: SkillResponse::from(&skill),
    }))
}
