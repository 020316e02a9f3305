//! Swap request handlers.
//!
//! ```text
//! POST /api/v1/swaps {"receiverId":"…","skillOfferedId":"…","skillWantedId":"…","message":"Hi"}
//! GET /api/v1/swaps
//! GET /api/v1/swaps/{id}
//! PATCH /api/v1/swaps/{id} {"status":"accepted"}
//! ```
//!
//! Who may move a swap where is decided by the domain; these handlers only
//! parse identifiers and shape the envelopes.

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, RequestedStatus, SkillId, SwapId, SwapProposal, SwapView, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, SwapViewSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, RequiredFields, parse_uuid};

const RECEIVER_ID: FieldName = FieldName::new("receiverId");
const SKILL_OFFERED_ID: FieldName = FieldName::new("skillOfferedId");
const SKILL_WANTED_ID: FieldName = FieldName::new("skillWantedId");
const SWAP_ID: FieldName = FieldName::new("id");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSwapRequest {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub receiver_id: Option<String>,
    pub skill_offered_id: Option<String>,
    pub skill_wanted_id: Option<String>,
    #[schema(example = "Happy to trade an afternoon of joinery for Spanish.")]
    pub message: Option<String>,
}

impl TryFrom<CreateSwapRequest> for SwapProposal {
    type Error = Error;

    fn try_from(request: CreateSwapRequest) -> Result<Self, Self::Error> {
        RequiredFields::default()
            .check(RECEIVER_ID, &request.receiver_id)
            .check(SKILL_OFFERED_ID, &request.skill_offered_id)
            .check(SKILL_WANTED_ID, &request.skill_wanted_id)
            .finish("Please provide all required swap details")?;
        let receiver = parse_uuid(
            request.receiver_id.as_deref().unwrap_or_default(),
            RECEIVER_ID,
        )?;
        let skill_offered = parse_uuid(
            request.skill_offered_id.as_deref().unwrap_or_default(),
            SKILL_OFFERED_ID,
        )?;
        let skill_wanted = parse_uuid(
            request.skill_wanted_id.as_deref().unwrap_or_default(),
            SKILL_WANTED_ID,
        )?;
        Ok(Self {
            receiver: UserId::from_uuid(receiver),
            skill_offered: SkillId::from_uuid(skill_offered),
            skill_wanted: SkillId::from_uuid(skill_wanted),
            message: request.message,
        })
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateSwapStatusRequest {
    #[schema(example = "accepted")]
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SwapEnvelope {
    #[schema(value_type = SwapViewSchema)]
    pub swap: SwapView,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SwapList {
    #[schema(value_type = Vec<SwapViewSchema>)]
    pub swaps: Vec<SwapView>,
    pub count: usize,
}

impl From<Vec<SwapView>> for SwapList {
    fn from(swaps: Vec<SwapView>) -> Self {
        Self {
            count: swaps.len(),
            swaps,
        }
    }
}

fn swap_id(raw: &str) -> Result<SwapId, Error> {
    parse_uuid(raw, SWAP_ID).map(SwapId::from_uuid)
}

/// Propose a skill swap to another user.
#[utoipa::path(
    post,
    path = "/api/v1/swaps",
    request_body = CreateSwapRequest,
    responses(
        (status = 201, description = "Swap created", body = SwapEnvelope),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Receiver not found", body = ErrorSchema)
    ),
    tags = ["swaps"],
    operation_id = "createSwap"
)]
#[post("/swaps")]
pub async fn create_swap(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateSwapRequest>,
) -> ApiResult<HttpResponse> {
    let requester = session.require_user_id()?;
    let proposal = SwapProposal::try_from(payload.into_inner())?;
    let swap = state.swaps.propose(&requester, proposal).await?;
    Ok(HttpResponse::Created().json(SwapEnvelope { swap }))
}

/// Swaps the signed-in user takes part in, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/swaps",
    responses(
        (status = 200, description = "Own swaps", body = SwapList),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["swaps"],
    operation_id = "listSwaps"
)]
#[get("/swaps")]
pub async fn list_swaps(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SwapList>> {
    let actor = session.require_user_id()?;
    let swaps = state.swaps_query.list_mine(&actor).await?;
    Ok(web::Json(SwapList::from(swaps)))
}

#[utoipa::path(
    get,
    path = "/api/v1/swaps/{id}",
    params(("id" = String, Path, description = "Swap identifier")),
    responses(
        (status = 200, description = "Swap", body = SwapEnvelope),
        (status = 400, description = "Invalid swap id", body = ErrorSchema),
        (status = 401, description = "Not a participant", body = ErrorSchema),
        (status = 404, description = "Swap not found", body = ErrorSchema)
    ),
    tags = ["swaps"],
    operation_id = "getSwap"
)]
#[get("/swaps/{id}")]
pub async fn get_swap(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<SwapEnvelope>> {
    let actor = session.require_user_id()?;
    let id = swap_id(&path.into_inner())?;
    let swap = state.swaps_query.get(&actor, &id).await?;
    Ok(web::Json(SwapEnvelope { swap }))
}

/// Accept, reject, cancel, or complete a swap.
#[utoipa::path(
    patch,
    path = "/api/v1/swaps/{id}",
    params(("id" = String, Path, description = "Swap identifier")),
    request_body = UpdateSwapStatusRequest,
    responses(
        (status = 200, description = "Updated swap", body = SwapEnvelope),
        (status = 400, description = "Invalid status or transition", body = ErrorSchema),
        (status = 401, description = "Actor may not make this change", body = ErrorSchema),
        (status = 404, description = "Swap not found", body = ErrorSchema)
    ),
    tags = ["swaps"],
    operation_id = "updateSwapStatus"
)]
#[patch("/swaps/{id}")]
pub async fn update_swap_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateSwapStatusRequest>,
) -> ApiResult<web::Json<SwapEnvelope>> {
    let actor = session.require_user_id()?;
    let id = swap_id(&path.into_inner())?;
    let requested = RequestedStatus::parse(payload.status.as_deref())
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let swap = state.swaps.change_status(&actor, &id, requested).await?;
    Ok(web::Json(SwapEnvelope { swap }))
}
