//! Feedback handlers.
//!
//! ```text
//! POST /api/v1/feedback {"swapId":"…","rating":5,"comment":"Great session"}
//! GET /api/v1/feedback/{userId}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{NewFeedback, UserFeedback};
use crate::domain::{FeedbackComment, FeedbackView, Rating, SwapId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, FeedbackViewSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, RequiredFields, invalid_field_error, parse_uuid,
};

const SWAP_ID: FieldName = FieldName::new("swapId");
const RATING: FieldName = FieldName::new("rating");
const COMMENT: FieldName = FieldName::new("comment");
const USER_ID: FieldName = FieldName::new("userId");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveFeedbackRequest {
    pub swap_id: Option<String>,
    #[schema(minimum = 1, maximum = 5, example = 5)]
    pub rating: Option<i64>,
    #[schema(example = "Patient and well prepared.")]
    pub comment: Option<String>,
}

impl TryFrom<LeaveFeedbackRequest> for NewFeedback {
    type Error = crate::domain::Error;

    fn try_from(request: LeaveFeedbackRequest) -> Result<Self, Self::Error> {
        RequiredFields::default()
            .check(SWAP_ID, &request.swap_id)
            .check(RATING, &request.rating)
            .finish("Please provide a swap ID and a rating")?;
        let swap = parse_uuid(request.swap_id.as_deref().unwrap_or_default(), SWAP_ID)?;
        let rating = Rating::new(request.rating.unwrap_or_default())
            .map_err(|err| invalid_field_error(RATING, err))?;
        let comment = FeedbackComment::parse(request.comment.as_deref())
            .map_err(|err| invalid_field_error(COMMENT, err))?;
        Ok(Self {
            swap: SwapId::from_uuid(swap),
            rating,
            comment,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedbackEnvelope {
    #[schema(value_type = FeedbackViewSchema)]
    pub feedback: FeedbackView,
}

/// OpenAPI schema for [`UserFeedback`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::UserFeedback)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserFeedbackSchema {
    feedback: Vec<FeedbackViewSchema>,
    count: usize,
    /// Rounded to one decimal place; `0` without feedback.
    #[schema(example = 4.5)]
    average_rating: f64,
}

/// Review the other participant of a completed swap.
#[utoipa::path(
    post,
    path = "/api/v1/feedback",
    request_body = LeaveFeedbackRequest,
    responses(
        (status = 201, description = "Feedback recorded", body = FeedbackEnvelope),
        (status = 400, description = "Invalid request, swap not completed, or already reviewed", body = ErrorSchema),
        (status = 401, description = "Not a participant", body = ErrorSchema),
        (status = 404, description = "Swap not found", body = ErrorSchema)
    ),
    tags = ["feedback"],
    operation_id = "leaveFeedback"
)]
#[post("/feedback")]
pub async fn leave_feedback(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LeaveFeedbackRequest>,
) -> ApiResult<HttpResponse> {
    let rater = session.require_user_id()?;
    let feedback = NewFeedback::try_from(payload.into_inner())?;
    let feedback = state.feedback.leave(&rater, feedback).await?;
    Ok(HttpResponse::Created().json(FeedbackEnvelope { feedback }))
}

/// Every review a user received, with the rounded average.
#[utoipa::path(
    get,
    path = "/api/v1/feedback/{userId}",
    params(("userId" = String, Path, description = "Rated user")),
    responses(
        (status = 200, description = "Feedback received", body = UserFeedbackSchema),
        (status = 400, description = "Invalid user id", body = ErrorSchema)
    ),
    tags = ["feedback"],
    operation_id = "getUserFeedback",
    security([])
)]
#[get("/feedback/{user_id}")]
pub async fn user_feedback(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserFeedback>> {
    let user_id = UserId::from_uuid(parse_uuid(&path.into_inner(), USER_ID)?);
    let feedback = state.feedback_query.for_user(&user_id).await?;
    Ok(web::Json(feedback))
}
