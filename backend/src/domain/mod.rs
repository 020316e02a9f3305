//! Domain primitives, aggregates, ports, and services.
//!
//! Purpose: define the strongly typed entities used by the API and
//! persistence layers, the swap lifecycle rules, and the services that
//! implement the driving ports on top of the driven (repository) ports.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and its stable identifier.
//! - User, Profile, Skill, Swap, Feedback: stored aggregates.
//! - `validate_transition` / `required_role`: the swap lifecycle table.
//! - `*Service`: driving-port implementations wired by the server.

pub mod admin_service;
pub mod auth;
pub mod directory_service;
pub mod error;
pub mod feedback;
pub mod feedback_service;
pub mod ids;
pub mod ports;
pub mod profile;
pub mod profile_service;
pub mod skill;
pub mod swap;
pub mod swap_service;
pub mod trace_id;
pub mod user;

mod account_service;
mod read_models;
mod service_errors;

pub use self::account_service::AccountService;
pub use self::admin_service::AdminService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MIN, PasswordHash, Registration,
    RegistrationValidationError,
};
pub use self::directory_service::DirectoryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::feedback::{
    FEEDBACK_COMMENT_MAX, Feedback, FeedbackComment, FeedbackValidationError, FeedbackView,
    RATING_MAX, RATING_MIN, RaterSummary, Rating, average_rating,
};
pub use self::feedback_service::FeedbackService;
pub use self::ids::{FeedbackId, SkillId, SwapId};
pub use self::profile::{
    AVAILABILITY_MAX, DEFAULT_AVAILABILITY, DEFAULT_PROFILE_PHOTO_URL, DirectoryFilter,
    LOCATION_MAX, Profile, ProfileOwner, ProfileUpdate, ProfileValidationError, ProfileView,
};
pub use self::profile_service::ProfileService;
pub use self::skill::{
    SKILL_NAME_MAX, Skill, SkillListKind, SkillName, SkillSummary, SkillValidationError,
};
pub use self::swap::{
    ActorRole, RequestedStatus, RequiredRole, SWAP_MESSAGE_MAX, Swap, SwapCreationError,
    SwapMessage, SwapProposal, SwapStatus, SwapTransitionError, SwapView, UnknownSwapStatus,
    check_swap_preconditions, required_role, validate_transition,
};
pub use self::swap_service::SwapService;
pub use self::trace_id::TraceId;
pub use self::user::{
    EmailAddress, Role, USER_NAME_MAX, USER_NAME_MIN, User, UserDraft, UserId, UserName,
    UserSummary, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use skillswap::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
