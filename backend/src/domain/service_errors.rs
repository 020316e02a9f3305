//! Translation of driven-port errors into domain errors.
//!
//! Connection failures become `service_unavailable`; everything else the
//! caller cannot act on becomes `internal`. Variants with a user-facing
//! meaning are handled by the service that expects them before falling back
//! here.

use tracing::debug;

use super::Error;
use super::ports::{
    FeedbackPersistenceError, PasswordHashError, ProfilePersistenceError, SkillPersistenceError,
    SwapPersistenceError, UserPersistenceError,
};

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    debug!(%error, "user repository failure");
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => Error::invalid_request("Email already in use"),
    }
}

pub(crate) fn map_profile_error(error: ProfilePersistenceError) -> Error {
    debug!(%error, "profile repository failure");
    match error {
        ProfilePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("profile repository unavailable: {message}"))
        }
        ProfilePersistenceError::Query { message } => {
            Error::internal(format!("profile repository error: {message}"))
        }
    }
}

pub(crate) fn map_skill_error(error: SkillPersistenceError) -> Error {
    debug!(%error, "skill repository failure");
    match error {
        SkillPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("skill repository unavailable: {message}"))
        }
        SkillPersistenceError::Query { message } => {
            Error::internal(format!("skill repository error: {message}"))
        }
    }
}

pub(crate) fn map_swap_error(error: SwapPersistenceError) -> Error {
    debug!(%error, "swap repository failure");
    match error {
        SwapPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("swap repository unavailable: {message}"))
        }
        SwapPersistenceError::Query { message } => {
            Error::internal(format!("swap repository error: {message}"))
        }
    }
}

pub(crate) fn map_feedback_error(error: FeedbackPersistenceError) -> Error {
    debug!(%error, "feedback repository failure");
    match error {
        FeedbackPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("feedback repository unavailable: {message}"))
        }
        FeedbackPersistenceError::Query { message } => {
            Error::internal(format!("feedback repository error: {message}"))
        }
        FeedbackPersistenceError::DuplicateSwap { .. } => {
            Error::invalid_request("This swap has already been reviewed")
        }
    }
}

pub(crate) fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}
