//! Driving ports for leaving and reading feedback.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Error, FeedbackComment, FeedbackView, Rating, SwapId, UserId};

/// Feedback submitted by a swap participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub swap: SwapId,
    pub rating: Rating,
    pub comment: Option<FeedbackComment>,
}

/// Feedback received by one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFeedback {
    /// Newest first.
    pub feedback: Vec<FeedbackView>,
    pub count: usize,
    /// Mean rating rounded to one decimal; `0` without feedback.
    pub average_rating: f64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackCommand: Send + Sync {
    /// Review the counterpart of a completed swap.
    async fn leave(&self, rater: &UserId, feedback: NewFeedback) -> Result<FeedbackView, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackQuery: Send + Sync {
    /// Every review `user_id` received.
    async fn for_user(&self, user_id: &UserId) -> Result<UserFeedback, Error>;
}
