//! Port for feedback persistence.

use async_trait::async_trait;

use crate::domain::{Feedback, SwapId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by feedback repository adapters.
    pub enum FeedbackPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "feedback repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "feedback repository query failed: {message}",
        /// The swap already has feedback.
        DuplicateSwap { swap_id: String } => "feedback already recorded for swap {swap_id}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Store feedback; at most one entry per swap.
    async fn insert(&self, feedback: &Feedback) -> Result<(), FeedbackPersistenceError>;

    /// Whether the swap already has feedback.
    async fn exists_for_swap(&self, swap: &SwapId) -> Result<bool, FeedbackPersistenceError>;

    /// Feedback received by `user_id`, newest first.
    async fn list_for_rated_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Feedback>, FeedbackPersistenceError>;
}
