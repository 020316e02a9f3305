//! Post-swap reviews.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use super::ports::{
    FeedbackCommand, FeedbackQuery, FeedbackRepository, NewFeedback, SwapRepository,
    UserFeedback, UserRepository,
};
use super::read_models::feedback_views;
use super::service_errors::{map_feedback_error, map_swap_error};
use super::{Error, Feedback, FeedbackId, FeedbackView, SwapStatus, UserId, average_rating};

const ALREADY_REVIEWED: &str = "This swap has already been reviewed";

/// Feedback service implementing [`FeedbackCommand`] and [`FeedbackQuery`].
#[derive(Clone)]
pub struct FeedbackService<F, W, U> {
    feedback: Arc<F>,
    swaps: Arc<W>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<F, W, U> FeedbackService<F, W, U> {
    /// Create a service over the given repositories.
    pub fn new(feedback: Arc<F>, swaps: Arc<W>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            feedback,
            swaps,
            users,
            clock,
        }
    }
}

#[async_trait]
impl<F, W, U> FeedbackCommand for FeedbackService<F, W, U>
where
    F: FeedbackRepository,
    W: SwapRepository,
    U: UserRepository,
{
    async fn leave(&self, rater: &UserId, feedback: NewFeedback) -> Result<FeedbackView, Error> {
        let swap = self
            .swaps
            .find_by_id(&feedback.swap)
            .await
            .map_err(map_swap_error)?
            .ok_or_else(|| Error::not_found(format!("No swap found with id: {}", feedback.swap)))?;
        if swap.status != SwapStatus::Completed {
            return Err(Error::invalid_request(
                "Feedback can only be left for completed swaps",
            ));
        }
        let rated_user = swap
            .counterpart_of(rater)
            .cloned()
            .ok_or_else(|| Error::unauthorized("You were not a participant in this swap"))?;
        if self
            .feedback
            .exists_for_swap(&swap.id)
            .await
            .map_err(map_feedback_error)?
        {
            return Err(Error::invalid_request(ALREADY_REVIEWED));
        }

        let entry = Feedback {
            id: FeedbackId::random(),
            swap: swap.id,
            rater: rater.clone(),
            rated_user,
            rating: feedback.rating,
            comment: feedback.comment,
            created_at: self.clock.utc(),
        };
        self.feedback
            .insert(&entry)
            .await
            .map_err(map_feedback_error)?;

        info!(swap_id = %entry.swap, rater = %entry.rater, "feedback recorded");
        let id = entry.id;
        feedback_views(self.users.as_ref(), vec![entry])
            .await?
            .pop()
            .ok_or_else(|| Error::internal(format!("feedback {id} references a missing rater")))
    }
}

#[async_trait]
impl<F, W, U> FeedbackQuery for FeedbackService<F, W, U>
where
    F: FeedbackRepository,
    W: SwapRepository,
    U: UserRepository,
{
    async fn for_user(&self, user_id: &UserId) -> Result<UserFeedback, Error> {
        let received = self
            .feedback
            .list_for_rated_user(user_id)
            .await
            .map_err(map_feedback_error)?;
        let ratings: Vec<_> = received.iter().map(|entry| entry.rating).collect();
        let average_rating = average_rating(&ratings);
        let feedback = feedback_views(self.users.as_ref(), received).await?;
        Ok(UserFeedback {
            count: feedback.len(),
            feedback,
            average_rating,
        })
    }
}

#[cfg(test)]
#[path = "feedback_service_tests.rs"]
mod tests;
