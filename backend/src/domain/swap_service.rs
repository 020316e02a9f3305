//! Swap proposals and lifecycle transitions.
//!
//! Status changes are validated against the stored status and then written
//! with a conditional update keyed on that same status. When the write
//! matches no row another request won the race; the swap is re-read and the
//! request is judged against whatever status it now has.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use super::ports::{
    ProfileRepository, SkillRepository, StatusChange, SwapCommand, SwapQuery, SwapRepository,
    UserRepository,
};
use super::read_models::{swap_view, swap_views};
use super::service_errors::{map_profile_error, map_swap_error};
use super::{
    Error, RequestedStatus, Swap, SwapCreationError, SwapId, SwapProposal, SwapStatus,
    SwapTransitionError, SwapView, UserId, check_swap_preconditions, validate_transition,
};

/// Swap service implementing [`SwapCommand`] and [`SwapQuery`].
#[derive(Clone)]
pub struct SwapService<W, P, U, S> {
    swaps: Arc<W>,
    profiles: Arc<P>,
    users: Arc<U>,
    skills: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<W, P, U, S> SwapService<W, P, U, S> {
    /// Create a service over the given repositories.
    pub fn new(
        swaps: Arc<W>,
        profiles: Arc<P>,
        users: Arc<U>,
        skills: Arc<S>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            swaps,
            profiles,
            users,
            skills,
            clock,
        }
    }
}

fn swap_not_found(id: &SwapId) -> Error {
    Error::not_found(format!("No swap found with id: {id}"))
}

fn map_creation_error(error: SwapCreationError) -> Error {
    let message = error.to_string();
    match error {
        SwapCreationError::ReceiverNotFound { .. } => Error::not_found(message),
        SwapCreationError::SelfSwap
        | SwapCreationError::RequesterLacksSkill
        | SwapCreationError::ReceiverLacksSkill
        | SwapCreationError::MessageTooLong { .. } => Error::invalid_request(message),
    }
}

fn map_transition_error(error: &SwapTransitionError) -> Error {
    if error.is_authorisation_failure() {
        Error::unauthorized(error.to_string())
    } else {
        Error::invalid_request(error.to_string())
    }
}

impl<W, P, U, S> SwapService<W, P, U, S>
where
    W: SwapRepository,
    P: ProfileRepository,
    U: UserRepository,
    S: SkillRepository,
{
    async fn load(&self, id: &SwapId) -> Result<Swap, Error> {
        self.swaps
            .find_by_id(id)
            .await
            .map_err(map_swap_error)?
            .ok_or_else(|| swap_not_found(id))
    }

    async fn view(&self, swap: Swap) -> Result<SwapView, Error> {
        swap_view(self.users.as_ref(), self.skills.as_ref(), swap).await
    }

    /// Report a lost conditional update against the status now stored.
    async fn lost_race(&self, id: &SwapId, requested: RequestedStatus) -> Error {
        match self.swaps.find_by_id(id).await {
            Ok(Some(current)) => map_transition_error(&SwapTransitionError::NotPermitted {
                from: current.status,
                to: requested,
            }),
            Ok(None) => swap_not_found(id),
            Err(error) => map_swap_error(error),
        }
    }
}

#[async_trait]
impl<W, P, U, S> SwapCommand for SwapService<W, P, U, S>
where
    W: SwapRepository,
    P: ProfileRepository,
    U: UserRepository,
    S: SkillRepository,
{
    async fn propose(&self, requester: &UserId, proposal: SwapProposal) -> Result<SwapView, Error> {
        let requester_profile = self
            .profiles
            .find_by_user(requester)
            .await
            .map_err(map_profile_error)?;
        let receiver_profile = if *requester == proposal.receiver {
            None
        } else {
            self.profiles
                .find_by_user(&proposal.receiver)
                .await
                .map_err(map_profile_error)?
        };
        let message = check_swap_preconditions(
            requester,
            &proposal,
            requester_profile.as_ref(),
            receiver_profile.as_ref(),
        )
        .map_err(map_creation_error)?;

        let now = self.clock.utc();
        let swap = Swap {
            id: SwapId::random(),
            requester: requester.clone(),
            receiver: proposal.receiver,
            skill_offered: proposal.skill_offered,
            skill_wanted: proposal.skill_wanted,
            status: SwapStatus::Pending,
            message,
            created_at: now,
            updated_at: now,
        };
        self.swaps.insert(&swap).await.map_err(map_swap_error)?;
        info!(swap_id = %swap.id, requester = %swap.requester, "swap proposed");
        self.view(swap).await
    }

    async fn change_status(
        &self,
        actor: &UserId,
        swap: &SwapId,
        requested: RequestedStatus,
    ) -> Result<SwapView, Error> {
        let mut current = self.load(swap).await?;
        let next = validate_transition(current.status, requested, current.actor_role(actor))
            .map_err(|error| map_transition_error(&error))?;

        let change = StatusChange {
            swap: current.id,
            expected: current.status,
            next,
            at: self.clock.utc(),
        };
        let applied = self
            .swaps
            .update_status(&change)
            .await
            .map_err(map_swap_error)?;
        if !applied {
            return Err(self.lost_race(swap, requested).await);
        }

        info!(swap_id = %current.id, from = %current.status, to = %next, "swap status changed");
        current.status = next;
        current.updated_at = change.at;
        self.view(current).await
    }
}

#[async_trait]
impl<W, P, U, S> SwapQuery for SwapService<W, P, U, S>
where
    W: SwapRepository,
    P: ProfileRepository,
    U: UserRepository,
    S: SkillRepository,
{
    async fn list_mine(&self, actor: &UserId) -> Result<Vec<SwapView>, Error> {
        let swaps = self
            .swaps
            .list_for_participant(actor)
            .await
            .map_err(map_swap_error)?;
        swap_views(self.users.as_ref(), self.skills.as_ref(), swaps).await
    }

    async fn get(&self, actor: &UserId, swap: &SwapId) -> Result<SwapView, Error> {
        let found = self.load(swap).await?;
        if !found.actor_role(actor).is_participant() {
            return Err(Error::unauthorized("Not authorized to access this swap"));
        }
        self.view(found).await
    }
}

#[cfg(test)]
#[path = "swap_service_tests.rs"]
mod tests;
