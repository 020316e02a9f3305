//! Moderation: account bans, swap oversight, and the skill catalogue.
//!
//! The session only carries the actor's id, so each call reloads the actor
//! and checks the stored role. A demoted or deleted admin loses access on
//! their next request.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::ports::{AdminCommand, SkillRepository, SwapRepository, UserRepository};
use super::read_models::swap_views;
use super::service_errors::{map_skill_error, map_swap_error, map_user_error};
use super::{Error, Skill, SkillId, SwapStatus, SwapView, User, UserId};

/// Admin service implementing [`AdminCommand`].
#[derive(Clone)]
pub struct AdminService<U, W, S> {
    users: Arc<U>,
    swaps: Arc<W>,
    skills: Arc<S>,
}

impl<U, W, S> AdminService<U, W, S> {
    /// Create a service over the given repositories.
    pub fn new(users: Arc<U>, swaps: Arc<W>, skills: Arc<S>) -> Self {
        Self {
            users,
            swaps,
            skills,
        }
    }
}

impl<U, W, S> AdminService<U, W, S>
where
    U: UserRepository,
    W: SwapRepository,
    S: SkillRepository,
{
    async fn ensure_admin(&self, actor: &UserId) -> Result<User, Error> {
        let found = self.users.find_by_id(actor).await.map_err(map_user_error)?;
        match found {
            Some(user) if user.is_admin() && !user.is_banned() => Ok(user),
            _ => {
                warn!(user_id = %actor, "non-admin attempted a moderation call");
                Err(Error::forbidden("Unauthorized to access this route"))
            }
        }
    }
}

#[async_trait]
impl<U, W, S> AdminCommand for AdminService<U, W, S>
where
    U: UserRepository,
    W: SwapRepository,
    S: SkillRepository,
{
    async fn list_users(&self, actor: &UserId) -> Result<Vec<User>, Error> {
        self.ensure_admin(actor).await?;
        self.users.list_all().await.map_err(map_user_error)
    }

    async fn toggle_ban(&self, actor: &UserId, target: &UserId) -> Result<User, Error> {
        let admin = self.ensure_admin(actor).await?;
        if admin.id() == target {
            return Err(Error::invalid_request("Admin cannot ban themselves"));
        }
        let user = self
            .users
            .toggle_banned(target)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("No user with id: {target}")))?;
        info!(admin = %admin.id(), user_id = %target, banned = user.is_banned(), "ban toggled");
        Ok(user)
    }

    async fn list_swaps(
        &self,
        actor: &UserId,
        status: Option<SwapStatus>,
    ) -> Result<Vec<SwapView>, Error> {
        self.ensure_admin(actor).await?;
        let swaps = self.swaps.list_all(status).await.map_err(map_swap_error)?;
        swap_views(self.users.as_ref(), self.skills.as_ref(), swaps).await
    }

    async fn list_skills(&self, actor: &UserId) -> Result<Vec<Skill>, Error> {
        self.ensure_admin(actor).await?;
        self.skills.list_all().await.map_err(map_skill_error)
    }

    async fn toggle_skill_approval(&self, actor: &UserId, skill: &SkillId) -> Result<Skill, Error> {
        let admin = self.ensure_admin(actor).await?;
        let updated = self
            .skills
            .toggle_approval(skill)
            .await
            .map_err(map_skill_error)?
            .ok_or_else(|| Error::not_found(format!("No skill with id: {skill}")))?;
        info!(
            admin = %admin.id(),
            skill_id = %skill,
            approved = updated.is_approved,
            "skill approval toggled"
        );
        Ok(updated)
    }
}
