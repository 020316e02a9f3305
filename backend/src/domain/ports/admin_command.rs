//! Driving port for moderation.
//!
//! Every operation takes the acting user and refuses non-admins.

use async_trait::async_trait;

use crate::domain::{Error, Skill, SkillId, SwapStatus, SwapView, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminCommand: Send + Sync {
    /// Every account.
    async fn list_users(&self, actor: &UserId) -> Result<Vec<User>, Error>;

    /// Ban or un-ban `target`.
    async fn toggle_ban(&self, actor: &UserId, target: &UserId) -> Result<User, Error>;

    /// Every swap, optionally filtered by status.
    async fn list_swaps(
        &self,
        actor: &UserId,
        status: Option<SwapStatus>,
    ) -> Result<Vec<SwapView>, Error>;

    /// The whole skill catalogue.
    async fn list_skills(&self, actor: &UserId) -> Result<Vec<Skill>, Error>;

    /// Approve or reject a skill.
    async fn toggle_skill_approval(&self, actor: &UserId, skill: &SkillId) -> Result<Skill, Error>;
}
