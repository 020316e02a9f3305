//! Driving port for the signed-in user's own profile.

use async_trait::async_trait;

use crate::domain::{Error, ProfileUpdate, ProfileView, SkillId, SkillListKind, SkillName, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCommand: Send + Sync {
    /// Current profile of `user_id`.
    async fn my_profile(&self, user_id: &UserId) -> Result<ProfileView, Error>;

    /// Apply an edit and return the updated profile.
    async fn update_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<ProfileView, Error>;

    /// Find or create the named skill and add it to one list.
    async fn add_skill(
        &self,
        user_id: &UserId,
        name: SkillName,
        kind: SkillListKind,
    ) -> Result<ProfileView, Error>;

    /// Remove a skill from both lists.
    async fn remove_skill(&self, user_id: &UserId, skill: &SkillId) -> Result<ProfileView, Error>;
}
