//! Profile editing for the signed-in user.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use super::ports::{ProfileCommand, ProfileRepository, SkillRepository, UserRepository};
use super::read_models::profile_views;
use super::service_errors::{map_profile_error, map_skill_error};
use super::{
    Error, Profile, ProfileUpdate, ProfileView, Skill, SkillId, SkillListKind, SkillName, UserId,
};

const PROFILE_NOT_FOUND: &str = "No profile found for this user";

/// Profile service implementing [`ProfileCommand`].
#[derive(Clone)]
pub struct ProfileService<P, S, U> {
    profiles: Arc<P>,
    skills: Arc<S>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<P, S, U> ProfileService<P, S, U> {
    /// Create a service over the given repositories.
    pub fn new(profiles: Arc<P>, skills: Arc<S>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            profiles,
            skills,
            users,
            clock,
        }
    }
}

impl<P, S, U> ProfileService<P, S, U>
where
    P: ProfileRepository,
    S: SkillRepository,
    U: UserRepository,
{
    async fn load(&self, user_id: &UserId) -> Result<Profile, Error> {
        self.profiles
            .find_by_user(user_id)
            .await
            .map_err(map_profile_error)?
            .ok_or_else(|| Error::not_found(PROFILE_NOT_FOUND))
    }

    async fn view(&self, profile: Profile) -> Result<ProfileView, Error> {
        profile_views(self.users.as_ref(), self.skills.as_ref(), vec![profile])
            .await?
            .pop()
            .ok_or_else(|| Error::not_found(PROFILE_NOT_FOUND))
    }

    async fn reload_view(&self, user_id: &UserId) -> Result<ProfileView, Error> {
        let profile = self.load(user_id).await?;
        self.view(profile).await
    }
}

#[async_trait]
impl<P, S, U> ProfileCommand for ProfileService<P, S, U>
where
    P: ProfileRepository,
    S: SkillRepository,
    U: UserRepository,
{
    async fn my_profile(&self, user_id: &UserId) -> Result<ProfileView, Error> {
        self.reload_view(user_id).await
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<ProfileView, Error> {
        let mut profile = self.load(user_id).await?;
        profile.apply(update);
        self.profiles
            .save_details(&profile)
            .await
            .map_err(map_profile_error)?;
        self.view(profile).await
    }

    async fn add_skill(
        &self,
        user_id: &UserId,
        name: SkillName,
        kind: SkillListKind,
    ) -> Result<ProfileView, Error> {
        self.load(user_id).await?;
        let skill = self
            .skills
            .find_or_create(&Skill::new(name, self.clock.utc()))
            .await
            .map_err(map_skill_error)?;
        self.profiles
            .add_skill(user_id, kind, &skill.id)
            .await
            .map_err(map_profile_error)?;
        self.reload_view(user_id).await
    }

    async fn remove_skill(&self, user_id: &UserId, skill: &SkillId) -> Result<ProfileView, Error> {
        self.load(user_id).await?;
        self.profiles
            .remove_skill(user_id, skill)
            .await
            .map_err(map_profile_error)?;
        self.reload_view(user_id).await
    }
}
