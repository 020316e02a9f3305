//! Public user directory and single-profile lookups.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::Page;

use super::ports::{
    DirectoryQuery, DirectoryRequest, FeedbackRepository, ProfileRepository, PublicProfile,
    SkillRepository, UserRepository,
};
use super::read_models::{feedback_views, profile_views};
use super::service_errors::{
    map_feedback_error, map_profile_error, map_skill_error, map_user_error,
};
use super::{DirectoryFilter, Error, ProfileView, UserId};

/// Directory service implementing [`DirectoryQuery`].
#[derive(Clone)]
pub struct DirectoryService<P, S, U, F> {
    profiles: Arc<P>,
    skills: Arc<S>,
    users: Arc<U>,
    feedback: Arc<F>,
}

impl<P, S, U, F> DirectoryService<P, S, U, F> {
    /// Create a service over the given repositories.
    pub fn new(profiles: Arc<P>, skills: Arc<S>, users: Arc<U>, feedback: Arc<F>) -> Self {
        Self {
            profiles,
            skills,
            users,
            feedback,
        }
    }
}

fn user_not_found(id: &UserId) -> Error {
    Error::not_found(format!("No user found with id: {id}"))
}

#[async_trait]
impl<P, S, U, F> DirectoryQuery for DirectoryService<P, S, U, F>
where
    P: ProfileRepository,
    S: SkillRepository,
    U: UserRepository,
    F: FeedbackRepository,
{
    async fn search(&self, request: DirectoryRequest) -> Result<Page<ProfileView>, Error> {
        let skill = match &request.skill {
            Some(name) => {
                let found = self
                    .skills
                    .find_by_name(name)
                    .await
                    .map_err(map_skill_error)?;
                // An unknown skill matches nobody.
                let Some(found) = found else {
                    return Ok(Page::empty(request.page));
                };
                Some(found.id)
            }
            None => None,
        };
        let filter = DirectoryFilter {
            search: request
                .search
                .map(|text| text.trim().to_owned())
                .filter(|text| !text.is_empty()),
            skill,
        };

        let page = self
            .profiles
            .search_public(&filter, &request.page)
            .await
            .map_err(map_profile_error)?;
        let page_request = page.request();
        let (profiles, total) = page.into_parts();
        let views = profile_views(self.users.as_ref(), self.skills.as_ref(), profiles).await?;
        Ok(Page::new(views, total, page_request))
    }

    async fn public_profile(&self, user_id: &UserId) -> Result<PublicProfile, Error> {
        let owner = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .filter(|user| !user.is_banned())
            .ok_or_else(|| user_not_found(user_id))?;
        let profile = self
            .profiles
            .find_by_user(owner.id())
            .await
            .map_err(map_profile_error)?
            .ok_or_else(|| user_not_found(user_id))?;
        if !profile.is_public {
            return Err(Error::unauthorized("This user profile is private"));
        }

        let profile = profile_views(self.users.as_ref(), self.skills.as_ref(), vec![profile])
            .await?
            .pop()
            .ok_or_else(|| user_not_found(user_id))?;
        let received = self
            .feedback
            .list_for_rated_user(user_id)
            .await
            .map_err(map_feedback_error)?;
        let feedback = feedback_views(self.users.as_ref(), received).await?;
        Ok(PublicProfile { profile, feedback })
    }
}
