//! Batch resolution of stored references into display views.
//!
//! Each helper loads the referenced users and skills with one repository
//! call per kind, then stitches the views together in memory.

use std::collections::BTreeSet;

use super::ports::{SkillRepository, UserRepository};
use super::service_errors::{map_skill_error, map_user_error};
use super::{
    Error, Feedback, FeedbackView, Profile, ProfileView, SkillId, SkillSummary, Swap, SwapView,
    User, UserId, UserSummary,
};

fn unique_users<'a>(ids: impl Iterator<Item = &'a UserId>) -> Vec<UserId> {
    let mut seen = BTreeSet::new();
    ids.filter(|id| seen.insert(*id.as_uuid()))
        .cloned()
        .collect()
}

fn unique_skills<'a>(ids: impl Iterator<Item = &'a SkillId>) -> Vec<SkillId> {
    ids.copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

async fn load_users<U: UserRepository + ?Sized>(
    users: &U,
    ids: &[UserId],
) -> Result<Vec<User>, Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    users.find_many(ids).await.map_err(map_user_error)
}

async fn load_skills<S: SkillRepository + ?Sized>(
    skills: &S,
    ids: &[SkillId],
) -> Result<Vec<SkillSummary>, Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let found = skills.find_many(ids).await.map_err(map_skill_error)?;
    Ok(found.iter().map(SkillSummary::from).collect())
}

/// Resolve profiles; profiles whose owner is gone are dropped.
pub(crate) async fn profile_views<U, S>(
    users: &U,
    skills: &S,
    profiles: Vec<Profile>,
) -> Result<Vec<ProfileView>, Error>
where
    U: UserRepository + ?Sized,
    S: SkillRepository + ?Sized,
{
    let owner_ids = unique_users(profiles.iter().map(|profile| &profile.user_id));
    let skill_ids = unique_skills(
        profiles
            .iter()
            .flat_map(|profile| profile.skills_offered.iter().chain(&profile.skills_wanted)),
    );
    let owners = load_users(users, &owner_ids).await?;
    let summaries = load_skills(skills, &skill_ids).await?;

    Ok(profiles
        .into_iter()
        .filter_map(|profile| {
            let owner = owners.iter().find(|user| *user.id() == profile.user_id)?;
            Some(ProfileView::assemble(profile, owner, &summaries))
        })
        .collect())
}

/// Resolve swaps; swaps with a dangling reference are dropped.
pub(crate) async fn swap_views<U, S>(
    users: &U,
    skills: &S,
    swaps: Vec<Swap>,
) -> Result<Vec<SwapView>, Error>
where
    U: UserRepository + ?Sized,
    S: SkillRepository + ?Sized,
{
    let user_ids = unique_users(
        swaps
            .iter()
            .flat_map(|swap| [&swap.requester, &swap.receiver]),
    );
    let skill_ids = unique_skills(
        swaps
            .iter()
            .flat_map(|swap| [&swap.skill_offered, &swap.skill_wanted]),
    );
    let participants: Vec<UserSummary> = load_users(users, &user_ids)
        .await?
        .iter()
        .map(UserSummary::from)
        .collect();
    let summaries = load_skills(skills, &skill_ids).await?;

    Ok(swaps
        .into_iter()
        .filter_map(|swap| SwapView::assemble(swap, &participants, &summaries))
        .collect())
}

/// Resolve a single swap, reporting a dangling reference as an internal
/// error.
pub(crate) async fn swap_view<U, S>(users: &U, skills: &S, swap: Swap) -> Result<SwapView, Error>
where
    U: UserRepository + ?Sized,
    S: SkillRepository + ?Sized,
{
    let id = swap.id;
    swap_views(users, skills, vec![swap])
        .await?
        .pop()
        .ok_or_else(|| Error::internal(format!("swap {id} references missing records")))
}

/// Attach rater names; entries whose rater is gone are dropped.
pub(crate) async fn feedback_views<U>(
    users: &U,
    feedback: Vec<Feedback>,
) -> Result<Vec<FeedbackView>, Error>
where
    U: UserRepository + ?Sized,
{
    let rater_ids = unique_users(feedback.iter().map(|entry| &entry.rater));
    let raters = load_users(users, &rater_ids).await?;
    Ok(feedback
        .into_iter()
        .filter_map(|entry| {
            let name = raters
                .iter()
                .find(|user| *user.id() == entry.rater)?
                .name()
                .clone();
            Some(FeedbackView::new(entry, name))
        })
        .collect())
}
