//! Public profile attached one-to-one to every user.
//!
//! Profiles store skill references by id; [`ProfileView`] is the read model
//! with the owner and skill names resolved.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{EmailAddress, SkillId, SkillListKind, SkillSummary, User, UserId, UserName};

/// Photo shown until the user uploads their own.
pub const DEFAULT_PROFILE_PHOTO_URL: &str = "/uploads/default-avatar.png";
/// Availability text for new profiles.
pub const DEFAULT_AVAILABILITY: &str = "Please specify your availability";
/// Maximum length of the location field.
pub const LOCATION_MAX: usize = 100;
/// Maximum length of the availability field.
pub const AVAILABILITY_MAX: usize = 200;

/// Validation failures for profile edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileValidationError {
    #[error("location must be at most {max} characters")]
    LocationTooLong { max: usize },
    #[error("availability must be at most {max} characters")]
    AvailabilityTooLong { max: usize },
}

fn bounded(raw: &str, max: usize) -> Option<String> {
    let trimmed = raw.trim();
    (trimmed.chars().count() <= max).then(|| trimmed.to_owned())
}

/// Stored profile state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub user_id: UserId,
    pub location: String,
    pub profile_photo_url: String,
    pub availability: String,
    pub is_public: bool,
    pub skills_offered: Vec<SkillId>,
    pub skills_wanted: Vec<SkillId>,
}

impl Profile {
    /// Profile created alongside a new account.
    ///
    /// # Examples
    /// ```
    /// use skillswap::domain::{Profile, UserId, DEFAULT_AVAILABILITY};
    ///
    /// let profile = Profile::new_default(UserId::random());
    /// assert!(profile.is_public);
    /// assert_eq!(profile.availability, DEFAULT_AVAILABILITY);
    /// ```
    pub fn new_default(user_id: UserId) -> Self {
        Self {
            user_id,
            location: String::new(),
            profile_photo_url: DEFAULT_PROFILE_PHOTO_URL.to_owned(),
            availability: DEFAULT_AVAILABILITY.to_owned(),
            is_public: true,
            skills_offered: Vec::new(),
            skills_wanted: Vec::new(),
        }
    }

    /// Whether `skill` is listed among the skills this user offers.
    pub fn offers(&self, skill: &SkillId) -> bool {
        self.skills_offered.contains(skill)
    }

    /// Add `skill` to the chosen list. Returns `false` when already present.
    pub fn add_skill(&mut self, kind: SkillListKind, skill: SkillId) -> bool {
        let list = match kind {
            SkillListKind::Offered => &mut self.skills_offered,
            SkillListKind::Wanted => &mut self.skills_wanted,
        };
        if list.contains(&skill) {
            return false;
        }
        list.push(skill);
        true
    }

    /// Remove `skill` from both lists. Returns whether anything changed.
    pub fn remove_skill(&mut self, skill: &SkillId) -> bool {
        let before = self.skills_offered.len() + self.skills_wanted.len();
        self.skills_offered.retain(|id| id != skill);
        self.skills_wanted.retain(|id| id != skill);
        before != self.skills_offered.len() + self.skills_wanted.len()
    }

    /// Apply a validated edit.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(location) = update.location {
            self.location = location;
        }
        if let Some(availability) = update.availability {
            self.availability = availability;
        }
        if let Some(is_public) = update.is_public {
            self.is_public = is_public;
        }
    }
}

/// Partial profile edit.
///
/// Blank text fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    location: Option<String>,
    availability: Option<String>,
    is_public: Option<bool>,
}

impl ProfileUpdate {
    /// Validate raw edit fields.
    pub fn try_new(
        location: Option<&str>,
        availability: Option<&str>,
        is_public: Option<bool>,
    ) -> Result<Self, ProfileValidationError> {
        let location = location
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| {
                bounded(raw, LOCATION_MAX)
                    .ok_or(ProfileValidationError::LocationTooLong { max: LOCATION_MAX })
            })
            .transpose()?;
        let availability = availability
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| {
                bounded(raw, AVAILABILITY_MAX).ok_or(ProfileValidationError::AvailabilityTooLong {
                    max: AVAILABILITY_MAX,
                })
            })
            .transpose()?;
        Ok(Self {
            location,
            availability,
            is_public,
        })
    }
}

/// Owner details embedded in a profile view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileOwner {
    pub id: UserId,
    pub name: UserName,
    pub email: EmailAddress,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for ProfileOwner {
    fn from(value: &User) -> Self {
        Self {
            id: value.id().clone(),
            name: value.name().clone(),
            email: value.email().clone(),
            created_at: value.created_at(),
        }
    }
}

/// Profile with owner and skill names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub user: ProfileOwner,
    pub location: String,
    pub profile_photo_url: String,
    pub availability: String,
    pub is_public: bool,
    pub skills_offered: Vec<SkillSummary>,
    pub skills_wanted: Vec<SkillSummary>,
}

impl ProfileView {
    /// Combine a stored profile with its resolved references.
    ///
    /// Skill ids missing from `skills` are dropped from the view.
    pub fn assemble(profile: Profile, owner: &User, skills: &[SkillSummary]) -> Self {
        let resolve = |ids: &[SkillId]| -> Vec<SkillSummary> {
            ids.iter()
                .filter_map(|id| skills.iter().find(|skill| skill.id == *id).cloned())
                .collect()
        };
        Self {
            user: ProfileOwner::from(owner),
            skills_offered: resolve(&profile.skills_offered),
            skills_wanted: resolve(&profile.skills_wanted),
            location: profile.location,
            profile_photo_url: profile.profile_photo_url,
            availability: profile.availability,
            is_public: profile.is_public,
        }
    }
}

/// Directory search filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryFilter {
    /// Case-insensitive substring of the user name.
    pub search: Option<String>,
    /// Skill that must appear in either list.
    pub skill: Option<SkillId>,
}
