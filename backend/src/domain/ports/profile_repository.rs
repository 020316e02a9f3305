//! Port for profile persistence, including directory search.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{DirectoryFilter, Profile, SkillId, SkillListKind, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by profile repository adapters.
    pub enum ProfilePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "profile repository query failed: {message}",
    }
}

/// Storage for the one-to-one user profile.
///
/// Skill list edits are individual operations so concurrent edits to the
/// two lists never overwrite each other.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Create the profile for a new account.
    async fn insert(&self, profile: &Profile) -> Result<(), ProfilePersistenceError>;

    /// Fetch the profile of `user_id`.
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Profile>, ProfilePersistenceError>;

    /// Persist location, availability, and visibility.
    async fn save_details(&self, profile: &Profile) -> Result<(), ProfilePersistenceError>;

    /// Add `skill` to one list; a skill already present is left alone.
    async fn add_skill(
        &self,
        user_id: &UserId,
        kind: SkillListKind,
        skill: &SkillId,
    ) -> Result<(), ProfilePersistenceError>;

    /// Remove `skill` from both lists.
    async fn remove_skill(
        &self,
        user_id: &UserId,
        skill: &SkillId,
    ) -> Result<(), ProfilePersistenceError>;

    /// Public profiles of non-banned users matching `filter`, ordered by
    /// owner registration time.
    async fn search_public(
        &self,
        filter: &DirectoryFilter,
        page: &PageRequest,
    ) -> Result<Page<Profile>, ProfilePersistenceError>;
}
