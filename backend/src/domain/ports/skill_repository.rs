//! Port for the skill catalogue.

use async_trait::async_trait;

use crate::domain::{Skill, SkillId, SkillName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by skill repository adapters.
    pub enum SkillPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "skill repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "skill repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SkillRepository: Send + Sync {
    /// Fetch a skill by identifier.
    async fn find_by_id(&self, id: &SkillId) -> Result<Option<Skill>, SkillPersistenceError>;

    /// Fetch a skill by name, ignoring case.
    async fn find_by_name(&self, name: &SkillName) -> Result<Option<Skill>, SkillPersistenceError>;

    /// Return the skill with the same case-insensitive name as `candidate`,
    /// inserting `candidate` when none exists.
    async fn find_or_create(&self, candidate: &Skill) -> Result<Skill, SkillPersistenceError>;

    /// Every skill, alphabetically.
    async fn list_all(&self) -> Result<Vec<Skill>, SkillPersistenceError>;

    /// Skills matching any of `ids`; unknown ids are skipped.
    async fn find_many(&self, ids: &[SkillId]) -> Result<Vec<Skill>, SkillPersistenceError>;

    /// Flip the approval flag and return the updated skill.
    async fn toggle_approval(&self, id: &SkillId) -> Result<Option<Skill>, SkillPersistenceError>;
}
