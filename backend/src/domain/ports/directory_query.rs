//! Driving port for the public user directory.

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use serde::Serialize;

use crate::domain::{Error, FeedbackView, ProfileView, SkillName, UserId};

/// Directory search parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryRequest {
    /// Case-insensitive substring of the user name.
    pub search: Option<String>,
    /// Skill that must appear in either list, matched ignoring case.
    pub skill: Option<SkillName>,
    pub page: PageRequest,
}

/// A public profile together with the feedback its owner received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub profile: ProfileView,
    /// Newest first.
    pub feedback: Vec<FeedbackView>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryQuery: Send + Sync {
    /// Page through public profiles of non-banned users.
    async fn search(&self, request: DirectoryRequest) -> Result<Page<ProfileView>, Error>;

    /// One public profile with its feedback.
    async fn public_profile(&self, user_id: &UserId) -> Result<PublicProfile, Error>;
}
