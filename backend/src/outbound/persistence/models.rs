//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversion into domain types lives next
//! to each repository.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{feedback, profile_skills, profiles, skills, swaps, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_banned: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub is_banned: bool,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub user_id: Uuid,
    pub location: String,
    pub profile_photo_url: String,
    pub availability: String,
    pub is_public: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = profiles)]
pub(crate) struct NewProfileRow<'a> {
    pub user_id: Uuid,
    pub location: &'a str,
    pub profile_photo_url: &'a str,
    pub availability: &'a str,
    pub is_public: bool,
}

/// Changeset for the editable profile fields.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = profiles)]
pub(crate) struct ProfileDetailsUpdate<'a> {
    pub location: &'a str,
    pub profile_photo_url: &'a str,
    pub availability: &'a str,
    pub is_public: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profile_skills)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileSkillRow {
    pub user_id: Uuid,
    pub skill_id: Uuid,
    pub kind: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = profile_skills)]
pub(crate) struct NewProfileSkillRow<'a> {
    pub user_id: Uuid,
    pub skill_id: Uuid,
    pub kind: &'a str,
}

// ---------------------------------------------------------------------------
// Skills
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = skills)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SkillRow {
    pub id: Uuid,
    pub name: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Swaps
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = swaps)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SwapRow {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub receiver_id: Uuid,
    pub skill_offered_id: Uuid,
    pub skill_wanted_id: Uuid,
    pub status: String,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = swaps)]
pub(crate) struct NewSwapRow<'a> {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub receiver_id: Uuid,
    pub skill_offered_id: Uuid,
    pub skill_wanted_id: Uuid,
    pub status: &'a str,
    pub message: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = feedback)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FeedbackRow {
    pub id: Uuid,
    pub swap_id: Uuid,
    pub rater_id: Uuid,
    pub rated_user_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = feedback)]
pub(crate) struct NewFeedbackRow<'a> {
    pub id: Uuid,
    pub swap_id: Uuid,
    pub rater_id: Uuid,
    pub rated_user_id: Uuid,
    pub rating: i16,
    pub comment: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}
