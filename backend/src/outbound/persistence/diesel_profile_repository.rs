//! PostgreSQL-backed [`ProfileRepository`].
//!
//! Profile details live in `profiles`; the offered and wanted lists live in
//! `profile_skills`, ordered by an insertion sequence.

use async_trait::async_trait;
use diesel::dsl::{InnerJoin, IntoBoxed};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::ports::{ProfilePersistenceError, ProfileRepository};
use crate::domain::{DirectoryFilter, Profile, SkillId, SkillListKind, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{
    NewProfileRow, NewProfileSkillRow, ProfileDetailsUpdate, ProfileRow, ProfileSkillRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{profile_skills, profiles, users};

/// Diesel-backed implementation of the [`ProfileRepository`] port.
#[derive(Clone)]
pub struct DieselProfileRepository {
    pool: DbPool,
}

impl DieselProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProfilePersistenceError {
    map_basic_pool_error(error, ProfilePersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ProfilePersistenceError {
    map_basic_diesel_error(
        error,
        ProfilePersistenceError::query,
        ProfilePersistenceError::connection,
    )
}

/// Escape `LIKE` metacharacters so user input matches literally.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn assemble(row: ProfileRow, entries: &[ProfileSkillRow]) -> Result<Profile, ProfilePersistenceError> {
    let mut profile = Profile {
        user_id: UserId::from_uuid(row.user_id),
        location: row.location,
        profile_photo_url: row.profile_photo_url,
        availability: row.availability,
        is_public: row.is_public,
        skills_offered: Vec::new(),
        skills_wanted: Vec::new(),
    };
    for entry in entries.iter().filter(|entry| entry.user_id == row.user_id) {
        let kind = entry.kind.parse::<SkillListKind>().map_err(|_| {
            ProfilePersistenceError::query(format!("unknown skill list kind: {}", entry.kind))
        })?;
        profile.add_skill(kind, SkillId::from_uuid(entry.skill_id));
    }
    Ok(profile)
}

async fn with_skills(
    conn: &mut AsyncPgConnection,
    rows: Vec<ProfileRow>,
) -> Result<Vec<Profile>, ProfilePersistenceError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let owners: Vec<Uuid> = rows.iter().map(|row| row.user_id).collect();
    let entries: Vec<ProfileSkillRow> = profile_skills::table
        .filter(profile_skills::user_id.eq_any(owners))
        .order(profile_skills::position.asc())
        .select(ProfileSkillRow::as_select())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    rows.into_iter()
        .map(|row| assemble(row, &entries))
        .collect()
}

type VisibleProfiles<'a> = IntoBoxed<'a, InnerJoin<profiles::table, users::table>, Pg>;

/// Public profiles of non-banned owners matching `filter`.
fn visible_profiles(filter: &DirectoryFilter) -> VisibleProfiles<'static> {
    let mut query = profiles::table
        .inner_join(users::table)
        .filter(profiles::is_public.eq(true))
        .filter(users::is_banned.eq(false))
        .into_boxed();
    if let Some(search) = &filter.search {
        query = query.filter(users::name.ilike(contains_pattern(search)));
    }
    if let Some(skill) = filter.skill {
        let holders = profile_skills::table
            .filter(profile_skills::skill_id.eq(*skill.as_uuid()))
            .select(profile_skills::user_id);
        query = query.filter(profiles::user_id.eq_any(holders));
    }
    query
}

#[async_trait]
impl ProfileRepository for DieselProfileRepository {
    async fn insert(&self, profile: &Profile) -> Result<(), ProfilePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewProfileRow {
            user_id: *profile.user_id.as_uuid(),
            location: &profile.location,
            profile_photo_url: &profile.profile_photo_url,
            availability: &profile.availability,
            is_public: profile.is_public,
        };
        diesel::insert_into(profiles::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let lists = [
            (SkillListKind::Offered, &profile.skills_offered),
            (SkillListKind::Wanted, &profile.skills_wanted),
        ];
        let entries: Vec<NewProfileSkillRow<'_>> = lists
            .iter()
            .flat_map(|(kind, skills)| {
                skills.iter().map(|skill| NewProfileSkillRow {
                    user_id: *profile.user_id.as_uuid(),
                    skill_id: *skill.as_uuid(),
                    kind: kind.as_str(),
                })
            })
            .collect();
        if !entries.is_empty() {
            diesel::insert_into(profile_skills::table)
                .values(&entries)
                .on_conflict_do_nothing()
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        }
        Ok(())
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Profile>, ProfilePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ProfileRow> = profiles::table
            .find(*user_id.as_uuid())
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(with_skills(&mut conn, vec![row]).await?.pop())
    }

    async fn save_details(&self, profile: &Profile) -> Result<(), ProfilePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = ProfileDetailsUpdate {
            location: &profile.location,
            profile_photo_url: &profile.profile_photo_url,
            availability: &profile.availability,
            is_public: profile.is_public,
        };
        let updated = diesel::update(profiles::table.find(*profile.user_id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(ProfilePersistenceError::query("profile not found for update"));
        }
        Ok(())
    }

    async fn add_skill(
        &self,
        user_id: &UserId,
        kind: SkillListKind,
        skill: &SkillId,
    ) -> Result<(), ProfilePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let entry = NewProfileSkillRow {
            user_id: *user_id.as_uuid(),
            skill_id: *skill.as_uuid(),
            kind: kind.as_str(),
        };
        diesel::insert_into(profile_skills::table)
            .values(&entry)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn remove_skill(
        &self,
        user_id: &UserId,
        skill: &SkillId,
    ) -> Result<(), ProfilePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(
            profile_skills::table
                .filter(profile_skills::user_id.eq(*user_id.as_uuid()))
                .filter(profile_skills::skill_id.eq(*skill.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(map_diesel_error)
    }

    async fn search_public(
        &self,
        filter: &DirectoryFilter,
        page: &PageRequest,
    ) -> Result<Page<Profile>, ProfilePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = visible_profiles(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<ProfileRow> = visible_profiles(filter)
            .select(ProfileRow::as_select())
            .order((users::created_at.asc(), users::id.asc()))
            .limit(i64::from(page.limit()))
            .offset(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let profiles = with_skills(&mut conn, rows).await?;
        Ok(Page::new(
            profiles,
            u64::try_from(total).unwrap_or_default(),
            *page,
        ))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn row(user_id: Uuid) -> ProfileRow {
        ProfileRow {
            user_id,
            location: "Lisbon".to_owned(),
            profile_photo_url: "/uploads/default-avatar.png".to_owned(),
            availability: "Weekends".to_owned(),
            is_public: true,
        }
    }

    fn entry(user_id: Uuid, skill_id: Uuid, kind: &str) -> ProfileSkillRow {
        ProfileSkillRow {
            user_id,
            skill_id,
            kind: kind.to_owned(),
        }
    }

    #[rstest]
    #[case("50%_off", "%50\\%\\_off%")]
    #[case("back\\slash", "%back\\\\slash%")]
    #[case("plain", "%plain%")]
    fn like_patterns_escape_metacharacters(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(contains_pattern(input), expected);
    }

    #[rstest]
    fn lists_are_split_by_kind_for_the_owner_only() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let (first, second) = (Uuid::new_v4(), Uuid::new_v4());
        let entries = [
            entry(owner, first, "offered"),
            entry(other, second, "offered"),
            entry(owner, second, "wanted"),
        ];
        let profile = assemble(row(owner), &entries).expect("valid rows");
        assert_eq!(profile.skills_offered, vec![SkillId::from_uuid(first)]);
        assert_eq!(profile.skills_wanted, vec![SkillId::from_uuid(second)]);
        assert_eq!(profile.location, "Lisbon");
    }

    #[rstest]
    fn unknown_list_kind_is_a_query_error() {
        let owner = Uuid::new_v4();
        let err = assemble(row(owner), &[entry(owner, Uuid::new_v4(), "hoarded")])
            .expect_err("bad kind");
        assert!(matches!(err, ProfilePersistenceError::Query { .. }));
    }
}
