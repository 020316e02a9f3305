//! PostgreSQL-backed [`SkillRepository`].
//!
//! Names are matched through `lower(name)`, the same expression the unique
//! index covers, so lookups and the uniqueness rule agree.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SkillPersistenceError, SkillRepository};
use crate::domain::{Skill, SkillId, SkillName};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::SkillRow;
use super::pool::{DbPool, PoolError};
use super::schema::skills;

diesel::define_sql_function! {
    /// Postgres `lower(text)`.
    fn lower(value: Text) -> Text;
}

/// Diesel-backed implementation of the [`SkillRepository`] port.
#[derive(Clone)]
pub struct DieselSkillRepository {
    pool: DbPool,
}

impl DieselSkillRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SkillPersistenceError {
    map_basic_pool_error(error, SkillPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> SkillPersistenceError {
    map_basic_diesel_error(
        error,
        SkillPersistenceError::query,
        SkillPersistenceError::connection,
    )
}

fn row_to_skill(row: SkillRow) -> Result<Skill, SkillPersistenceError> {
    let name = SkillName::new(&row.name).map_err(|err| {
        SkillPersistenceError::query(format!("stored skill {} has invalid name: {err}", row.id))
    })?;
    Ok(Skill {
        id: SkillId::from_uuid(row.id),
        name,
        is_approved: row.is_approved,
        created_at: row.created_at,
    })
}

fn rows_to_skills(rows: Vec<SkillRow>) -> Result<Vec<Skill>, SkillPersistenceError> {
    rows.into_iter().map(row_to_skill).collect()
}

impl DieselSkillRepository {
    async fn load_by_name(
        conn: &mut diesel_async::AsyncPgConnection,
        name: &SkillName,
    ) -> Result<Option<Skill>, SkillPersistenceError> {
        skills::table
            .filter(lower(skills::name).eq(name.lookup_key()))
            .select(SkillRow::as_select())
            .first(conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_skill)
            .transpose()
    }
}

#[async_trait]
impl SkillRepository for DieselSkillRepository {
    async fn find_by_id(&self, id: &SkillId) -> Result<Option<Skill>, SkillPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        skills::table
            .find(*id.as_uuid())
            .select(SkillRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_skill)
            .transpose()
    }

    async fn find_by_name(&self, name: &SkillName) -> Result<Option<Skill>, SkillPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        Self::load_by_name(&mut conn, name).await
    }

    async fn find_or_create(&self, candidate: &Skill) -> Result<Skill, SkillPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = SkillRow {
            id: *candidate.id.as_uuid(),
            name: candidate.name.to_string(),
            is_approved: candidate.is_approved,
            created_at: candidate.created_at,
        };
        // A concurrent insert of the same name loses quietly and reads the
        // winner back.
        diesel::insert_into(skills::table)
            .values(&row)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Self::load_by_name(&mut conn, &candidate.name)
            .await?
            .ok_or_else(|| SkillPersistenceError::query("skill vanished after insert"))
    }

    async fn list_all(&self) -> Result<Vec<Skill>, SkillPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = skills::table
            .order(lower(skills::name).asc())
            .select(SkillRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_skills(rows)
    }

    async fn find_many(&self, ids: &[SkillId]) -> Result<Vec<Skill>, SkillPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let uuids: Vec<uuid::Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows = skills::table
            .filter(skills::id.eq_any(uuids))
            .select(SkillRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_skills(rows)
    }

    async fn toggle_approval(&self, id: &SkillId) -> Result<Option<Skill>, SkillPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(skills::table.find(*id.as_uuid()))
            .set(skills::is_approved.eq(diesel::dsl::not(skills::is_approved)))
            .returning(SkillRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_skill)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    fn row(name: &str) -> SkillRow {
        SkillRow {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            is_approved: false,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn rows_keep_their_casing() {
        let skill = row_to_skill(row("TypeScript")).expect("valid row");
        assert_eq!(skill.name.as_ref(), "TypeScript");
        assert!(!skill.is_approved);
    }

    #[rstest]
    fn blank_names_are_rejected() {
        let err = row_to_skill(row("   ")).expect_err("blank");
        assert!(matches!(err, SkillPersistenceError::Query { .. }));
    }
}
