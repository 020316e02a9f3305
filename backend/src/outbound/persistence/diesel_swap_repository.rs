//! PostgreSQL-backed [`SwapRepository`].
//!
//! Status writes are conditional on the status the caller validated
//! against, so two racing transitions cannot both succeed.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StatusChange, SwapPersistenceError, SwapRepository};
use crate::domain::{SkillId, Swap, SwapId, SwapMessage, SwapStatus, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewSwapRow, SwapRow};
use super::pool::{DbPool, PoolError};
use super::schema::swaps;

/// Diesel-backed implementation of the [`SwapRepository`] port.
#[derive(Clone)]
pub struct DieselSwapRepository {
    pool: DbPool,
}

impl DieselSwapRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SwapPersistenceError {
    map_basic_pool_error(error, SwapPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> SwapPersistenceError {
    map_basic_diesel_error(
        error,
        SwapPersistenceError::query,
        SwapPersistenceError::connection,
    )
}

fn row_to_swap(row: SwapRow) -> Result<Swap, SwapPersistenceError> {
    let status = row.status.parse::<SwapStatus>().map_err(|err| {
        SwapPersistenceError::query(format!("stored swap {} is corrupt: {err}", row.id))
    })?;
    let message = SwapMessage::parse(row.message.as_deref()).map_err(|err| {
        SwapPersistenceError::query(format!("stored swap {} is corrupt: {err}", row.id))
    })?;
    Ok(Swap {
        id: SwapId::from_uuid(row.id),
        requester: UserId::from_uuid(row.requester_id),
        receiver: UserId::from_uuid(row.receiver_id),
        skill_offered: SkillId::from_uuid(row.skill_offered_id),
        skill_wanted: SkillId::from_uuid(row.skill_wanted_id),
        status,
        message,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn rows_to_swaps(rows: Vec<SwapRow>) -> Result<Vec<Swap>, SwapPersistenceError> {
    rows.into_iter().map(row_to_swap).collect()
}

#[async_trait]
impl SwapRepository for DieselSwapRepository {
    async fn insert(&self, swap: &Swap) -> Result<(), SwapPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewSwapRow {
            id: *swap.id.as_uuid(),
            requester_id: *swap.requester.as_uuid(),
            receiver_id: *swap.receiver.as_uuid(),
            skill_offered_id: *swap.skill_offered.as_uuid(),
            skill_wanted_id: *swap.skill_wanted.as_uuid(),
            status: swap.status.as_str(),
            message: swap
                .message
                .as_ref()
                .map(|message: &SwapMessage| -> &str { message.as_ref() }),
            created_at: swap.created_at,
            updated_at: swap.updated_at,
        };
        diesel::insert_into(swaps::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &SwapId) -> Result<Option<Swap>, SwapPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        swaps::table
            .find(*id.as_uuid())
            .select(SwapRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_swap)
            .transpose()
    }

    async fn list_for_participant(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Swap>, SwapPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let participant = *user_id.as_uuid();
        let rows = swaps::table
            .filter(
                swaps::requester_id
                    .eq(participant)
                    .or(swaps::receiver_id.eq(participant)),
            )
            .order(swaps::created_at.desc())
            .select(SwapRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_swaps(rows)
    }

    async fn list_all(&self, status: Option<SwapStatus>) -> Result<Vec<Swap>, SwapPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = swaps::table
            .order(swaps::created_at.desc())
            .select(SwapRow::as_select())
            .into_boxed();
        if let Some(status) = status {
            query = query.filter(swaps::status.eq(status.as_str()));
        }
        let rows = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows_to_swaps(rows)
    }

    async fn update_status(&self, change: &StatusChange) -> Result<bool, SwapPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            swaps::table
                .filter(swaps::id.eq(*change.swap.as_uuid()))
                .filter(swaps::status.eq(change.expected.as_str())),
        )
        .set((
            swaps::status.eq(change.next.as_str()),
            swaps::updated_at.eq(change.at),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated == 1)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    fn row(status: &str, message: Option<&str>) -> SwapRow {
        let now = Utc::now();
        SwapRow {
            id: Uuid::new_v4(),
            requester_id: Uuid::new_v4(),
            receiver_id: Uuid::new_v4(),
            skill_offered_id: Uuid::new_v4(),
            skill_wanted_id: Uuid::new_v4(),
            status: status.to_owned(),
            message: message.map(str::to_owned),
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    #[case("pending", SwapStatus::Pending)]
    #[case("completed", SwapStatus::Completed)]
    fn statuses_round_trip_through_text(#[case] stored: &str, #[case] expected: SwapStatus) {
        let swap = row_to_swap(row(stored, Some("hi"))).expect("valid row");
        assert_eq!(swap.status, expected);
        assert_eq!(swap.status.as_str(), stored);
    }

    #[rstest]
    fn unknown_status_is_a_query_error() {
        let err = row_to_swap(row("archived", None)).expect_err("bad status");
        assert!(matches!(err, SwapPersistenceError::Query { .. }));
    }

    #[rstest]
    fn blank_stored_message_reads_as_none() {
        let swap = row_to_swap(row("accepted", Some("  "))).expect("valid row");
        assert!(swap.message.is_none());
    }
}
