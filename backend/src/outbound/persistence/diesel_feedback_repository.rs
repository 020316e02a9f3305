//! PostgreSQL-backed [`FeedbackRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{FeedbackPersistenceError, FeedbackRepository};
use crate::domain::{Feedback, FeedbackComment, FeedbackId, Rating, SwapId, UserId};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{FeedbackRow, NewFeedbackRow};
use super::pool::{DbPool, PoolError};
use super::schema::feedback;

const SWAP_CONSTRAINT: &str = "feedback_swap_id_key";

/// Diesel-backed implementation of the [`FeedbackRepository`] port.
#[derive(Clone)]
pub struct DieselFeedbackRepository {
    pool: DbPool,
}

impl DieselFeedbackRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FeedbackPersistenceError {
    map_basic_pool_error(error, FeedbackPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> FeedbackPersistenceError {
    map_basic_diesel_error(
        error,
        FeedbackPersistenceError::query,
        FeedbackPersistenceError::connection,
    )
}

fn row_to_feedback(row: FeedbackRow) -> Result<Feedback, FeedbackPersistenceError> {
    let corrupt = |err: &dyn std::fmt::Display| {
        FeedbackPersistenceError::query(format!("stored feedback {} is corrupt: {err}", row.id))
    };
    let rating = Rating::new(i64::from(row.rating)).map_err(|err| corrupt(&err))?;
    let comment = FeedbackComment::parse(row.comment.as_deref()).map_err(|err| corrupt(&err))?;
    Ok(Feedback {
        id: FeedbackId::from_uuid(row.id),
        swap: SwapId::from_uuid(row.swap_id),
        rater: UserId::from_uuid(row.rater_id),
        rated_user: UserId::from_uuid(row.rated_user_id),
        rating,
        comment,
        created_at: row.created_at,
    })
}

#[async_trait]
impl FeedbackRepository for DieselFeedbackRepository {
    async fn insert(&self, entry: &Feedback) -> Result<(), FeedbackPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewFeedbackRow {
            id: *entry.id.as_uuid(),
            swap_id: *entry.swap.as_uuid(),
            rater_id: *entry.rater.as_uuid(),
            rated_user_id: *entry.rated_user.as_uuid(),
            rating: i16::from(entry.rating.value()),
            comment: entry
                .comment
                .as_ref()
                .map(|comment: &FeedbackComment| -> &str { comment.as_ref() }),
            created_at: entry.created_at,
        };
        diesel::insert_into(feedback::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err, SWAP_CONSTRAINT) {
                    FeedbackPersistenceError::duplicate_swap(entry.swap.to_string())
                } else {
                    map_diesel_error(err)
                }
            })
    }

    async fn exists_for_swap(&self, swap: &SwapId) -> Result<bool, FeedbackPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            feedback::table.filter(feedback::swap_id.eq(*swap.as_uuid())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn list_for_rated_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Feedback>, FeedbackPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = feedback::table
            .filter(feedback::rated_user_id.eq(*user_id.as_uuid()))
            .order(feedback::created_at.desc())
            .select(FeedbackRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_feedback).collect()
    }
}
