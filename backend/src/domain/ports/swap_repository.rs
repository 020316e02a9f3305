//! Port for swap persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Swap, SwapId, SwapStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by swap repository adapters.
    pub enum SwapPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "swap repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "swap repository query failed: {message}",
    }
}

/// Conditional status write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub swap: SwapId,
    /// Status the caller validated against.
    pub expected: SwapStatus,
    pub next: SwapStatus,
    pub at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SwapRepository: Send + Sync {
    /// Store a new swap.
    async fn insert(&self, swap: &Swap) -> Result<(), SwapPersistenceError>;

    /// Fetch a swap by identifier.
    async fn find_by_id(&self, id: &SwapId) -> Result<Option<Swap>, SwapPersistenceError>;

    /// Swaps where `user_id` is requester or receiver, newest first.
    async fn list_for_participant(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Swap>, SwapPersistenceError>;

    /// Every swap, optionally restricted to one status, newest first.
    async fn list_all(&self, status: Option<SwapStatus>) -> Result<Vec<Swap>, SwapPersistenceError>;

    /// Apply `change` only while the stored status still equals
    /// `change.expected`. Returns `false` when no row matched.
    async fn update_status(&self, change: &StatusChange) -> Result<bool, SwapPersistenceError>;
}
