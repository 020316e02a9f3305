//! Driving ports for proposing, reading, and progressing swaps.

use async_trait::async_trait;

use crate::domain::{Error, RequestedStatus, SwapId, SwapProposal, SwapView, UserId};

/// State-changing swap use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SwapCommand: Send + Sync {
    /// Create a pending swap with `requester` as the initiator.
    async fn propose(&self, requester: &UserId, proposal: SwapProposal) -> Result<SwapView, Error>;

    /// Move a swap to `requested` on behalf of `actor`.
    async fn change_status(
        &self,
        actor: &UserId,
        swap: &SwapId,
        requested: RequestedStatus,
    ) -> Result<SwapView, Error>;
}

/// Read-only swap use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SwapQuery: Send + Sync {
    /// Swaps `actor` takes part in, newest first.
    async fn list_mine(&self, actor: &UserId) -> Result<Vec<SwapView>, Error>;

    /// A single swap, visible only to its participants.
    async fn get(&self, actor: &UserId, swap: &SwapId) -> Result<SwapView, Error>;
}
