//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountsCommand, AdminCommand, DirectoryQuery, FeedbackCommand, FeedbackQuery,
    ProfileCommand, SwapCommand, SwapQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountsCommand>,
    pub profiles: Arc<dyn ProfileCommand>,
    pub directory: Arc<dyn DirectoryQuery>,
    pub swaps: Arc<dyn SwapCommand>,
    pub swaps_query: Arc<dyn SwapQuery>,
    pub feedback: Arc<dyn FeedbackCommand>,
    pub feedback_query: Arc<dyn FeedbackQuery>,
    pub admin: Arc<dyn AdminCommand>,
}
