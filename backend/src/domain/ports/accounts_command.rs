//! Driving port for registration and login.
//!
//! Inbound adapters call this port and then persist the returned user id in
//! the session; the port knows nothing about cookies.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsCommand: Send + Sync {
    /// Create an account and its default profile. The very first account
    /// becomes an admin.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Check credentials and return the matching, non-banned account.
    async fn login(&self, credentials: LoginCredentials) -> Result<User, Error>;
}
