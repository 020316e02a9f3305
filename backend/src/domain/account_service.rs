//! Registration and login.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use super::ports::{AccountsCommand, PasswordHasher, ProfileRepository, UserRepository};
use super::service_errors::{map_hash_error, map_profile_error, map_user_error};
use super::{Error, LoginCredentials, Profile, Registration, Role, User, UserDraft, UserId};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Account service implementing [`AccountsCommand`].
#[derive(Clone)]
pub struct AccountService<U, P, H> {
    users: Arc<U>,
    profiles: Arc<P>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<U, P, H> AccountService<U, P, H> {
    /// Create a service over the given adapters.
    pub fn new(users: Arc<U>, profiles: Arc<P>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            profiles,
            hasher,
            clock,
        }
    }
}

impl<U, P, H> AccountService<U, P, H>
where
    U: UserRepository,
    P: ProfileRepository,
    H: PasswordHasher,
{
    async fn role_for_new_account(&self) -> Result<Role, Error> {
        let existing = self.users.count().await.map_err(map_user_error)?;
        Ok(if existing == 0 { Role::Admin } else { Role::User })
    }

    async fn create_profile(&self, user_id: &UserId) -> Result<(), Error> {
        self.profiles
            .insert(&Profile::new_default(user_id.clone()))
            .await
            .map_err(map_profile_error)
    }
}

#[async_trait]
impl<U, P, H> AccountsCommand for AccountService<U, P, H>
where
    U: UserRepository,
    P: ProfileRepository,
    H: PasswordHasher,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        if self
            .users
            .find_credentials(registration.email())
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            return Err(Error::invalid_request("Email already in use"));
        }

        let role = self.role_for_new_account().await?;
        let password_hash = self
            .hasher
            .hash(registration.password())
            .map_err(map_hash_error)?;
        let user = User::new(UserDraft {
            id: UserId::random(),
            name: registration.name().clone(),
            email: registration.email().clone(),
            role,
            is_banned: false,
            created_at: self.clock.utc(),
        });

        self.users
            .insert(&user, &password_hash)
            .await
            .map_err(map_user_error)?;
        self.create_profile(user.id()).await?;
        info!(user_id = %user.id(), role = %user.role(), "account registered");
        Ok(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<User, Error> {
        let Some(stored) = self
            .users
            .find_credentials(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .map_err(map_hash_error)?;
        if !matches {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        if stored.user.is_banned() {
            return Err(Error::forbidden("This account has been suspended."));
        }
        Ok(stored.user)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
