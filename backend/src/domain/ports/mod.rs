//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`]) describe what the domain
//! needs from storage and crypto adapters. Each exposes a typed error built
//! with `define_port_error!` so adapters map their failures into predictable
//! variants. Driving ports (`*Command`, `*Query`) are the use-cases inbound
//! adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts_command;
mod admin_command;
mod directory_query;
mod feedback_command;
mod feedback_repository;
mod password_hasher;
mod profile_command;
mod profile_repository;
mod skill_repository;
mod swap_command;
mod swap_repository;
mod user_repository;

pub use accounts_command::AccountsCommand;
#[cfg(test)]
pub use accounts_command::MockAccountsCommand;
pub use admin_command::AdminCommand;
#[cfg(test)]
pub use admin_command::MockAdminCommand;
pub use directory_query::{DirectoryQuery, DirectoryRequest, PublicProfile};
#[cfg(test)]
pub use directory_query::MockDirectoryQuery;
pub use feedback_command::{FeedbackCommand, FeedbackQuery, NewFeedback, UserFeedback};
#[cfg(test)]
pub use feedback_command::{MockFeedbackCommand, MockFeedbackQuery};
pub use feedback_repository::{FeedbackPersistenceError, FeedbackRepository};
#[cfg(test)]
pub use feedback_repository::MockFeedbackRepository;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use profile_command::MockProfileCommand;
pub use profile_command::ProfileCommand;
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{ProfilePersistenceError, ProfileRepository};
#[cfg(test)]
pub use skill_repository::MockSkillRepository;
pub use skill_repository::{SkillPersistenceError, SkillRepository};
#[cfg(test)]
pub use swap_command::{MockSwapCommand, MockSwapQuery};
pub use swap_command::{SwapCommand, SwapQuery};
#[cfg(test)]
pub use swap_repository::MockSwapRepository;
pub use swap_repository::{StatusChange, SwapPersistenceError, SwapRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredCredentials, UserPersistenceError, UserRepository};
