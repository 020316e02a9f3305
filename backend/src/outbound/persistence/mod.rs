//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL through `diesel-async` and a `bb8` pool.
//!
//! - Repository implementations only translate between Diesel rows and
//!   domain types. No business rules live here.
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private to this module.
//! - Database failures are mapped to the port's typed errors; unique
//!   violations that carry domain meaning get their own variants.
//!
//! # Example
//!
//! ```ignore
//! use skillswap::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/skillswap")).await?;
//! let users = DieselUserRepository::new(pool.clone());
//! ```

mod diesel_basic_error_mapping;
mod diesel_feedback_repository;
mod diesel_profile_repository;
mod diesel_skill_repository;
mod diesel_swap_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_feedback_repository::DieselFeedbackRepository;
pub use diesel_profile_repository::DieselProfileRepository;
pub use diesel_skill_repository::DieselSkillRepository;
pub use diesel_swap_repository::DieselSwapRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DEFAULT_POOL_SIZE, DbPool, PoolConfig, PoolError};
