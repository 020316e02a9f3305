//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers only translate between JSON and the driving ports held in
//! [`state::HttpState`]; every rule lives in the domain services.

pub mod admin;
pub mod auth;
pub mod error;
pub mod feedback;
pub mod health;
pub mod profile;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
pub mod swaps;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` endpoint on `cfg`.
///
/// The caller owns the scope, so the server and tests can wrap it in
/// different session middleware.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use skillswap::inbound::http::configure_api;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .app_data(error::query_config())
        .service(auth::register)
        .service(auth::login)
        .service(auth::logout)
        .service(profile::my_profile)
        .service(profile::update_profile)
        .service(profile::add_skill)
        .service(profile::remove_skill)
        .service(users::list_profiles)
        .service(users::public_profile)
        .service(swaps::create_swap)
        .service(swaps::list_swaps)
        .service(swaps::get_swap)
        .service(swaps::update_swap_status)
        .service(feedback::leave_feedback)
        .service(feedback::user_feedback)
        .service(admin::list_users)
        .service(admin::toggle_ban)
        .service(admin::list_swaps)
        .service(admin::list_skills)
        .service(admin::toggle_skill_approval);
}
