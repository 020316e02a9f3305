//! Wires the Diesel repositories into the domain services behind
//! [`HttpState`].

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use skillswap::domain::{
    AccountService, AdminService, DirectoryService, FeedbackService, ProfileService, SwapService,
};
use skillswap::inbound::http::state::HttpState;
use skillswap::outbound::persistence::{
    DbPool, DieselFeedbackRepository, DieselProfileRepository, DieselSkillRepository,
    DieselSwapRepository, DieselUserRepository,
};
use skillswap::outbound::security::Argon2PasswordHasher;

/// Repository handles shared by every service.
struct Repositories {
    users: Arc<DieselUserRepository>,
    profiles: Arc<DieselProfileRepository>,
    skills: Arc<DieselSkillRepository>,
    swaps: Arc<DieselSwapRepository>,
    feedback: Arc<DieselFeedbackRepository>,
}

impl Repositories {
    fn new(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            profiles: Arc::new(DieselProfileRepository::new(pool.clone())),
            skills: Arc::new(DieselSkillRepository::new(pool.clone())),
            swaps: Arc::new(DieselSwapRepository::new(pool.clone())),
            feedback: Arc::new(DieselFeedbackRepository::new(pool.clone())),
        }
    }
}

/// Build the HTTP state backed by PostgreSQL.
pub(crate) fn build_http_state(pool: &DbPool) -> HttpState {
    let repos = Repositories::new(pool);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let swaps = Arc::new(SwapService::new(
        repos.swaps.clone(),
        repos.profiles.clone(),
        repos.users.clone(),
        repos.skills.clone(),
        clock.clone(),
    ));
    let feedback = Arc::new(FeedbackService::new(
        repos.feedback.clone(),
        repos.swaps.clone(),
        repos.users.clone(),
        clock.clone(),
    ));

    HttpState {
        accounts: Arc::new(AccountService::new(
            repos.users.clone(),
            repos.profiles.clone(),
            Arc::new(Argon2PasswordHasher::new()),
            clock.clone(),
        )),
        profiles: Arc::new(ProfileService::new(
            repos.profiles.clone(),
            repos.skills.clone(),
            repos.users.clone(),
            clock,
        )),
        directory: Arc::new(DirectoryService::new(
            repos.profiles.clone(),
            repos.skills.clone(),
            repos.users.clone(),
            repos.feedback.clone(),
        )),
        swaps: swaps.clone(),
        swaps_query: swaps,
        feedback: feedback.clone(),
        feedback_query: feedback,
        admin: Arc::new(AdminService::new(repos.users, repos.swaps, repos.skills)),
    }
}
