//! Test utilities for the backend crate.
//!
//! Shared by unit tests in `src/` and the integration tests in `tests/`
//! (through the `test-support` feature). [`InMemoryStore`] implements every
//! driven repository port against one mutex-guarded state, so services and
//! HTTP handlers can be exercised without a database.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;
use pagination::{Page, PageRequest};

use crate::domain::ports::{
    FeedbackPersistenceError, FeedbackRepository, PasswordHashError, PasswordHasher,
    ProfilePersistenceError, ProfileRepository, SkillPersistenceError, SkillRepository,
    StatusChange, StoredCredentials, SwapPersistenceError, SwapRepository, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    DirectoryFilter, EmailAddress, Feedback, PasswordHash, Profile, Role, Skill, SkillId,
    SkillListKind, SkillName, Swap, SwapId, SwapStatus, User, UserDraft, UserId, UserName,
};

/// Clock whose current instant only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Password hasher that stores `plain:<password>`; fast enough for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextPasswordHasher;

const PLAIN_PREFIX: &str = "plain:";

impl PasswordHasher for PlainTextPasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        Ok(PasswordHash::new(format!("{PLAIN_PREFIX}{password}")))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        let stored = hash
            .as_str()
            .strip_prefix(PLAIN_PREFIX)
            .ok_or_else(|| PasswordHashError::hashing("not a plain-text hash"))?;
        Ok(stored == password)
    }
}

#[derive(Default)]
struct State {
    /// Registration order.
    users: Vec<StoredCredentials>,
    profiles: Vec<Profile>,
    skills: Vec<Skill>,
    /// Insertion order; listings reverse it.
    swaps: Vec<Swap>,
    feedback: Vec<Feedback>,
}

impl State {
    fn user(&self, id: &UserId) -> Option<&User> {
        self.users
            .iter()
            .map(|stored| &stored.user)
            .find(|user| user.id() == id)
    }

    fn profile_mut(&mut self, id: &UserId) -> Option<&mut Profile> {
        self.profiles.iter_mut().find(|profile| profile.user_id == *id)
    }

    fn skill_named(&self, name: &SkillName) -> Option<&Skill> {
        let key = name.lookup_key();
        self.skills
            .iter()
            .find(|skill| skill.name.lookup_key() == key)
    }

    fn matches(&self, profile: &Profile, filter: &DirectoryFilter) -> bool {
        let Some(owner) = self.user(&profile.user_id) else {
            return false;
        };
        if !profile.is_public || owner.is_banned() {
            return false;
        }
        let name_matches = filter.search.as_ref().is_none_or(|needle| {
            owner
                .name()
                .as_ref()
                .to_lowercase()
                .contains(&needle.to_lowercase())
        });
        let skill_matches = filter.skill.is_none_or(|skill| {
            profile.skills_offered.contains(&skill) || profile.skills_wanted.contains(&skill)
        });
        name_matches && skill_matches
    }
}

/// In-memory implementation of every repository port.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

fn with_user(user: &User, is_banned: bool) -> User {
    User::new(UserDraft {
        id: user.id().clone(),
        name: user.name().clone(),
        email: user.email().clone(),
        role: user.role(),
        is_banned,
        created_at: user.created_at(),
    })
}

impl InMemoryStore {
    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("store mutex"),
        }
    }

    /// Register `user_id` as offering or wanting the named skill, creating
    /// the catalogue entry on first use.
    pub fn give_skill(&self, user_id: &UserId, kind: SkillListKind, name: &str) -> SkillId {
        let name = SkillName::new(name).expect("valid skill name");
        let mut state = self.lock();
        let id = match state.skill_named(&name) {
            Some(skill) => skill.id,
            None => {
                let skill = Skill::new(name, Utc::now());
                let id = skill.id;
                state.skills.push(skill);
                id
            }
        };
        state
            .profile_mut(user_id)
            .expect("profile seeded")
            .add_skill(kind, id);
        id
    }

    pub fn set_banned(&self, user_id: &UserId, banned: bool) {
        let mut state = self.lock();
        let stored = state
            .users
            .iter_mut()
            .find(|stored| stored.user.id() == user_id)
            .expect("user seeded");
        stored.user = with_user(&stored.user, banned);
    }

    pub fn set_public(&self, user_id: &UserId, public: bool) {
        self.lock()
            .profile_mut(user_id)
            .expect("profile seeded")
            .is_public = public;
    }

    /// Store a swap as-is, bypassing the creation rules.
    pub fn put_swap(&self, swap: Swap) {
        self.lock().swaps.push(swap);
    }

    pub fn skill_count(&self) -> usize {
        self.lock().skills.len()
    }

    pub fn swap_status(&self, id: &SwapId) -> Option<SwapStatus> {
        self.lock()
            .swaps
            .iter()
            .find(|swap| swap.id == *id)
            .map(|swap| swap.status)
    }
}

/// Register a user with a default profile and the password `password123`.
///
/// The first account in an empty store becomes an admin, mirroring
/// registration.
pub fn seed_user(store: &InMemoryStore, name: &str, email: &str) -> User {
    let mut state = store.lock();
    let role = if state.users.is_empty() {
        Role::Admin
    } else {
        Role::User
    };
    let user = User::new(UserDraft {
        id: UserId::random(),
        name: UserName::new(name).expect("valid name"),
        email: EmailAddress::new(email).expect("valid email"),
        role,
        is_banned: false,
        created_at: Utc::now(),
    });
    state.users.push(StoredCredentials {
        user: user.clone(),
        password_hash: PasswordHash::new(format!("{PLAIN_PREFIX}password123")),
    });
    state.profiles.push(Profile::new_default(user.id().clone()));
    user
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut state = self.lock();
        if state
            .users
            .iter()
            .any(|stored| stored.user.email() == user.email())
        {
            return Err(UserPersistenceError::duplicate_email(user.email().to_string()));
        }
        state.users.push(StoredCredentials {
            user: user.clone(),
            password_hash: password_hash.clone(),
        });
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().user(id).cloned())
    }

    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|stored| stored.user.email() == email)
            .cloned())
    }

    async fn count(&self) -> Result<u64, UserPersistenceError> {
        Ok(self.lock().users.len() as u64)
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .map(|stored| stored.user.clone())
            .collect())
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError> {
        let state = self.lock();
        Ok(ids.iter().filter_map(|id| state.user(id).cloned()).collect())
    }

    async fn toggle_banned(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut state = self.lock();
        let Some(stored) = state.users.iter_mut().find(|stored| stored.user.id() == id) else {
            return Ok(None);
        };
        stored.user = with_user(&stored.user, !stored.user.is_banned());
        Ok(Some(stored.user.clone()))
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn insert(&self, profile: &Profile) -> Result<(), ProfilePersistenceError> {
        let mut state = self.lock();
        if state.profile_mut(&profile.user_id).is_some() {
            return Err(ProfilePersistenceError::query("profile already exists"));
        }
        state.profiles.push(profile.clone());
        Ok(())
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Profile>, ProfilePersistenceError> {
        Ok(self.lock().profile_mut(user_id).map(|profile| profile.clone()))
    }

    async fn save_details(&self, profile: &Profile) -> Result<(), ProfilePersistenceError> {
        let mut state = self.lock();
        let stored = state
            .profile_mut(&profile.user_id)
            .ok_or_else(|| ProfilePersistenceError::query("profile missing"))?;
        stored.location.clone_from(&profile.location);
        stored.availability.clone_from(&profile.availability);
        stored.profile_photo_url.clone_from(&profile.profile_photo_url);
        stored.is_public = profile.is_public;
        Ok(())
    }

    async fn add_skill(
        &self,
        user_id: &UserId,
        kind: SkillListKind,
        skill: &SkillId,
    ) -> Result<(), ProfilePersistenceError> {
        let mut state = self.lock();
        let stored = state
            .profile_mut(user_id)
            .ok_or_else(|| ProfilePersistenceError::query("profile missing"))?;
        stored.add_skill(kind, *skill);
        Ok(())
    }

    async fn remove_skill(
        &self,
        user_id: &UserId,
        skill: &SkillId,
    ) -> Result<(), ProfilePersistenceError> {
        let mut state = self.lock();
        let stored = state
            .profile_mut(user_id)
            .ok_or_else(|| ProfilePersistenceError::query("profile missing"))?;
        stored.remove_skill(skill);
        Ok(())
    }

    async fn search_public(
        &self,
        filter: &DirectoryFilter,
        page: &PageRequest,
    ) -> Result<Page<Profile>, ProfilePersistenceError> {
        let state = self.lock();
        let matching: Vec<&Profile> = state
            .users
            .iter()
            .filter_map(|stored| {
                state
                    .profiles
                    .iter()
                    .find(|profile| profile.user_id == *stored.user.id())
            })
            .filter(|profile| state.matches(profile, filter))
            .collect();
        let total = matching.len() as u64;
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(skip)
            .take(page.limit() as usize)
            .cloned()
            .collect();
        Ok(Page::new(items, total, *page))
    }
}

#[async_trait]
impl SkillRepository for InMemoryStore {
    async fn find_by_id(&self, id: &SkillId) -> Result<Option<Skill>, SkillPersistenceError> {
        Ok(self
            .lock()
            .skills
            .iter()
            .find(|skill| skill.id == *id)
            .cloned())
    }

    async fn find_by_name(&self, name: &SkillName) -> Result<Option<Skill>, SkillPersistenceError> {
        Ok(self.lock().skill_named(name).cloned())
    }

    async fn find_or_create(&self, candidate: &Skill) -> Result<Skill, SkillPersistenceError> {
        let mut state = self.lock();
        if let Some(existing) = state.skill_named(&candidate.name) {
            return Ok(existing.clone());
        }
        state.skills.push(candidate.clone());
        Ok(candidate.clone())
    }

    async fn list_all(&self) -> Result<Vec<Skill>, SkillPersistenceError> {
        let mut skills = self.lock().skills.clone();
        skills.sort_by_key(|skill| skill.name.lookup_key());
        Ok(skills)
    }

    async fn find_many(&self, ids: &[SkillId]) -> Result<Vec<Skill>, SkillPersistenceError> {
        Ok(self
            .lock()
            .skills
            .iter()
            .filter(|skill| ids.contains(&skill.id))
            .cloned()
            .collect())
    }

    async fn toggle_approval(&self, id: &SkillId) -> Result<Option<Skill>, SkillPersistenceError> {
        let mut state = self.lock();
        let Some(skill) = state.skills.iter_mut().find(|skill| skill.id == *id) else {
            return Ok(None);
        };
        skill.is_approved = !skill.is_approved;
        Ok(Some(skill.clone()))
    }
}

#[async_trait]
impl SwapRepository for InMemoryStore {
    async fn insert(&self, swap: &Swap) -> Result<(), SwapPersistenceError> {
        self.lock().swaps.push(swap.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &SwapId) -> Result<Option<Swap>, SwapPersistenceError> {
        Ok(self
            .lock()
            .swaps
            .iter()
            .find(|swap| swap.id == *id)
            .cloned())
    }

    async fn list_for_participant(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Swap>, SwapPersistenceError> {
        Ok(self
            .lock()
            .swaps
            .iter()
            .rev()
            .filter(|swap| swap.requester == *user_id || swap.receiver == *user_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self, status: Option<SwapStatus>) -> Result<Vec<Swap>, SwapPersistenceError> {
        Ok(self
            .lock()
            .swaps
            .iter()
            .rev()
            .filter(|swap| status.is_none_or(|wanted| swap.status == wanted))
            .cloned()
            .collect())
    }

    async fn update_status(&self, change: &StatusChange) -> Result<bool, SwapPersistenceError> {
        let mut state = self.lock();
        let Some(swap) = state
            .swaps
            .iter_mut()
            .find(|swap| swap.id == change.swap && swap.status == change.expected)
        else {
            return Ok(false);
        };
        swap.status = change.next;
        swap.updated_at = change.at;
        Ok(true)
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryStore {
    async fn insert(&self, feedback: &Feedback) -> Result<(), FeedbackPersistenceError> {
        let mut state = self.lock();
        if state.feedback.iter().any(|entry| entry.swap == feedback.swap) {
            return Err(FeedbackPersistenceError::duplicate_swap(
                feedback.swap.to_string(),
            ));
        }
        state.feedback.push(feedback.clone());
        Ok(())
    }

    async fn exists_for_swap(&self, swap: &SwapId) -> Result<bool, FeedbackPersistenceError> {
        Ok(self.lock().feedback.iter().any(|entry| entry.swap == *swap))
    }

    async fn list_for_rated_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Feedback>, FeedbackPersistenceError> {
        Ok(self
            .lock()
            .feedback
            .iter()
            .rev()
            .filter(|entry| entry.rated_user == *user_id)
            .cloned()
            .collect())
    }
}

/// Wire every service over `store` with plain-text hashing and `clock`.
pub fn http_state(
    store: std::sync::Arc<InMemoryStore>,
    clock: std::sync::Arc<MutableClock>,
) -> crate::inbound::http::state::HttpState {
    use std::sync::Arc;

    use crate::domain::{
        AccountService, AdminService, DirectoryService, FeedbackService, ProfileService,
        SwapService,
    };

    let clock: Arc<dyn Clock> = clock;
    let hasher = Arc::new(PlainTextPasswordHasher);
    let swaps = Arc::new(SwapService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        clock.clone(),
    ));
    let feedback = Arc::new(FeedbackService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        clock.clone(),
    ));
    crate::inbound::http::state::HttpState {
        accounts: Arc::new(AccountService::new(
            store.clone(),
            store.clone(),
            hasher,
            clock.clone(),
        )),
        profiles: Arc::new(ProfileService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            clock,
        )),
        directory: Arc::new(DirectoryService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
        )),
        swaps: swaps.clone(),
        swaps_query: swaps,
        feedback: feedback.clone(),
        feedback_query: feedback,
        admin: Arc::new(AdminService::new(store.clone(), store.clone(), store)),
    }
}
