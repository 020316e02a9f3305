//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use actix_http::Request;
use serde_json::{Value, json};

use super::configure_api;
use super::state::HttpState;
use crate::test_support::{InMemoryStore, MutableClock, http_state};

/// Session middleware with a fresh key and `Secure` disabled for plain-HTTP
/// tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Initialise the full API over the given state, mounted at the root.
pub async fn init_api(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(test_session_middleware())
            .configure(configure_api),
    )
    .await
}

/// Services wired over an empty in-memory store.
///
/// Tests swap single ports for mocks with struct update syntax:
/// `HttpState { accounts: Arc::new(mock), ..state }`.
pub fn in_memory_state() -> (Arc<InMemoryStore>, HttpState) {
    let store = Arc::new(InMemoryStore::default());
    let clock = Arc::new(MutableClock::new(chrono::Utc::now()));
    let state = http_state(store.clone(), clock);
    (store, state)
}

/// API backed by an empty in-memory store.
pub async fn init_in_memory_api() -> (
    Arc<InMemoryStore>,
    impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
) {
    let (store, state) = in_memory_state();
    (store, init_api(state).await)
}

pub fn session_cookie(res: &ServiceResponse) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// Log in with the seeded password and return the session cookie.
pub async fn login_as<S>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({"email": email, "password": "password123"}))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "login failed: {}", res.status());
    session_cookie(&res).expect("login sets a session cookie")
}

/// Read a response body as JSON.
pub async fn body_json(res: ServiceResponse) -> Value {
    test::read_body_json(res).await
}
