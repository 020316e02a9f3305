//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{AppSettings, ServerConfig};
pub(crate) use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use skillswap::Trace;
#[cfg(debug_assertions)]
use skillswap::doc::ApiDoc;
use skillswap::doc::SESSION_COOKIE_NAME;
use skillswap::inbound::http::configure_api;
use skillswap::inbound::http::health::{HealthState, live, ready};
use skillswap::inbound::http::state::HttpState;

/// Session cookies expire after this much inactivity.
const SESSION_TTL_HOURS: i64 = 2;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE_NAME.into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default()
                .session_ttl(actix_web::cookie::time::Duration::hours(SESSION_TTL_HOURS)),
        )
        .build();

    let api = web::scope("/api/v1").wrap(session).configure(configure_api);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server.
///
/// Readiness is flipped once the listener is bound; the caller drains it
/// again on shutdown.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config.db_pool));
    let server_health_state = health_state.clone();
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(actix_web::middleware::Condition::from_option(
            prometheus.clone(),
        ));

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use skillswap::test_support::{InMemoryStore, MutableClock, http_state, seed_user};
    use std::sync::Arc;

    async fn app_with_store() -> (
        Arc<InMemoryStore>,
        impl actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
    ) {
        let store = Arc::new(InMemoryStore::default());
        let state = http_state(store.clone(), Arc::new(MutableClock::new(Utc::now())));
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        let app = test::init_service(build_app(AppDependencies {
            health_state: health,
            http_state: web::Data::new(state),
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        }))
        .await;
        (store, app)
    }

    #[rstest]
    #[actix_web::test]
    async fn api_is_mounted_under_version_prefix_with_session_cookie() {
        let (store, app) = app_with_store().await;
        seed_user(&store, "Ada Lovelace", "ada@example.com");

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({"email": "ada@example.com", "password": "password123"}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("trace-id"));
        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
            .expect("session cookie");
        assert_eq!(cookie.http_only(), Some(true));

        let me = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/profile/me")
                .cookie(cookie.into_owned())
                .to_request(),
        )
        .await;
        assert_eq!(me.status(), StatusCode::OK);
    }

    #[rstest]
    #[case("/health/ready")]
    #[case("/health/live")]
    #[actix_web::test]
    async fn probes_sit_outside_the_api_scope(#[case] uri: &str) {
        let (_store, app) = app_with_store().await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
