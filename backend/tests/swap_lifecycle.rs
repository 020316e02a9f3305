//! End-to-end swap flows over the full `/api/v1` surface with in-memory
//! storage: register, list skills, propose, accept, complete, review once.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::Utc;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use skillswap::Trace;
use skillswap::domain::TRACE_ID_HEADER;
use skillswap::inbound::http::configure_api;
use skillswap::test_support::{InMemoryStore, MutableClock, http_state};

struct Harness {
    store: Arc<InMemoryStore>,
}

#[fixture]
fn harness() -> Harness {
    Harness {
        store: Arc::new(InMemoryStore::default()),
    }
}

impl Harness {
    async fn app(&self) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
        let state = http_state(self.store.clone(), Arc::new(MutableClock::new(Utc::now())));
        let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
            .cookie_name("session".to_owned())
            .cookie_secure(false)
            .build();
        test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(Trace)
                .service(web::scope("/api/v1").wrap(session).configure(configure_api)),
        )
        .await
    }
}

fn session_of(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

async fn send<S>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(app, req).await;
    let status = res.status();
    let body = test::read_body(res).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

async fn register<S>(app: &S, name: &str, email: &str) -> (Cookie<'static>, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({"name": name, "email": email, "password": "secret123"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let cookie = session_of(&res);
    let body: Value = test::read_body_json(res).await;
    (cookie, body["user"].clone())
}

async fn offer<S>(app: &S, cookie: &Cookie<'static>, skill: &str, kind: &str) -> String
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        test::TestRequest::post()
            .uri("/api/v1/profile/me/skills")
            .cookie(cookie.clone())
            .set_json(json!({"skillName": skill, "type": kind}))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let list = if kind == "offered" { "skillsOffered" } else { "skillsWanted" };
    body["profile"][list]
        .as_array()
        .and_then(|skills| skills.iter().find(|s| s["name"] == skill))
        .and_then(|s| s["id"].as_str())
        .map(str::to_owned)
        .expect("skill listed on profile")
}

fn patch_status(cookie: &Cookie<'static>, id: &str, status: &str) -> Request {
    test::TestRequest::patch()
        .uri(&format!("/api/v1/swaps/{id}"))
        .cookie(cookie.clone())
        .set_json(json!({"status": status}))
        .to_request()
}

fn feedback(cookie: &Cookie<'static>, swap: &str, rating: i64) -> Request {
    test::TestRequest::post()
        .uri("/api/v1/feedback")
        .cookie(cookie.clone())
        .set_json(json!({"swapId": swap, "rating": rating, "comment": "Great session"}))
        .to_request()
}

#[rstest]
#[actix_web::test]
async fn completed_swap_accepts_a_single_review(harness: Harness) {
    let app = harness.app().await;
    let (admin, admin_user) = register(&app, "Site Admin", "admin@example.com").await;
    assert_eq!(admin_user["role"], "ADMIN");
    let (ada, ada_user) = register(&app, "Ada Lovelace", "ada@example.com").await;
    let (grace, grace_user) = register(&app, "Grace Hopper", "grace@example.com").await;
    assert_eq!(ada_user["role"], "USER");

    let woodworking = offer(&app, &ada, "Woodworking", "offered").await;
    let spanish = offer(&app, &grace, "Spanish", "offered").await;

    let (status, created) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/swaps")
            .cookie(ada.clone())
            .set_json(json!({
                "receiverId": grace_user["id"],
                "skillOfferedId": woodworking,
                "skillWantedId": spanish,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let swap_id = created["swap"]["id"].as_str().expect("swap id").to_owned();

    let (status, _) = send(&app, feedback(&ada, &swap_id, 5)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, patch_status(&grace, &swap_id, "accepted")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, patch_status(&grace, &swap_id, "completed")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["swap"]["status"], "completed");

    let (status, _) = send(&app, feedback(&ada, &swap_id, 5)).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send(&app, feedback(&grace, &swap_id, 4)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "This swap has already been reviewed");
    let (status, body) = send(&app, feedback(&ada, &swap_id, 1)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "This swap has already been reviewed");
    let (status, _) = send(&app, feedback(&admin, &swap_id, 1)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let grace_id = grace_user["id"].as_str().expect("grace id");
    let (status, received) = send(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/feedback/{grace_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(received["count"], 1);
    assert_eq!(received["averageRating"], 5.0);

    let (_, public) = send(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/users/{grace_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(public["feedback"].as_array().map(Vec::len), Some(1));
}

#[rstest]
#[actix_web::test]
async fn requester_cannot_accept_and_rejected_swaps_are_final(harness: Harness) {
    let app = harness.app().await;
    register(&app, "Site Admin", "admin@example.com").await;
    let (ada, _) = register(&app, "Ada Lovelace", "ada@example.com").await;
    let (grace, grace_user) = register(&app, "Grace Hopper", "grace@example.com").await;
    let woodworking = offer(&app, &ada, "Woodworking", "offered").await;
    let spanish = offer(&app, &grace, "spanish", "offered").await;

    let (_, created) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/swaps")
            .cookie(ada.clone())
            .set_json(json!({
                "receiverId": grace_user["id"],
                "skillOfferedId": woodworking,
                "skillWantedId": spanish,
            }))
            .to_request(),
    )
    .await;
    let swap_id = created["swap"]["id"].as_str().expect("swap id").to_owned();

    let (status, body) = send(&app, patch_status(&ada, &swap_id, "accepted")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"],
        "Only the receiver can accept or reject a swap request"
    );

    let (status, _) = send(&app, patch_status(&grace, &swap_id, "rejected")).await;
    assert_eq!(status, StatusCode::OK);
    for next in ["accepted", "cancelled", "completed"] {
        let (status, body) = send(&app, patch_status(&grace, &swap_id, next)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            format!("Cannot change status to \"{next}\" from \"rejected\"")
        );
    }
}

#[rstest]
#[actix_web::test]
async fn failures_carry_a_trace_identifier(harness: Harness) {
    let app = harness.app().await;
    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/swaps").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let header = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["traceId"], header);
    assert_eq!(body["message"], "Authentication invalid");
}
