//! Tests for the account handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::MockAccountsCommand;
use crate::inbound::http::test_utils::{
    body_json, in_memory_state, init_api, init_in_memory_api, login_as, session_cookie,
};
use crate::test_support::seed_user;

fn register_request(body: Value) -> actix_http::Request {
    test::TestRequest::post()
        .uri("/auth/register")
        .set_json(body)
        .to_request()
}

#[rstest]
#[actix_web::test]
async fn first_registration_is_admin_and_signed_in() {
    let (_store, app) = init_in_memory_api().await;

    let res = test::call_service(
        &app,
        register_request(json!({
            "name": "Ada Lovelace",
            "email": "Ada@Example.com",
            "password": "hunter22",
        })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let cookie = session_cookie(&res).expect("session cookie");
    let body = body_json(res).await;
    assert_eq!(body["user"]["role"], "ADMIN");
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["isBanned"], false);
    assert!(body["user"].get("password").is_none());

    let me = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/profile/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(me.status(), StatusCode::OK);

    let second = test::call_service(
        &app,
        register_request(json!({
            "name": "Grace Hopper",
            "email": "grace@example.com",
            "password": "hunter22",
        })),
    )
    .await;
    assert_eq!(body_json(second).await["user"]["role"], "USER");
}

#[rstest]
#[case(json!({"email": "ada@example.com", "password": "hunter22"}), json!(["name"]))]
#[case(json!({"name": "Ada", "email": " ", "password": ""}), json!(["email", "password"]))]
#[actix_web::test]
async fn registration_lists_missing_fields(#[case] body: Value, #[case] fields: Value) {
    let (_store, app) = init_in_memory_api().await;
    let res = test::call_service(&app, register_request(body)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(body["message"], "Please provide all required fields");
    assert_eq!(body["details"]["fields"], fields);
}

#[rstest]
#[case(json!({"name": "Ada", "email": "not-an-email", "password": "hunter22"}), "Please provide a valid email")]
#[case(json!({"name": "Ada", "email": "ada@example.com", "password": "abc"}), "password must be at least 6 characters")]
#[actix_web::test]
async fn registration_rejects_invalid_values(#[case] body: Value, #[case] message: &str) {
    let (_store, app) = init_in_memory_api().await;
    let res = test::call_service(&app, register_request(body)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["message"], message);
}

#[rstest]
#[actix_web::test]
async fn duplicate_email_is_rejected() {
    let (store, app) = init_in_memory_api().await;
    seed_user(&store, "Ada Lovelace", "ada@example.com");

    let res = test::call_service(
        &app,
        register_request(json!({
            "name": "Imposter",
            "email": "ADA@example.com",
            "password": "hunter22",
        })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["message"], "Email already in use");
}

#[rstest]
#[case(json!({"email": "ada@example.com", "password": "wrong-password"}), StatusCode::UNAUTHORIZED, "Invalid credentials")]
#[case(json!({"email": "nobody@example.com", "password": "password123"}), StatusCode::UNAUTHORIZED, "Invalid credentials")]
#[case(json!({"email": "ada@example.com"}), StatusCode::BAD_REQUEST, "Please provide email and password")]
#[actix_web::test]
async fn login_failures(#[case] body: Value, #[case] status: StatusCode, #[case] message: &str) {
    let (store, app) = init_in_memory_api().await;
    seed_user(&store, "Ada Lovelace", "ada@example.com");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), status);
    assert!(session_cookie(&res).is_none());
    assert_eq!(body_json(res).await["message"], message);
}

#[rstest]
#[actix_web::test]
async fn banned_accounts_cannot_log_in() {
    let (store, app) = init_in_memory_api().await;
    seed_user(&store, "Admin", "admin@example.com");
    let user = seed_user(&store, "Ada Lovelace", "ada@example.com");
    store.set_banned(user.id(), true);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({"email": "ada@example.com", "password": "password123"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(res).await["message"],
        "This account has been suspended."
    );
}

#[rstest]
#[actix_web::test]
async fn logout_ends_the_session() {
    let (store, app) = init_in_memory_api().await;
    seed_user(&store, "Ada Lovelace", "ada@example.com");
    let cookie = login_as(&app, "ada@example.com").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let removal = session_cookie(&res).expect("removal cookie");
    assert_eq!(removal.value(), "");
    assert_eq!(
        body_json(res).await["msg"],
        "User logged out successfully!"
    );

    let me = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/profile/me")
            .cookie(removal)
            .to_request(),
    )
    .await;
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn service_failures_are_redacted() {
    let mut accounts = MockAccountsCommand::new();
    accounts
        .expect_login()
        .times(1)
        .return_once(|_| Err(Error::internal("pool exhausted at 10.0.0.5")));
    let (_store, state) = in_memory_state();
    let app = init_api(HttpState {
        accounts: Arc::new(accounts),
        ..state
    })
    .await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({"email": "ada@example.com", "password": "hunter22"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(res).await["message"], "Internal server error");
}
