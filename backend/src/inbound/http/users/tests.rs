//! Tests for the public directory handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use pagination::Page;
use rstest::rstest;
use serde_json::Value;

use super::*;
use crate::domain::SkillListKind;
use crate::domain::ports::MockDirectoryQuery;
use crate::inbound::http::test_utils::{body_json, in_memory_state, init_api, init_in_memory_api};
use crate::test_support::{InMemoryStore, seed_user};

/// Admin, two public users, one private user, and one banned user.
fn seed_directory(store: &InMemoryStore) -> UserId {
    seed_user(store, "Site Admin", "admin@example.com");
    let ada = seed_user(store, "Ada Lovelace", "ada@example.com");
    store.give_skill(ada.id(), SkillListKind::Offered, "Woodworking");
    let adam = seed_user(store, "Adam Smith", "adam@example.com");
    store.give_skill(adam.id(), SkillListKind::Wanted, "woodworking");
    let grace = seed_user(store, "Grace Hopper", "grace@example.com");
    store.set_public(grace.id(), false);
    let bob = seed_user(store, "Bob Banned", "bob@example.com");
    store.set_banned(bob.id(), true);
    ada.id().clone()
}

fn names(body: &Value) -> Vec<String> {
    let mut names: Vec<String> = body["profiles"]
        .as_array()
        .expect("profiles array")
        .iter()
        .filter_map(|profile| profile["user"]["name"].as_str().map(str::to_owned))
        .collect();
    names.sort();
    names
}

async fn get_json(uri: &str) -> (StatusCode, Value) {
    let (store, app) = init_in_memory_api().await;
    seed_directory(&store);
    let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    let status = res.status();
    (status, body_json(res).await)
}

#[rstest]
#[case("/users", &["Ada Lovelace", "Adam Smith", "Site Admin"])]
#[case("/users?search=ADA", &["Ada Lovelace", "Adam Smith"])]
#[case("/users?skill=WOODWORKING", &["Ada Lovelace", "Adam Smith"])]
#[case("/users?search=lovelace&skill=woodworking", &["Ada Lovelace"])]
#[case("/users?search=&skill=", &["Ada Lovelace", "Adam Smith", "Site Admin"])]
#[case("/users?skill=Knitting", &[])]
#[actix_web::test]
async fn directory_lists_public_unbanned_profiles(#[case] uri: &str, #[case] expected: &[&str]) {
    let (status, body) = get_json(uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), expected);
    assert_eq!(body["count"], expected.len());
}

#[rstest]
#[actix_web::test]
async fn directory_reports_page_counts() {
    let (status, body) = get_json("/users?page=2&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["numOfPages"], 2);
    assert_eq!(body["profiles"].as_array().map(Vec::len), Some(1));
}

#[rstest]
#[case("/users?limit=101", "limit must be at most 100, got 101")]
#[case("/users?page=first", "Query string is malformed")]
#[actix_web::test]
async fn directory_rejects_bad_windows(#[case] uri: &str, #[case] message: &str) {
    let (status, body) = get_json(uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], message);
}

#[rstest]
#[actix_web::test]
async fn directory_forwards_normalised_filters() {
    let mut directory = MockDirectoryQuery::new();
    directory
        .expect_search()
        .withf(|request| {
            request.search.as_deref() == Some("ada")
                && request
                    .skill
                    .as_ref()
                    .is_some_and(|name| name.as_ref() == "Spanish")
                && request.page.page() == 3
                && request.page.limit() == 5
        })
        .times(1)
        .return_once(|request| Ok(Page::new(Vec::new(), 11, request.page)));
    let (_store, state) = in_memory_state();
    let app = init_api(HttpState {
        directory: Arc::new(directory),
        ..state
    })
    .await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/users?search=ada&skill=Spanish&page=3&limit=5")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["count"], 11);
    assert_eq!(body["numOfPages"], 3);
}

#[rstest]
#[actix_web::test]
async fn public_profile_includes_feedback() {
    let (store, app) = init_in_memory_api().await;
    let ada = seed_directory(&store);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/users/{ada}"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["profile"]["user"]["name"], "Ada Lovelace");
    assert_eq!(body["feedback"], Value::Array(Vec::new()));
}

#[rstest]
#[actix_web::test]
async fn hidden_profiles_are_not_served() {
    let (store, app) = init_in_memory_api().await;
    seed_user(&store, "Site Admin", "admin@example.com");
    let grace = seed_user(&store, "Grace Hopper", "grace@example.com");
    store.set_public(grace.id(), false);
    let bob = seed_user(&store, "Bob Banned", "bob@example.com");
    store.set_banned(bob.id(), true);
    let missing = UserId::random();

    let fetch = |id: &UserId| {
        test::TestRequest::get()
            .uri(&format!("/users/{id}"))
            .to_request()
    };
    let private = test::call_service(&app, fetch(grace.id())).await;
    assert_eq!(private.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(private).await["message"],
        "This user profile is private"
    );

    for id in [bob.id(), &missing] {
        let res = test::call_service(&app, fetch(id)).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(res).await["message"],
            format!("No user found with id: {id}")
        );
    }

    let malformed = test::call_service(
        &app,
        test::TestRequest::get().uri("/users/ada").to_request(),
    )
    .await;
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
}
