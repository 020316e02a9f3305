//! Tests for the feedback service.

use std::sync::Arc;

use chrono::Utc;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{FeedbackPersistenceError, MockFeedbackRepository};
use crate::domain::{ErrorCode, Rating, SkillId, Swap, SwapId, User};
use crate::test_support::{InMemoryStore, MutableClock, seed_user};

struct World {
    store: Arc<InMemoryStore>,
    requester: User,
    receiver: User,
    outsider: User,
}

impl World {
    fn service(&self) -> FeedbackService<InMemoryStore, InMemoryStore, InMemoryStore> {
        FeedbackService::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            Arc::new(MutableClock::new(Utc::now())),
        )
    }

    fn swap(&self, status: SwapStatus) -> SwapId {
        let now = Utc::now();
        let swap = Swap {
            id: SwapId::random(),
            requester: self.requester.id().clone(),
            receiver: self.receiver.id().clone(),
            skill_offered: SkillId::random(),
            skill_wanted: SkillId::random(),
            status,
            message: None,
            created_at: now,
            updated_at: now,
        };
        self.store.put_swap(swap.clone());
        swap.id
    }
}

#[fixture]
fn world() -> World {
    let store = Arc::new(InMemoryStore::default());
    World {
        requester: seed_user(&store, "Ada Lovelace", "ada@example.com"),
        receiver: seed_user(&store, "Grace Hopper", "grace@example.com"),
        outsider: seed_user(&store, "Alan Turing", "alan@example.com"),
        store,
    }
}

fn review(swap: SwapId, rating: i64) -> NewFeedback {
    NewFeedback {
        swap,
        rating: Rating::new(rating).expect("valid rating"),
        comment: None,
    }
}

#[rstest]
#[tokio::test]
async fn participant_rates_the_counterpart(world: World) {
    let swap = world.swap(SwapStatus::Completed);
    let view = world
        .service()
        .leave(world.receiver.id(), review(swap, 5))
        .await
        .expect("feedback stored");
    assert_eq!(view.rated_user, *world.requester.id());
    assert_eq!(view.rater.name.as_ref(), "Grace Hopper");
}

#[rstest]
#[tokio::test]
async fn second_review_of_a_swap_is_rejected(world: World) {
    let swap = world.swap(SwapStatus::Completed);
    let service = world.service();
    service
        .leave(world.requester.id(), review(swap, 4))
        .await
        .expect("first review");
    let err = service
        .leave(world.receiver.id(), review(swap, 2))
        .await
        .expect_err("second review");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), ALREADY_REVIEWED);
}

#[rstest]
#[case(SwapStatus::Pending)]
#[case(SwapStatus::Accepted)]
#[case(SwapStatus::Cancelled)]
#[tokio::test]
async fn only_completed_swaps_can_be_reviewed(world: World, #[case] status: SwapStatus) {
    let swap = world.swap(status);
    let err = world
        .service()
        .leave(world.requester.id(), review(swap, 3))
        .await
        .expect_err("not completed");
    assert_eq!(err.message(), "Feedback can only be left for completed swaps");
}

#[rstest]
#[tokio::test]
async fn outsiders_cannot_review(world: World) {
    let swap = world.swap(SwapStatus::Completed);
    let err = world
        .service()
        .leave(world.outsider.id(), review(swap, 3))
        .await
        .expect_err("outsider");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "You were not a participant in this swap");
}

#[rstest]
#[tokio::test]
async fn unknown_swap_is_not_found(world: World) {
    let err = world
        .service()
        .leave(world.requester.id(), review(SwapId::random(), 3))
        .await
        .expect_err("unknown swap");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn insert_race_reports_already_reviewed(world: World) {
    let swap = world.swap(SwapStatus::Completed);
    let mut feedback = MockFeedbackRepository::new();
    feedback.expect_exists_for_swap().return_once(|_| Ok(false));
    feedback
        .expect_insert()
        .return_once(|entry| Err(FeedbackPersistenceError::duplicate_swap(entry.swap.to_string())));
    let service = FeedbackService::new(
        Arc::new(feedback),
        world.store.clone(),
        world.store.clone(),
        Arc::new(MutableClock::new(Utc::now())),
    );

    let err = service
        .leave(world.requester.id(), review(swap, 5))
        .await
        .expect_err("duplicate");
    assert_eq!(err.message(), ALREADY_REVIEWED);
}

#[rstest]
#[tokio::test]
async fn summary_rounds_the_average(world: World) {
    let service = world.service();
    for rating in [5, 4, 4] {
        let swap = world.swap(SwapStatus::Completed);
        service
            .leave(world.requester.id(), review(swap, rating))
            .await
            .expect("review");
    }

    let summary = service
        .for_user(world.receiver.id())
        .await
        .expect("summary");
    assert_eq!(summary.count, 3);
    assert!((summary.average_rating - 4.3).abs() < f64::EPSILON);

    let empty = service
        .for_user(world.outsider.id())
        .await
        .expect("summary");
    assert_eq!(empty.count, 0);
    assert!(empty.average_rating.abs() < f64::EPSILON);
}
