//! Reaction service integration tests
//!
//! Every test runs against the in-memory backend. The `pg_` tests repeat the
//! key scenarios against PostgreSQL and are skipped unless DATABASE_URL is set.
//!
//! Run with: cargo test -p integration-tests --test reaction_tests

use std::sync::Arc;

use futures::TryStreamExt;

use integration_tests::{as_client, fixtures::*, TestContext};
use reaction_common::AggregationStrategy;
use reaction_core::entities::{CountsDelta, Reaction, ReactionType};
use reaction_core::Snowflake;
use reaction_service::dto::{ListReactorsQuery, SubmitReactionRequest};
use reaction_service::ReactionStore;

const STRATEGIES: [AggregationStrategy; 2] =
    [AggregationStrategy::Incremental, AggregationStrategy::Recompute];

// ============================================================================
// Store Semantics
// ============================================================================

#[tokio::test]
async fn test_apply_then_get_returns_type() {
    let test = TestContext::start().unwrap();
    let scenario = ReactionScenario::with_users(1);
    test.register(&scenario);

    for kind in [ReactionType::Like, ReactionType::Dislike] {
        test.service()
            .apply(scenario.message_id, scenario.user(0), kind)
            .await
            .unwrap();
        let reaction = test
            .service()
            .get(scenario.message_id, scenario.user(0))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reaction.reaction_type, kind);
    }
}

#[tokio::test]
async fn test_at_most_one_reaction_per_user() {
    let test = TestContext::start().unwrap();
    let scenario = ReactionScenario::with_users(1);
    test.register(&scenario);
    let user = scenario.user(0);

    for kind in [ReactionType::Like, ReactionType::Dislike, ReactionType::Like] {
        test.service().apply(scenario.message_id, user, kind).await.unwrap();
    }

    let reactions: Vec<Reaction> = ReactionStore::new(&test.ctx)
        .list_by_message(scenario.message_id)
        .try_collect()
        .await
        .unwrap();
    assert_eq!(reactions.len(), 1);
    assert_eq!(reactions[0].reaction_type, ReactionType::Like);
}

#[tokio::test]
async fn test_same_type_twice_is_idempotent() {
    let test = TestContext::start().unwrap();
    let scenario = ReactionScenario::with_users(1);
    test.register(&scenario);

    let first = test
        .service()
        .submit(scenario.message_id, scenario.user(0), SubmitReactionRequest::new("LIKE"))
        .await
        .unwrap();
    let second = test
        .service()
        .submit(scenario.message_id, scenario.user(0), SubmitReactionRequest::new("LIKE"))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.created_at, second.created_at);

    let summary = test
        .service()
        .summarize(scenario.message_id, scenario.user(0))
        .await
        .unwrap();
    assert_eq!(summary.like_count, 1);
}

#[tokio::test]
async fn test_remove_without_reaction_is_noop() {
    let test = TestContext::start().unwrap();
    let scenario = ReactionScenario::with_users(1);

    // Unregistered ids are fine for removal
    let change = test
        .service()
        .remove(scenario.message_id, scenario.user(0))
        .await
        .unwrap();
    assert!(change.delta().is_zero());
    assert_eq!(change.previous, None);
}

#[tokio::test]
async fn test_unknown_message_and_user_are_not_found() {
    let test = TestContext::start().unwrap();
    let scenario = ReactionScenario::with_users(1);
    test.directory.register(scenario.user(0));

    let err = test
        .service()
        .apply(scenario.message_id, scenario.user(0), ReactionType::Like)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
    assert_eq!(err.error_code(), "UNKNOWN_MESSAGE");

    test.directory.register(scenario.message_id);
    let stranger = unique_id();
    let err = test
        .service()
        .apply(scenario.message_id, stranger, ReactionType::Like)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "UNKNOWN_USER");
}

#[tokio::test]
async fn test_invalid_type_is_rejected() {
    let test = TestContext::start().unwrap();
    let scenario = ReactionScenario::with_users(1);
    test.register(&scenario);

    let err = test
        .service()
        .submit(scenario.message_id, scenario.user(0), SubmitReactionRequest::new("LOVE"))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert_eq!(err.error_code(), "INVALID_REACTION_TYPE");

    let err = ReactionStore::new(&test.ctx)
        .apply_raw(scenario.message_id, scenario.user(0), "")
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_REACTION_TYPE");

    assert!(test
        .service()
        .get(scenario.message_id, scenario.user(0))
        .await
        .unwrap()
        .is_none());
}

// ============================================================================
// Aggregation
// ============================================================================

#[tokio::test]
async fn test_summary_of_mixed_reactions() {
    for strategy in STRATEGIES {
        let test = TestContext::start_with_strategy(strategy).unwrap();
        let scenario = ReactionScenario::with_users(3);
        test.register(&scenario);
        let service = test.service();

        service.apply(scenario.message_id, scenario.user(0), ReactionType::Like).await.unwrap();
        service.apply(scenario.message_id, scenario.user(1), ReactionType::Like).await.unwrap();
        service.apply(scenario.message_id, scenario.user(2), ReactionType::Dislike).await.unwrap();

        let response = service.summary(scenario.message_id, scenario.user(0)).await.unwrap();
        let json: SummaryJson = as_client(&response).unwrap();
        assert_eq!(
            json,
            SummaryJson {
                message_id: scenario.message_id.to_string(),
                like_count: 2,
                dislike_count: 1,
                user_reaction: Some("LIKE".to_string()),
            }
        );
    }
}

#[tokio::test]
async fn test_summary_of_empty_message() {
    for strategy in STRATEGIES {
        let test = TestContext::start_with_strategy(strategy).unwrap();
        let message_id = unique_id();

        let response = test.service().summary(message_id, unique_id()).await.unwrap();
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["like_count"], 0);
        assert_eq!(value["dislike_count"], 0);
        assert!(value.get("user_reaction").is_none());
    }
}

#[tokio::test]
async fn test_switching_type_moves_the_count() {
    for strategy in STRATEGIES {
        let test = TestContext::start_with_strategy(strategy).unwrap();
        let scenario = ReactionScenario::with_users(2);
        test.register(&scenario);
        let service = test.service();

        service.apply(scenario.message_id, scenario.user(0), ReactionType::Like).await.unwrap();
        service.apply(scenario.message_id, scenario.user(1), ReactionType::Dislike).await.unwrap();
        let before = service.summarize(scenario.message_id, scenario.user(0)).await.unwrap();
        assert_eq!((before.like_count, before.dislike_count), (1, 1));

        service.apply(scenario.message_id, scenario.user(0), ReactionType::Dislike).await.unwrap();
        let after = service.summarize(scenario.message_id, scenario.user(0)).await.unwrap();
        assert_eq!((after.like_count, after.dislike_count), (0, 2));
        assert_eq!(after.user_reaction, Some(ReactionType::Dislike));
    }
}

#[tokio::test]
async fn test_strategies_agree_on_the_same_history() {
    let incremental = TestContext::start_with_strategy(AggregationStrategy::Incremental).unwrap();
    let recompute = TestContext::start_with_strategy(AggregationStrategy::Recompute).unwrap();
    let scenario = ReactionScenario::with_users(12);
    incremental.register(&scenario);
    recompute.register(&scenario);

    for (step, user) in scenario.users.iter().enumerate() {
        let kind = if step % 3 == 0 { ReactionType::Dislike } else { ReactionType::Like };
        for test in [&incremental, &recompute] {
            test.service().apply(scenario.message_id, *user, kind).await.unwrap();
            if step % 4 == 0 {
                test.service().remove(scenario.message_id, *user).await.unwrap();
            }
            if step % 5 == 0 {
                test.service()
                    .apply(scenario.message_id, *user, ReactionType::Like)
                    .await
                    .unwrap();
            }
        }

        let viewer = scenario.user(0);
        assert_eq!(
            incremental.service().summarize(scenario.message_id, viewer).await.unwrap(),
            recompute.service().summarize(scenario.message_id, viewer).await.unwrap(),
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_hundred_concurrent_users_are_all_counted() {
    for strategy in STRATEGIES {
        let test = Arc::new(TestContext::start_with_strategy(strategy).unwrap());
        let scenario = ReactionScenario::with_users(100);
        test.register(&scenario);

        // Seed incremental counters before the burst
        test.service()
            .summarize(scenario.message_id, scenario.user(0))
            .await
            .unwrap();

        let handles: Vec<_> = scenario
            .users
            .iter()
            .map(|&user| {
                let test = Arc::clone(&test);
                let message_id = scenario.message_id;
                tokio::spawn(async move {
                    test.service().apply(message_id, user, ReactionType::Like).await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let summary = test
            .service()
            .summarize(scenario.message_id, scenario.user(0))
            .await
            .unwrap();
        assert_eq!(summary.like_count, 100);
        assert_eq!(summary.dislike_count, 0);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_switches_by_one_user_settle_on_one_reaction() {
    let test = Arc::new(TestContext::start().unwrap());
    let scenario = ReactionScenario::with_users(1);
    test.register(&scenario);
    let user = scenario.user(0);

    let handles: Vec<_> = (0..40)
        .map(|i| {
            let test = Arc::clone(&test);
            let message_id = scenario.message_id;
            let kind = if i % 2 == 0 { ReactionType::Like } else { ReactionType::Dislike };
            tokio::spawn(async move { test.service().apply(message_id, user, kind).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let summary = test.service().summarize(scenario.message_id, user).await.unwrap();
    assert_eq!(summary.like_count + summary.dislike_count, 1);
    let current = test.service().get(scenario.message_id, user).await.unwrap().unwrap();
    assert_eq!(
        Some(current.reaction_type),
        summary.user_reaction
    );
}

// ============================================================================
// Listing and Moderation
// ============================================================================

#[tokio::test]
async fn test_list_reactors_and_clear_message() {
    let test = TestContext::start().unwrap();
    let scenario = ReactionScenario::with_users(4);
    test.register(&scenario);
    let service = test.service();

    for user in &scenario.users[..3] {
        service.apply(scenario.message_id, *user, ReactionType::Like).await.unwrap();
    }
    service.apply(scenario.message_id, scenario.user(3), ReactionType::Dislike).await.unwrap();

    let query: ListReactorsQuery = serde_json::from_str(r#"{"type":"LIKE","limit":2}"#).unwrap();
    let reactors = service.list_reactors(scenario.message_id, query).await.unwrap();
    assert_eq!(reactors.users.len(), 2);

    let cleared = service.clear_message(scenario.message_id).await.unwrap();
    assert_eq!((cleared.likes, cleared.dislikes), (3, 1));

    let summary = service.summarize(scenario.message_id, scenario.user(0)).await.unwrap();
    assert_eq!((summary.like_count, summary.dislike_count), (0, 0));
    assert_eq!(summary.user_reaction, None);
}

#[tokio::test]
async fn test_submit_response_shape() {
    let test = TestContext::start().unwrap();
    let scenario = ReactionScenario::with_users(1);
    test.register(&scenario);

    let response = test
        .service()
        .submit(scenario.message_id, scenario.user(0), SubmitReactionRequest::new("dislike"))
        .await
        .unwrap();
    let json: ReactionJson = as_client(&response).unwrap();

    assert_eq!(json.message_id, scenario.message_id.to_string());
    assert_eq!(json.user_id, scenario.user(0).to_string());
    assert_eq!(json.reaction_type, "DISLIKE");
    assert!(Snowflake::parse(&json.id).is_ok());
    assert!(!json.created_at.is_empty());
}

// ============================================================================
// PostgreSQL Backend
// ============================================================================

#[tokio::test]
async fn test_pg_summary_and_switch() {
    let Some(test) = TestContext::postgres(AggregationStrategy::Incremental).await.unwrap() else {
        return;
    };
    let scenario = ReactionScenario::with_users(3);
    test.register(&scenario);
    let service = test.service();

    service.apply(scenario.message_id, scenario.user(0), ReactionType::Like).await.unwrap();
    service.apply(scenario.message_id, scenario.user(1), ReactionType::Like).await.unwrap();
    service.apply(scenario.message_id, scenario.user(2), ReactionType::Dislike).await.unwrap();

    let summary = service.summarize(scenario.message_id, scenario.user(0)).await.unwrap();
    assert_eq!((summary.like_count, summary.dislike_count), (2, 1));

    service.apply(scenario.message_id, scenario.user(0), ReactionType::Dislike).await.unwrap();
    let summary = service.summarize(scenario.message_id, scenario.user(0)).await.unwrap();
    assert_eq!((summary.like_count, summary.dislike_count), (1, 2));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_pg_hundred_concurrent_users() {
    for strategy in STRATEGIES {
        let Some(test) = TestContext::postgres(strategy).await.unwrap() else {
            return;
        };
        let test = Arc::new(test);
        let scenario = ReactionScenario::with_users(100);
        test.register(&scenario);

        let handles: Vec<_> = scenario
            .users
            .iter()
            .map(|&user| {
                let test = Arc::clone(&test);
                let message_id = scenario.message_id;
                tokio::spawn(async move {
                    test.service().apply(message_id, user, ReactionType::Dislike).await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let summary = test
            .service()
            .summarize(scenario.message_id, scenario.user(0))
            .await
            .unwrap();
        assert_eq!(summary.dislike_count, 100);
    }
}
