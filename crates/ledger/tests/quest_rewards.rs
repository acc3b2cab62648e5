//! Quest creation, joining and reward claims against the in-memory store.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use common::Harness;
use studyquest_core::quest::QuestState;
use studyquest_ledger::quest::{NewQuest, QuestRewardService};
use studyquest_ledger::store::LedgerStore;
use studyquest_ledger::LedgerError;

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reward_is_derived_from_target() {
    let h = Harness::new();
    let user = h.user("ada").await;

    let quest = h.quest(user.id, "Deep Work Protocol", 4.0).await;

    assert_eq!(quest.xp_reward, 400);
    assert_eq!(quest.description, "Deep Work Protocol");
    assert_eq!(quest.created_by, Some(user.id));
    let feed = h.store.activity_for(user.id).await;
    assert_eq!(feed[0].text, "created quest: Deep Work Protocol");
}

#[tokio::test]
async fn fractional_target_reward_is_floored() {
    let h = Harness::new();
    let user = h.user("ada").await;

    let quest = h.quest(user.id, "Odd", 1.255).await;

    assert_eq!(quest.xp_reward, 125);
}

#[tokio::test]
async fn invalid_quest_input_is_rejected() {
    let h = Harness::new();
    let user = h.user("ada").await;

    for (title, target_hours) in [("Ok", 0.0), ("Ok", -2.0), ("Ok", f64::NAN), ("<>", 2.0)] {
        let err = h
            .quests
            .create_quest(NewQuest {
                created_by: user.id,
                title: title.to_string(),
                description: None,
                target_hours,
            })
            .await
            .unwrap_err();
        assert_matches!(err, LedgerError::Validation(_));
    }
    assert!(h.store.list_quests().await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Joining
// ---------------------------------------------------------------------------

#[tokio::test]
async fn join_starts_at_zero_and_logs() {
    let h = Harness::new();
    let user = h.user("ada").await;
    let quest = h.quest(user.id, "Sprint", 4.0).await;

    let progress = h.quests.join_quest(user.id, quest.id).await.unwrap();

    assert_eq!(progress.progress_hours, 0.0);
    assert!(progress.completed_at.is_none());
    let feed = h.store.activity_for(user.id).await;
    assert_eq!(feed.last().unwrap().text, "joined quest: Sprint");
}

#[tokio::test]
async fn double_join_is_rejected_without_side_effects() {
    let h = Harness::new();
    let user = h.user("ada").await;
    let quest = h.quest(user.id, "Sprint", 4.0).await;
    h.quests.join_quest(user.id, quest.id).await.unwrap();
    let feed_before = h.store.activity_count(user.id).await;

    let err = h.quests.join_quest(user.id, quest.id).await.unwrap_err();

    assert_matches!(err, LedgerError::AlreadyJoined(id) if id == quest.id);
    assert_eq!(h.store.list_progress(user.id).await.unwrap().len(), 1);
    assert_eq!(h.store.activity_count(user.id).await, feed_before);
}

#[tokio::test]
async fn concurrent_joins_create_one_row() {
    let h = Harness::new();
    let user = h.user("ada").await;
    let quest = h.quest(user.id, "Sprint", 4.0).await;

    let joins = (0..8).map(|_| h.quests.join_quest(user.id, quest.id));
    let results = futures::future::join_all(joins).await;

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, LedgerError::AlreadyJoined(_))));
}

#[tokio::test]
async fn join_unknown_quest_is_not_found() {
    let h = Harness::new();
    let user = h.user("ada").await;

    let err = h.quests.join_quest(user.id, 404).await.unwrap_err();

    assert_matches!(err, LedgerError::QuestNotFound(404));
}

#[tokio::test]
async fn join_by_unknown_user_is_not_found() {
    let h = Harness::new();
    let creator = h.user("ada").await;
    let quest = h.quest(creator.id, "Sprint", 4.0).await;

    let err = h.quests.join_quest(999, quest.id).await.unwrap_err();

    assert_matches!(err, LedgerError::UserNotFound(999));
    assert!(h.store.list_progress(999).await.unwrap().is_empty());
    assert_eq!(h.store.activity_count(999).await, 0);
}

// ---------------------------------------------------------------------------
// Claiming
// ---------------------------------------------------------------------------

#[tokio::test]
async fn four_hour_quest_end_to_end() {
    let h = Harness::new();
    let user = h.user("ada").await;
    let quest = h.quest(user.id, "Deep Work Protocol", 4.0).await;
    h.quests.join_quest(user.id, quest.id).await.unwrap();

    for _ in 0..3 {
        h.study(user.id, 3_600).await;
    }
    let err = h.quests.claim_reward(user.id, quest.id).await.unwrap_err();
    assert_matches!(
        err,
        LedgerError::QuestNotComplete { progress_hours, target_hours, .. }
            if progress_hours == 3.0 && target_hours == 4.0
    );
    assert_eq!(h.xp(user.id).await, 300);

    h.study(user.id, 3_600).await;
    let claim = h.quests.claim_reward(user.id, quest.id).await.unwrap();

    assert_eq!(claim.xp_awarded, 400);
    assert_eq!(claim.xp_total, 800);
    assert_eq!(h.xp(user.id).await, 800);
    let feed = h.store.activity_for(user.id).await;
    assert_eq!(
        feed.last().unwrap().text,
        "completed quest: Deep Work Protocol [+400 XP]"
    );

    let err = h.quests.claim_reward(user.id, quest.id).await.unwrap_err();
    assert_matches!(err, LedgerError::AlreadyClaimed(_));
    assert_eq!(h.xp(user.id).await, 800);
}

#[tokio::test]
async fn claim_validation_order() {
    let h = Harness::new();
    let user = h.user("ada").await;

    let err = h.quests.claim_reward(user.id, 77).await.unwrap_err();
    assert_matches!(err, LedgerError::QuestNotFound(77));

    let quest = h.quest(user.id, "Sprint", 1.0).await;
    let err = h.quests.claim_reward(user.id, quest.id).await.unwrap_err();
    assert_matches!(err, LedgerError::NotJoined(_));

    h.quests.join_quest(user.id, quest.id).await.unwrap();
    let err = h.quests.claim_reward(user.id, quest.id).await.unwrap_err();
    assert_matches!(err, LedgerError::QuestNotComplete { .. });
}

#[tokio::test]
async fn concurrent_claims_pay_exactly_once() {
    let h = Harness::new();
    let user = h.user("ada").await;
    let quest = h.quest(user.id, "Race", 1.0).await;
    h.quests.join_quest(user.id, quest.id).await.unwrap();
    h.study(user.id, 3_600).await;

    // Separate tokio tasks sharing one store.
    let shared: Arc<dyn LedgerStore> = Arc::new(h.store.clone());
    let service = Arc::new(QuestRewardService::new(shared));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let service = Arc::clone(&service);
            let (user_id, quest_id) = (user.id, quest.id);
            tokio::spawn(async move { service.claim_reward(user_id, quest_id).await })
        })
        .collect();

    let mut wins = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => wins += 1,
            Err(err) => assert_matches!(err, LedgerError::AlreadyClaimed(_)),
        }
    }

    assert_eq!(wins, 1);
    assert_eq!(h.xp(user.id).await, 200);
    let completed = h
        .store
        .activity_for(user.id)
        .await
        .into_iter()
        .filter(|e| e.text.starts_with("completed quest:"))
        .count();
    assert_eq!(completed, 1);
}

#[tokio::test]
async fn failed_claim_rolls_back_completion() {
    let h = Harness::new();
    let user = h.user("ada").await;
    let quest = h.quest(user.id, "Short", 1.0).await;
    h.quests.join_quest(user.id, quest.id).await.unwrap();
    h.study(user.id, 3_600).await;

    h.store.fail_next_activity_append();
    let err = h.quests.claim_reward(user.id, quest.id).await.unwrap_err();
    assert_matches!(err, LedgerError::Storage(_));

    let progress = h.store.find_progress(user.id, quest.id).await.unwrap().unwrap();
    assert!(progress.completed_at.is_none());
    assert_eq!(h.xp(user.id).await, 100);

    // A retry by the caller succeeds.
    let claim = h.quests.claim_reward(user.id, quest.id).await.unwrap();
    assert_eq!(claim.xp_total, 200);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_reports_state_per_user() {
    let h = Harness::new();
    let user = h.user("ada").await;
    let idle = h.quest(user.id, "Idle", 10.0).await;
    let joined = h.quest(user.id, "Joined", 10.0).await;
    let ready = h.quest(user.id, "Ready", 1.0).await;
    let done = h.quest(user.id, "Done", 1.0).await;
    for q in [&joined, &ready, &done] {
        h.quests.join_quest(user.id, q.id).await.unwrap();
    }
    h.study(user.id, 3_600).await;
    h.quests.claim_reward(user.id, done.id).await.unwrap();

    let views = h.quests.list_quests(user.id).await.unwrap();

    let titles: Vec<&str> = views.iter().map(|v| v.quest.title.as_str()).collect();
    assert_eq!(titles, ["Done", "Ready", "Joined", "Idle"]);

    let state_of = |id: i64| views.iter().find(|v| v.quest.id == id).unwrap();
    assert_eq!(state_of(idle.id).state, QuestState::NotJoined);
    assert!(!state_of(idle.id).joined);
    assert_eq!(state_of(idle.id).progress_hours, 0.0);
    assert_eq!(state_of(joined.id).state, QuestState::Joined);
    assert_eq!(state_of(joined.id).progress_hours, 1.0);
    assert_eq!(state_of(ready.id).state, QuestState::Completable);
    assert_eq!(state_of(done.id).state, QuestState::Claimed);
    assert!(state_of(done.id).completed_at.is_some());
}
