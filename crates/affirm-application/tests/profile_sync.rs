mod common;

use affirm_core::profile::{NewGoal, ProfilePatch, Theme, UserProfile};
use affirm_core::storage::{KeyValueStore, USER_PROFILE_KEY};
use affirm_core::sync::ReplayReport;
use common::{Harness, SwitchableRemote};

async fn stored_profile(harness: &Harness) -> UserProfile {
    let raw = harness
        .storage
        .get(USER_PROFILE_KEY)
        .await
        .unwrap()
        .expect("profile should be stored");
    serde_json::from_str(&raw).unwrap()
}

#[tokio::test]
async fn test_initialize_on_empty_storage() {
    let harness = Harness::new(SwitchableRemote::online());

    let profile = harness.services.store.initialize().await.unwrap();

    assert!(!profile.id.is_empty());
    assert!(!profile.is_premium);
    assert_eq!(profile.preferences, Default::default());
    assert!(profile.stats.is_zero());
    assert_eq!(stored_profile(&harness).await, profile);
}

#[tokio::test]
async fn test_initialize_is_idempotent() {
    let harness = Harness::new(SwitchableRemote::online());

    let first = harness.services.store.initialize().await.unwrap();
    let writes = harness.storage.writes();
    let second = harness.services.store.initialize().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(harness.storage.writes(), writes);
}

#[tokio::test]
async fn test_initialize_does_not_touch_remote() {
    let harness = Harness::new(SwitchableRemote::online());

    harness.services.store.initialize().await.unwrap();
    harness.services.sync.flush().await;

    assert_eq!(harness.remote.attempts(), 0);
    assert_eq!(harness.auth.calls(), 0);
}

#[tokio::test]
async fn test_update_survives_restart() {
    let harness = Harness::new(SwitchableRemote::online());
    let original = harness.services.store.initialize().await.unwrap();

    harness
        .services
        .store
        .update(ProfilePatch::new().name("Jane"))
        .await
        .unwrap();

    let restarted = Harness::over(harness.storage.inner().clone(), SwitchableRemote::online());
    let reloaded = restarted.services.store.initialize().await.unwrap();

    assert_eq!(reloaded.name, "Jane");
    assert_eq!(reloaded.id, original.id);
    assert_eq!(reloaded.joined_at, original.joined_at);
    assert_eq!(reloaded.preferences, original.preferences);
    assert_eq!(reloaded.goals, original.goals);
}

#[tokio::test]
async fn test_local_write_precedes_remote_push() {
    let harness = Harness::new(SwitchableRemote::online());
    let store = &harness.services.store;
    store.initialize().await.unwrap();

    store.update(ProfilePatch::new().name("Jane")).await.unwrap();
    // Durable as soon as update returns, whatever the remote does
    assert_eq!(stored_profile(&harness).await.name, "Jane");

    harness.services.sync.flush().await;
    let accepted = harness.remote.accepted();
    assert_eq!(accepted.len(), 1);
    let (collection, document_id, payload) = &accepted[0];
    assert_eq!(collection, "users");
    assert_eq!(document_id, &store.get().unwrap().id);
    assert_eq!(payload["name"], "Jane");
    assert_eq!(payload["isPremium"], false);
}

#[tokio::test]
async fn test_remote_failure_is_not_surfaced() {
    let harness = Harness::new(SwitchableRemote::offline());
    let store = &harness.services.store;
    store.initialize().await.unwrap();

    store.update(ProfilePatch::new().name("A")).await.unwrap();
    store.add_goal(NewGoal::new("Meditate")).await.unwrap();
    store.upgrade_to_premium().await.unwrap();
    harness.services.sync.flush().await;

    assert_eq!(harness.services.queue.len().await.unwrap(), 3);
    assert!(store.get().unwrap().is_premium);
}

#[tokio::test]
async fn test_queued_entries_are_snapshots() {
    let harness = Harness::new(SwitchableRemote::offline());
    let store = &harness.services.store;
    store.initialize().await.unwrap();

    store.update(ProfilePatch::new().name("first")).await.unwrap();
    store.update(ProfilePatch::new().name("second")).await.unwrap();
    harness.services.sync.flush().await;

    let names: Vec<String> = harness
        .services
        .queue
        .entries()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.profile_snapshot.name)
        .collect();
    assert_eq!(names, vec!["first", "second"]);
}

#[tokio::test]
async fn test_queue_keeps_ten_most_recent_failures() {
    let harness = Harness::new(SwitchableRemote::offline());
    let store = &harness.services.store;
    store.initialize().await.unwrap();

    for i in 0..11 {
        store
            .update(ProfilePatch::new().name(format!("state-{}", i)))
            .await
            .unwrap();
    }
    harness.services.sync.flush().await;

    let entries = harness.services.queue.entries().await.unwrap();
    assert_eq!(entries.len(), 10);
    assert!(entries.iter().all(|e| e.profile_snapshot.name != "state-0"));
    assert_eq!(entries[0].profile_snapshot.name, "state-1");
    assert_eq!(entries[9].profile_snapshot.name, "state-10");
}

#[tokio::test]
async fn test_replay_drains_queue_once_online() {
    let harness = Harness::new(SwitchableRemote::offline());
    let store = &harness.services.store;
    store.initialize().await.unwrap();
    for name in ["a", "b", "c"] {
        store.update(ProfilePatch::new().name(name)).await.unwrap();
    }
    harness.services.sync.flush().await;
    assert_eq!(harness.services.queue.len().await.unwrap(), 3);

    harness.remote.set_offline(false);
    let first = harness.services.drain.replay().await;
    let second = harness.services.drain.replay().await;

    assert_eq!(first, ReplayReport { succeeded: 3, remaining: 0 });
    assert_eq!(second, ReplayReport { succeeded: 0, remaining: 0 });

    // Oldest first, so the remote ends on the latest local state
    let accepted = harness.remote.accepted();
    let last = &accepted.last().unwrap().2;
    assert_eq!(last["name"], "c");
    assert_eq!(last, &serde_json::to_value(store.get().unwrap()).unwrap());
}

#[tokio::test]
async fn test_failed_replay_does_not_grow_queue() {
    let harness = Harness::new(SwitchableRemote::offline());
    let store = &harness.services.store;
    store.initialize().await.unwrap();
    store.update(ProfilePatch::new().name("a")).await.unwrap();
    harness.services.sync.flush().await;

    for _ in 0..3 {
        let report = harness.services.drain.replay().await;
        assert_eq!(report, ReplayReport { succeeded: 0, remaining: 1 });
    }
    assert_eq!(harness.services.queue.len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_failed_local_write_rolls_back() {
    let harness = Harness::new(SwitchableRemote::online());
    let store = &harness.services.store;
    let before = store.initialize().await.unwrap();

    harness.storage.set_failing(true);
    let err = store
        .update(ProfilePatch::new().name("lost"))
        .await
        .unwrap_err();
    let goal_err = store.add_goal(NewGoal::new("lost")).await.unwrap_err();
    harness.storage.set_failing(false);
    harness.services.sync.flush().await;

    assert!(err.is_persistence());
    assert!(goal_err.is_persistence());
    assert_eq!(store.get().unwrap(), before);
    assert_eq!(stored_profile(&harness).await, before);
    assert_eq!(harness.remote.attempts(), 0);
}

#[tokio::test]
async fn test_shallow_merge_replaces_nested_preferences() {
    let harness = Harness::new(SwitchableRemote::online());
    let store = &harness.services.store;
    let profile = store.initialize().await.unwrap();

    let mut preferences = profile.preferences.clone();
    preferences.theme = Theme::Dark;
    preferences.notifications.daily_reminder = false;
    store
        .update(ProfilePatch::new().preferences(preferences.clone()))
        .await
        .unwrap();

    assert_eq!(store.get().unwrap().preferences, preferences);
}

#[tokio::test]
async fn test_token_requested_lazily_and_cached() {
    let harness = Harness::new(SwitchableRemote::online());
    let store = &harness.services.store;
    store.initialize().await.unwrap();
    assert_eq!(harness.auth.calls(), 0);

    store.update(ProfilePatch::new().name("a")).await.unwrap();
    store.update(ProfilePatch::new().name("b")).await.unwrap();
    harness.services.sync.flush().await;

    assert_eq!(harness.auth.calls(), 1);
    assert_eq!(harness.remote.accepted().len(), 2);
}

#[tokio::test]
async fn test_reset_then_reinitialize() {
    let harness = Harness::new(SwitchableRemote::offline());
    let store = &harness.services.store;
    let old = store.initialize().await.unwrap();
    store.update(ProfilePatch::new().name("gone")).await.unwrap();

    harness.services.store.reset().await.unwrap();

    assert!(store.get().is_none());
    assert!(harness.services.queue.is_empty().await.unwrap());
    assert!(harness.storage.inner().is_empty().await);

    let fresh = store.initialize().await.unwrap();
    assert_ne!(fresh.id, old.id);
    assert!(fresh.name.is_empty());
}

#[tokio::test]
async fn test_unchanged_update_still_attempts_sync() {
    let harness = Harness::new(SwitchableRemote::offline());
    let store = &harness.services.store;
    store.initialize().await.unwrap();
    let writes = harness.storage.writes();

    store.update(ProfilePatch::new().name("")).await.unwrap();
    harness.services.sync.flush().await;

    assert_eq!(harness.remote.attempts(), 1);
    assert_eq!(harness.services.queue.len().await.unwrap(), 1);
    // Profile write plus the queue write
    assert_eq!(harness.storage.writes(), writes + 2);
}
