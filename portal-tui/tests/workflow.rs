use portal_core::{QueryCache, QuerySnapshot, QueryUpdate, RemoteError, ResourceState};
use portal_test_utils::{fixtures, paths, FakeBackend};
use portal_tui::cards::{CardGrid, CardKind};
use portal_tui::notifications::NotificationLevel;
use portal_tui::workflow::{
    profile_key, Phase, ProfileWorkflow, SubmitOutcome, FAILURE_MESSAGE, SUCCESS_MESSAGE,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn workflow(backend: &FakeBackend) -> ProfileWorkflow {
    ProfileWorkflow::new(QueryCache::default(), Arc::new(backend.clone()))
}

/// Apply updates until `done` holds.
async fn settle(wf: &mut ProfileWorkflow, done: impl Fn(&ProfileWorkflow) -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !done(wf) {
            match wf.next_update().await {
                Some(update) => wf.apply_update(update),
                None => break,
            }
        }
    })
    .await
    .expect("workflow did not settle");
}

fn loaded(wf: &ProfileWorkflow) -> bool {
    !wf.profile().is_loading() && !wf.projects().is_loading() && !wf.patents().is_loading()
}

async fn mounted(backend: &FakeBackend) -> ProfileWorkflow {
    let mut wf = workflow(backend);
    wf.mount();
    settle(&mut wf, loaded).await;
    wf
}

#[tokio::test]
async fn mount_loads_profile_projects_and_patents() {
    let backend = FakeBackend::seeded();
    let wf = mounted(&backend).await;

    assert_eq!(wf.phase(), Phase::Ready);
    let profile = wf.profile().ready().expect("profile loaded");
    assert_eq!(profile.name, "A. Smith");
    assert_eq!(wf.form().value("linkedin"), "");

    match wf.cards(CardKind::Projects) {
        ResourceState::Ready(cards) => {
            assert_eq!(cards.len(), 3);
            assert_eq!(cards[1].description, portal_core::DESCRIPTION_PLACEHOLDER);
        }
        other => panic!("unexpected projects state: {:?}", other),
    }
    for path in [paths::PROFILE, paths::PROJECTS, paths::PATENTS] {
        assert_eq!(backend.get_count(path), 1, "{}", path);
    }
}

#[tokio::test]
async fn valid_submit_sends_one_put_and_refetches_profile() {
    let backend = FakeBackend::seeded();
    let mut wf = mounted(&backend).await;

    assert!(wf.edit_field("linkedin", "https://linkedin.com/in/asmith"));
    assert_eq!(wf.submit().await, SubmitOutcome::Saved);

    assert_eq!(backend.put_count(), 1);
    assert_eq!(
        backend.last_put_body(),
        Some(json!({
            "linkedin": "https://linkedin.com/in/asmith",
            "orchidID": "",
            "scopusID": "",
            "googleScholar": ""
        }))
    );
    let snapshot = wf.cache().peek(&profile_key()).expect("profile cached");
    assert_eq!(snapshot.invalidation_count, 1);

    let note = wf.latest_notification().expect("toast");
    assert_eq!(note.level, NotificationLevel::Success);
    assert_eq!(note.message, SUCCESS_MESSAGE);

    settle(&mut wf, |wf| {
        wf.profile()
            .ready()
            .and_then(|p| p.linkedin.as_deref())
            == Some("https://linkedin.com/in/asmith")
    })
    .await;
    assert_eq!(backend.get_count(paths::PROFILE), 2);
    assert_eq!(wf.form().value("linkedin"), "https://linkedin.com/in/asmith");
}

#[tokio::test]
async fn invalid_submit_sends_nothing() {
    let backend = FakeBackend::seeded();
    let mut wf = mounted(&backend).await;

    wf.edit_field("linkedin", "not a url");
    match wf.submit().await {
        SubmitOutcome::Invalid(errors) => {
            assert_eq!(errors.get("linkedin"), Some("Please enter a valid LinkedIn URL"));
            assert_eq!(errors.len(), 1);
        }
        other => panic!("expected invalid, got {:?}", other),
    }
    assert_eq!(backend.put_count(), 0);
    assert_eq!(wf.phase(), Phase::Ready);
    let snapshot = wf.cache().peek(&profile_key()).expect("profile cached");
    assert_eq!(snapshot.invalidation_count, 0);
}

#[tokio::test]
async fn failed_submit_keeps_input_and_does_not_invalidate() {
    let backend = FakeBackend::seeded();
    let mut wf = mounted(&backend).await;
    backend.fail_put(RemoteError::http(500, "Internal Server Error"));

    wf.edit_field("googleScholar", "https://scholar.google.com/citations?user=x");
    assert!(matches!(wf.submit().await, SubmitOutcome::Failed(_)));

    assert_eq!(backend.put_count(), 1);
    assert_eq!(wf.phase(), Phase::Ready);
    assert!(!wf.form().is_submitting);
    assert_eq!(
        wf.form().value("googleScholar"),
        "https://scholar.google.com/citations?user=x"
    );
    let snapshot = wf.cache().peek(&profile_key()).expect("profile cached");
    assert_eq!(snapshot.invalidation_count, 0);

    let note = wf.latest_notification().expect("toast");
    assert_eq!(note.level, NotificationLevel::Error);
    assert_eq!(note.message, FAILURE_MESSAGE);

    backend.heal();
    assert_eq!(wf.submit().await, SubmitOutcome::Saved);
    assert_eq!(backend.put_count(), 2);
}

#[tokio::test]
async fn second_submit_while_in_flight_is_busy() {
    let backend = FakeBackend::seeded();
    let mut wf = mounted(&backend).await;

    wf.edit_field("scopusID", "57190000000");
    let task = wf.prepare_submit().expect("valid form");
    assert_eq!(wf.phase(), Phase::Submitting);
    assert!(wf.form().is_submitting);
    assert!(matches!(wf.prepare_submit(), Err(SubmitOutcome::Busy)));
    assert!(!wf.edit_field("scopusID", "other"));

    let result = task.run().await;
    assert_eq!(wf.complete_submit(result), SubmitOutcome::Saved);
    assert_eq!(backend.put_count(), 1);
    assert_eq!(wf.phase(), Phase::Ready);
}

#[tokio::test]
async fn profile_refetched_during_submit_resets_form_on_save() {
    let backend = FakeBackend::seeded();
    let mut wf = mounted(&backend).await;

    wf.edit_field("linkedin", "https://linkedin.com/in/asmith");
    let task = wf.prepare_submit().expect("valid form");
    let result = task.run().await;

    // The server stored a normalized URL and the refetch lands before the
    // submit is completed.
    let normalized = "https://www.linkedin.com/in/asmith/";
    let mut stored = fixtures::asmith_profile_json();
    stored["linkedin"] = json!(normalized);
    wf.apply_update(QueryUpdate {
        key: profile_key(),
        snapshot: QuerySnapshot {
            key: profile_key(),
            data: Some(stored),
            is_loading: false,
            is_stale: false,
            error: None,
            updated_at: None,
            fetch_count: 2,
            invalidation_count: 1,
        },
    });
    assert_eq!(wf.phase(), Phase::Submitting);
    assert_eq!(wf.form().value("linkedin"), "https://linkedin.com/in/asmith");

    assert_eq!(wf.complete_submit(result), SubmitOutcome::Saved);
    assert_eq!(wf.form().value("linkedin"), normalized);
    assert!(!wf.form().is_dirty());
}

#[tokio::test]
async fn profile_refetched_during_failed_submit_keeps_input() {
    let backend = FakeBackend::seeded();
    let mut wf = mounted(&backend).await;

    wf.edit_field("scopusID", "57190000000");
    let task = wf.prepare_submit().expect("valid form");
    backend.fail_put(RemoteError::http(500, "Internal Server Error"));
    backend.set_resource(paths::PROFILE, {
        let mut other = fixtures::asmith_profile_json();
        other["designation"] = json!("Professor");
        other
    });
    assert!(wf.refresh() > 0);
    settle(&mut wf, |wf| {
        wf.profile().ready().map(|p| p.designation.as_str()) == Some("Professor")
    })
    .await;

    let result = task.run().await;
    assert!(matches!(wf.complete_submit(result), SubmitOutcome::Failed(_)));
    assert_eq!(wf.form().value("scopusID"), "57190000000");
    assert!(wf.form().is_dirty());
}

#[tokio::test]
async fn logout_drops_cached_resources() {
    let backend = FakeBackend::seeded();
    let mut wf = mounted(&backend).await;
    assert!(wf.cache().peek(&profile_key()).is_some());

    wf.logout();
    assert!(wf.cache().peek(&profile_key()).is_none());
}

#[tokio::test]
async fn logout_stops_updates() {
    let backend = FakeBackend::seeded();
    let mut wf = mounted(&backend).await;

    wf.logout();
    assert_eq!(wf.phase(), Phase::Detached);
    assert_eq!(wf.refresh(), 0);
    assert!(wf.next_update().await.is_none());
    assert_eq!(wf.cache().subscriber_count(&profile_key()), 0);
}

#[tokio::test]
async fn submit_finishing_after_logout_changes_nothing() {
    let backend = FakeBackend::seeded();
    let mut wf = mounted(&backend).await;

    wf.edit_field("orchidID", "0000-0002-1825-0097");
    let task = wf.prepare_submit().expect("valid form");
    wf.logout();
    let notifications = wf.notifications().len();

    let result = task.run().await;
    assert_eq!(wf.complete_submit(result), SubmitOutcome::Saved);
    assert_eq!(wf.phase(), Phase::Detached);
    assert_eq!(wf.notifications().len(), notifications);
}

#[tokio::test]
async fn failed_list_fetch_renders_empty_state() {
    let backend = FakeBackend::seeded();
    backend.fail_get(paths::PROJECTS, RemoteError::http(500, "boom"));
    let wf = mounted(&backend).await;

    assert!(matches!(wf.projects(), ResourceState::Failed(_)));
    assert_eq!(
        CardGrid::build(CardKind::Projects, &wf.cards(CardKind::Projects)),
        CardGrid::Empty("No projects found.".to_string())
    );
    assert_eq!(wf.phase(), Phase::Ready);
}

#[tokio::test]
async fn failed_profile_fetch_is_ready_with_error_toast() {
    let backend = FakeBackend::seeded();
    backend.fail_get(paths::PROFILE, RemoteError::http(401, "Token expired"));
    let wf = mounted(&backend).await;

    assert_eq!(wf.phase(), Phase::Ready);
    assert!(matches!(wf.profile(), ResourceState::Failed(_)));
    let note = wf.latest_notification().expect("toast");
    assert_eq!(note.level, NotificationLevel::Error);
    assert!(note.message.contains("Token expired"));
    assert_eq!(
        wf.notifications()
            .iter()
            .filter(|n| n.title == "Profile unavailable")
            .count(),
        1
    );
}

#[tokio::test]
async fn concurrent_mounts_share_one_request_per_resource() {
    let backend = FakeBackend::seeded().with_delay(Duration::from_millis(50));
    let cache = QueryCache::default();

    let mut views: Vec<ProfileWorkflow> = (0..4)
        .map(|_| ProfileWorkflow::new(cache.clone(), Arc::new(backend.clone())))
        .collect();
    for wf in &mut views {
        wf.mount();
    }
    for wf in &mut views {
        settle(wf, loaded).await;
        assert_eq!(
            wf.profile().ready().map(|p| p.name.as_str()),
            Some("A. Smith")
        );
    }
    for path in [paths::PROFILE, paths::PROJECTS, paths::PATENTS] {
        assert_eq!(backend.get_count(path), 1, "{}", path);
    }
}

#[tokio::test]
async fn refresh_reloads_every_resource() {
    let backend = FakeBackend::seeded();
    let mut wf = mounted(&backend).await;
    backend.set_resource(paths::PATENTS, json!([]));

    assert_eq!(wf.refresh(), 3);
    settle(&mut wf, |wf| {
        wf.patents().ready().map(Vec::is_empty) == Some(true)
    })
    .await;
    assert_eq!(
        CardGrid::build(CardKind::Patents, &wf.cards(CardKind::Patents)),
        CardGrid::Empty("No patents found.".to_string())
    );
}
