//! Association sessions against the in-memory config server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use fleet_common::Action;
use fleet_console::application::services::associations::{
    self, AssociationSession, edit_associations,
};
use fleet_console::domain::{
    AgentGroup, Config, EntityKey, LedgerError, LedgerPhase, Summary, SummaryCache,
};
use mockall::predicate::str;

use crate::fake_server::FakeConfigServer;
use crate::helpers::{MockReporter, client, quiet_reporter};

fn server_with(group: &str, configs: &[&str], applied: &[&str]) -> FakeConfigServer {
    let server = FakeConfigServer::new();
    server.add_group(group);
    for config in configs {
        server.add_config(config);
    }
    for config in applied {
        server.apply_pair(group, config);
    }
    server
}

#[tokio::test]
async fn test_open_shows_applied_peers_with_first_active() {
    let server = server_with("web", &["a", "b"], &["b", "a"]);
    let client = client(&server);
    let mut session = AssociationSession::<Config>::new("web");

    session.open(&client).await.unwrap();

    assert_eq!(session.tabs().keys(), ["b", "a"]);
    assert_eq!(session.tabs().active(), Some("b"));
    assert_eq!(session.ledger().phase(), &LedgerPhase::Idle);
}

#[tokio::test]
async fn test_applying_twice_leaves_one_edge() {
    let server = server_with("web", &["cfg1"], &[]);
    let client = client(&server);

    associations::apply(&client, "web", "cfg1").await.unwrap();
    associations::apply(&client, "web", "cfg1").await.unwrap();

    let configs = associations::applied_names(&client, &EntityKey::group("web"))
        .await
        .unwrap();
    let groups = associations::applied_names(&client, &EntityKey::config("cfg1"))
        .await
        .unwrap();
    assert_eq!(configs, ["cfg1"]);
    assert_eq!(groups, ["web"]);
}

#[tokio::test]
async fn test_partial_removal_keeps_failed_peer_and_refetches() {
    let server = server_with("web", &["a", "b", "c"], &["a", "b", "c"]);
    server.fail(Action::RemoveConfigFromAgentGroup, "b", 500);
    let client = client(&server);
    let mut cache = SummaryCache::new();
    let mut session = AssociationSession::<Config>::new("web");
    session.open(&client).await.unwrap();

    for peer in ["a", "b", "c"] {
        session.remove_peer_from_view(peer).unwrap();
    }
    assert!(session.tabs().keys().is_empty());
    let batch = session.save(&client, &mut cache).await.unwrap().batch;

    assert_eq!(batch.len(), 3);
    assert_eq!(batch.failed_peers().collect::<Vec<_>>(), ["b"]);
    assert_eq!(server.configs_of("web"), ["b"]);
    assert_eq!(session.ledger().committed(), ["b"]);
    assert!(session.ledger().pending_removal().is_empty());
    // Not every call succeeded, so the view stays open on the server's state.
    assert_eq!(session.tabs().keys(), ["b"]);
    assert!(matches!(session.ledger().phase(), LedgerPhase::Failed(msg) if msg.contains("injected")));
}

#[tokio::test]
async fn test_failed_refetch_still_reports_batch() {
    let server = server_with("web", &["a", "b"], &["a", "b"]);
    server.fail(Action::RemoveConfigFromAgentGroup, "b", 500);
    let client = client(&server);
    let mut cache = SummaryCache::new();
    let mut session = AssociationSession::<Config>::new("web");
    session.open(&client).await.unwrap();
    server.fail(Action::GetConfig, "b", 500);
    session.remove_peer_from_view("a").unwrap();
    session.remove_peer_from_view("b").unwrap();

    let commit = session.save(&client, &mut cache).await.unwrap();

    assert_eq!(commit.batch.succeeded_peers().collect::<Vec<_>>(), ["a"]);
    let (peer, err) = commit.batch.first_failure().unwrap();
    assert_eq!(peer, "b");
    assert_eq!(err.action, Action::RemoveConfigFromAgentGroup);
    let refresh = commit.refresh_error.expect("refetch failed");
    assert!(refresh.contains("GetConfig"), "{refresh}");
    // The view could not be rebuilt, so it is closed rather than left stale.
    assert!(!session.tabs().is_open());
    assert_eq!(session.ledger().committed(), ["b"]);
    assert_eq!(server.configs_of("web"), ["b"]);
    assert!(
        matches!(session.ledger().phase(), LedgerPhase::Failed(msg) if msg.contains("RemoveConfigFromAgentGroup"))
    );
}

#[tokio::test]
async fn test_edit_carries_refresh_error() {
    let server = server_with("web", &["a"], &[]);
    server.fail(Action::GetConfig, "a", 500);
    let client = client(&server);
    let mut cache = SummaryCache::new();

    let edit = edit_associations::<Config>(
        &client,
        &mut cache,
        &quiet_reporter(),
        "web",
        &["a".to_string()],
        &[],
    )
    .await
    .unwrap();

    assert!(edit.batch.all_succeeded());
    assert_eq!(edit.applied, ["a"]);
    assert!(edit.refresh_error.is_some());
    assert_eq!(server.configs_of("web"), ["a"]);
}

#[tokio::test]
async fn test_successful_save_closes_view() {
    let server = server_with("web", &["a", "b"], &["a", "b"]);
    let client = client(&server);
    let mut cache = SummaryCache::new();
    let mut session = AssociationSession::<Config>::new("web");
    session.open(&client).await.unwrap();

    session.remove_peer_from_view("a").unwrap();
    let batch = session.save(&client, &mut cache).await.unwrap().batch;

    assert!(batch.all_succeeded());
    assert!(!session.tabs().is_open());
    assert_eq!(server.configs_of("web"), ["b"]);
}

#[tokio::test]
async fn test_picker_refused_while_removals_staged() {
    let server = server_with("web", &["a"], &["a"]);
    let client = client(&server);
    let mut session = AssociationSession::<Config>::new("web");
    session.open(&client).await.unwrap();
    session.remove_peer_from_view("a").unwrap();

    let err = session.open_addition_picker(&client).await.unwrap_err();

    assert_eq!(
        err.downcast_ref::<LedgerError>(),
        Some(&LedgerError::ConcurrentEdit { pending: 1 })
    );
    assert!(session.ledger().pending_addition().is_none());
    assert_eq!(server.calls(Action::ListConfigs), 0);
}

#[tokio::test]
async fn test_picker_marks_applied_peers() {
    let server = server_with("web", &["a", "b"], &["a"]);
    let client = client(&server);
    let mut session = AssociationSession::<Config>::new("web");
    session.open(&client).await.unwrap();

    let options = session.open_addition_picker(&client).await.unwrap();

    let marks: Vec<(&str, bool)> = options
        .iter()
        .map(|o| (o.peer.name.as_str(), o.applied))
        .collect();
    assert_eq!(marks, [("a", true), ("b", false)]);
}

#[tokio::test]
async fn test_empty_selection_only_closes_picker() {
    let server = server_with("web", &["a"], &[]);
    let client = client(&server);
    let mut cache = SummaryCache::new();
    let mut session = AssociationSession::<Config>::new("web");
    session.open(&client).await.unwrap();
    session.open_addition_picker(&client).await.unwrap();

    let batch = session.commit_additions(&client, &mut cache).await.unwrap().batch;

    assert!(batch.is_empty());
    assert!(session.ledger().pending_addition().is_none());
    assert_eq!(server.calls(Action::ApplyConfigToAgentGroup), 0);
}

#[tokio::test]
async fn test_partial_addition_keeps_successes() {
    let server = server_with("web", &["a", "b"], &[]);
    server.fail(Action::ApplyConfigToAgentGroup, "b", 500);
    let client = client(&server);
    let mut cache = SummaryCache::new();
    let mut session = AssociationSession::<Config>::new("web");
    session.open(&client).await.unwrap();
    session.open_addition_picker(&client).await.unwrap();
    session.toggle_addition("a").unwrap();
    session.toggle_addition("b").unwrap();

    let batch = session.commit_additions(&client, &mut cache).await.unwrap().batch;

    let (peer, err) = batch.first_failure().unwrap();
    assert_eq!(peer, "b");
    assert_eq!(err.status_code, 500);
    assert_eq!(server.configs_of("web"), ["a"]);
    assert_eq!(session.tabs().keys(), ["a"]);
    assert_eq!(session.tabs().active(), Some("a"));
}

#[tokio::test]
async fn test_commit_refreshes_owner_and_invalidates_peers() {
    let server = server_with("web", &["a", "b"], &["a"]);
    let client = client(&server);
    let mut cache = SummaryCache::new();
    let owner = EntityKey::group("web");
    // Stale entries for the owner and a peer.
    cache.store(
        &owner,
        Summary {
            agent_count: Some(0),
            peer_names: Some(vec!["a".to_string()]),
        },
    );
    cache.store(
        &EntityKey::config("b"),
        Summary {
            agent_count: None,
            peer_names: Some(Vec::new()),
        },
    );
    let mut session = AssociationSession::<Config>::new("web");
    session.open(&client).await.unwrap();
    session.open_addition_picker(&client).await.unwrap();
    session.toggle_addition("b").unwrap();

    session.commit_additions(&client, &mut cache).await.unwrap();

    let refreshed = cache.get(&owner).and_then(|s| s.peer_names.clone());
    assert_eq!(refreshed, Some(vec!["a".to_string(), "b".to_string()]));
    assert!(!cache.is_fresh(&EntityKey::config("b")));
}

#[tokio::test]
async fn test_removal_commit_with_nothing_staged_force_refreshes_owner() {
    let server = server_with("web", &["a"], &["a"]);
    let client = client(&server);
    let mut cache = SummaryCache::new();
    let mut session = AssociationSession::<Config>::new("web");
    session.open(&client).await.unwrap();
    let before = server.calls(Action::GetAppliedConfigsForAgentGroup);

    let batch = session.commit_removals(&client, &mut cache).await.unwrap().batch;

    assert!(batch.is_empty());
    assert_eq!(server.calls(Action::RemoveConfigFromAgentGroup), 0);
    assert_eq!(server.calls(Action::GetAppliedConfigsForAgentGroup), before + 1);
    assert!(cache.is_fresh(&EntityKey::group("web")));
}

#[tokio::test]
async fn test_cancel_discards_staged_removals() {
    let server = server_with("web", &["a"], &["a"]);
    let client = client(&server);
    let mut session = AssociationSession::<Config>::new("web");
    session.open(&client).await.unwrap();
    session.remove_peer_from_view("a").unwrap();

    session.cancel();

    assert!(!session.tabs().is_open());
    assert!(session.ledger().pending_removal().is_empty());
    assert_eq!(server.calls(Action::RemoveConfigFromAgentGroup), 0);
    assert_eq!(server.configs_of("web"), ["a"]);
}

#[tokio::test]
async fn test_config_side_session_edits_groups() {
    let server = server_with("web", &["cfg1"], &[]);
    server.add_group("db");
    let client = client(&server);
    let mut cache = SummaryCache::new();
    let mut session = AssociationSession::<AgentGroup>::new("cfg1");
    session.open(&client).await.unwrap();
    session.open_addition_picker(&client).await.unwrap();
    session.toggle_addition("db").unwrap();
    session.toggle_addition("web").unwrap();

    let batch = session.commit_additions(&client, &mut cache).await.unwrap().batch;

    assert!(batch.all_succeeded());
    assert_eq!(server.configs_of("db"), ["cfg1"]);
    assert_eq!(server.configs_of("web"), ["cfg1"]);
    assert_eq!(session.owner(), &EntityKey::config("cfg1"));
}

// ── Non-interactive edits ───────────────────────────────────────────────────

#[tokio::test]
async fn test_edit_skips_already_applied_with_warning() {
    let server = server_with("web", &["a", "b"], &["a"]);
    let client = client(&server);
    let mut cache = SummaryCache::new();
    let mut reporter = MockReporter::new();
    reporter.expect_step().returning(|_| ());
    reporter.expect_success().returning(|_| ());
    reporter
        .expect_warn()
        .with(str::contains("already applied"))
        .times(1)
        .returning(|_| ());

    let edit = edit_associations::<Config>(
        &client,
        &mut cache,
        &reporter,
        "web",
        &["a".to_string(), "b".to_string()],
        &[],
    )
    .await
    .unwrap();

    assert_eq!(edit.batch.succeeded_peers().collect::<Vec<_>>(), ["b"]);
    assert_eq!(edit.applied, ["a", "b"]);
    assert_eq!(server.calls(Action::ApplyConfigToAgentGroup), 1);
}

#[tokio::test]
async fn test_edit_unknown_peer_sends_nothing() {
    let server = server_with("web", &["a"], &[]);
    let client = client(&server);
    let mut cache = SummaryCache::new();

    let err = edit_associations::<Config>(
        &client,
        &mut cache,
        &quiet_reporter(),
        "web",
        &["nope".to_string()],
        &[],
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("config 'nope' not found"));
    assert_eq!(server.calls(Action::ApplyConfigToAgentGroup), 0);
}

#[tokio::test]
async fn test_edit_removing_unapplied_peer_is_rejected() {
    let server = server_with("web", &["a"], &[]);
    let client = client(&server);
    let mut cache = SummaryCache::new();

    let err = edit_associations::<Config>(
        &client,
        &mut cache,
        &quiet_reporter(),
        "web",
        &[],
        &["a".to_string()],
    )
    .await
    .unwrap_err();

    assert_eq!(
        err.downcast_ref::<LedgerError>(),
        Some(&LedgerError::NotApplied("a".to_string()))
    );
}

#[tokio::test]
async fn test_edit_refuses_adding_and_removing_together() {
    let server = server_with("web", &["a", "b"], &["a"]);
    let client = client(&server);
    let mut cache = SummaryCache::new();

    let err = edit_associations::<Config>(
        &client,
        &mut cache,
        &quiet_reporter(),
        "web",
        &["b".to_string()],
        &["a".to_string()],
    )
    .await
    .unwrap_err();

    assert!(err.downcast_ref::<LedgerError>().is_some());
    assert_eq!(server.total_calls(), 0);
}
