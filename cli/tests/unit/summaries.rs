//! Summary cache refresh and call counting.

#![allow(clippy::unwrap_used)]

use fleet_common::Action;
use fleet_console::application::services::{configs, groups};
use fleet_console::application::services::summaries::{ensure, fill_rows};
use fleet_console::domain::{CountCell, EntityKey, EntityKind, SummaryCache};

use crate::fake_server::FakeConfigServer;
use crate::helpers::client;

#[tokio::test]
async fn test_ensure_hits_cache_after_first_fetch() {
    let server = FakeConfigServer::new();
    server.add_agent("a-1");
    let client = client(&server);
    let mut cache = SummaryCache::new();
    let key = EntityKey::group("default");

    assert!(ensure(&client, &mut cache, &key, false).await.unwrap());
    let calls = server.total_calls();
    assert!(!ensure(&client, &mut cache, &key, false).await.unwrap());

    assert_eq!(server.total_calls(), calls);
    assert_eq!(cache.get(&key).unwrap().agent_count, Some(1));
}

#[tokio::test]
async fn test_forced_ensure_always_fetches() {
    let server = FakeConfigServer::new();
    let client = client(&server);
    let mut cache = SummaryCache::new();
    let key = EntityKey::group("default");

    ensure(&client, &mut cache, &key, false).await.unwrap();
    ensure(&client, &mut cache, &key, true).await.unwrap();
    ensure(&client, &mut cache, &key, true).await.unwrap();

    assert_eq!(server.calls(Action::ListAgents), 3);
    assert_eq!(server.calls(Action::GetAppliedConfigsForAgentGroup), 3);
}

#[tokio::test]
async fn test_config_summary_needs_one_call() {
    let server = FakeConfigServer::new();
    server.add_config("cfg1");
    server.apply_pair("default", "cfg1");
    let client = client(&server);
    let mut cache = SummaryCache::new();
    let key = EntityKey::config("cfg1");

    ensure(&client, &mut cache, &key, false).await.unwrap();

    assert_eq!(server.total_calls(), 1);
    assert_eq!(
        cache.get(&key).unwrap().peer_cell(),
        CountCell::Counted {
            count: 1,
            names: vec!["default".to_string()],
        }
    );
}

#[tokio::test]
async fn test_failed_refresh_leaves_entry_untouched() {
    let server = FakeConfigServer::new();
    server.add_config("cfg1");
    let client = client(&server);
    let mut cache = SummaryCache::new();
    let key = EntityKey::config("cfg1");
    ensure(&client, &mut cache, &key, false).await.unwrap();
    server.fail(Action::GetAppliedAgentGroups, "cfg1", 500);

    assert!(ensure(&client, &mut cache, &key, true).await.is_err());
    assert_eq!(cache.get(&key).unwrap().peer_cell(), CountCell::Empty);
}

#[tokio::test]
async fn test_fill_rows_leaves_failed_rows_unfetched() {
    let server = FakeConfigServer::new();
    server.add_config("good");
    server.add_config("bad");
    server.fail(Action::GetAppliedAgentGroups, "bad", 500);
    let client = client(&server);
    let mut cache = SummaryCache::new();

    let listed = configs::list_configs(&client).await.unwrap();
    let rows = fill_rows(&client, &mut cache, EntityKind::Config, listed).await;

    let cells: Vec<(String, CountCell)> = rows
        .iter()
        .map(|row| (row.entity.name.clone(), row.summary.peer_cell()))
        .collect();
    assert_eq!(
        cells,
        [
            ("bad".to_string(), CountCell::NotFetched),
            ("good".to_string(), CountCell::Empty),
        ]
    );
}

#[tokio::test]
async fn test_fill_rows_only_fetches_stale_rows() {
    let server = FakeConfigServer::new();
    server.add_group("web");
    let client = client(&server);
    let mut cache = SummaryCache::new();
    ensure(&client, &mut cache, &EntityKey::group("web"), false)
        .await
        .unwrap();
    let before = server.calls(Action::ListAgents);

    let listed = groups::list_groups(&client).await.unwrap();
    let rows = fill_rows(&client, &mut cache, EntityKind::Group, listed).await;

    assert_eq!(rows.len(), 2);
    // Only "default" was stale.
    assert_eq!(server.calls(Action::ListAgents), before + 1);
    assert!(rows.iter().all(|row| row.summary.agent_count == Some(0)));
}
