//! Application service: summary refresh.
//!
//! Fetches the derived counts shown next to groups and configs and keeps the
//! [`SummaryCache`] coherent with the server.

use anyhow::{Context, Result};
use futures_util::future::{join, join_all};

use crate::application::ports::Transport;
use crate::application::rpc::RpcClient;
use crate::application::services::associations::applied_names;
use crate::application::services::groups::list_agents;
use crate::domain::{EntityKey, EntityKind, Keyed, Row, Summary, SummaryCache};

/// Fetch every summary value `key` needs, without touching any cache.
///
/// Groups need their agent count and applied configs; both calls are issued
/// concurrently. Configs need their applied groups.
pub async fn fetch_summary(client: &RpcClient<impl Transport>, key: &EntityKey) -> Result<Summary> {
    match key.kind {
        EntityKind::Group => {
            let (agents, applied) =
                join(list_agents(client, &key.name), applied_names(client, key)).await;
            Ok(Summary {
                agent_count: Some(agents?.len()),
                peer_names: Some(applied?),
            })
        }
        EntityKind::Config => Ok(Summary {
            agent_count: None,
            peer_names: Some(applied_names(client, key).await?),
        }),
    }
}

/// Make sure `key` has a complete summary.
///
/// Without `force`, an entry that is already complete is kept and nothing is
/// sent. Returns whether a fetch happened.
///
/// # Errors
///
/// Returns an error if a fetch was needed and failed; the cached entry is
/// left as it was.
pub async fn ensure(
    client: &RpcClient<impl Transport>,
    cache: &mut SummaryCache,
    key: &EntityKey,
    force: bool,
) -> Result<bool> {
    if !force && cache.is_fresh(key) {
        tracing::trace!(%key, "summary cache hit");
        return Ok(false);
    }
    let summary = fetch_summary(client, key)
        .await
        .with_context(|| format!("Failed to refresh summary of {key}"))?;
    cache.store(key, summary);
    tracing::debug!(%key, force, "summary refreshed");
    Ok(true)
}

/// Merge a fresh listing into the cache and fill in missing summaries.
///
/// Rows whose summary cannot be fetched keep it unset, so they render as
/// not fetched rather than zero.
pub async fn fill_rows<E: Keyed>(
    client: &RpcClient<impl Transport>,
    cache: &mut SummaryCache,
    kind: EntityKind,
    entities: Vec<E>,
) -> Vec<Row<E>> {
    let mut rows = cache.refresh_listing(kind, entities);
    let stale: Vec<EntityKey> = rows
        .iter()
        .map(|row| EntityKey {
            kind,
            name: row.entity.key().to_string(),
        })
        .filter(|key| !cache.is_fresh(key))
        .collect();

    let fetched = join_all(stale.iter().map(|key| fetch_summary(client, key))).await;
    for (key, result) in stale.iter().zip(fetched) {
        match result {
            Ok(summary) => cache.store(key, summary),
            Err(err) => tracing::warn!(%key, error = %err, "summary unavailable"),
        }
    }

    for row in &mut rows {
        let key = EntityKey {
            kind,
            name: row.entity.key().to_string(),
        };
        if let Some(summary) = cache.get(&key) {
            row.summary = summary.clone();
        }
    }
    rows
}
