//! Application service: editing the applied relation between groups and
//! configs.
//!
//! An [`AssociationSession`] drives one owner's [`AssociationLedger`] and the
//! tab view of its peers. Batches are issued concurrently and always run to
//! completion; nothing is rolled back. After every commit the view is
//! refetched so it shows exactly what the server holds, the owner's summary
//! is force-refreshed and the touched peers' summaries are invalidated.

use anyhow::{Context, Result, bail};
use fleet_common::proto;
use futures_util::future::join_all;

use crate::application::ports::{ProgressReporter, Transport};
use crate::application::rpc::{RpcClient, RpcFailure};
use crate::application::services::summaries::ensure;
use crate::application::services::{configs, groups};
use crate::domain::{
    AgentGroup, AssociationLedger, BatchResult, Config, EntityKey, EntityKind, Keyed, LedgerError,
    LedgerOp, PickerOption, SelectionError, SummaryCache, TabController,
};

/// Outcome of one apply or removal batch.
pub type AssociationBatch = BatchResult<(), RpcFailure>;

/// A settled batch and how the view came out of it.
#[derive(Debug, Default)]
pub struct Commit {
    pub batch: AssociationBatch,
    /// Set when the view or the owner's summary could not be refetched after
    /// the batch. A view whose peers could not be loaded is closed; the
    /// ledger still holds the applied set when that part of the refetch
    /// succeeded.
    pub refresh_error: Option<String>,
}

/// An entity that can appear on the peer side of an association view.
#[allow(async_fn_in_trait)]
pub trait Peer: Keyed + Clone {
    const KIND: EntityKind;

    /// Fetch one peer by name.
    async fn fetch_one(client: &RpcClient<impl Transport>, name: &str) -> Result<Self>;

    /// Fetch every entity of this kind, for the addition picker.
    async fn list_all(client: &RpcClient<impl Transport>) -> Result<Vec<Self>>;
}

impl Peer for Config {
    const KIND: EntityKind = EntityKind::Config;

    async fn fetch_one(client: &RpcClient<impl Transport>, name: &str) -> Result<Self> {
        configs::get_config(client, name).await
    }

    async fn list_all(client: &RpcClient<impl Transport>) -> Result<Vec<Self>> {
        configs::list_configs(client).await
    }
}

impl Peer for AgentGroup {
    const KIND: EntityKind = EntityKind::Group;

    async fn fetch_one(client: &RpcClient<impl Transport>, name: &str) -> Result<Self> {
        groups::get_group(client, name).await
    }

    async fn list_all(client: &RpcClient<impl Transport>) -> Result<Vec<Self>> {
        groups::list_groups(client).await
    }
}

// ── Single calls ──────────────────────────────────────────────────────────────

/// Names of the peers currently applied to `owner`, in server order.
pub async fn applied_names(client: &RpcClient<impl Transport>, owner: &EntityKey) -> Result<Vec<String>> {
    let names = match owner.kind {
        EntityKind::Group => {
            client
                .invoke(proto::GetAppliedConfigsForAgentGroupRequest {
                    group_name: owner.name.clone(),
                    ..Default::default()
                })
                .await?
                .config_names
        }
        EntityKind::Config => {
            client
                .invoke(proto::GetAppliedAgentGroupsRequest {
                    config_name: owner.name.clone(),
                    ..Default::default()
                })
                .await?
                .agent_group_names
        }
    };
    Ok(names)
}

/// Apply a config to a group. Applying an applied pair is a no-op server-side.
pub async fn apply(client: &RpcClient<impl Transport>, group: &str, config: &str) -> Result<(), RpcFailure> {
    client
        .invoke(proto::ApplyConfigToAgentGroupRequest {
            group_name: group.to_string(),
            config_name: config.to_string(),
            ..Default::default()
        })
        .await
        .map(|_| ())
}

pub async fn remove(client: &RpcClient<impl Transport>, group: &str, config: &str) -> Result<(), RpcFailure> {
    client
        .invoke(proto::RemoveConfigFromAgentGroupRequest {
            group_name: group.to_string(),
            config_name: config.to_string(),
            ..Default::default()
        })
        .await
        .map(|_| ())
}

/// Issue one call per peer concurrently and wait for all of them.
async fn run_batch(
    client: &RpcClient<impl Transport>,
    owner: &EntityKey,
    peers: &[String],
    op: LedgerOp,
) -> AssociationBatch {
    let calls = peers.iter().map(|peer| async move {
        let (group, config) = owner.pair(peer);
        let outcome = match op {
            LedgerOp::Remove => remove(client, group, config).await,
            _ => apply(client, group, config).await,
        };
        (peer.clone(), outcome)
    });
    let batch = BatchResult::from_outcomes(join_all(calls).await);
    tracing::info!(
        %owner,
        op = op.label(),
        succeeded = batch.succeeded.len(),
        failed = batch.failed.len(),
        "association batch settled"
    );
    batch
}

// ── Session ───────────────────────────────────────────────────────────────────

/// The association view of one owner: its applied peers as tabs plus the
/// staged edits.
pub struct AssociationSession<P> {
    ledger: AssociationLedger,
    tabs: TabController<P>,
}

impl<P: Peer> AssociationSession<P> {
    /// A closed session for the owner named `owner_name`, whose kind is the
    /// other side of `P`.
    #[must_use]
    pub fn new(owner_name: impl Into<String>) -> Self {
        let owner = EntityKey {
            kind: P::KIND.peer(),
            name: owner_name.into(),
        };
        Self {
            ledger: AssociationLedger::new(owner),
            tabs: TabController::new(),
        }
    }

    #[must_use]
    pub fn owner(&self) -> &EntityKey {
        self.ledger.owner()
    }

    #[must_use]
    pub fn ledger(&self) -> &AssociationLedger {
        &self.ledger
    }

    #[must_use]
    pub fn tabs(&self) -> &TabController<P> {
        &self.tabs
    }

    /// `Closed → Open`: fetch the applied peers fresh and show them.
    pub async fn open(&mut self, client: &RpcClient<impl Transport>) -> Result<()> {
        self.ledger.reset();
        self.ledger.begin(LedgerOp::Fetch)?;
        let fetched = self.fetch_view(client).await;
        self.ledger.finish(fetched.as_ref().err().map(ToString::to_string));
        self.tabs.open(fetched?);
        Ok(())
    }

    /// Refetch the view, keeping the selection where possible.
    pub async fn reload(&mut self, client: &RpcClient<impl Transport>) -> Result<()> {
        self.ledger.begin(LedgerOp::Fetch)?;
        let fetched = self.fetch_view(client).await;
        self.ledger.finish(fetched.as_ref().err().map(ToString::to_string));
        self.show(fetched?)
    }

    async fn fetch_view(&mut self, client: &RpcClient<impl Transport>) -> Result<Vec<P>> {
        let names = applied_names(client, self.ledger.owner())
            .await
            .with_context(|| format!("Failed to load associations of {}", self.ledger.owner()))?;
        self.ledger.set_committed(names);
        let visible = self.ledger.effective();
        let fetched = join_all(visible.iter().map(|name| P::fetch_one(client, name))).await;
        fetched.into_iter().collect()
    }

    fn show(&mut self, peers: Vec<P>) -> Result<()> {
        if self.tabs.is_open() {
            self.tabs.replace(peers)?;
        } else {
            self.tabs.open(peers);
        }
        Ok(())
    }

    pub fn select_active(&mut self, key: &str) -> Result<(), SelectionError> {
        self.tabs.select(key)
    }

    /// Close one tab: the peer leaves the view and is staged for removal.
    pub fn remove_peer_from_view(&mut self, key: &str) -> Result<()> {
        if !self.tabs.is_open() {
            return Err(SelectionError::NotOpen.into());
        }
        if !self.tabs.keys().iter().any(|k| k == key) {
            return Err(SelectionError::UnknownPeer(key.to_string()).into());
        }
        self.ledger.stage_removal(key)?;
        self.tabs.remove(key)?;
        tracing::debug!(owner = %self.ledger.owner(), peer = key, "removal staged");
        Ok(())
    }

    /// Open the addition picker with every peer, applied ones marked.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ConcurrentEdit`] while removals are staged, or
    /// the fetch error; the picker stays closed in both cases.
    pub async fn open_addition_picker(
        &mut self,
        client: &RpcClient<impl Transport>,
    ) -> Result<Vec<PickerOption<P>>> {
        self.ledger.begin_addition()?;
        match P::list_all(client).await {
            Ok(all) => Ok(self.ledger.mark_applied(all)),
            Err(err) => {
                self.ledger.close_picker();
                Err(err)
            }
        }
    }

    pub fn toggle_addition(&mut self, key: &str) -> Result<bool, LedgerError> {
        self.ledger.toggle_addition(key)
    }

    /// Close the picker without applying anything.
    pub fn discard_picker(&mut self) {
        self.ledger.close_picker();
    }

    /// Apply every peer selected in the picker and close it.
    ///
    /// An empty selection only closes the picker. Failed calls are reported
    /// in the returned batch; successful ones stay applied.
    pub async fn commit_additions(
        &mut self,
        client: &RpcClient<impl Transport>,
        cache: &mut SummaryCache,
    ) -> Result<Commit> {
        let selected: Vec<String> = self.ledger.close_picker().into_iter().collect();
        if selected.is_empty() {
            return Ok(Commit::default());
        }
        self.ledger.begin(LedgerOp::Apply)?;
        let batch = run_batch(client, self.ledger.owner(), &selected, LedgerOp::Apply).await;
        Ok(self.settle(client, cache, batch).await)
    }

    /// Remove every staged peer.
    ///
    /// With nothing staged this only force-refreshes the owner's summary.
    pub async fn commit_removals(
        &mut self,
        client: &RpcClient<impl Transport>,
        cache: &mut SummaryCache,
    ) -> Result<Commit> {
        let pending = self.ledger.pending_removal().to_vec();
        if pending.is_empty() {
            ensure(client, cache, self.ledger.owner(), true).await?;
            return Ok(Commit::default());
        }
        self.ledger.begin(LedgerOp::Remove)?;
        let batch = run_batch(client, self.ledger.owner(), &pending, LedgerOp::Remove).await;
        self.ledger.clear_removals();
        Ok(self.settle(client, cache, batch).await)
    }

    /// Refetch the view and the owner's summary after a batch. The batch is
    /// always handed back, whatever the refetch does.
    async fn settle(
        &mut self,
        client: &RpcClient<impl Transport>,
        cache: &mut SummaryCache,
        batch: AssociationBatch,
    ) -> Commit {
        let owner = self.ledger.owner().clone();
        for peer in batch.succeeded_peers().chain(batch.failed_peers()) {
            cache.invalidate(&owner.peer(peer));
        }

        let mut refresh_error = match self.fetch_view(client).await {
            Ok(peers) => self.show(peers).err(),
            Err(err) => {
                // Tabs built from the pre-batch state would not match the server.
                self.tabs.close();
                Some(err)
            }
        }
        .map(|err| format!("{err:#}"));
        if let Err(err) = ensure(client, cache, &owner, true).await {
            refresh_error.get_or_insert_with(|| format!("{err:#}"));
        }
        if let Some(err) = &refresh_error {
            tracing::warn!(%owner, error = %err, "view not refreshed after batch");
        }

        let failure = batch
            .first_failure()
            .map(|(_, err)| err.to_string())
            .or_else(|| refresh_error.clone());
        self.ledger.finish(failure);
        Commit {
            batch,
            refresh_error,
        }
    }

    /// Commit staged removals and close the view if every call succeeded.
    pub async fn save(
        &mut self,
        client: &RpcClient<impl Transport>,
        cache: &mut SummaryCache,
    ) -> Result<Commit> {
        let commit = self.commit_removals(client, cache).await?;
        if commit.batch.all_succeeded() {
            self.close();
        }
        Ok(commit)
    }

    /// `Open → Closed` discarding every staged change.
    pub fn cancel(&mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.ledger.reset();
        self.tabs.close();
    }
}

// ── Non-interactive edits ─────────────────────────────────────────────────────

/// Result of [`edit_associations`].
#[derive(Debug)]
pub struct AssociationEdit {
    pub op: LedgerOp,
    pub batch: AssociationBatch,
    /// Applied peers as last fetched from the server.
    pub applied: Vec<String>,
    /// See [`Commit::refresh_error`].
    pub refresh_error: Option<String>,
}

/// Add or remove peers of one owner in a single step.
///
/// Runs the same session an interactive editor would: removals are staged
/// tab by tab and saved, additions are toggled in the picker and committed.
/// Peers that are already applied are skipped with a warning.
///
/// # Errors
///
/// Returns an error if both lists are non-empty, if a peer to add does not
/// exist, if a peer to remove is not applied, or if loading fails.
pub async fn edit_associations<P: Peer>(
    client: &RpcClient<impl Transport>,
    cache: &mut SummaryCache,
    reporter: &impl ProgressReporter,
    owner_name: &str,
    add: &[String],
    remove: &[String],
) -> Result<AssociationEdit> {
    if !add.is_empty() && !remove.is_empty() {
        return Err(LedgerError::ConcurrentEdit {
            pending: remove.len(),
        }
        .into());
    }

    let mut session = AssociationSession::<P>::new(owner_name);
    reporter.step(&format!("loading {}...", session.owner()));
    session.open(client).await?;

    let (op, commit) = if remove.is_empty() {
        let options = session.open_addition_picker(client).await?;
        for name in add {
            let Some(option) = options.iter().find(|o| o.peer.key() == name) else {
                bail!("{} '{name}' not found", P::KIND.label());
            };
            if option.applied {
                reporter.warn(&format!(
                    "{} '{name}' is already applied to {}, skipping",
                    P::KIND.label(),
                    session.owner()
                ));
                continue;
            }
            if !session.ledger().pending_addition().is_some_and(|s| s.contains(name)) {
                session.toggle_addition(name)?;
            }
        }
        reporter.step("applying...");
        (LedgerOp::Apply, session.commit_additions(client, cache).await?)
    } else {
        for name in remove {
            if !session.ledger().is_applied(name) {
                return Err(LedgerError::NotApplied(name.clone()).into());
            }
            if !session.ledger().pending_removal().contains(name) {
                session.remove_peer_from_view(name)?;
            }
        }
        reporter.step("removing...");
        (LedgerOp::Remove, session.save(client, cache).await?)
    };

    let applied = session.ledger().committed().to_vec();
    if commit.batch.is_empty() {
        reporter.success("nothing to change");
    }
    Ok(AssociationEdit {
        op,
        batch: commit.batch,
        applied,
        refresh_error: commit.refresh_error,
    })
}
