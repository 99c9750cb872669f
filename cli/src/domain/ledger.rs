//! Association ledger: staged edits to one entity's applied set.
//!
//! The ledger tracks the committed peer set as last fetched, the peers staged
//! for removal, and (while the addition picker is open) the peers selected
//! for addition. It never talks to the network; the association session in
//! the application layer drives it.

use std::collections::BTreeSet;

use crate::domain::error::LedgerError;
use crate::domain::model::{EntityKey, Keyed};

/// Operation an owner's ledger is busy with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerOp {
    Fetch,
    Apply,
    Remove,
}

impl LedgerOp {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            LedgerOp::Fetch => "fetch",
            LedgerOp::Apply => "apply",
            LedgerOp::Remove => "removal",
        }
    }
}

/// Per-owner operation state. Starting an operation while `Loading` is an
/// illegal transition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LedgerPhase {
    #[default]
    Idle,
    Loading(LedgerOp),
    Failed(String),
}

/// A peer offered by the addition picker.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerOption<P> {
    pub peer: P,
    /// Already applied; shown checked and not selectable.
    pub applied: bool,
}

#[derive(Debug, Clone)]
pub struct AssociationLedger {
    owner: EntityKey,
    committed: Vec<String>,
    pending_removal: Vec<String>,
    pending_addition: Option<BTreeSet<String>>,
    phase: LedgerPhase,
}

impl AssociationLedger {
    #[must_use]
    pub fn new(owner: EntityKey) -> Self {
        Self {
            owner,
            committed: Vec::new(),
            pending_removal: Vec::new(),
            pending_addition: None,
            phase: LedgerPhase::Idle,
        }
    }

    #[must_use]
    pub fn owner(&self) -> &EntityKey {
        &self.owner
    }

    /// Applied peers in server order.
    #[must_use]
    pub fn committed(&self) -> &[String] {
        &self.committed
    }

    /// Peers staged for removal, in staging order.
    #[must_use]
    pub fn pending_removal(&self) -> &[String] {
        &self.pending_removal
    }

    /// Peers selected in the open picker; `None` while it is closed.
    #[must_use]
    pub fn pending_addition(&self) -> Option<&BTreeSet<String>> {
        self.pending_addition.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> &LedgerPhase {
        &self.phase
    }

    #[must_use]
    pub fn is_applied(&self, peer: &str) -> bool {
        self.committed.iter().any(|p| p == peer)
    }

    /// Committed peers not staged for removal: what the view shows.
    #[must_use]
    pub fn effective(&self) -> Vec<String> {
        self.committed
            .iter()
            .filter(|p| !self.pending_removal.contains(p))
            .cloned()
            .collect()
    }

    /// Replace the committed set with a fresh server view, keeping server
    /// order and dropping duplicates. Staged removals of peers that are no
    /// longer applied are dropped.
    pub fn set_committed(&mut self, peers: impl IntoIterator<Item = String>) {
        self.committed.clear();
        for peer in peers {
            if !self.committed.contains(&peer) {
                self.committed.push(peer);
            }
        }
        let committed = &self.committed;
        self.pending_removal.retain(|p| committed.contains(p));
    }

    /// Stage a committed peer for removal. Returns `false` when it was
    /// already staged.
    pub fn stage_removal(&mut self, peer: &str) -> Result<bool, LedgerError> {
        self.ensure_not_loading()?;
        if !self.is_applied(peer) {
            return Err(LedgerError::NotApplied(peer.to_string()));
        }
        if self.pending_removal.iter().any(|p| p == peer) {
            return Ok(false);
        }
        self.pending_removal.push(peer.to_string());
        Ok(true)
    }

    /// Open the addition picker. Refused while removals are staged so two
    /// batches never race over the same owner.
    pub fn begin_addition(&mut self) -> Result<(), LedgerError> {
        self.ensure_not_loading()?;
        if !self.pending_removal.is_empty() {
            return Err(LedgerError::ConcurrentEdit {
                pending: self.pending_removal.len(),
            });
        }
        self.pending_addition = Some(BTreeSet::new());
        Ok(())
    }

    /// Flip a peer's selection in the open picker. Returns whether the peer
    /// is selected afterwards.
    pub fn toggle_addition(&mut self, peer: &str) -> Result<bool, LedgerError> {
        if self.is_applied(peer) {
            return Err(LedgerError::AlreadyApplied(peer.to_string()));
        }
        let selected = self
            .pending_addition
            .as_mut()
            .ok_or(LedgerError::PickerClosed)?;
        if selected.remove(peer) {
            Ok(false)
        } else {
            selected.insert(peer.to_string());
            Ok(true)
        }
    }

    /// Mark each candidate as applied or not, for the picker.
    #[must_use]
    pub fn mark_applied<P: Keyed>(&self, candidates: Vec<P>) -> Vec<PickerOption<P>> {
        candidates
            .into_iter()
            .map(|peer| {
                let applied = self.is_applied(peer.key());
                PickerOption { peer, applied }
            })
            .collect()
    }

    /// Close the picker, handing back the selection.
    pub fn close_picker(&mut self) -> BTreeSet<String> {
        self.pending_addition.take().unwrap_or_default()
    }

    /// `Idle | Failed → Loading(op)`.
    pub fn begin(&mut self, op: LedgerOp) -> Result<(), LedgerError> {
        self.ensure_not_loading()?;
        self.phase = LedgerPhase::Loading(op);
        Ok(())
    }

    /// `Loading → Idle` on success, `Loading → Failed` otherwise.
    pub fn finish(&mut self, failure: Option<String>) {
        self.phase = match failure {
            None => LedgerPhase::Idle,
            Some(message) => LedgerPhase::Failed(message),
        };
    }

    /// Drop staged removals after a removal batch settled. Peers whose
    /// removal failed show up again once the view is refetched.
    pub fn clear_removals(&mut self) {
        self.pending_removal.clear();
    }

    /// Discard every staged change.
    pub fn reset(&mut self) {
        self.pending_removal.clear();
        self.pending_addition = None;
        self.phase = LedgerPhase::Idle;
    }

    fn ensure_not_loading(&self) -> Result<(), LedgerError> {
        match self.phase {
            LedgerPhase::Loading(op) => Err(LedgerError::Busy(op.label())),
            _ => Ok(()),
        }
    }
}
