//! Tab/selection controller for an association view.
//!
//! The view is either `Closed` or `Open` with an ordered peer list and the
//! key of the active peer. The active key always names a peer in the list,
//! or is `None` when the list is empty.

use crate::domain::error::SelectionError;
use crate::domain::model::Keyed;

/// Recompute the active key after the peer list changed.
///
/// - the previous active peer is kept while it is still listed;
/// - otherwise the nearest peer that preceded it in `old` and survives in
///   `new` becomes active;
/// - otherwise the first peer of `new`;
/// - `None` when `new` is empty.
#[must_use]
pub fn next_active(old: &[String], old_active: Option<&str>, new: &[String]) -> Option<String> {
    let first = new.first()?;
    let Some(active) = old_active else {
        return Some(first.clone());
    };
    if new.iter().any(|k| k == active) {
        return Some(active.to_string());
    }
    let preceding = old
        .iter()
        .position(|k| k == active)
        .and_then(|i| old[..i].iter().rev().find(|k| new.contains(k)));
    Some(preceding.unwrap_or(first).clone())
}

/// State of the association view.
#[derive(Debug, Clone, PartialEq)]
pub enum TabState<P> {
    Closed,
    Open { peers: Vec<P>, active: Option<String> },
}

/// Tracks which peer is shown in a multi-peer view.
#[derive(Debug, Clone)]
pub struct TabController<P> {
    state: TabState<P>,
}

impl<P> Default for TabController<P> {
    fn default() -> Self {
        Self {
            state: TabState::Closed,
        }
    }
}

impl<P: Keyed> TabController<P> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &TabState<P> {
        &self.state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, TabState::Open { .. })
    }

    /// `Closed → Open` with a freshly fetched list; the first peer is active.
    pub fn open(&mut self, peers: Vec<P>) {
        let active = peers.first().map(|p| p.key().to_string());
        self.state = TabState::Open { peers, active };
    }

    /// Back to `Closed`, dropping the list.
    pub fn close(&mut self) {
        self.state = TabState::Closed;
    }

    #[must_use]
    pub fn peers(&self) -> &[P] {
        match &self.state {
            TabState::Open { peers, .. } => peers,
            TabState::Closed => &[],
        }
    }

    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.peers().iter().map(|p| p.key().to_string()).collect()
    }

    #[must_use]
    pub fn active(&self) -> Option<&str> {
        match &self.state {
            TabState::Open { active, .. } => active.as_deref(),
            TabState::Closed => None,
        }
    }

    #[must_use]
    pub fn active_peer(&self) -> Option<&P> {
        let active = self.active()?;
        self.peers().iter().find(|p| p.key() == active)
    }

    /// Show another listed peer.
    pub fn select(&mut self, key: &str) -> Result<(), SelectionError> {
        let TabState::Open { peers, active } = &mut self.state else {
            return Err(SelectionError::NotOpen);
        };
        if !peers.iter().any(|p| p.key() == key) {
            return Err(SelectionError::UnknownPeer(key.to_string()));
        }
        *active = Some(key.to_string());
        Ok(())
    }

    /// Drop one peer from the list and recompute the active key.
    pub fn remove(&mut self, key: &str) -> Result<P, SelectionError> {
        let TabState::Open { peers, active } = &mut self.state else {
            return Err(SelectionError::NotOpen);
        };
        let old: Vec<String> = peers.iter().map(|p| p.key().to_string()).collect();
        let index = peers
            .iter()
            .position(|p| p.key() == key)
            .ok_or_else(|| SelectionError::UnknownPeer(key.to_string()))?;
        let removed = peers.remove(index);
        let new: Vec<String> = peers.iter().map(|p| p.key().to_string()).collect();
        *active = next_active(&old, active.as_deref(), &new);
        Ok(removed)
    }

    /// Swap in a refetched list, keeping the selection where possible.
    pub fn replace(&mut self, fresh: Vec<P>) -> Result<(), SelectionError> {
        let TabState::Open { peers, active } = &mut self.state else {
            return Err(SelectionError::NotOpen);
        };
        let old: Vec<String> = peers.iter().map(|p| p.key().to_string()).collect();
        let new: Vec<String> = fresh.iter().map(|p| p.key().to_string()).collect();
        *active = next_active(&old, active.as_deref(), &new);
        *peers = fresh;
        Ok(())
    }
}
