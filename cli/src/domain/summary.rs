//! Lazily fetched per-entity summaries and the listing merge.
//!
//! A summary holds the derived counts shown next to an entity in a listing:
//! the agent count of a group and the applied peers of either kind. Missing
//! values mean "not fetched yet" and are never rendered as zero.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::domain::model::{EntityKey, EntityKind, Keyed};

/// Derived values for one entity. `None` means not fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Agents matched by a group. Always `None` for configs.
    pub agent_count: Option<usize>,
    /// Names of the applied peers.
    pub peer_names: Option<Vec<String>>,
}

impl Summary {
    /// Whether every value this kind of entity needs is present.
    #[must_use]
    pub fn is_complete(&self, kind: EntityKind) -> bool {
        match kind {
            EntityKind::Group => self.agent_count.is_some() && self.peer_names.is_some(),
            EntityKind::Config => self.peer_names.is_some(),
        }
    }

    /// Overlay freshly fetched values, keeping the fields the fetch did not
    /// cover.
    pub fn absorb(&mut self, fetched: Summary) {
        if fetched.agent_count.is_some() {
            self.agent_count = fetched.agent_count;
        }
        if fetched.peer_names.is_some() {
            self.peer_names = fetched.peer_names;
        }
    }

    #[must_use]
    pub fn peer_cell(&self) -> CountCell {
        CountCell::from_names(self.peer_names.as_deref())
    }
}

/// How an applied-peer count is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountCell {
    NotFetched,
    /// Zero peers: shown as an invitation to add some.
    Empty,
    Counted { count: usize, names: Vec<String> },
}

impl CountCell {
    #[must_use]
    pub fn from_names(names: Option<&[String]>) -> Self {
        match names {
            None => CountCell::NotFetched,
            Some([]) => CountCell::Empty,
            Some(names) => CountCell::Counted {
                count: names.len(),
                names: names.to_vec(),
            },
        }
    }
}

impl fmt::Display for CountCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountCell::NotFetched => f.write_str("not fetched"),
            CountCell::Empty => f.write_str("+ add"),
            CountCell::Counted { count, names } => write!(f, "{count} [{}]", names.join(", ")),
        }
    }
}

/// One listing row: the entity as last fetched and its cached summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row<E> {
    #[serde(flatten)]
    pub entity: E,
    pub summary: Summary,
}

/// Rebuild listing rows from a fresh fetch.
///
/// Entity fields always come from `fetched`; only the summary of an entity
/// that is still listed is carried over from `previous`.
#[must_use]
pub fn merge<E: Keyed>(previous: &BTreeMap<String, Summary>, fetched: Vec<E>) -> Vec<Row<E>> {
    fetched
        .into_iter()
        .map(|entity| {
            let summary = previous.get(entity.key()).cloned().unwrap_or_default();
            Row { entity, summary }
        })
        .collect()
}

/// Summaries for both entity kinds, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct SummaryCache {
    groups: BTreeMap<String, Summary>,
    configs: BTreeMap<String, Summary>,
}

impl SummaryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn side(&self, kind: EntityKind) -> &BTreeMap<String, Summary> {
        match kind {
            EntityKind::Group => &self.groups,
            EntityKind::Config => &self.configs,
        }
    }

    fn side_mut(&mut self, kind: EntityKind) -> &mut BTreeMap<String, Summary> {
        match kind {
            EntityKind::Group => &mut self.groups,
            EntityKind::Config => &mut self.configs,
        }
    }

    #[must_use]
    pub fn get(&self, key: &EntityKey) -> Option<&Summary> {
        self.side(key.kind).get(&key.name)
    }

    /// A cached entry exists and holds every value its kind needs.
    #[must_use]
    pub fn is_fresh(&self, key: &EntityKey) -> bool {
        self.get(key).is_some_and(|s| s.is_complete(key.kind))
    }

    /// Merge fetched values into one entity's entry. Other entries are left
    /// untouched.
    pub fn store(&mut self, key: &EntityKey, fetched: Summary) {
        self.side_mut(key.kind)
            .entry(key.name.clone())
            .or_default()
            .absorb(fetched);
    }

    /// Forget an entry so the next non-forced refresh refetches it.
    pub fn invalidate(&mut self, key: &EntityKey) {
        self.side_mut(key.kind).remove(&key.name);
    }

    /// Merge a fresh listing with the cached summaries and drop entries for
    /// entities that are gone.
    pub fn refresh_listing<E: Keyed>(&mut self, kind: EntityKind, fetched: Vec<E>) -> Vec<Row<E>> {
        let rows = merge(self.side(kind), fetched);
        let side = self.side_mut(kind);
        side.retain(|name, _| rows.iter().any(|row| row.entity.key() == name));
        rows
    }
}
