//! Outcome of a batch of concurrently issued calls.

/// Successes and failures of one batch, each tagged with the peer it
/// concerned, in submission order. Every member has settled by the time a
/// `BatchResult` exists; nothing is rolled back.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult<T, E> {
    pub succeeded: Vec<(String, T)>,
    pub failed: Vec<(String, E)>,
}

impl<T, E> Default for BatchResult<T, E> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T, E> BatchResult<T, E> {
    /// Partition settled outcomes.
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = (String, Result<T, E>)>) -> Self {
        let mut batch = Self::default();
        for (peer, outcome) in outcomes {
            match outcome {
                Ok(value) => batch.succeeded.push((peer, value)),
                Err(err) => batch.failed.push((peer, err)),
            }
        }
        batch
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.succeeded.is_empty() && self.failed.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    /// The failure reported to the user.
    #[must_use]
    pub fn first_failure(&self) -> Option<&(String, E)> {
        self.failed.first()
    }

    pub fn succeeded_peers(&self) -> impl Iterator<Item = &str> {
        self.succeeded.iter().map(|(peer, _)| peer.as_str())
    }

    pub fn failed_peers(&self) -> impl Iterator<Item = &str> {
        self.failed.iter().map(|(peer, _)| peer.as_str())
    }
}
