//! # Vote Tally
//!
//! Votes accumulated per parameter id since the start of the current
//! voting epoch.

use std::collections::HashSet;

use shared_types::{ParameterId, NO_PARAMETER};

/// Ordered `(parameter id, vote count)` pairs of the current epoch.
///
/// The id set is fixed when the epoch starts: it is seeded from the
/// boundary block's votes and later blocks can only add to those ids.
/// Construction drops placeholders, duplicates and contradictory ids, so a
/// tally never holds an id together with its negation and never exceeds
/// 128 entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteTally {
    epoch_votes: Vec<(ParameterId, i32)>,
}

impl VoteTally {
    /// Genesis tally.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Tally opening an epoch: one vote per distinct id, in vote order.
    pub fn seeded(votes: &[ParameterId]) -> Self {
        let mut seen = HashSet::new();
        let epoch_votes = votes
            .iter()
            .copied()
            .filter(|&id| {
                id != NO_PARAMETER && !seen.contains(&id.wrapping_neg()) && seen.insert(id)
            })
            .map(|id| (id, 1))
            .collect();
        Self { epoch_votes }
    }

    /// Rebuild a tally from stored pairs, rejecting the first entry that
    /// would break the tally's invariants.
    pub(crate) fn from_pairs(pairs: Vec<(ParameterId, i32)>) -> Result<Self, ParameterId> {
        let mut seen = HashSet::new();
        for &(id, _) in &pairs {
            if id == NO_PARAMETER || seen.contains(&id.wrapping_neg()) || !seen.insert(id) {
                return Err(id);
            }
        }
        Ok(Self { epoch_votes: pairs })
    }

    /// Copy of this tally with one more vote for `id`. Ids not opened at
    /// the epoch start are ignored.
    #[must_use]
    pub fn update(&self, id: ParameterId) -> Self {
        let epoch_votes = self
            .epoch_votes
            .iter()
            .map(|&(vote_id, count)| {
                if vote_id == id {
                    (vote_id, count.saturating_add(1))
                } else {
                    (vote_id, count)
                }
            })
            .collect();
        Self { epoch_votes }
    }

    pub fn votes_for(&self, id: ParameterId) -> Option<i32> {
        self.epoch_votes
            .iter()
            .find(|(vote_id, _)| *vote_id == id)
            .map(|(_, count)| *count)
    }

    pub fn epoch_votes(&self) -> &[(ParameterId, i32)] {
        &self.epoch_votes
    }

    pub fn len(&self) -> usize {
        self.epoch_votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epoch_votes.is_empty()
    }
}
