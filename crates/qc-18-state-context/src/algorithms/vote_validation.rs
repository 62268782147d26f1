//! # Vote Validation
//!
//! Well-formedness rules for the votes carried by a single header.

use std::collections::HashSet;

use shared_types::{is_votable, ParameterId, NO_PARAMETER, PARAM_VOTES_COUNT, SOFT_FORK};

use crate::domain::{ConsensusError, ConsensusResult};

/// Check a header's votes before they touch the tally.
///
/// # Checks
/// 1. At most `PARAM_VOTES_COUNT` votes besides the soft-fork vote
/// 2. No id twice, no id together with its negation
/// 3. At an epoch start, only votable ids
///
/// `NO_PARAMETER` placeholders are not votes and are skipped.
pub fn check_votes(votes: &[ParameterId], epoch_starts: bool) -> ConsensusResult<()> {
    let count = votes
        .iter()
        .filter(|&&id| id != NO_PARAMETER && id != SOFT_FORK)
        .count();
    if count > PARAM_VOTES_COUNT {
        return Err(ConsensusError::TooManyVotes {
            count,
            max: PARAM_VOTES_COUNT,
        });
    }

    let mut seen = HashSet::with_capacity(votes.len());
    for &id in votes.iter().filter(|&&id| id != NO_PARAMETER) {
        if seen.contains(&id) {
            return Err(ConsensusError::DoubleVote { id });
        }
        if seen.contains(&id.wrapping_neg()) {
            return Err(ConsensusError::ContradictoryVotes { id });
        }
        seen.insert(id);
    }

    // Mid-epoch votes can only add to ids opened at the epoch start, which
    // were checked here already.
    if epoch_starts {
        if let Some(&id) = votes
            .iter()
            .find(|&&id| id != NO_PARAMETER && !is_votable(id))
        {
            return Err(ConsensusError::UnrecognizedVote { id });
        }
    }

    Ok(())
}
