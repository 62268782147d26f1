//! # Parameter Epoch Processing
//!
//! Folds a block's votes into the running tally, or at a voting-epoch
//! boundary closes the epoch: recomputes the parameter table from the
//! accumulated votes, checks it against the table the block declares, and
//! opens a fresh tally.

use std::collections::BTreeSet;

use shared_types::{Extension, ParameterId, Parameters, VotingSettings, NO_PARAMETER};
use tracing::{debug, trace, warn};

use super::vote_validation::check_votes;
use crate::domain::{ConsensusError, ConsensusResult, VoteTally};

/// Process the extension and votes of the block at `height`.
///
/// Returns the parameters and tally in force after the block.
///
/// # Errors
/// - `MandatoryFieldsInGenesis` if a height-0 block declares mandatory fields
/// - any `check_votes` failure
/// - `ParameterParseFailure` / `ParameterMismatch` at an epoch boundary
pub fn process_extension(
    extension: &Extension,
    header_votes: &[ParameterId],
    height: u32,
    voting: &VotingSettings,
    current_parameters: &Parameters,
    current_voting: &VoteTally,
) -> ConsensusResult<(Parameters, VoteTally)> {
    if height == 0 && !extension.mandatory_fields.is_empty() {
        return Err(ConsensusError::MandatoryFieldsInGenesis {
            count: extension.mandatory_fields.len(),
        });
    }

    let votes: Vec<ParameterId> = header_votes
        .iter()
        .copied()
        .filter(|&id| id != NO_PARAMETER)
        .collect();
    let epoch_starts = voting.is_epoch_start(height);

    check_votes(&votes, epoch_starts).inspect_err(|e| {
        warn!(height, ?votes, error = %e, "Rejected block votes");
    })?;

    if epoch_starts {
        let fresh_voting = VoteTally::seeded(&votes);
        let calculated = current_parameters.update(height, current_voting.epoch_votes(), voting);
        let declared = Parameters::parse_extension(height, extension)?;

        if let Some((id, calculated_value, declared_value)) = first_mismatch(&calculated, &declared) {
            warn!(
                height,
                parameter = id,
                calculated = ?calculated_value,
                declared = ?declared_value,
                "Declared parameters disagree with recomputed table"
            );
            return Err(ConsensusError::ParameterMismatch {
                id,
                calculated: calculated_value,
                declared: declared_value,
            });
        }

        debug!(
            height,
            parameters = calculated.parameters_table.len(),
            opened_votes = fresh_voting.len(),
            "Voting epoch started"
        );
        Ok((calculated, fresh_voting))
    } else {
        let folded = votes.iter().fold(current_voting.clone(), |tally, &id| {
            trace!(height, parameter = id, "Folding vote into tally");
            tally.update(id)
        });
        Ok((current_parameters.clone(), folded))
    }
}

/// First id, in ascending order, whose value differs between the tables
/// (including ids present in only one of them).
fn first_mismatch(
    calculated: &Parameters,
    declared: &Parameters,
) -> Option<(ParameterId, Option<i32>, Option<i32>)> {
    calculated
        .parameters_table
        .keys()
        .chain(declared.parameters_table.keys())
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .find_map(|id| {
            let calculated_value = calculated.get(id);
            let declared_value = declared.get(id);
            (calculated_value != declared_value).then_some((id, calculated_value, declared_value))
        })
}
