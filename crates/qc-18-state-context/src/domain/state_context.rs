//! # State Context
//!
//! The consensus state a node carries from block to block. Values are
//! immutable: `apply_block` returns the next context and leaves the
//! receiver as it was, so readers holding the current context always see a
//! consistent snapshot while the next block is validated.

use shared_types::{
    AdDigest, FullBlock, Header, Parameters, VotingSettings, MAX_POW_SOLUTION_SIZE,
};
use tracing::{debug, warn};

use super::errors::{ConsensusError, ConsensusResult};
use super::vote_tally::VoteTally;
use crate::algorithms::process_extension;
use crate::config::StateContextConfig;

/// Number of most recent headers kept in the context.
pub const LAST_HEADERS_IN_CONTEXT: usize = 10;

/// Height of the first block applied to an empty context.
pub const GENESIS_HEIGHT: u32 = 1;

/// Consensus state context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateContext {
    /// Most recent headers, newest first, at most `LAST_HEADERS_IN_CONTEXT`.
    last_headers: Vec<Header>,
    /// State digest before the first block.
    genesis_state_digest: AdDigest,
    /// Parameters in force since the current epoch started.
    current_parameters: Parameters,
    /// Votes collected since the current epoch started.
    current_voting: VoteTally,
}

impl StateContext {
    /// Context of a node that has applied no blocks yet.
    pub fn empty(genesis_state_digest: AdDigest) -> Self {
        Self {
            last_headers: Vec::new(),
            genesis_state_digest,
            current_parameters: Parameters::default(),
            current_voting: VoteTally::empty(),
        }
    }

    /// Empty context for the network described by `config`.
    pub fn genesis(config: &StateContextConfig) -> Self {
        Self::empty(config.genesis_state_digest)
    }

    pub(crate) fn from_parts(
        last_headers: Vec<Header>,
        genesis_state_digest: AdDigest,
        current_parameters: Parameters,
        current_voting: VoteTally,
    ) -> Self {
        Self {
            last_headers,
            genesis_state_digest,
            current_parameters,
            current_voting,
        }
    }

    pub fn last_headers(&self) -> &[Header] {
        &self.last_headers
    }

    /// Most recent header, if any block was applied.
    pub fn last_header(&self) -> Option<&Header> {
        self.last_headers.first()
    }

    /// True once at least one block was applied.
    pub fn has_headers(&self) -> bool {
        !self.last_headers.is_empty()
    }

    pub fn genesis_state_digest(&self) -> AdDigest {
        self.genesis_state_digest
    }

    pub fn current_parameters(&self) -> &Parameters {
        &self.current_parameters
    }

    pub fn current_voting(&self) -> &VoteTally {
        &self.current_voting
    }

    /// Height of the most recent header, or 0 without headers.
    ///
    /// 0 is also the height of a window whose tip was restored at height 0,
    /// so use [`has_headers`](Self::has_headers) to detect an empty context.
    pub fn current_height(&self) -> u32 {
        self.last_header().map_or(0, |header| header.height)
    }

    /// State digest before the most recent block: the second-newest
    /// header's state root, or the genesis digest.
    pub fn previous_state_digest(&self) -> AdDigest {
        self.last_headers
            .get(1)
            .map_or(self.genesis_state_digest, |header| header.state_root)
    }

    /// Height the running soft-fork vote started at.
    pub fn soft_fork_voting_starting_height(&self) -> Option<u32> {
        self.current_parameters.soft_fork_starting_height()
    }

    /// Votes collected for the running soft fork.
    pub fn soft_fork_votes_collected(&self) -> Option<i32> {
        self.current_parameters.soft_fork_votes_collected()
    }

    /// Height the running soft fork activates at if approved.
    pub fn activation_height(&self, voting: &VotingSettings) -> Option<u32> {
        let starting = self.soft_fork_voting_starting_height()?;
        let epochs = voting.soft_fork_epochs.checked_add(voting.activation_epochs)?;
        starting.checked_add(voting.voting_length.checked_mul(epochs)?)
    }

    /// Apply the next block and return the resulting context.
    ///
    /// An empty context accepts only a block at `GENESIS_HEIGHT`; afterwards
    /// each block must sit exactly one above the tip.
    ///
    /// # Errors
    /// - `OutOfOrderBlock` if the block is not at the expected height
    /// - `PowSolutionTooLarge` if the header exceeds `MAX_POW_SOLUTION_SIZE`
    /// - any failure from vote or parameter processing
    pub fn apply_block(
        &self,
        block: &FullBlock,
        voting: &VotingSettings,
    ) -> ConsensusResult<StateContext> {
        let header = &block.header;
        self.check_extends_tip(header.height)?;
        if header.pow_solution.len() > MAX_POW_SOLUTION_SIZE {
            warn!(
                height = header.height,
                length = header.pow_solution.len(),
                "Rejected oversized PoW solution"
            );
            return Err(ConsensusError::PowSolutionTooLarge {
                length: header.pow_solution.len(),
                max: MAX_POW_SOLUTION_SIZE,
            });
        }

        let (current_parameters, current_voting) = process_extension(
            &block.extension,
            &header.votes,
            header.height,
            voting,
            &self.current_parameters,
            &self.current_voting,
        )?;

        let mut last_headers = Vec::with_capacity(LAST_HEADERS_IN_CONTEXT);
        last_headers.push(header.clone());
        last_headers.extend(
            self.last_headers
                .iter()
                .take(LAST_HEADERS_IN_CONTEXT - 1)
                .cloned(),
        );

        debug!(
            height = header.height,
            state_root = %header.state_root,
            tally_entries = current_voting.len(),
            "Block applied to state context"
        );

        Ok(StateContext {
            last_headers,
            genesis_state_digest: self.genesis_state_digest,
            current_parameters,
            current_voting,
        })
    }

    /// Height the next block must have, `None` once the tip is `u32::MAX`.
    fn expected_height(&self) -> Option<u32> {
        if self.has_headers() {
            self.current_height().checked_add(1)
        } else {
            Some(GENESIS_HEIGHT)
        }
    }

    fn check_extends_tip(&self, height: u32) -> ConsensusResult<()> {
        let next = self.expected_height();
        if next == Some(height) {
            return Ok(());
        }

        let expected = next.unwrap_or(u32::MAX);
        warn!(expected, actual = height, "Improper block applied");
        Err(ConsensusError::OutOfOrderBlock {
            expected,
            actual: height,
        })
    }
}
