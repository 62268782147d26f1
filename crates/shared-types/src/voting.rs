//! # Voting Settings
//!
//! Chain-wide constants of the on-chain parameter voting scheme.

use serde::{Deserialize, Serialize};

/// Default voting epoch length in blocks.
pub const DEFAULT_VOTING_LENGTH: u32 = 1024;

/// Default number of epochs a soft-fork vote stays open.
pub const DEFAULT_SOFT_FORK_EPOCHS: u32 = 32;

/// Default number of epochs between an approved soft fork and activation.
pub const DEFAULT_ACTIVATION_EPOCHS: u32 = 32;

/// Voting configuration shared by every node of a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingSettings {
    /// Epoch length in blocks.
    pub voting_length: u32,
    /// Epochs a soft-fork vote is collected for.
    pub soft_fork_epochs: u32,
    /// Epochs between soft-fork approval and activation.
    pub activation_epochs: u32,
}

impl Default for VotingSettings {
    fn default() -> Self {
        Self {
            voting_length: DEFAULT_VOTING_LENGTH,
            soft_fork_epochs: DEFAULT_SOFT_FORK_EPOCHS,
            activation_epochs: DEFAULT_ACTIVATION_EPOCHS,
        }
    }
}

impl VotingSettings {
    /// Settings with the given epoch length and default soft-fork windows.
    pub fn with_voting_length(voting_length: u32) -> Self {
        Self {
            voting_length,
            ..Self::default()
        }
    }

    /// A parameter change passes with a strict majority of the epoch.
    pub fn change_approved(&self, votes: i32) -> bool {
        i64::from(votes) > i64::from(self.voting_length / 2)
    }

    /// True if `height` opens a new voting epoch. Height 0 never does, and
    /// neither does any height under a zero epoch length.
    pub fn is_epoch_start(&self, height: u32) -> bool {
        height > 0 && height.checked_rem(self.voting_length) == Some(0)
    }
}
