//! # State Context Configuration
//!
//! Network-level settings a node needs to build and advance its state
//! context.

use std::env;

use serde::{Deserialize, Serialize};
use shared_types::{AdDigest, VotingSettings};
use thiserror::Error;
use tracing::warn;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Epochs must contain at least one block.
    #[error("Voting length must be positive")]
    ZeroVotingLength,
}

/// State context configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateContextConfig {
    /// Voting epoch and soft-fork timing.
    pub voting: VotingSettings,

    /// State digest before the first block.
    pub genesis_state_digest: AdDigest,
}

impl Default for StateContextConfig {
    fn default() -> Self {
        Self {
            voting: VotingSettings::default(),
            genesis_state_digest: AdDigest::zero(),
        }
    }
}

impl StateContextConfig {
    /// Create a config for testing (short epochs).
    pub fn for_testing() -> Self {
        Self {
            voting: VotingSettings {
                voting_length: 4,
                soft_fork_epochs: 2,
                activation_epochs: 2,
            },
            genesis_state_digest: AdDigest::zero(),
        }
    }

    /// Read overrides from `QC_VOTING_LENGTH`, `QC_SOFT_FORK_EPOCHS`,
    /// `QC_ACTIVATION_EPOCHS` and `QC_GENESIS_STATE_DIGEST`. Missing or
    /// unparsable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let number = |key: &str, default: u32| {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };

        let genesis_state_digest = match lookup("QC_GENESIS_STATE_DIGEST") {
            Some(text) => AdDigest::from_hex(text.trim()).unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring QC_GENESIS_STATE_DIGEST");
                defaults.genesis_state_digest
            }),
            None => defaults.genesis_state_digest,
        };

        Self {
            voting: VotingSettings {
                voting_length: number("QC_VOTING_LENGTH", defaults.voting.voting_length),
                soft_fork_epochs: number("QC_SOFT_FORK_EPOCHS", defaults.voting.soft_fork_epochs),
                activation_epochs: number(
                    "QC_ACTIVATION_EPOCHS",
                    defaults.voting.activation_epochs,
                ),
            },
            genesis_state_digest,
        }
    }

    /// Check the settings can drive epoch processing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.voting.voting_length == 0 {
            return Err(ConfigError::ZeroVotingLength);
        }
        Ok(())
    }
}
