//! # System Parameters
//!
//! The table of protocol parameters adjustable by on-chain voting, the
//! deterministic recomputation applied at each voting epoch boundary, and
//! the declarations of the table inside a block's extension section.
//!
//! ## Vote ids
//!
//! A vote byte names a parameter: a positive id asks for an increase, its
//! negation for a decrease. `NO_PARAMETER` marks an empty vote slot and
//! `SOFT_FORK` is a vote for the pending soft fork.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bytes::ByteReader;
use crate::entities::{Extension, MANDATORY_FIELD_KEY_SIZE, SYSTEM_PARAMETERS_PREFIX};
use crate::errors::ParametersError;
use crate::voting::VotingSettings;

/// Signed byte naming a parameter (or its negation).
pub type ParameterId = i8;

pub const NO_PARAMETER: ParameterId = 0;
pub const STORAGE_FEE_FACTOR: ParameterId = 1;
pub const MIN_VALUE_PER_BYTE: ParameterId = 2;
pub const MAX_BLOCK_SIZE: ParameterId = 3;
pub const MAX_BLOCK_COST: ParameterId = 4;
pub const TOKEN_ACCESS_COST: ParameterId = 5;
pub const INPUT_COST: ParameterId = 6;
pub const DATA_INPUT_COST: ParameterId = 7;
pub const OUTPUT_COST: ParameterId = 8;
pub const SOFT_FORK: ParameterId = 120;
pub const SOFT_FORK_VOTES_COLLECTED: ParameterId = 121;
pub const SOFT_FORK_STARTING_HEIGHT: ParameterId = 122;
pub const BLOCK_VERSION: ParameterId = 123;

/// Maximum number of parameter (non soft-fork) votes in one header.
pub const PARAM_VOTES_COUNT: usize = 2;

/// Serialized size of one `(id, value)` table entry.
const ENTRY_SIZE: usize = 5;

const DEFAULT_TABLE: [(ParameterId, i32); 9] = [
    (STORAGE_FEE_FACTOR, 1_250_000),
    (MIN_VALUE_PER_BYTE, 360),
    (MAX_BLOCK_SIZE, 512 * 1024),
    (MAX_BLOCK_COST, 1_000_000),
    (TOKEN_ACCESS_COST, 100),
    (INPUT_COST, 2_000),
    (DATA_INPUT_COST, 100),
    (OUTPUT_COST, 100),
    (BLOCK_VERSION, 1),
];

fn step_for(id: ParameterId, current: i32) -> i32 {
    match id {
        STORAGE_FEE_FACTOR => 25_000,
        MIN_VALUE_PER_BYTE => 10,
        _ => (current / 100).max(1),
    }
}

fn min_value(id: ParameterId) -> i32 {
    match id {
        MAX_BLOCK_SIZE | MAX_BLOCK_COST => 16 * 1024,
        _ => 0,
    }
}

fn max_value(id: ParameterId) -> i32 {
    match id {
        STORAGE_FEE_FACTOR => 2_500_000,
        MIN_VALUE_PER_BYTE => 10_000,
        _ => i32::MAX / 2,
    }
}

/// Absolute parameter id for ids adjustable by voting.
fn adjustable_target(id: ParameterId) -> Option<ParameterId> {
    let target = id.checked_abs()?;
    (STORAGE_FEE_FACTOR..=OUTPUT_COST)
        .contains(&target)
        .then_some(target)
}

/// True if `id` (or its negation) may be voted for.
pub fn is_votable(id: ParameterId) -> bool {
    adjustable_target(id).is_some() || id.checked_abs() == Some(SOFT_FORK)
}

/// Parameter table effective from a given height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    /// Height the table became effective at.
    pub height: u32,
    /// Parameter values, ordered by id.
    pub parameters_table: BTreeMap<ParameterId, i32>,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            height: 0,
            parameters_table: DEFAULT_TABLE.into_iter().collect(),
        }
    }
}

impl Parameters {
    pub fn new(height: u32, parameters_table: BTreeMap<ParameterId, i32>) -> Self {
        Self {
            height,
            parameters_table,
        }
    }

    pub fn get(&self, id: ParameterId) -> Option<i32> {
        self.parameters_table.get(&id).copied()
    }

    pub fn storage_fee_factor(&self) -> Option<i32> {
        self.get(STORAGE_FEE_FACTOR)
    }

    pub fn min_value_per_byte(&self) -> Option<i32> {
        self.get(MIN_VALUE_PER_BYTE)
    }

    pub fn max_block_size(&self) -> Option<i32> {
        self.get(MAX_BLOCK_SIZE)
    }

    pub fn max_block_cost(&self) -> Option<i32> {
        self.get(MAX_BLOCK_COST)
    }

    pub fn block_version(&self) -> Option<i32> {
        self.get(BLOCK_VERSION)
    }

    /// Height the current soft-fork vote started at, if one is running.
    pub fn soft_fork_starting_height(&self) -> Option<u32> {
        self.get(SOFT_FORK_STARTING_HEIGHT)
            .and_then(|h| u32::try_from(h).ok())
    }

    /// Votes collected so far for the running soft fork.
    pub fn soft_fork_votes_collected(&self) -> Option<i32> {
        self.get(SOFT_FORK_VOTES_COLLECTED)
    }

    /// Recompute the table for the epoch starting at `height` from the
    /// votes accumulated over the previous epoch.
    ///
    /// Each approved id moves its parameter one step up (positive id) or
    /// down (negative id) unless the value already sits at its bound.
    /// Soft-fork entries are carried unchanged.
    pub fn update(
        &self,
        height: u32,
        epoch_votes: &[(ParameterId, i32)],
        voting: &VotingSettings,
    ) -> Parameters {
        let mut table = self.parameters_table.clone();

        for &(id, count) in epoch_votes {
            let Some(target) = adjustable_target(id) else {
                continue;
            };
            if !voting.change_approved(count) {
                continue;
            }
            let Some(current) = self.get(target) else {
                continue;
            };

            let step = step_for(target, current);
            let updated = if id > 0 {
                if current < max_value(target) {
                    current.saturating_add(step)
                } else {
                    current
                }
            } else if current > min_value(target) {
                current.saturating_sub(step)
            } else {
                current
            };

            debug!(
                parameter = target,
                votes = count,
                from = current,
                to = updated,
                height,
                "Parameter change approved"
            );
            table.insert(target, updated);
        }

        Parameters::new(height, table)
    }

    /// Read the parameter table declared in a block's extension section.
    pub fn parse_extension(height: u32, extension: &Extension) -> Result<Parameters, ParametersError> {
        let mut table = BTreeMap::new();

        for (key, value) in extension.system_parameter_fields() {
            let id = key as ParameterId;
            let bytes: [u8; 4] = value
                .try_into()
                .map_err(|_| ParametersError::InvalidValueLength {
                    id,
                    length: value.len(),
                })?;
            if table.insert(id, i32::from_be_bytes(bytes)).is_some() {
                return Err(ParametersError::DuplicateParameter { id });
            }
        }

        if table.is_empty() {
            return Err(ParametersError::EmptyTable);
        }
        Ok(Parameters::new(height, table))
    }

    /// Mandatory extension fields declaring this table.
    pub fn to_extension_fields(&self) -> Vec<([u8; MANDATORY_FIELD_KEY_SIZE], Vec<u8>)> {
        self.parameters_table
            .iter()
            .map(|(&id, value)| {
                (
                    [SYSTEM_PARAMETERS_PREFIX, id as u8],
                    value.to_be_bytes().to_vec(),
                )
            })
            .collect()
    }

    /// Append the serialized table: `height(u32)` then `(id, value)` pairs
    /// in ascending id order. No count prefix; the table runs to the end
    /// of its buffer.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.height.to_be_bytes());
        for (&id, value) in &self.parameters_table {
            out.extend_from_slice(&id.to_be_bytes());
            out.extend_from_slice(&value.to_be_bytes());
        }
    }

    /// Size of the serialized table in bytes.
    pub fn encoded_len(&self) -> usize {
        4 + ENTRY_SIZE * self.parameters_table.len()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut out);
        out
    }

    /// Parse a table consuming everything left in `reader`.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Parameters, ParametersError> {
        let height = reader.read_u32()?;
        let mut table = BTreeMap::new();
        let mut previous: Option<ParameterId> = None;

        while reader.remaining() >= ENTRY_SIZE {
            let id = reader.read_i8()?;
            let value = reader.read_i32()?;
            if let Some(previous) = previous {
                if id <= previous {
                    return Err(ParametersError::UnorderedTable { previous, id });
                }
            }
            previous = Some(id);
            table.insert(id, value);
        }

        if !reader.is_empty() {
            return Err(ParametersError::TrailingBytes {
                count: reader.remaining(),
            });
        }
        Ok(Parameters::new(height, table))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Parameters, ParametersError> {
        Self::read_from(&mut ByteReader::new(bytes))
    }
}
