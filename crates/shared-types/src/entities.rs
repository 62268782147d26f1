//! # Core Chain Entities
//!
//! The block-level values the state context consumes.
//!
//! ## Clusters
//!
//! - **Digests**: `Hash`, `AdDigest`
//! - **Block sections**: `Header`, `Extension`, `FullBlock`

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};

use crate::bytes::{put_vlq, ByteReader};
use crate::errors::{DigestError, HeaderError};

// =============================================================================
// DIGESTS
// =============================================================================

/// A 32-byte hash.
pub type Hash = [u8; 32];

/// Size of an authenticated-dictionary state digest.
pub const AD_DIGEST_SIZE: usize = 33;

/// Authenticated state digest: 32 hash bytes plus a trailing tree-height
/// byte, 33 bytes total.
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdDigest(#[serde_as(as = "Bytes")] pub [u8; AD_DIGEST_SIZE]);

impl AdDigest {
    /// All-zero digest.
    pub const fn zero() -> Self {
        Self([0u8; AD_DIGEST_SIZE])
    }

    pub fn as_bytes(&self) -> &[u8; AD_DIGEST_SIZE] {
        &self.0
    }

    /// Parse a digest from 66 hex characters.
    pub fn from_hex(text: &str) -> Result<Self, DigestError> {
        let bytes = hex::decode(text).map_err(|e| DigestError::InvalidHex(e.to_string()))?;
        let actual = bytes.len();
        let array: [u8; AD_DIGEST_SIZE] =
            bytes
                .try_into()
                .map_err(|_| DigestError::InvalidLength {
                    expected: AD_DIGEST_SIZE,
                    actual,
                })?;
        Ok(Self(array))
    }
}

impl Default for AdDigest {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<[u8; AD_DIGEST_SIZE]> for AdDigest {
    fn from(bytes: [u8; AD_DIGEST_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for AdDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for AdDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AdDigest({})", hex::encode(self.0))
    }
}

// =============================================================================
// HEADER
// =============================================================================

/// Number of vote slots carried by every header.
pub const VOTES_PER_HEADER: usize = 3;

/// Upper bound on the PoW solution carried by a header.
pub const MAX_POW_SOLUTION_SIZE: usize = 1024;

/// Block header.
///
/// Serialized form (big-endian, self-delimiting):
///
/// ```text
/// version(1) | parent_id(32) | transactions_root(32) | state_root(33)
/// | timestamp(8) | extension_root(32) | n_bits(4) | height(4) | votes(3)
/// | pow_len(VLQ) | pow_solution(pow_len)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Block version.
    pub version: u8,
    /// Id of the parent header.
    pub parent_id: Hash,
    /// Merkle root of the block transactions.
    pub transactions_root: Hash,
    /// State digest after applying this block.
    pub state_root: AdDigest,
    /// Unix timestamp in milliseconds.
    pub timestamp: u64,
    /// Digest of the extension section.
    pub extension_root: Hash,
    /// Encoded difficulty target.
    pub n_bits: u32,
    /// Height of this block.
    pub height: u32,
    /// Parameter votes; zero marks an empty slot.
    pub votes: [i8; VOTES_PER_HEADER],
    /// Opaque PoW solution bytes.
    pub pow_solution: Vec<u8>,
}

impl Header {
    /// Append the serialized header to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.push(self.version);
        out.extend_from_slice(&self.parent_id);
        out.extend_from_slice(&self.transactions_root);
        out.extend_from_slice(self.state_root.as_bytes());
        out.extend_from_slice(&self.timestamp.to_be_bytes());
        out.extend_from_slice(&self.extension_root);
        out.extend_from_slice(&self.n_bits.to_be_bytes());
        out.extend_from_slice(&self.height.to_be_bytes());
        for vote in self.votes {
            out.extend_from_slice(&vote.to_be_bytes());
        }
        put_vlq(out, self.pow_solution.len() as u64);
        out.extend_from_slice(&self.pow_solution);
    }

    /// Serialize the header.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(152 + self.pow_solution.len());
        self.write_to(&mut out);
        out
    }

    /// Parse exactly one header record, leaving the reader after it.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, HeaderError> {
        let version = reader.read_u8()?;
        let parent_id = reader.read_array()?;
        let transactions_root = reader.read_array()?;
        let state_root = AdDigest(reader.read_array()?);
        let timestamp = reader.read_u64()?;
        let extension_root = reader.read_array()?;
        let n_bits = reader.read_u32()?;
        let height = reader.read_u32()?;
        let mut votes = [0i8; VOTES_PER_HEADER];
        for vote in votes.iter_mut() {
            *vote = reader.read_i8()?;
        }

        let pow_len = reader.read_vlq()?;
        let pow_len = usize::try_from(pow_len)
            .ok()
            .filter(|len| *len <= MAX_POW_SOLUTION_SIZE)
            .ok_or(HeaderError::PowSolutionTooLarge {
                length: pow_len,
                max: MAX_POW_SOLUTION_SIZE,
            })?;
        let pow_solution = reader.take(pow_len)?.to_vec();

        Ok(Self {
            version,
            parent_id,
            transactions_root,
            state_root,
            timestamp,
            extension_root,
            n_bits,
            height,
            votes,
            pow_solution,
        })
    }

    /// Parse a header from a standalone buffer. Trailing bytes are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HeaderError> {
        Self::read_from(&mut ByteReader::new(bytes))
    }
}

// =============================================================================
// EXTENSION & FULL BLOCK
// =============================================================================

/// Key prefix of mandatory fields that declare system parameters.
pub const SYSTEM_PARAMETERS_PREFIX: u8 = 0x00;

/// Key length of a mandatory extension field.
pub const MANDATORY_FIELD_KEY_SIZE: usize = 2;

/// Key length of an optional extension field.
pub const OPTIONAL_FIELD_KEY_SIZE: usize = 32;

/// Key/value section attached to every block. Carries protocol metadata
/// such as declared system parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    /// Consensus-relevant fields with 2-byte keys.
    pub mandatory_fields: Vec<([u8; MANDATORY_FIELD_KEY_SIZE], Vec<u8>)>,
    /// Free-form fields with 32-byte keys.
    pub optional_fields: Vec<([u8; OPTIONAL_FIELD_KEY_SIZE], Vec<u8>)>,
}

impl Extension {
    /// Extension with no fields.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Extension carrying only the given mandatory fields.
    pub fn with_mandatory_fields(fields: Vec<([u8; MANDATORY_FIELD_KEY_SIZE], Vec<u8>)>) -> Self {
        Self {
            mandatory_fields: fields,
            optional_fields: Vec::new(),
        }
    }

    /// Mandatory fields under the system-parameters prefix, as
    /// `(parameter id byte, raw value)`.
    pub fn system_parameter_fields(&self) -> impl Iterator<Item = (u8, &[u8])> + '_ {
        self.mandatory_fields
            .iter()
            .filter(|(key, _)| key[0] == SYSTEM_PARAMETERS_PREFIX)
            .map(|(key, value)| (key[1], value.as_slice()))
    }
}

/// A block as seen by the state context: header plus extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullBlock {
    pub header: Header,
    pub extension: Extension,
}

impl FullBlock {
    pub fn new(header: Header, extension: Extension) -> Self {
        Self { header, extension }
    }
}
