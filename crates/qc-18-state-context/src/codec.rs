//! # State Context Codec
//!
//! Fixed-layout binary form of a [`StateContext`], used by persistence and
//! by peers exchanging context snapshots.
//!
//! ```text
//! genesis_state_digest(33)
//! | headers_len(i32 BE) | headers(headers_len), most recent first
//! | tally_len(u8) | tally_len x (id(i8), votes(i32 BE))
//! | parameters (rest of the buffer)
//! ```

use shared_types::{
    AdDigest, ByteReader, Header, HeaderError, Parameters, ReadError, AD_DIGEST_SIZE,
};
use tracing::trace;

use crate::domain::{CodecError, CodecResult, StateContext, VoteTally, LAST_HEADERS_IN_CONTEXT};

/// Size of the headers section length prefix.
const HEADERS_LEN_SIZE: usize = 4;

/// Size of the tally entry count.
const TALLY_LEN_SIZE: usize = 1;

/// Size of one `(id, votes)` tally entry.
const TALLY_ENTRY_SIZE: usize = 5;

/// Serializer for [`StateContext`].
pub struct StateContextCodec;

impl StateContextCodec {
    /// Serialize a context.
    ///
    /// # Errors
    /// `HeadersTooLarge` if the headers section does not fit an `i32`.
    /// Contexts built by `empty`, `apply_block` or `decode` never hit it:
    /// their window holds at most `LAST_HEADERS_IN_CONTEXT` headers with
    /// PoW solutions capped at `MAX_POW_SOLUTION_SIZE`.
    pub fn encode(context: &StateContext) -> CodecResult<Vec<u8>> {
        let mut headers = Vec::new();
        for header in context.last_headers() {
            header.write_to(&mut headers);
        }
        let headers_len = i32::try_from(headers.len()).map_err(|_| CodecError::HeadersTooLarge {
            length: headers.len(),
        })?;

        let tally = context.current_voting().epoch_votes();
        let parameters = context.current_parameters();

        let mut out = Vec::with_capacity(
            AD_DIGEST_SIZE
                + HEADERS_LEN_SIZE
                + headers.len()
                + TALLY_LEN_SIZE
                + TALLY_ENTRY_SIZE * tally.len()
                + parameters.encoded_len(),
        );
        out.extend_from_slice(context.genesis_state_digest().as_bytes());
        out.extend_from_slice(&headers_len.to_be_bytes());
        out.extend_from_slice(&headers);
        // A tally holds at most 128 ids: no placeholder, no id with its negation.
        out.push(tally.len() as u8);
        for (id, votes) in tally {
            out.extend_from_slice(&id.to_be_bytes());
            out.extend_from_slice(&votes.to_be_bytes());
        }
        parameters.write_to(&mut out);

        Ok(out)
    }

    /// Parse a context, checking that the decoded window and tally satisfy
    /// the invariants `apply_block` maintains.
    pub fn decode(bytes: &[u8]) -> CodecResult<StateContext> {
        let mut reader = ByteReader::new(bytes);

        let genesis_state_digest = AdDigest(reader.read_array()?);

        let length = reader.read_i32()?;
        let section_len =
            usize::try_from(length).map_err(|_| CodecError::NegativeHeadersLength { length })?;
        let last_headers = decode_headers(reader.take(section_len)?)?;
        check_window(&last_headers)?;

        let tally_len = reader.read_u8()?;
        let mut pairs = Vec::with_capacity(usize::from(tally_len));
        for _ in 0..tally_len {
            pairs.push((reader.read_i8()?, reader.read_i32()?));
        }
        let current_voting =
            VoteTally::from_pairs(pairs).map_err(|id| CodecError::InvalidVoteTally { id })?;

        let current_parameters = Parameters::read_from(&mut reader)?;

        trace!(
            headers = last_headers.len(),
            tally_entries = current_voting.len(),
            parameters = current_parameters.parameters_table.len(),
            "Decoded state context"
        );

        Ok(StateContext::from_parts(
            last_headers,
            genesis_state_digest,
            current_parameters,
            current_voting,
        ))
    }
}

fn decode_headers(section: &[u8]) -> CodecResult<Vec<Header>> {
    let mut reader = ByteReader::new(section);
    let mut headers = Vec::new();

    while !reader.is_empty() {
        let index = headers.len();
        let header = Header::read_from(&mut reader).map_err(|source| match source {
            HeaderError::Read(ReadError::UnexpectedEnd { .. }) => CodecError::HeaderOverrun { index },
            source => CodecError::Header { index, source },
        })?;
        headers.push(header);
    }

    Ok(headers)
}

fn check_window(headers: &[Header]) -> CodecResult<()> {
    if headers.len() > LAST_HEADERS_IN_CONTEXT {
        return Err(CodecError::TooManyHeaders {
            count: headers.len(),
            max: LAST_HEADERS_IN_CONTEXT,
        });
    }

    for (index, pair) in headers.windows(2).enumerate() {
        let (newer, older) = (&pair[0], &pair[1]);
        if older.height.checked_add(1) != Some(newer.height) {
            return Err(CodecError::NonContiguousHeaders {
                index: index + 1,
                expected: newer.height.saturating_sub(1),
                actual: older.height,
            });
        }
    }

    Ok(())
}
