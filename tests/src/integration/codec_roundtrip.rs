//! # Codec Round-Trips
//!
//! Contexts produced by real block sequences survive encode/decode, and
//! decode never panics on arbitrary input.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use qc_18_state_context::{
        CodecError, ConsensusError, StateContext, StateContextCodec, StateContextConfig,
        LAST_HEADERS_IN_CONTEXT,
    };
    use shared_types::{
        AdDigest, Extension, FullBlock, ParameterId, AD_DIGEST_SIZE, MAX_POW_SOLUTION_SIZE,
        SOFT_FORK,
    };

    use crate::fixtures::{digest, extend_chain, header};

    /// Well-formed vote triples for any height.
    const VOTE_PATTERNS: [[ParameterId; 3]; 8] = [
        [0, 0, 0],
        [3, 0, 0],
        [-3, 0, 0],
        [1, 4, 0],
        [3, SOFT_FORK, 0],
        [-6, SOFT_FORK, 2],
        [0, 8, 0],
        [-1, -2, 0],
    ];

    fn chain_strategy() -> impl Strategy<Value = StateContext> {
        (
            prop::collection::vec(any::<u8>(), AD_DIGEST_SIZE),
            prop::collection::vec(prop::sample::select(VOTE_PATTERNS.to_vec()), 0..30),
        )
            .prop_map(|(genesis, votes)| {
                let genesis: [u8; AD_DIGEST_SIZE] = genesis.try_into().unwrap();
                let config = StateContextConfig {
                    genesis_state_digest: AdDigest(genesis),
                    ..StateContextConfig::for_testing()
                };
                extend_chain(StateContext::genesis(&config), &votes, &config.voting)
                    .expect("generated chains follow the voting rules")
            })
    }

    #[test]
    fn test_roundtrip_after_epochs() {
        let voting = StateContextConfig::for_testing().voting;
        let ctx = extend_chain(
            StateContext::empty(digest(0x42)),
            &[
                [0, 0, 0],
                [0, 0, 0],
                [0, 0, 0],
                [3, SOFT_FORK, 0],
                [3, 0, 0],
                [3, 0, 0],
                [3, 0, 0],
                [-6, 0, 0],
                [-6, 0, 0],
            ],
            &voting,
        )
        .unwrap();

        let bytes = StateContextCodec::encode(&ctx).unwrap();
        let decoded = StateContextCodec::decode(&bytes).unwrap();

        assert_eq!(decoded, ctx);
        assert_eq!(decoded.current_parameters().max_block_size(), Some(529_530));
        assert_eq!(decoded.current_voting().votes_for(-6), Some(2));
    }

    #[test]
    fn test_accepted_pow_solutions_survive_roundtrip() {
        let voting = StateContextConfig::for_testing().voting;
        let ctx = StateContext::empty(digest(5));

        let mut oversized = header(1, [0, 0, 0]);
        oversized.pow_solution = vec![7; 2000];
        assert_eq!(
            ctx.apply_block(&FullBlock::new(oversized, Extension::empty()), &voting),
            Err(ConsensusError::PowSolutionTooLarge {
                length: 2000,
                max: MAX_POW_SOLUTION_SIZE
            })
        );

        let mut largest = header(1, [0, 0, 0]);
        largest.pow_solution = vec![7; MAX_POW_SOLUTION_SIZE];
        let ctx = ctx
            .apply_block(&FullBlock::new(largest, Extension::empty()), &voting)
            .unwrap();
        let bytes = StateContextCodec::encode(&ctx).unwrap();
        assert_eq!(StateContextCodec::decode(&bytes).unwrap(), ctx);
    }

    #[test]
    fn test_decoded_context_keeps_validating() {
        let voting = StateContextConfig::for_testing().voting;
        let ctx = extend_chain(StateContext::empty(digest(7)), &[[0, 0, 0]; 6], &voting).unwrap();

        let restored = StateContextCodec::decode(&StateContextCodec::encode(&ctx).unwrap()).unwrap();
        let direct = extend_chain(ctx, &[[3, 0, 0]; 4], &voting).unwrap();
        let resumed = extend_chain(restored, &[[3, 0, 0]; 4], &voting).unwrap();

        assert_eq!(direct, resumed);
    }

    #[test]
    fn test_truncation_at_every_offset_is_an_error() {
        let voting = StateContextConfig::for_testing().voting;
        let ctx = extend_chain(StateContext::empty(digest(7)), &[[3, 0, 0]; 2], &voting).unwrap();
        let bytes = StateContextCodec::encode(&ctx).unwrap();

        // Cuts inside the parameter table can still parse as a shorter table.
        let parameters_start = bytes.len() - ctx.current_parameters().to_bytes().len();
        for cut in 0..parameters_start + 4 {
            assert!(
                StateContextCodec::decode(&bytes[..cut]).is_err(),
                "decode accepted a buffer cut at {cut}"
            );
        }
    }

    #[test]
    fn test_edited_header_section() {
        let voting = StateContextConfig::for_testing().voting;
        let ctx = extend_chain(StateContext::empty(digest(7)), &[[0, 0, 0]; 12], &voting).unwrap();
        let bytes = StateContextCodec::encode(&ctx).unwrap();

        // Drop the newest header: the window now starts one block lower but
        // the remaining headers are still contiguous.
        let newest = ctx.last_headers()[0].to_bytes().len();
        let headers_len = i32::from_be_bytes(
            bytes[AD_DIGEST_SIZE..AD_DIGEST_SIZE + 4].try_into().unwrap(),
        ) as usize;
        let mut trimmed = bytes[..AD_DIGEST_SIZE].to_vec();
        trimmed.extend_from_slice(&((headers_len - newest) as i32).to_be_bytes());
        trimmed.extend_from_slice(&bytes[AD_DIGEST_SIZE + 4 + newest..]);

        let decoded = StateContextCodec::decode(&trimmed).unwrap();
        assert_eq!(decoded.current_height(), 11);
        assert_eq!(decoded.last_headers().len(), LAST_HEADERS_IN_CONTEXT - 1);

        // Swapping in a header section with a gap is rejected.
        let mut gapped = bytes[..AD_DIGEST_SIZE].to_vec();
        let mut section = ctx.last_headers()[0].to_bytes();
        section.extend_from_slice(&ctx.last_headers()[2].to_bytes());
        gapped.extend_from_slice(&(section.len() as i32).to_be_bytes());
        gapped.extend_from_slice(&section);
        gapped.extend_from_slice(&bytes[AD_DIGEST_SIZE + 4 + headers_len..]);

        assert_eq!(
            StateContextCodec::decode(&gapped),
            Err(CodecError::NonContiguousHeaders {
                index: 1,
                expected: 11,
                actual: 10
            })
        );
    }

    proptest! {
        #[test]
        fn roundtrip_preserves_context(ctx in chain_strategy()) {
            let bytes = StateContextCodec::encode(&ctx).unwrap();
            let decoded = StateContextCodec::decode(&bytes).unwrap();
            prop_assert_eq!(&decoded, &ctx);
            prop_assert_eq!(StateContextCodec::encode(&decoded).unwrap(), bytes);
        }

        #[test]
        fn window_is_bounded_and_contiguous(ctx in chain_strategy()) {
            let headers = ctx.last_headers();
            prop_assert!(headers.len() <= LAST_HEADERS_IN_CONTEXT);
            for pair in headers.windows(2) {
                prop_assert_eq!(pair[0].height, pair[1].height + 1);
            }
        }

        #[test]
        fn decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
            let _ = StateContextCodec::decode(&bytes);
        }

        #[test]
        fn decode_never_panics_after_digest(
            tail in prop::collection::vec(any::<u8>(), 0..256)
        ) {
            let mut bytes = vec![0u8; AD_DIGEST_SIZE];
            bytes.extend_from_slice(&tail);
            let _ = StateContextCodec::decode(&bytes);
        }
    }
}
