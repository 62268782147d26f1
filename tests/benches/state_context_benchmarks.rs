//! # State Context Benchmarks
//!
//! | Operation | Target |
//! |-----------|--------|
//! | `apply_block` mid-epoch | < 10µs |
//! | `apply_block` at an epoch boundary | < 50µs |
//! | encode / decode a full window | < 20µs |

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qc_18_state_context::{StateContext, StateContextCodec, StateContextConfig};
use qc_tests::fixtures::{digest, extend_chain, next_block};
use shared_types::{VotingSettings, INPUT_COST, MAX_BLOCK_SIZE};

fn chain(blocks: usize, voting: &VotingSettings) -> StateContext {
    let votes = vec![[MAX_BLOCK_SIZE, 0, 0]; blocks];
    extend_chain(StateContext::empty(digest(1)), &votes, voting).expect("valid chain")
}

fn bench_apply_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18-apply-block");
    group.measurement_time(Duration::from_secs(5));

    let voting = VotingSettings::with_voting_length(1024);
    let ctx = chain(20, &voting);
    let block = next_block(&ctx, [MAX_BLOCK_SIZE, INPUT_COST, 0], &voting);
    group.bench_function("mid_epoch", |b| {
        b.iter(|| black_box(ctx.apply_block(black_box(&block), &voting)))
    });

    let voting = StateContextConfig::for_testing().voting;
    let ctx = chain(7, &voting);
    let block = next_block(&ctx, [MAX_BLOCK_SIZE, 0, 0], &voting);
    group.bench_function("epoch_boundary", |b| {
        b.iter(|| black_box(ctx.apply_block(black_box(&block), &voting)))
    });

    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18-codec");
    let voting = StateContextConfig::for_testing().voting;

    for blocks in [1usize, 5, 10, 50] {
        let ctx = chain(blocks, &voting);
        let bytes = StateContextCodec::encode(&ctx).expect("encodable");
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("encode", blocks), &ctx, |b, ctx| {
            b.iter(|| black_box(StateContextCodec::encode(ctx)))
        });
        group.bench_with_input(BenchmarkId::new("decode", blocks), &bytes, |b, bytes| {
            b.iter(|| black_box(StateContextCodec::decode(bytes)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_apply_block, bench_codec);
criterion_main!(benches);
