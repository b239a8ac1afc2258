//! Host event dispatch benchmarks.
//!
//! Measures how long one host reply takes to resolve a batch of pending
//! requests, for growing batch sizes.
//!
//! Run with: cargo bench --bench dispatch
//! Results saved to: target/criterion/

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use frame_auth::transport::MemoryChannel;
use frame_auth::{FrameAuth, HostEvent, UserToken};

// ============================================================================
// Benchmark Parameters
// ============================================================================

const BATCH_SIZES: &[usize] = &[1, 16, 256];

// ============================================================================
// Benchmark: Token Batch Resolution
// ============================================================================

fn bench_token_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("token_batch");
    let reply = HostEvent::TokenCreated {
        token: None,
        user_token: Some(UserToken::new("bench-token")),
    }
    .to_message();

    for &size in BATCH_SIZES {
        group.bench_with_input(BenchmarkId::new("resolve", size), &size, |b, &size| {
            b.iter(|| {
                let (channel, host) = MemoryChannel::pair();
                let auth = FrameAuth::new(Arc::new(channel));

                for _ in 0..size {
                    auth.get_token_with_callback(&[], |reply| {
                        black_box(reply.is_ok());
                    });
                }

                host.deliver(black_box(&reply));
            });
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Grant Batch Resolution
// ============================================================================

fn bench_grant_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("grant_batch");
    let reply = HostEvent::GrantsResolved { has_grants: true }.to_message();

    for &size in BATCH_SIZES {
        group.bench_with_input(BenchmarkId::new("resolve", size), &size, |b, &size| {
            b.iter(|| {
                let (channel, host) = MemoryChannel::pair();
                let auth = FrameAuth::new(Arc::new(channel));

                for _ in 0..size {
                    auth.check_grant_with_callback(&[], |has_grants| {
                        black_box(has_grants);
                    });
                }

                host.deliver(black_box(&reply));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_token_batch, bench_grant_batch);
criterion_main!(benches);
