//! Derivation throughput benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fairline::config::EngineConfig;
use fairline::games::{self, BetParams};
use fairline::rng::OutcomeStream;

fn bench_stream(c: &mut Criterion) {
    c.bench_function("hmac_stream_32_floats", |b| {
        let mut nonce = 0u64;
        b.iter(|| {
            nonce += 1;
            let mut stream = OutcomeStream::new("bench-server-seed", "bench-client-seed", nonce);
            let mut acc = 0.0;
            for _ in 0..32 {
                acc += stream.next_f64();
            }
            black_box(acc)
        })
    });
}

fn bench_games(c: &mut Criterion) {
    let config = EngineConfig::default();

    c.bench_function("dice_round", |b| {
        let mut nonce = 0u64;
        b.iter(|| {
            nonce += 1;
            let mut stream = OutcomeStream::new("bench-server-seed", "bench-client-seed", nonce);
            black_box(
                games::resolve_single(&BetParams::Dice { target: 50.0 }, &mut stream, &config)
                    .unwrap(),
            )
        })
    });

    c.bench_function("blackjack_shoe_shuffle", |b| {
        let mut nonce = 0u64;
        b.iter(|| {
            nonce += 1;
            let mut stream = OutcomeStream::new("bench-server-seed", "bench-client-seed", nonce);
            black_box(stream.shuffled_deck())
        })
    });
}

criterion_group!(benches, bench_stream, bench_games);
criterion_main!(benches);
