//! Benchmark harness using Criterion for latency measurement.
//!
//! Measures:
//! - Price index insert and search
//! - Sorted menu view
//! - Place + decide order round trip
//! - Mixed workload

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use food_palace::seed::default_menu;
use food_palace::{
    Catalog, Command, Decision, Engine, LineRequest, MenuEntry, PlaceOrder, PriceIndex,
};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;

fn random_price(rng: &mut ChaCha8Rng) -> Decimal {
    Decimal::new(rng.gen_range(1..10_000_000), 2)
}

/// Generate a random place order command against the house menu
fn random_order(rng: &mut ChaCha8Rng) -> Command {
    Command::PlaceOrder(PlaceOrder {
        table: rng.gen_range(1..50),
        lines: (0..rng.gen_range(1..4))
            .map(|_| LineRequest {
                item_id: rng.gen_range(1..4),
                quantity: rng.gen_range(1..5),
            })
            .collect(),
    })
}

/// Benchmark: Insert into an index of a given size
fn bench_index_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_insert");

    for size in [100, 10_000, 100_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut rng = ChaCha8Rng::seed_from_u64(0xDEADBEEF);
            let mut index = PriceIndex::with_capacity(size * 2);
            for _ in 0..size {
                index.insert(random_price(&mut rng), "warm");
            }

            b.iter(|| black_box(index.insert(random_price(&mut rng), "bench")))
        });
    }

    group.finish();
}

/// Benchmark: Exact-match search
fn bench_index_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_search");

    for size in [100, 10_000, 100_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut rng = ChaCha8Rng::seed_from_u64(0xCAFEBABE);
            let mut index = PriceIndex::with_capacity(size);
            let mut prices = Vec::with_capacity(size);
            for _ in 0..size {
                let price = random_price(&mut rng);
                index.insert(price, "dish");
                prices.push(price);
            }

            let mut i = 0usize;
            b.iter(|| {
                i = (i + 1) % prices.len();
                black_box(index.search(prices[i]))
            })
        });
    }

    group.finish();
}

/// Benchmark: Sorted menu view
fn bench_sorted_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("sorted_view");

    for size in [10, 100, 1_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            let catalog = Catalog::from_entries((0..size as u64).map(|id| MenuEntry {
                id,
                name: format!("dish{}", id),
                price: Decimal::new(rng.gen_range(1..100_000), 2),
            }));

            b.iter(|| black_box(catalog.sorted_view()))
        });
    }

    group.finish();
}

/// Benchmark: Place an order and decide it straight away
fn bench_order_round_trip(c: &mut Criterion) {
    let mut engine = Engine::with_menu(default_menu());
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    c.bench_function("order_round_trip", |b| {
        b.iter(|| {
            engine.process_command(random_order(&mut rng));
            black_box(engine.process_command(Command::ProcessNextOrder {
                decision: Decision::Accept,
            }))
        })
    });
}

/// Benchmark: Mixed workload (a busy evening)
fn bench_mixed_workload(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_workload");

    // 50% order, 40% decide, 10% search
    group.bench_function("50_order_40_decide_10_search", |b| {
        let mut engine = Engine::with_menu(default_menu());
        let mut rng = ChaCha8Rng::seed_from_u64(0xFEED);

        b.iter(|| {
            let roll = rng.gen_range(0..10);
            let cmd = match roll {
                0..=4 => random_order(&mut rng),
                5..=8 => Command::ProcessNextOrder {
                    decision: if rng.gen_bool(0.8) { Decision::Accept } else { Decision::Reject },
                },
                _ => Command::SearchByPrice {
                    price: Decimal::new(rng.gen_range(1..6) * 10_000, 2),
                },
            };
            black_box(engine.process_command(cmd))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_index_insert,
    bench_index_search,
    bench_sorted_view,
    bench_order_round_trip,
    bench_mixed_workload,
);
criterion_main!(benches);
