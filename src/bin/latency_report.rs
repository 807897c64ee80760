use clap::Parser;
use food_palace::PriceIndex;
use hdrhistogram::Histogram;
use rust_decimal::Decimal;
use std::time::{Duration, Instant};

/// Latency distribution of price index insert and search
#[derive(Parser, Debug)]
#[command(name = "latency-report")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of distinct prices to insert
    #[arg(long, default_value_t = 200_000)]
    items: u64,

    /// Seed for the price shuffle
    #[arg(long, default_value_t = 12345)]
    seed: u64,
}

/// Distinct prices in a seeded pseudo-random order (multiplicative
/// permutation of 0..n, scaled to paise).
fn shuffled_prices(n: u64, seed: u64) -> Vec<Decimal> {
    // Odd multiplier is a bijection mod 2^k; values past n are skipped
    let modulus = n.next_power_of_two().max(2);
    let mult = (seed | 1).wrapping_mul(2654435761) | 1;
    (0..modulus)
        .map(|i| (i.wrapping_mul(mult).wrapping_add(seed)) & (modulus - 1))
        .filter(|&v| v < n)
        .map(|v| Decimal::new(i64::try_from(v).unwrap_or(i64::MAX), 2))
        .collect()
}

fn report(label: &str, histogram: &Histogram<u64>, total: Duration) {
    let ops = histogram.len();
    println!("\n=== {} Latency (ns) ===", label);
    println!("Total Ops:  {}", ops);
    println!("Throughput: {:.2} ops/sec", ops as f64 / total.as_secs_f64().max(f64::EPSILON));
    println!("---------------------------");
    println!("Min:    {:6} ns", histogram.min());
    println!("P50:    {:6} ns", histogram.value_at_quantile(0.50));
    println!("P90:    {:6} ns", histogram.value_at_quantile(0.90));
    println!("P99:    {:6} ns", histogram.value_at_quantile(0.99));
    println!("P99.9:  {:6} ns", histogram.value_at_quantile(0.999));
    println!("Max:    {:6} ns", histogram.max());
    println!("---------------------------");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    println!("Preparing Latency Benchmark...");

    let prices = shuffled_prices(args.items, args.seed);
    let mut index = PriceIndex::with_capacity(prices.len());

    let mut insert_hist = Histogram::<u64>::new_with_bounds(1, 1_000_000, 3)?;
    let mut search_hist = Histogram::<u64>::new_with_bounds(1, 1_000_000, 3)?;

    println!("Inserting {} prices...", prices.len());
    let mut insert_total = Duration::ZERO;
    for price in &prices {
        // Critical measurement section
        let start = Instant::now();
        std::hint::black_box(index.insert(*price, "dish"));
        let elapsed = start.elapsed();

        // Outliers past the upper bound are dropped
        insert_hist.record(elapsed.as_nanos() as u64).unwrap_or(());
        insert_total += elapsed;
    }

    println!("Searching...");
    let mut search_total = Duration::ZERO;
    for price in prices.iter().rev() {
        let start = Instant::now();
        std::hint::black_box(index.search(*price));
        let elapsed = start.elapsed();

        search_hist.record(elapsed.as_nanos() as u64).unwrap_or(());
        search_total += elapsed;
    }

    report("Insert", &insert_hist, insert_total);
    report("Search", &search_hist, search_total);

    println!("\nIndex: {} nodes, height {}", index.len(), index.height());
    index.check_invariants()?;
    println!("AVL invariants hold.");
    Ok(())
}
