//! Timed comparison of single-threaded and pooled integer summation over the
//! inclusive range [0, n], accumulated with a relaxed atomic add.
//!
//! Usage: `range_sum [workers] [n]` — `n` is capped so the total fits in u64.

use threads_orchestra::ThreadPoolManager;

use std::env;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::info;

// Largest n whose triangular sum still fits comfortably in u64.
const MAX_NUM: u64 = 6_000_000_000;

fn partial_sum(start: u64, end: u64) -> u64 {
  (start..end).sum()
}

/// Splits the inclusive range [0, n] into `blocks` contiguous half-open
/// ranges whose sizes differ by at most one, covering every value exactly
/// once.
fn partition(n: u64, blocks: u64) -> Vec<(u64, u64)> {
  let total = n + 1;
  let base = total / blocks;
  let remainder = total % blocks;
  let mut ranges = Vec::with_capacity(blocks as usize);
  let mut start = 0u64;
  for i in 0..blocks {
    let len = base + u64::from(i < remainder);
    ranges.push((start, start + len));
    start += len;
  }
  ranges
}

fn main() {
  tracing_subscriber::fmt()
    .with_max_level(tracing::Level::INFO)
    .with_target(false)
    .init();

  let args: Vec<String> = env::args().collect();
  let workers: usize = args.get(1).and_then(|a| a.parse().ok()).unwrap_or(8);
  let count_to: u64 = args
    .get(2)
    .and_then(|a| a.parse().ok())
    .filter(|requested| *requested <= MAX_NUM)
    .unwrap_or(MAX_NUM);

  info!("Time test of single-threaded and pooled summation");
  info!("Count to {}", count_to);

  // n(n+1) overflows u64 before the halving at the upper end of the range,
  // so the closed form is computed in u128.
  let expected = ((count_to as u128 * (count_to as u128 + 1)) / 2) as u64;

  // Single-threaded
  let start_time = Instant::now();
  let single_sum = partial_sum(0, count_to + 1);
  info!("Single-threaded:");
  info!("time={:.3}ms", start_time.elapsed().as_secs_f64() * 1000.0);
  info!("sum={}", single_sum);

  // Pooled
  info!("Pooled:");
  let sum = Arc::new(AtomicU64::new(0));
  let manager = ThreadPoolManager::new(workers, "range_sum_pool");
  info!("threads={}", manager.thread_count());

  let start_time = Instant::now();
  for (block_start, block_end) in partition(count_to, manager.thread_count() as u64) {
    let sum_clone = sum.clone();
    manager
      .push(Box::new(move || {
        let partial = partial_sum(block_start, block_end);
        sum_clone.fetch_add(partial, Ordering::Relaxed);
      }))
      .expect("pool rejected task before join");
  }

  manager.join();
  let pooled_sum = sum.load(Ordering::SeqCst);
  info!("time={:.3}ms", start_time.elapsed().as_secs_f64() * 1000.0);
  info!("sum={}", pooled_sum);

  if pooled_sum == expected && single_sum == expected {
    info!("Both totals match the closed form n(n+1)/2 = {}", expected);
  } else {
    info!("UNEXPECTED: totals diverge from the closed form {}", expected);
  }
}
