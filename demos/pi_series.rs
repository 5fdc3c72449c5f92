//! Timed comparison of single-threaded and pooled evaluation of the Leibniz
//! series for pi over the inclusive term range [0, n].
//!
//! Usage: `pi_series [workers] [n] [skip_single]` — pass `1` as the third
//! argument to skip the single-threaded baseline.

use threads_orchestra::ThreadPoolManager;

use std::env;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tracing::info;

/// Sum of the Leibniz terms for indices in `[start, end)`:
/// `(-1)^k / (2k + 1)` for each term index `k`.
fn partial_pi_series(start: u64, end: u64) -> f64 {
  let mut factor = if start % 2 == 0 { 1.0 } else { -1.0 };
  let mut partial = 0.0;
  for k in start..end {
    partial += factor / (2 * k + 1) as f64;
    factor = -factor;
  }
  partial
}

/// Splits the inclusive range [0, n] into `blocks` contiguous half-open
/// ranges whose sizes differ by at most one, covering every index exactly
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
  let workers: usize = args.get(1).and_then(|a| a.parse().ok()).unwrap_or(4);
  let n: u64 = args.get(2).and_then(|a| a.parse().ok()).unwrap_or(1_000_000_000);
  let skip_single = args.get(3).map(|a| a == "1").unwrap_or(false);

  info!("Time test of single-threaded and pooled pi-value solution");
  info!("n={}", n);

  if !skip_single {
    let start_time = Instant::now();
    let pi = 4.0 * partial_pi_series(0, n + 1);
    info!("Single-threaded:");
    info!("time={:.3}ms", start_time.elapsed().as_secs_f64() * 1000.0);
    info!("computed pi={:.15}", pi);
    info!("std    pi={:.15}", std::f64::consts::PI);
  } else {
    info!("Skip single-thread test!");
  }

  info!("Pooled:");
  let sum = Arc::new(Mutex::new(0.0f64));
  let manager = ThreadPoolManager::new(workers, "pi_series_pool");
  info!("threads={}", manager.thread_count());

  let start_time = Instant::now();
  for (block_start, block_end) in partition(n, manager.thread_count() as u64) {
    let sum_clone = sum.clone();
    manager
      .push(Box::new(move || {
        let partial = partial_pi_series(block_start, block_end);
        *sum_clone.lock() += partial;
      }))
      .expect("pool rejected task before join");
  }

  manager.join();
  let pi = 4.0 * *sum.lock();
  info!("time={:.3}ms", start_time.elapsed().as_secs_f64() * 1000.0);
  info!("computed pi={:.15}", pi);
  info!("std    pi={:.15}", std::f64::consts::PI);
}
