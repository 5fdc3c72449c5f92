use threads_orchestra::ThreadPoolManager;

use std::thread;
use std::time::Duration;

use tracing::info;

fn my_task_fn(id: usize, delay_ms: u64) {
  info!("Task {} starting, will sleep for {}ms", id, delay_ms);
  thread::sleep(Duration::from_millis(delay_ms));
  info!("Task {} finished successfully after {}ms", id, delay_ms);
}

fn main() {
  tracing_subscriber::fmt()
    .with_max_level(tracing::Level::DEBUG)
    .with_target(false) // Disable module paths for cleaner example output
    .init();

  info!("--- Basic Usage Example ---");

  let manager = ThreadPoolManager::new(2, "basic_pool");
  info!("Pool running {} worker threads.", manager.thread_count());

  for i in 0..5 {
    let task_id: usize = i;
    // Alternate sleep times for variety
    let sleep_duration: u64 = 500 + (i as u64 % 3 * 250);
    match manager.push(Box::new(move || my_task_fn(task_id, sleep_duration))) {
      Ok(()) => info!("Pushed task {}", task_id),
      Err(e) => tracing::error!("Failed to push task {}: {:?}", task_id, e),
    }
  }

  info!(
    "All tasks pushed ({} still queued). Joining pool...",
    manager.queued_task_count()
  );
  manager.join();
  info!("Pool join complete.");
  info!("--- Basic Usage Example End ---");
}
