use threads_orchestra::ThreadPoolManager;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::info;

fn main() {
  tracing_subscriber::fmt()
    .with_max_level(tracing::Level::DEBUG)
    .with_target(false)
    .init();
  info!("--- Task Panic Example ---");

  let manager = ThreadPoolManager::new(1, "panic_pool");

  manager
    .push(Box::new(|| {
      info!("Panicking Task: Starting...");
      thread::sleep(Duration::from_millis(100));
      info!("Panicking Task: About to panic!");
      panic!("This task is designed to panic!");
    }))
    .expect("Failed to push panicking task");

  // With a single worker, this task only runs if the pool survived the
  // panic above.
  let survivor_ran = Arc::new(AtomicBool::new(false));
  let survivor_ran_clone = survivor_ran.clone();
  manager
    .push(Box::new(move || {
      info!("Follow-up Task: Running on the same worker.");
      survivor_ran_clone.store(true, Ordering::SeqCst);
    }))
    .expect("Failed to push follow-up task");

  info!("Tasks pushed. Joining pool...");
  manager.join();

  if survivor_ran.load(Ordering::SeqCst) {
    info!("Pool correctly survived the panicking task and kept executing.");
  } else {
    info!("UNEXPECTED: follow-up task did not run.");
  }
  info!("--- Task Panic Example End ---");
}
