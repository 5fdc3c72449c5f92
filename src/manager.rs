use crate::error::PoolError;
use crate::task::{QueuedTaskInternal, TaskToExecute};
use crate::task_queue::TaskQueue;

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use tracing::{debug, error, info, trace, warn};

lazy_static::lazy_static! {
  static ref NEXT_POOL_TASK_ID_COUNTER: AtomicU64 = AtomicU64::new(0);
}

/// A fixed-size pool of worker threads executing queued closures.
///
/// Tasks are submitted with [`push`](ThreadPoolManager::push) and picked up
/// by whichever worker becomes free; no ordering is guaranteed between tasks
/// running on different workers. [`join`](ThreadPoolManager::join) is the
/// terminal synchronization point: it stops intake, lets the workers drain
/// the queue, and blocks until every worker thread has exited. The pool is
/// single-use and cannot be restarted after `join`.
pub struct ThreadPoolManager {
  pool_name: Arc<String>,
  worker_count: usize,
  task_queue: Arc<TaskQueue>,
  worker_join_handles_internal: Mutex<Vec<JoinHandle<()>>>,
}

impl ThreadPoolManager {
  /// Creates a pool with `worker_count` worker threads.
  ///
  /// A requested count of zero is clamped to one worker rather than treated
  /// as an error.
  pub fn new(worker_count: usize, pool_name: &str) -> Self {
    let worker_count = worker_count.max(1);
    let pool_name_arc = Arc::new(pool_name.to_string());
    let task_queue = Arc::new(TaskQueue::new());

    let mut worker_join_handles = Vec::with_capacity(worker_count);
    for worker_index in 0..worker_count {
      let worker_pool_name = pool_name_arc.clone();
      let worker_task_queue = task_queue.clone();

      let join_handle = thread::Builder::new()
        .name(format!("{}-worker-{}", pool_name, worker_index))
        .spawn(move || {
          Self::run_worker_loop(worker_pool_name, worker_index, worker_task_queue);
        })
        .expect("failed to spawn worker thread");
      worker_join_handles.push(join_handle);
    }

    info!(pool_name = %pool_name, worker_count, "Pool started.");

    Self {
      pool_name: pool_name_arc,
      worker_count,
      task_queue,
      worker_join_handles_internal: Mutex::new(worker_join_handles),
    }
  }

  /// Creates a pool with one worker per logical CPU on the host.
  pub fn with_default_workers(pool_name: &str) -> Self {
    Self::new(num_cpus::get(), pool_name)
  }

  pub fn name(&self) -> &str {
    &self.pool_name
  }

  /// Returns the number of worker threads actually spawned.
  pub fn thread_count(&self) -> usize {
    self.worker_count
  }

  /// Returns the current number of tasks in the pending queue.
  pub fn queued_task_count(&self) -> usize {
    self.task_queue.len()
  }

  /// Enqueues a task for execution by some worker, waking one if idle.
  ///
  /// Submission is fire-and-forget: the pool reports nothing back about the
  /// task's execution. Any result the task produces must travel through
  /// state captured by the closure itself, combined in a concurrency-safe
  /// way (an atomic counter, a mutex-guarded accumulator) since tasks on
  /// different workers complete in no particular order.
  ///
  /// # Errors
  /// Returns [`PoolError::PoolJoined`] if `join` has already begun.
  pub fn push(&self, task: TaskToExecute) -> Result<(), PoolError> {
    if self.task_queue.is_closed() {
      warn!(pool_name = %self.pool_name, "Push: Attempted to push task to a pool that is joining or has been joined.");
      return Err(PoolError::PoolJoined);
    }

    let task_id = NEXT_POOL_TASK_ID_COUNTER.fetch_add(1, AtomicOrdering::Relaxed);
    debug!(pool_name = %self.pool_name, %task_id, "Pushing task to queue.");

    // The closed flag may flip between the check above and this enqueue; the
    // queue re-checks it under its own lock, so a racing join still cannot
    // strand the task.
    self.task_queue.push(QueuedTaskInternal { task_id, work: task })
  }

  /// Stops intake, drains the queue, and blocks until every worker thread
  /// has exited.
  ///
  /// Every task pushed before this call is executed before it returns.
  /// Calling `join` again is a safe no-op; a second caller racing the first
  /// blocks until the workers are down and then returns.
  pub fn join(&self) {
    if !self.task_queue.is_closed() {
      info!(pool_name = %self.pool_name, "Initiating pool join: closing task queue and waking all workers.");
      self.task_queue.close();
    } else {
      trace!(pool_name = %self.pool_name, "Join already initiated by an earlier call or Drop.");
    }

    // The lock is held across the joins so that a concurrent join blocks
    // until the workers have exited instead of returning early.
    let mut worker_join_handles = self.worker_join_handles_internal.lock();
    if worker_join_handles.is_empty() {
      trace!(pool_name = %self.pool_name, "Worker threads already joined.");
      return;
    }

    info!(
      pool_name = %self.pool_name,
      "Waiting for {} worker threads to join.",
      worker_join_handles.len()
    );
    for join_handle in worker_join_handles.drain(..) {
      let thread_name = join_handle
        .thread()
        .name()
        .unwrap_or("<unnamed>")
        .to_string();
      match join_handle.join() {
        Ok(()) => trace!(pool_name = %self.pool_name, %thread_name, "Worker thread joined."),
        Err(_) => {
          error!(pool_name = %self.pool_name, %thread_name, "Worker thread panicked outside a task boundary.");
        }
      }
    }
    info!(pool_name = %self.pool_name, "Pool join completed.");
  }

  fn run_worker_loop(pool_name: Arc<String>, worker_index: usize, task_queue: Arc<TaskQueue>) {
    debug!(name = %*pool_name, worker_index, "Worker started.");

    while let Some(queued_task) = task_queue.pop_blocking() {
      let task_id = queued_task.task_id;
      trace!(name = %*pool_name, worker_index, %task_id, "Dequeued task. Executing.");

      // A panicking task must not take the worker thread down with it, or a
      // later join would block forever waiting for this worker's exit.
      match panic::catch_unwind(AssertUnwindSafe(queued_task.work)) {
        Ok(()) => {
          trace!(name = %*pool_name, worker_index, %task_id, "Task executed successfully.");
        }
        Err(_panic_payload) => {
          error!(name = %*pool_name, worker_index, %task_id, "Task panicked during execution.");
        }
      }
    }

    debug!(name = %*pool_name, worker_index, "Queue closed and drained. Worker terminating.");
  }
}

impl Drop for ThreadPoolManager {
  fn drop(&mut self) {
    if !self.task_queue.is_closed() {
      info!(
        pool_name = %*self.pool_name,
        "ThreadPoolManager instance dropped without explicit join. Joining implicitly."
      );
    }
    // join is idempotent and leaves no live threads behind.
    self.join();
  }
}
