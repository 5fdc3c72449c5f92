use crate::error::PoolError;
use crate::task::QueuedTaskInternal;

use std::collections::VecDeque;
use std::fmt;

use parking_lot::{Condvar, Mutex};

/// Everything protected by the queue's single lock.
///
/// The `closed` flag lives inside the locked state on purpose: it is set
/// under the same lock that guards push and pop, so a worker that holds the
/// lock observes a consistent (tasks, closed) pair. Once set it is never
/// cleared; the queue cannot be reopened.
struct QueueState {
  tasks: VecDeque<QueuedTaskInternal>,
  closed: bool,
}

/// An unbounded, multi-producer/multi-consumer FIFO queue of pending tasks,
/// guarded by one mutex and one condition variable.
///
/// Producers enqueue with [`push`](TaskQueue::push) and wake one waiter.
/// Consumers block in [`pop_blocking`](TaskQueue::pop_blocking) until a task
/// is available or the queue is closed *and* drained. Closing broadcasts to
/// every waiter so that all idle consumers re-check the exit condition, not
/// just one.
pub(crate) struct TaskQueue {
  state: Mutex<QueueState>,
  task_available: Condvar,
}

impl fmt::Debug for TaskQueue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let state = self.state.lock();
    f.debug_struct("TaskQueue")
      .field("len", &state.tasks.len())
      .field("closed", &state.closed)
      .finish()
  }
}

impl TaskQueue {
  pub(crate) fn new() -> Self {
    Self {
      state: Mutex::new(QueueState {
        tasks: VecDeque::new(),
        closed: false,
      }),
      task_available: Condvar::new(),
    }
  }

  /// Enqueues a task at the tail and wakes one blocked consumer.
  ///
  /// Fails with [`PoolError::PoolJoined`] if the queue has been closed.
  pub(crate) fn push(&self, task: QueuedTaskInternal) -> Result<(), PoolError> {
    let mut state = self.state.lock();
    if state.closed {
      return Err(PoolError::PoolJoined);
    }
    state.tasks.push_back(task);
    drop(state);
    self.task_available.notify_one();
    Ok(())
  }

  /// Blocks until a task can be dequeued, returning `None` once the queue is
  /// closed and every remaining task has been handed out.
  ///
  /// The wait predicate is re-checked after every wake-up, so spurious wakes
  /// and notify races are harmless. Tasks still queued at close time are
  /// drained before `None` is reported.
  pub(crate) fn pop_blocking(&self) -> Option<QueuedTaskInternal> {
    let mut state = self.state.lock();
    loop {
      if let Some(task) = state.tasks.pop_front() {
        return Some(task);
      }
      if state.closed {
        return None;
      }
      self.task_available.wait(&mut state);
    }
  }

  /// Closes the queue and wakes every blocked consumer.
  ///
  /// Idempotent. Pending tasks are not discarded; consumers keep draining
  /// them until the queue is empty.
  pub(crate) fn close(&self) {
    let mut state = self.state.lock();
    state.closed = true;
    drop(state);
    self.task_available.notify_all();
  }

  /// Returns `true` once [`close`](TaskQueue::close) has been called.
  pub(crate) fn is_closed(&self) -> bool {
    self.state.lock().closed
  }

  /// Returns the number of tasks currently waiting to be dequeued.
  pub(crate) fn len(&self) -> usize {
    self.state.lock().tasks.len()
  }
}
