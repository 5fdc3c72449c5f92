/// The type of closure that the pool executes.
/// It must be `Send` and `'static`, take no arguments, and return nothing.
pub type TaskToExecute = Box<dyn FnOnce() + Send + 'static>;

/// Internal representation of a task queued in the pool.
pub(crate) struct QueuedTaskInternal {
  pub(crate) task_id: u64,
  pub(crate) work: TaskToExecute,
}
