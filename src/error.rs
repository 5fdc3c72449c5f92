use thiserror::Error;

/// Errors that can occur within the `threads_orchestra` pool.
#[derive(Error, Debug, PartialEq)]
pub enum PoolError {
  #[error("Pool is joining or has already been joined, cannot accept new tasks")]
  PoolJoined,
}
