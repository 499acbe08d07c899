//! Error type for `crimewatch-store-memory`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The id is already stored, or appears twice in the batch. The batch was
  /// not applied.
  #[error("incident id already exists: {0}")]
  DuplicateId(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
