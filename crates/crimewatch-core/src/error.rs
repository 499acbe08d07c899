//! Error types for `crimewatch-core`.

use thiserror::Error;

/// Why a single ingested record was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Invalid {
  #[error("field `{0}` must not be empty")]
  EmptyField(&'static str),

  #[error("unknown severity {0:?}")]
  UnknownSeverity(String),

  #[error("unknown status {0:?}")]
  UnknownStatus(String),

  #[error("malformed timestamp {0:?}")]
  MalformedTimestamp(String),

  #[error("duplicate id {0:?}")]
  DuplicateId(String),
}

#[derive(Debug, Error)]
pub enum Error {
  /// An ingested batch was refused because one of its records is invalid.
  /// Nothing from the batch was stored.
  #[error("record {index} rejected: {reason}")]
  Validation { index: usize, reason: Invalid },

  #[error("no historical data found for the specified filters")]
  NoMatchingData,

  #[error(
    "insufficient data for prediction: {months} distinct month(s), need at \
     least 3"
  )]
  InsufficientData { months: usize },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// `true` for the two "cannot predict" outcomes, which callers surface as a
  /// structured result rather than a failure.
  pub fn is_unpredictable(&self) -> bool {
    matches!(self, Self::NoMatchingData | Self::InsufficientData { .. })
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
