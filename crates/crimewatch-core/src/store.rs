//! The `IncidentStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `crimewatch-store-memory`). The API layer depends on this abstraction, not
//! on any concrete backend.

use std::sync::Arc;

use crate::incident::Incident;

/// Abstraction over the record store.
///
/// The store is append-only: there is no update or removal. Readers receive an
/// immutable snapshot and must never observe a partially applied
/// [`append`](IncidentStore::append).
pub trait IncidentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All records in insertion order, as of the moment of the call.
  fn snapshot(&self) -> Arc<Vec<Incident>>;

  /// Append a batch atomically and return the total number of records held
  /// afterwards.
  ///
  /// Implementations must refuse the whole batch if any id is already stored
  /// or repeated within the batch.
  fn append(&self, records: Vec<Incident>) -> Result<usize, Self::Error>;

  /// Number of records currently held.
  fn len(&self) -> usize { self.snapshot().len() }

  fn is_empty(&self) -> bool { self.len() == 0 }
}
