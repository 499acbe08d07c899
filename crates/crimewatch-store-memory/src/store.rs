//! [`MemoryStore`] — the in-memory implementation of [`IncidentStore`].

use std::{
  collections::HashSet,
  sync::{Arc, PoisonError, RwLock},
};

use crimewatch_core::{incident::Incident, store::IncidentStore};

use crate::{Error, Result};

// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Inner {
  /// Copy-on-write: readers hold clones of this `Arc`.
  records: Arc<Vec<Incident>>,
  ids:     HashSet<String>,
}

/// An append-only incident store held in process memory.
///
/// Cloning is cheap — clones share the same underlying records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
  /// An empty store.
  pub fn new() -> Self { Self::default() }

  /// A store pre-populated with `records`, e.g. seed data.
  pub fn with_records(records: Vec<Incident>) -> Result<Self> {
    let store = Self::new();
    store.append_batch(records)?;
    Ok(store)
  }

  fn append_batch(&self, records: Vec<Incident>) -> Result<usize> {
    let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

    // Check the whole batch before touching anything.
    {
      let mut fresh: HashSet<&str> = HashSet::with_capacity(records.len());
      for record in &records {
        if inner.ids.contains(&record.id) || !fresh.insert(record.id.as_str()) {
          tracing::warn!(id = %record.id, "rejecting batch with duplicate id");
          return Err(Error::DuplicateId(record.id.clone()));
        }
      }
    }

    let appended = records.len();
    inner.ids.extend(records.iter().map(|r| r.id.clone()));
    Arc::make_mut(&mut inner.records).extend(records);
    let total = inner.records.len();

    tracing::debug!(appended, total, "appended incidents");
    Ok(total)
  }
}

impl IncidentStore for MemoryStore {
  type Error = Error;

  fn snapshot(&self) -> Arc<Vec<Incident>> {
    let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(&inner.records)
  }

  fn append(&self, records: Vec<Incident>) -> Result<usize> {
    self.append_batch(records)
  }

  fn len(&self) -> usize {
    self
      .inner
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .records
      .len()
  }
}
