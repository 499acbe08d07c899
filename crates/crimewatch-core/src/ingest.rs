//! The ingestion gate: validate externally supplied records and append them.
//!
//! A batch is all-or-nothing. The first invalid record rejects the whole batch
//! and nothing is appended. Timestamps are parsed here, so every stored
//! incident carries a valid `occurred_at` and read paths never meet a
//! malformed record.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
  Error, Invalid, Result,
  incident::{Incident, IncidentInput, Severity, Status, parse_timestamp},
  store::IncidentStore,
};

/// Outcome of a successful [`ingest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
  pub accepted_count: usize,
  /// Records held by the store after the append.
  pub total_records:  usize,
}

/// Convert one input into a stored [`Incident`].
pub fn validate(input: IncidentInput) -> Result<Incident, Invalid> {
  for (field, value) in [
    ("id", &input.id),
    ("crime_type", &input.category),
    ("state", &input.region),
    ("city", &input.locality),
  ] {
    if value.trim().is_empty() {
      return Err(Invalid::EmptyField(field));
    }
  }

  let severity: Severity = input
    .severity
    .parse()
    .map_err(|_| Invalid::UnknownSeverity(input.severity.clone()))?;
  let status: Status = input
    .status
    .parse()
    .map_err(|_| Invalid::UnknownStatus(input.status.clone()))?;
  let occurred_at = parse_timestamp(&input.occurred_at)
    .ok_or_else(|| Invalid::MalformedTimestamp(input.occurred_at.clone()))?;

  let subdivision = input
    .subdivision
    .filter(|d| !d.trim().is_empty())
    .unwrap_or_else(|| format!("{} District", input.locality));

  Ok(Incident {
    id: input.id,
    category: input.category,
    region: input.region,
    locality: input.locality,
    subdivision,
    occurred_at,
    latitude: input.latitude,
    longitude: input.longitude,
    severity,
    victim_age: input.victim_age,
    victim_gender: input.victim_gender,
    status,
  })
}

/// Validate every record in `batch`, then append them all to `store`.
///
/// Ids must be unique within the batch and must not already be stored. The
/// store re-checks uniqueness under its write lock, so a concurrent ingest of
/// the same id surfaces as [`Error::Store`].
pub fn ingest<S>(store: &S, batch: Vec<IncidentInput>) -> Result<IngestReport>
where
  S: IncidentStore + ?Sized,
{
  let incidents = {
    // The snapshot must be released before appending, or the store would
    // have to copy its records to keep this reader's view intact.
    let existing = store.snapshot();
    let stored_ids: HashSet<&str> =
      existing.iter().map(|i| i.id.as_str()).collect();
    let mut batch_ids: HashSet<String> = HashSet::with_capacity(batch.len());

    let mut incidents = Vec::with_capacity(batch.len());
    for (index, input) in batch.into_iter().enumerate() {
      let incident =
        validate(input).map_err(|reason| Error::Validation { index, reason })?;
      if stored_ids.contains(incident.id.as_str())
        || !batch_ids.insert(incident.id.clone())
      {
        return Err(Error::Validation {
          index,
          reason: Invalid::DuplicateId(incident.id),
        });
      }
      incidents.push(incident);
    }
    incidents
  };

  let accepted_count = incidents.len();
  let total_records = store
    .append(incidents)
    .map_err(|e| Error::Store(Box::new(e)))?;

  Ok(IngestReport {
    accepted_count,
    total_records,
  })
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use super::*;

  /// Minimal store used to exercise the gate in isolation.
  #[derive(Default)]
  struct VecStore(Mutex<Arc<Vec<Incident>>>);

  #[derive(Debug, thiserror::Error)]
  #[error("unreachable")]
  struct Never;

  impl IncidentStore for VecStore {
    type Error = Never;

    fn snapshot(&self) -> Arc<Vec<Incident>> { self.0.lock().unwrap().clone() }

    fn append(&self, records: Vec<Incident>) -> Result<usize, Never> {
      let mut guard = self.0.lock().unwrap();
      Arc::make_mut(&mut guard).extend(records);
      Ok(guard.len())
    }
  }

  fn input(id: &str) -> IncidentInput {
    IncidentInput {
      id:            id.into(),
      category:      "Theft".into(),
      region:        "Kerala".into(),
      locality:      "Kochi".into(),
      subdivision:   None,
      occurred_at:   "2024-02-03T04:05:06".into(),
      latitude:      9.9,
      longitude:     76.2,
      severity:      "low".into(),
      victim_age:    Some(40),
      victim_gender: None,
      status:        "closed".into(),
    }
  }

  #[test]
  fn valid_batch_grows_store_by_its_length() {
    let store = VecStore::default();
    let first = ingest(&store, vec![input("a"), input("b")]).unwrap();
    assert_eq!(first, IngestReport {
      accepted_count: 2,
      total_records:  2,
    });

    let second = ingest(&store, vec![input("c")]).unwrap();
    assert_eq!(second.total_records, first.total_records + 1);
    assert_eq!(store.len(), 3);
  }

  #[test]
  fn empty_batch_is_a_no_op() {
    let store = VecStore::default();
    let report = ingest(&store, Vec::new()).unwrap();
    assert_eq!(report.accepted_count, 0);
    assert_eq!(report.total_records, 0);
  }

  #[test]
  fn subdivision_defaults_from_city() {
    let incident = validate(input("a")).unwrap();
    assert_eq!(incident.subdivision, "Kochi District");
    assert_eq!(incident.severity, Severity::Low);
    assert_eq!(incident.status, Status::Closed);
  }

  #[test]
  fn stored_incident_converts_back_to_equivalent_input() {
    let stored = validate(input("a")).unwrap();
    let again = validate(IncidentInput::from(&stored)).unwrap();
    assert_eq!(again, stored);
  }

  #[test]
  fn one_bad_record_rejects_the_whole_batch() {
    let store = VecStore::default();
    let mut bad = input("b");
    bad.occurred_at = "not-a-date".into();

    let err = ingest(&store, vec![input("a"), bad, input("c")]).unwrap_err();
    assert!(matches!(
      err,
      Error::Validation {
        index:  1,
        reason: Invalid::MalformedTimestamp(_),
      }
    ));
    assert!(store.is_empty());
  }

  #[test]
  fn enum_and_required_fields_are_checked() {
    let mut severity = input("a");
    severity.severity = "critical".into();
    assert_eq!(
      validate(severity).unwrap_err(),
      Invalid::UnknownSeverity("critical".into())
    );

    let mut status = input("a");
    status.status = "Resolved".into();
    assert_eq!(
      validate(status).unwrap_err(),
      Invalid::UnknownStatus("Resolved".into())
    );

    let mut region = input("a");
    region.region = "  ".into();
    assert_eq!(validate(region).unwrap_err(), Invalid::EmptyField("state"));
  }

  #[test]
  fn duplicate_ids_are_rejected() {
    let store = VecStore::default();
    let err = ingest(&store, vec![input("a"), input("a")]).unwrap_err();
    assert!(matches!(err, Error::Validation { index: 1, .. }));

    ingest(&store, vec![input("a")]).unwrap();
    let err = ingest(&store, vec![input("a")]).unwrap_err();
    assert!(matches!(
      err,
      Error::Validation {
        reason: Invalid::DuplicateId(_),
        ..
      }
    ));
    assert_eq!(store.len(), 1);
  }
}
