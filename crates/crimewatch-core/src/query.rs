//! The filter engine: [`IncidentQuery`] and the linear-scan filters built on it.
//!
//! There are no indexes. Every query is a single pass over a store snapshot
//! that preserves insertion order.

use chrono::NaiveDateTime;

use crate::incident::Incident;

// ─── Query type ──────────────────────────────────────────────────────────────

/// Filter criteria. Every field is optional; unset (or empty-string) fields
/// impose no constraint and all set fields combine by logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentQuery {
  /// Case-insensitive substring of the state.
  pub region:          Option<String>,
  /// Case-insensitive substring of the city.
  pub locality:        Option<String>,
  /// Case-insensitive substring of the crime type.
  pub category:        Option<String>,
  /// Case-insensitive substring of the state OR the city.
  pub location:        Option<String>,
  /// Exact calendar year of `occurred_at`.
  pub year:            Option<i32>,
  /// Exact, case-sensitive severity name (`low`, `medium`, `high`).
  pub severity:        Option<String>,
  /// Exact, case-sensitive status name (`pending`, `resolved`, `closed`).
  pub status:          Option<String>,
  /// Inclusive lower bound on `occurred_at`.
  pub occurred_after:  Option<NaiveDateTime>,
  /// Inclusive upper bound on `occurred_at`.
  pub occurred_before: Option<NaiveDateTime>,
  /// Only used by [`list`].
  pub limit:           Option<usize>,
  /// Only used by [`list`].
  pub offset:          Option<usize>,
}

impl IncidentQuery {
  /// Criteria used by the trend and prediction paths.
  pub fn for_trend(location: Option<String>, category: Option<String>) -> Self {
    Self {
      location,
      category,
      ..Self::default()
    }
  }

  /// Whether `incident` satisfies every set criterion.
  pub fn matches(&self, incident: &Incident) -> bool {
    // Exact comparisons first; they are cheaper than case-folding.
    if let Some(year) = self.year
      && incident.year() != year
    {
      return false;
    }
    if let Some(severity) = set(&self.severity)
      && incident.severity.as_ref() != severity
    {
      return false;
    }
    if let Some(status) = set(&self.status)
      && incident.status.as_ref() != status
    {
      return false;
    }
    if let Some(after) = self.occurred_after
      && incident.occurred_at < after
    {
      return false;
    }
    if let Some(before) = self.occurred_before
      && incident.occurred_at > before
    {
      return false;
    }

    if let Some(region) = set(&self.region)
      && !contains_ci(&incident.region, region)
    {
      return false;
    }
    if let Some(locality) = set(&self.locality)
      && !contains_ci(&incident.locality, locality)
    {
      return false;
    }
    if let Some(category) = set(&self.category)
      && !contains_ci(&incident.category, category)
    {
      return false;
    }
    if let Some(location) = set(&self.location)
      && !contains_ci(&incident.region, location)
      && !contains_ci(&incident.locality, location)
    {
      return false;
    }
    true
  }
}

fn set(value: &Option<String>) -> Option<&str> {
  value.as_deref().filter(|v| !v.is_empty())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
  haystack.to_lowercase().contains(&needle.to_lowercase())
}

// ─── Filters ─────────────────────────────────────────────────────────────────

/// Lazily yield the records matching `query`, in input order.
pub fn filter<'a, I>(
  records: I,
  query: &'a IncidentQuery,
) -> impl Iterator<Item = &'a Incident> + 'a
where
  I: IntoIterator<Item = &'a Incident>,
  I::IntoIter: 'a,
{
  records.into_iter().filter(move |i| query.matches(i))
}

/// Filter, then apply `offset` and `limit`, returning owned records.
pub fn list(records: &[Incident], query: &IncidentQuery) -> Vec<Incident> {
  filter(records, query)
    .skip(query.offset.unwrap_or(0))
    .take(query.limit.unwrap_or(usize::MAX))
    .cloned()
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::incident::{Severity, Status, parse_timestamp};

  fn incident(
    id: &str,
    category: &str,
    region: &str,
    locality: &str,
    date: &str,
    severity: Severity,
  ) -> Incident {
    Incident {
      id: id.into(),
      category: category.into(),
      region: region.into(),
      locality: locality.into(),
      subdivision: format!("{locality} District"),
      occurred_at: parse_timestamp(date).unwrap(),
      latitude: 0.0,
      longitude: 0.0,
      severity,
      victim_age: None,
      victim_gender: None,
      status: Status::Pending,
    }
  }

  fn sample() -> Vec<Incident> {
    vec![
      incident("1", "Theft", "Maharashtra", "Mumbai", "2023-05-01", Severity::High),
      incident("2", "Vehicle Theft", "Gujarat", "Surat", "2024-01-10", Severity::Low),
      incident("3", "Fraud", "Maharashtra", "Pune", "2024-02-11", Severity::High),
      incident("4", "Murder", "Karnataka", "Bangalore", "2024-03-12", Severity::Medium),
      incident("5", "Theft", "Gujarat", "Ahmedabad", "2024-03-20", Severity::High),
    ]
  }

  fn ids<'a>(it: impl Iterator<Item = &'a Incident>) -> Vec<&'a str> {
    it.map(|i| i.id.as_str()).collect()
  }

  #[test]
  fn empty_query_matches_everything_in_order() {
    let records = sample();
    let q = IncidentQuery::default();
    assert_eq!(ids(filter(&records, &q)), ["1", "2", "3", "4", "5"]);
  }

  #[test]
  fn substring_match_is_case_insensitive() {
    let records = sample();
    let q = IncidentQuery {
      region: Some("RASH".into()),
      ..Default::default()
    };
    assert_eq!(ids(filter(&records, &q)), ["1", "3"]);

    let q = IncidentQuery {
      region: Some("xyz123".into()),
      ..Default::default()
    };
    assert_eq!(filter(&records, &q).count(), 0);

    let q = IncidentQuery {
      category: Some("theft".into()),
      ..Default::default()
    };
    assert_eq!(ids(filter(&records, &q)), ["1", "2", "5"]);
  }

  #[test]
  fn conjunction_equals_intersection_of_single_filters() {
    let records = sample();
    let region = IncidentQuery {
      region: Some("guj".into()),
      ..Default::default()
    };
    let category = IncidentQuery {
      category: Some("theft".into()),
      ..Default::default()
    };
    let year = IncidentQuery {
      year: Some(2024),
      ..Default::default()
    };
    let severity = IncidentQuery {
      severity: Some("high".into()),
      ..Default::default()
    };
    let combined = IncidentQuery {
      region: region.region.clone(),
      category: category.category.clone(),
      year: year.year,
      severity: severity.severity.clone(),
      ..Default::default()
    };

    let expected: Vec<&str> = records
      .iter()
      .filter(|i| {
        region.matches(i)
          && category.matches(i)
          && year.matches(i)
          && severity.matches(i)
      })
      .map(|i| i.id.as_str())
      .collect();
    assert_eq!(ids(filter(&records, &combined)), expected);
    assert_eq!(expected, ["5"]);
  }

  #[test]
  fn severity_is_exact_and_case_sensitive() {
    let records = sample();
    let q = IncidentQuery {
      severity: Some("High".into()),
      ..Default::default()
    };
    assert_eq!(filter(&records, &q).count(), 0);
  }

  #[test]
  fn location_matches_state_or_city() {
    let records = sample();
    let q = IncidentQuery::for_trend(Some("pune".into()), None);
    assert_eq!(ids(filter(&records, &q)), ["3"]);

    let q = IncidentQuery::for_trend(Some("gujarat".into()), Some("theft".into()));
    assert_eq!(ids(filter(&records, &q)), ["2", "5"]);
  }

  #[test]
  fn empty_strings_are_ignored() {
    let records = sample();
    let q = IncidentQuery {
      region: Some(String::new()),
      severity: Some(String::new()),
      ..Default::default()
    };
    assert_eq!(filter(&records, &q).count(), records.len());
  }

  #[test]
  fn date_window_is_inclusive() {
    let records = sample();
    let q = IncidentQuery {
      occurred_after: parse_timestamp("2024-02-11"),
      occurred_before: parse_timestamp("2024-03-12"),
      ..Default::default()
    };
    assert_eq!(ids(filter(&records, &q)), ["3", "4"]);
  }

  #[test]
  fn list_applies_offset_then_limit() {
    let records = sample();
    let q = IncidentQuery {
      offset: Some(1),
      limit: Some(2),
      ..Default::default()
    };
    let page = list(&records, &q);
    assert_eq!(ids(page.iter()), ["2", "3"]);
  }

  #[test]
  fn list_is_idempotent() {
    let records = sample();
    let q = IncidentQuery {
      category: Some("t".into()),
      limit: Some(3),
      ..Default::default()
    };
    assert_eq!(list(&records, &q), list(&records, &q));
  }
}
