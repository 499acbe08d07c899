//! Aggregations over a (possibly filtered) set of incidents.
//!
//! Grouping always goes through a [`BTreeMap`], so every output is sorted by
//! its grouping key and reproducible from run to run.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::incident::{Incident, Severity, Status};

// ─── Stats ───────────────────────────────────────────────────────────────────

/// Headline counts over the whole store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
  #[serde(rename = "total_crimes")]
  pub total:                   usize,
  #[serde(rename = "resolved_crimes")]
  pub resolved_count:          usize,
  #[serde(rename = "pending_crimes")]
  pub pending_count:           usize,
  #[serde(rename = "high_severity_crimes")]
  pub high_severity_count:     usize,
  #[serde(rename = "states_affected")]
  pub distinct_region_count:   usize,
  #[serde(rename = "crime_types")]
  pub distinct_category_count: usize,
}

/// Single-pass counts and distinct cardinalities.
pub fn stats<'a>(records: impl IntoIterator<Item = &'a Incident>) -> Stats {
  let mut out = Stats::default();
  let mut regions = BTreeSet::new();
  let mut categories = BTreeSet::new();

  for incident in records {
    out.total += 1;
    match incident.status {
      Status::Resolved => out.resolved_count += 1,
      Status::Pending => out.pending_count += 1,
      Status::Closed => {}
    }
    if incident.severity == Severity::High {
      out.high_severity_count += 1;
    }
    regions.insert(incident.region.as_str());
    categories.insert(incident.category.as_str());
  }

  out.distinct_region_count = regions.len();
  out.distinct_category_count = categories.len();
  out
}

// ─── Geo ─────────────────────────────────────────────────────────────────────

/// Per-state incident count and centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
  #[serde(rename = "state")]
  pub region:      String,
  pub crime_count: usize,
  /// Arithmetic mean of member latitudes.
  pub latitude:    f64,
  /// Arithmetic mean of member longitudes.
  pub longitude:   f64,
}

/// Group by state and average the coordinates; sorted by state name.
pub fn geo_aggregate<'a>(
  records: impl IntoIterator<Item = &'a Incident>,
) -> Vec<GeoPoint> {
  // region -> (count, lat sum, lng sum)
  let mut groups: BTreeMap<&str, (usize, f64, f64)> = BTreeMap::new();
  for incident in records {
    let entry = groups.entry(incident.region.as_str()).or_default();
    entry.0 += 1;
    entry.1 += incident.latitude;
    entry.2 += incident.longitude;
  }

  groups
    .into_iter()
    .map(|(region, (count, lat, lng))| GeoPoint {
      region:      region.to_owned(),
      crime_count: count,
      latitude:    lat / count as f64,
      longitude:   lng / count as f64,
    })
    .collect()
}

// ─── Trends ──────────────────────────────────────────────────────────────────

/// Number of incidents in one `YYYY-MM` bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCount {
  pub month: String,
  pub count: usize,
}

impl MonthlyCount {
  pub fn new(month: impl Into<String>, count: usize) -> Self {
    Self {
      month: month.into(),
      count,
    }
  }
}

/// Bucket by calendar month, ascending. Months without incidents are absent,
/// so the series is sparse.
pub fn monthly_trend<'a>(
  records: impl IntoIterator<Item = &'a Incident>,
) -> Vec<MonthlyCount> {
  let mut buckets: BTreeMap<String, usize> = BTreeMap::new();
  for incident in records {
    *buckets.entry(incident.month_key()).or_default() += 1;
  }
  buckets
    .into_iter()
    .map(|(month, count)| MonthlyCount { month, count })
    .collect()
}

// ─── Breakdown ───────────────────────────────────────────────────────────────

/// A field incidents can be tallied by.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Dimension {
  #[serde(alias = "crime_type")]
  #[strum(to_string = "category", serialize = "crime_type")]
  Category,
  #[serde(alias = "state")]
  #[strum(to_string = "region", serialize = "state")]
  Region,
  Severity,
  Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownEntry {
  pub key:   String,
  pub count: usize,
}

/// Tally by `dimension`, most frequent first; ties broken by key.
pub fn breakdown<'a>(
  records: impl IntoIterator<Item = &'a Incident>,
  dimension: Dimension,
) -> Vec<BreakdownEntry> {
  let mut tally: BTreeMap<&str, usize> = BTreeMap::new();
  for incident in records {
    let key = match dimension {
      Dimension::Category => incident.category.as_str(),
      Dimension::Region => incident.region.as_str(),
      Dimension::Severity => incident.severity.as_ref(),
      Dimension::Status => incident.status.as_ref(),
    };
    *tally.entry(key).or_default() += 1;
  }

  let mut entries: Vec<BreakdownEntry> = tally
    .into_iter()
    .map(|(key, count)| BreakdownEntry {
      key: key.to_owned(),
      count,
    })
    .collect();
  // Stable sort keeps the BTreeMap's key order among equal counts.
  entries.sort_by(|a, b| b.count.cmp(&a.count));
  entries
}
