//! Incident types — the sole domain entity of the analytics store.
//!
//! An incident is a flat, self-contained record. Incidents never reference
//! each other and are never updated once stored.
//!
//! Serialised field names follow the public API (`crime_type`, `state`,
//! `city`, `district`, `date`) while the Rust names describe what the fields
//! mean.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

// ─── Enumerations ────────────────────────────────────────────────────────────

/// How serious an incident is. Matched exactly, never case-folded.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
  VariantArray,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
  Low,
  Medium,
  High,
}

/// Case progress of an incident.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
  VariantArray,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Status {
  Pending,
  Resolved,
  Closed,
}

// ─── Incident ────────────────────────────────────────────────────────────────

/// A stored incident record. Every stored record has a parsed `occurred_at`;
/// malformed timestamps are refused at ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
  pub id:            String,
  #[serde(rename = "crime_type")]
  pub category:      String,
  /// State.
  #[serde(rename = "state")]
  pub region:        String,
  /// City.
  #[serde(rename = "city")]
  pub locality:      String,
  /// District; informational only, never filtered on.
  #[serde(rename = "district")]
  pub subdivision:   String,
  /// Wall-clock time of the incident as reported. Any UTC offset in the
  /// source is dropped, so year/month bucketing uses the reported local date.
  #[serde(rename = "date")]
  pub occurred_at:   NaiveDateTime,
  pub latitude:      f64,
  pub longitude:     f64,
  pub severity:      Severity,
  pub victim_age:    Option<i32>,
  pub victim_gender: Option<String>,
  pub status:        Status,
}

impl Incident {
  /// Calendar year of `occurred_at`.
  pub fn year(&self) -> i32 { self.occurred_at.year() }

  /// The `YYYY-MM` bucket this incident falls into.
  pub fn month_key(&self) -> String {
    self.occurred_at.format("%Y-%m").to_string()
  }
}

// ─── IncidentInput ───────────────────────────────────────────────────────────

/// An externally supplied record, as received by the ingestion gate.
///
/// Enumerations and the timestamp are kept as raw strings so that
/// [`crate::ingest`] can report precisely which record and field is wrong.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentInput {
  pub id:            String,
  #[serde(rename = "crime_type")]
  pub category:      String,
  #[serde(rename = "state")]
  pub region:        String,
  #[serde(rename = "city")]
  pub locality:      String,
  /// Defaults to `"<city> District"` when absent.
  #[serde(rename = "district", default)]
  pub subdivision:   Option<String>,
  #[serde(rename = "date")]
  pub occurred_at:   String,
  pub latitude:      f64,
  pub longitude:     f64,
  pub severity:      String,
  #[serde(default)]
  pub victim_age:    Option<i32>,
  #[serde(default)]
  pub victim_gender: Option<String>,
  pub status:        String,
}

impl From<&Incident> for IncidentInput {
  fn from(i: &Incident) -> Self {
    IncidentInput {
      id:            i.id.clone(),
      category:      i.category.clone(),
      region:        i.region.clone(),
      locality:      i.locality.clone(),
      subdivision:   Some(i.subdivision.clone()),
      occurred_at:   i.occurred_at.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
      latitude:      i.latitude,
      longitude:     i.longitude,
      severity:      i.severity.to_string(),
      victim_age:    i.victim_age,
      victim_gender: i.victim_gender.clone(),
      status:        i.status.to_string(),
    }
  }
}

// ─── Timestamps ──────────────────────────────────────────────────────────────

const NAIVE_FORMATS: &[&str] = &[
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 with an offset (the local wall-clock is kept), naive
/// date-times with `T` or space separators, and bare `YYYY-MM-DD` dates
/// (midnight). Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
  let raw = raw.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Some(dt.naive_local());
  }
  if let Some(dt) = NAIVE_FORMATS
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
  {
    return Some(dt);
  }
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .ok()
    .and_then(|d| d.and_hms_opt(0, 0, 0))
}
