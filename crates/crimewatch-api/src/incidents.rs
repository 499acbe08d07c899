//! Handlers for incident records.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/crimes` | Optional `state`, `city`, `crime_type`, `year`, `severity`, `status`, `from`, `to`, `limit` (100), `offset` |
//! | `POST` | `/upload` | Body: JSON array of incidents; all-or-nothing |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::{NaiveDate, NaiveDateTime};
use crimewatch_core::{
  incident::{Incident, IncidentInput, parse_timestamp},
  ingest::ingest,
  query::{self, IncidentQuery},
  store::IncidentStore,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Page size used when `limit` is not given.
pub const DEFAULT_LIMIT: usize = 100;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  pub state:      Option<String>,
  pub city:       Option<String>,
  pub crime_type: Option<String>,
  pub year:       Option<i32>,
  pub severity:   Option<String>,
  pub status:     Option<String>,
  /// Inclusive lower bound, ISO-8601 date or date-time.
  pub from:       Option<String>,
  /// Inclusive upper bound; a bare date covers that whole day.
  pub to:         Option<String>,
  pub limit:      Option<usize>,
  pub offset:     Option<usize>,
}

impl ListParams {
  pub fn into_query(self) -> Result<IncidentQuery, ApiError> {
    Ok(IncidentQuery {
      region: self.state,
      locality: self.city,
      category: self.crime_type,
      year: self.year,
      severity: self.severity,
      status: self.status,
      occurred_after: self.from.as_deref().map(bound("from", false)).transpose()?,
      occurred_before: self.to.as_deref().map(bound("to", true)).transpose()?,
      limit: Some(self.limit.unwrap_or(DEFAULT_LIMIT)),
      offset: self.offset,
      ..IncidentQuery::default()
    })
  }
}

/// Parse a date-window bound. A date-only upper bound extends to the end of
/// that day.
fn bound(
  name: &'static str,
  end_of_day: bool,
) -> impl Fn(&str) -> Result<NaiveDateTime, ApiError> {
  move |raw| {
    if end_of_day
      && let Ok(date) = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
      && let Some(end) = date.and_hms_nano_opt(23, 59, 59, 999_999_999)
    {
      return Ok(end);
    }
    parse_timestamp(raw).ok_or_else(|| {
      ApiError::BadRequest(format!("`{name}` is not a valid timestamp: {raw:?}"))
    })
  }
}

/// `GET /crimes[?state=...][&city=...][&crime_type=...][&year=...][&severity=...][&limit=...]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Incident>>, ApiError>
where
  S: IncidentStore,
{
  let query = params.into_query()?;
  let records = store.snapshot();
  Ok(Json(query::list(&records, &query)))
}

// ─── Upload ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
  pub message:        String,
  pub accepted_count: usize,
  pub total_records:  usize,
}

/// `POST /upload` — body: `[{...incident...}, ...]`.
///
/// Returns 400 with `{"error": ...}` naming the first invalid record; in that
/// case nothing is stored.
pub async fn upload<S>(
  State(store): State<Arc<S>>,
  Json(batch): Json<Vec<IncidentInput>>,
) -> Result<Json<UploadResponse>, ApiError>
where
  S: IncidentStore,
{
  let submitted = batch.len();
  let report = ingest(store.as_ref(), batch).inspect_err(|e| {
    tracing::warn!(submitted, error = %e, "rejected incident batch");
  })?;

  tracing::info!(
    accepted = report.accepted_count,
    total = report.total_records,
    "ingested incident batch"
  );
  Ok(Json(UploadResponse {
    message:        format!(
      "Successfully uploaded {} crime records",
      report.accepted_count
    ),
    accepted_count: report.accepted_count,
    total_records:  report.total_records,
  }))
}
