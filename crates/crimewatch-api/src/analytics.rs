//! Read-only aggregate endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/stats` | Whole-store counts |
//! | `GET`  | `/heatmap` | Per-state count and centroid, sorted by state |
//! | `GET`  | `/trends` | Optional `location`, `crime_type`; sparse monthly series |
//! | `GET`  | `/breakdown` | `dimension` required; optional list filters |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use crimewatch_core::{
  aggregate::{
    self, BreakdownEntry, Dimension, GeoPoint, MonthlyCount, Stats,
  },
  query::{IncidentQuery, filter},
  store::IncidentStore,
};
use serde::Deserialize;

/// `GET /stats`
pub async fn stats<S>(State(store): State<Arc<S>>) -> Json<Stats>
where
  S: IncidentStore,
{
  Json(aggregate::stats(store.snapshot().iter()))
}

/// `GET /heatmap`
pub async fn heatmap<S>(State(store): State<Arc<S>>) -> Json<Vec<GeoPoint>>
where
  S: IncidentStore,
{
  Json(aggregate::geo_aggregate(store.snapshot().iter()))
}

// ─── Trends ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct TrendParams {
  /// Matched against state or city.
  pub location:   Option<String>,
  pub crime_type: Option<String>,
}

/// `GET /trends[?location=...][&crime_type=...]`
pub async fn trends<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<TrendParams>,
) -> Json<Vec<MonthlyCount>>
where
  S: IncidentStore,
{
  let query = IncidentQuery::for_trend(params.location, params.crime_type);
  let records = store.snapshot();
  Json(aggregate::monthly_trend(filter(records.iter(), &query)))
}

// ─── Breakdown ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BreakdownParams {
  /// `category` (or `crime_type`), `region` (or `state`), `severity`, `status`.
  pub dimension:  Dimension,
  pub state:      Option<String>,
  pub city:       Option<String>,
  pub crime_type: Option<String>,
  pub year:       Option<i32>,
  pub severity:   Option<String>,
  pub status:     Option<String>,
}

/// `GET /breakdown?dimension=<dimension>[&state=...][&year=...]...`
pub async fn breakdown<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<BreakdownParams>,
) -> Json<Vec<BreakdownEntry>>
where
  S: IncidentStore,
{
  let query = IncidentQuery {
    region: params.state,
    locality: params.city,
    category: params.crime_type,
    year: params.year,
    severity: params.severity,
    status: params.status,
    ..IncidentQuery::default()
  };
  let records = store.snapshot();
  Json(aggregate::breakdown(
    filter(records.iter(), &query),
    params.dimension,
  ))
}
