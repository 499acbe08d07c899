//! Crime analytics endpoints over an [`IncidentStore`].
//!
//! | Route | |
//! |---|---|
//! | `GET /crimes` | filtered, paged incident list |
//! | `POST /upload` | all-or-nothing batch ingestion |
//! | `GET /stats` | headline counts |
//! | `GET /heatmap` | per-state centroids |
//! | `GET /trends` | monthly counts by location and crime type |
//! | `GET /breakdown` | counts grouped by one dimension |
//! | `GET /predict` | six-month naive forecast |
//!
//! The server mounts these under `/api`.

pub mod analytics;
pub mod error;
pub mod incidents;
pub mod predict;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use crimewatch_core::store::IncidentStore;

pub use error::ApiError;

/// Routes for every analytics endpoint, all reading from `store`.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: IncidentStore + 'static,
{
  Router::new()
    // Records
    .route("/crimes", get(incidents::list::<S>))
    .route("/upload", post(incidents::upload::<S>))
    // Aggregates
    .route("/stats", get(analytics::stats::<S>))
    .route("/heatmap", get(analytics::heatmap::<S>))
    .route("/trends", get(analytics::trends::<S>))
    .route("/breakdown", get(analytics::breakdown::<S>))
    // Forecast
    .route("/predict", get(predict::handler::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
