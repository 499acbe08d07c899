//! Handler for `GET /predict`.
//!
//! Both `location` and `crime_type` are required. When the matching history
//! is empty or spans fewer than three months the response is still `200`, with
//! a body of `{"error": "..."}` instead of a forecast.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::Utc;
use crimewatch_core::{
  aggregate::monthly_trend,
  forecast::{Forecast, forecast},
  query::{IncidentQuery, filter},
  store::IncidentStore,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct PredictParams {
  pub location:   String,
  pub crime_type: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PredictResponse {
  Forecast {
    location:   String,
    crime_type: String,
    #[serde(flatten)]
    forecast:   Forecast,
  },
  Unavailable {
    error: String,
  },
}

/// `GET /predict?location=...&crime_type=...`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<PredictParams>,
) -> Result<Json<PredictResponse>, ApiError>
where
  S: IncidentStore,
{
  let query = IncidentQuery::for_trend(
    Some(params.location.clone()),
    Some(params.crime_type.clone()),
  );
  let series = {
    let records = store.snapshot();
    monthly_trend(filter(records.iter(), &query))
  };

  match forecast(&series, Utc::now()) {
    Ok(forecast) => Ok(Json(PredictResponse::Forecast {
      location: params.location,
      crime_type: params.crime_type,
      forecast,
    })),
    Err(e) if e.is_unpredictable() => {
      tracing::info!(
        location = %params.location,
        crime_type = %params.crime_type,
        reason = %e,
        "cannot predict"
      );
      Ok(Json(PredictResponse::Unavailable {
        error: e.to_string(),
      }))
    }
    Err(e) => Err(e.into()),
  }
}
