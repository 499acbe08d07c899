//! Naive linear-trend forecast over a monthly series.
//!
//! This is a fixed heuristic, not a statistical model. The arithmetic below is
//! reproduced exactly so existing clients see identical numbers:
//!
//! 1. `avg` is the mean of all monthly counts.
//! 2. `recent_avg` is the mean of the last three months.
//! 3. `trend = (recent_avg - avg) / avg`, or `0` when `avg` is zero.
//! 4. For `i` in `1..=6`: `predicted = max(0, floor(recent_avg * (1 + trend *
//!    i * 0.1)))` and `confidence = max(0.6, 0.9 - i * 0.05)`.
//!
//! Forecast months are labelled from `now + 30 * i` days, anchored to the
//! supplied clock rather than to the last month of data. With backfilled
//! history the horizon can therefore start well after the data ends.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, aggregate::MonthlyCount};

/// Minimum number of distinct months required to forecast.
pub const MIN_MONTHS: usize = 3;

/// Number of future months predicted.
pub const HORIZON: u32 = 6;

/// Spacing between successive forecast points.
pub const STEP_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
  /// `YYYY-MM` label of the forecast point.
  pub month:           String,
  pub predicted_count: u64,
  pub confidence:      f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
  /// Mean monthly count, rounded to two decimals.
  pub historical_average: f64,
  /// Fractional trend expressed as a percentage, rounded to two decimals.
  #[serde(rename = "recent_trend")]
  pub recent_trend_pct:   f64,
  pub predictions:        Vec<Prediction>,
}

/// Project [`HORIZON`] months ahead of `now` from `series`.
///
/// Fails with [`Error::NoMatchingData`] for an empty series and
/// [`Error::InsufficientData`] for fewer than [`MIN_MONTHS`] distinct months.
pub fn forecast(series: &[MonthlyCount], now: DateTime<Utc>) -> Result<Forecast> {
  if series.is_empty() {
    return Err(Error::NoMatchingData);
  }
  let months = series
    .iter()
    .map(|m| m.month.as_str())
    .collect::<BTreeSet<_>>()
    .len();
  if months < MIN_MONTHS {
    return Err(Error::InsufficientData { months });
  }

  let mut ordered: Vec<&MonthlyCount> = series.iter().collect();
  ordered.sort_by(|a, b| a.month.cmp(&b.month));
  let counts: Vec<f64> = ordered.iter().map(|m| m.count as f64).collect();

  let avg = counts.iter().sum::<f64>() / counts.len() as f64;
  let recent_avg = counts[counts.len() - 3..].iter().sum::<f64>() / 3.0;
  let trend = if avg > 0.0 { (recent_avg - avg) / avg } else { 0.0 };

  let predictions = (1..=HORIZON)
    .map(|i| {
      let step = f64::from(i);
      let projected = (recent_avg * (1.0 + trend * step * 0.1)).floor();
      Prediction {
        month:           (now + Duration::days(STEP_DAYS * i64::from(i)))
          .format("%Y-%m")
          .to_string(),
        predicted_count: projected.max(0.0) as u64,
        confidence:      f64::max(0.6, 0.9 - step * 0.05),
      }
    })
    .collect();

  Ok(Forecast {
    historical_average: round2(avg),
    recent_trend_pct: round2(trend * 100.0),
    predictions,
  })
}

/// Round to two decimals on the exact binary value, ties to even.
fn round2(value: f64) -> f64 {
  format!("{value:.2}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 10, 12, 0, 0).unwrap()
  }

  fn series(points: &[(&str, usize)]) -> Vec<MonthlyCount> {
    points
      .iter()
      .map(|(month, count)| MonthlyCount::new(*month, *count))
      .collect()
  }

  fn approx(a: f64, b: f64) -> bool { (a - b).abs() < 1e-9 }

  #[test]
  fn flat_series_predicts_flat_with_decaying_confidence() {
    let s = series(&[("2024-01", 10), ("2024-02", 10), ("2024-03", 10)]);
    let f = forecast(&s, clock()).unwrap();

    assert_eq!(f.historical_average, 10.0);
    assert_eq!(f.recent_trend_pct, 0.0);
    assert_eq!(f.predictions.len(), 6);
    assert!(f.predictions.iter().all(|p| p.predicted_count == 10));

    let confidences: Vec<f64> =
      f.predictions.iter().map(|p| p.confidence).collect();
    for (got, want) in confidences.iter().zip([0.85, 0.80, 0.75, 0.70, 0.65, 0.60])
    {
      assert!(approx(*got, want), "{got} != {want}");
    }
    assert!(confidences.windows(2).all(|w| w[0] >= w[1]));
  }

  #[test]
  fn months_are_spaced_thirty_days_from_the_clock() {
    let s = series(&[("2020-01", 1), ("2020-02", 2), ("2020-03", 3)]);
    let f = forecast(&s, clock()).unwrap();
    let months: Vec<_> = f.predictions.iter().map(|p| p.month.as_str()).collect();
    // 2024-04-10 + 30, 60, ... 180 days.
    assert_eq!(months, [
      "2024-05", "2024-06", "2024-07", "2024-08", "2024-09", "2024-10"
    ]);
  }

  #[test]
  fn rising_series_uses_fractional_trend() {
    // avg = 6, recent_avg = (8 + 12 + 4) / 3 = 8, trend = 1/3
    let s = series(&[
      ("2024-01", 2),
      ("2024-02", 4),
      ("2024-03", 8),
      ("2024-04", 12),
      ("2024-05", 4),
    ]);
    let f = forecast(&s, clock()).unwrap();
    assert_eq!(f.historical_average, 6.0);
    assert_eq!(f.recent_trend_pct, 33.33);
    let counts: Vec<u64> = f.predictions.iter().map(|p| p.predicted_count).collect();
    // floor(8 * (1 + i / 30))
    assert_eq!(counts, [8, 8, 8, 9, 9, 9]);
  }

  #[test]
  fn averages_round_ties_to_even() {
    // avg = 9 / 8 = 1.125, exactly representable
    let s = series(&[
      ("2023-01", 2),
      ("2023-02", 1),
      ("2023-03", 1),
      ("2023-04", 1),
      ("2023-05", 1),
      ("2023-06", 1),
      ("2023-07", 1),
      ("2023-08", 1),
    ]);
    let f = forecast(&s, clock()).unwrap();
    assert_eq!(f.historical_average, 1.12);
    // (1 - 1.125) / 1.125 * 100 = -11.111...
    assert_eq!(f.recent_trend_pct, -11.11);
  }

  #[test]
  fn recent_window_follows_chronological_order() {
    let shuffled = series(&[("2024-03", 30), ("2024-01", 0), ("2024-02", 0)]);
    let sorted = series(&[("2024-01", 0), ("2024-02", 0), ("2024-03", 30)]);
    assert_eq!(
      forecast(&shuffled, clock()).unwrap(),
      forecast(&sorted, clock()).unwrap()
    );
  }

  #[test]
  fn falling_series_never_predicts_negative() {
    let s = series(&[
      ("2023-01", 100),
      ("2023-02", 100),
      ("2023-03", 100),
      ("2023-04", 100),
      ("2023-05", 100),
      ("2023-06", 100),
      ("2023-07", 100),
      ("2023-08", 0),
      ("2023-09", 0),
      ("2023-10", 1),
    ]);
    let f = forecast(&s, clock()).unwrap();
    assert!(f.recent_trend_pct < -90.0);
    assert!(f.predictions.iter().all(|p| p.predicted_count == 0));
  }

  #[test]
  fn two_months_is_insufficient() {
    let s = series(&[("2024-01", 5), ("2024-02", 7)]);
    assert!(matches!(
      forecast(&s, clock()),
      Err(Error::InsufficientData { months: 2 })
    ));
  }

  #[test]
  fn duplicate_month_labels_count_once() {
    let s = series(&[("2024-01", 5), ("2024-01", 5), ("2024-02", 7)]);
    assert!(matches!(
      forecast(&s, clock()),
      Err(Error::InsufficientData { months: 2 })
    ));
  }

  #[test]
  fn empty_series_is_no_matching_data() {
    let err = forecast(&[], clock()).unwrap_err();
    assert!(matches!(err, Error::NoMatchingData));
    assert!(err.is_unpredictable());
  }

  #[test]
  fn serialises_trend_under_api_name() {
    let s = series(&[("2024-01", 1), ("2024-02", 1), ("2024-03", 1)]);
    let json = serde_json::to_value(forecast(&s, clock()).unwrap()).unwrap();
    assert!(json.get("recent_trend").is_some());
    assert_eq!(json["predictions"].as_array().unwrap().len(), 6);
  }
}
