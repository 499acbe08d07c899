//! Synthetic demo data.
//!
//! Generates incidents spread over ten Indian states and cities, with
//! timestamps in the two years before `now`. Coordinates are the city centre
//! jittered by up to half a degree; state and city are drawn independently, so
//! a record's city need not lie in its state.

use chrono::{Duration, NaiveDateTime};
use crimewatch_core::incident::{Incident, Severity, Status};
use rand::Rng;
use strum::VariantArray as _;

/// Number of records generated when no count is configured.
pub const DEFAULT_COUNT: usize = 2000;

/// How far back generated incidents reach.
pub const SPAN_DAYS: i64 = 730;

/// Maximum coordinate jitter, in degrees.
pub const JITTER: f64 = 0.5;

pub const STATES: [&str; 10] = [
  "Maharashtra",
  "Uttar Pradesh",
  "Gujarat",
  "Rajasthan",
  "Karnataka",
  "Tamil Nadu",
  "West Bengal",
  "Andhra Pradesh",
  "Madhya Pradesh",
  "Telangana",
];

/// City name with its approximate centre (latitude, longitude).
pub const CITIES: [(&str, f64, f64); 10] = [
  ("Mumbai", 19.0760, 72.8777),
  ("Delhi", 28.7041, 77.1025),
  ("Bangalore", 12.9716, 77.5946),
  ("Chennai", 13.0827, 80.2707),
  ("Kolkata", 22.5726, 88.3639),
  ("Hyderabad", 17.3850, 78.4867),
  ("Pune", 18.5204, 73.8567),
  ("Ahmedabad", 23.0225, 72.5714),
  ("Surat", 21.1702, 72.8311),
  ("Jaipur", 26.9124, 75.7873),
];

pub const CRIME_TYPES: [&str; 10] = [
  "Theft",
  "Burglary",
  "Assault",
  "Fraud",
  "Vehicle Theft",
  "Domestic Violence",
  "Robbery",
  "Cybercrime",
  "Drug Offense",
  "Murder",
];

const GENDERS: [&str; 2] = ["male", "female"];

fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> &'a T {
  &items[rng.gen_range(0..items.len())]
}

/// Generate `count` incidents with ids `crime_1` … `crime_{count}`.
pub fn generate<R: Rng + ?Sized>(
  count: usize,
  rng: &mut R,
  now: NaiveDateTime,
) -> Vec<Incident> {
  (1..=count)
    .map(|n| {
      let &(city, lat, lng) = pick(rng, &CITIES);
      let region = *pick(rng, &STATES);
      let category = *pick(rng, &CRIME_TYPES);
      let severity = *pick(rng, Severity::VARIANTS);
      let status = *pick(rng, Status::VARIANTS);
      let gender = *pick(rng, &GENDERS);
      let days_ago = rng.gen_range(0..=SPAN_DAYS);

      Incident {
        id:            format!("crime_{n}"),
        category:      category.to_owned(),
        region:        region.to_owned(),
        locality:      city.to_owned(),
        subdivision:   format!("{city} District"),
        occurred_at:   now - Duration::days(days_ago),
        latitude:      lat + rng.gen_range(-JITTER..=JITTER),
        longitude:     lng + rng.gen_range(-JITTER..=JITTER),
        severity,
        victim_age:    Some(rng.gen_range(18..=75)),
        victim_gender: Some(gender.to_owned()),
        status,
      }
    })
    .collect()
}
