//! HTTP server assembly for the crime analytics API.
//!
//! Wires the JSON API from `crimewatch-api` to an in-memory store, adds the
//! service banner and health routes, and applies request tracing and CORS.

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use chrono::Local;
use crimewatch_core::store::IncidentStore;
use crimewatch_store_memory::{MemoryStore, seed};
use rand::{SeedableRng, rngs::StdRng};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `CRIMEWATCH_*` environment variables. Every key is optional.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:           String,
  #[serde(default = "default_port")]
  pub port:           u16,
  /// Number of synthetic incidents loaded at startup.
  #[serde(default = "default_seed_records")]
  pub seed_records:   usize,
  /// Fixes the seed generator for reproducible demo data.
  #[serde(default)]
  pub rng_seed:       Option<u64>,
  /// Allow any origin, method and header.
  #[serde(default = "default_cors_allow_any")]
  pub cors_allow_any: bool,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }
fn default_seed_records() -> usize { seed::DEFAULT_COUNT }
fn default_cors_allow_any() -> bool { true }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:           default_host(),
      port:           default_port(),
      seed_records:   default_seed_records(),
      rng_seed:       None,
      cors_allow_any: default_cors_allow_any(),
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Store ────────────────────────────────────────────────────────────────────

/// Build the process-wide store, pre-loaded with demo data.
pub fn seeded_store(
  config: &ServerConfig,
) -> crimewatch_store_memory::Result<MemoryStore> {
  let mut rng = match config.rng_seed {
    Some(s) => StdRng::seed_from_u64(s),
    None => StdRng::from_entropy(),
  };
  let records =
    seed::generate(config.seed_records, &mut rng, Local::now().naive_local());
  let store = MemoryStore::with_records(records)?;
  tracing::info!(records = store.len(), "seeded incident store");
  Ok(store)
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application router: banner and health at the root, the
/// JSON API under `/api`.
pub fn app<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: IncidentStore + 'static,
{
  let router = Router::new()
    .route("/", get(banner))
    .route("/health", get(health::<S>))
    .with_state(store.clone())
    .nest("/api", crimewatch_api::api_router(store))
    .layer(TraceLayer::new_for_http());

  if config.cors_allow_any {
    router.layer(
      CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any),
    )
  } else {
    router
  }
}

/// `GET /`
async fn banner() -> Json<Value> {
  Json(json!({
    "message": "Crime Analytics API",
    "version": env!("CARGO_PKG_VERSION"),
    "status":  "active",
  }))
}

/// `GET /health`
async fn health<S>(State(store): State<Arc<S>>) -> Json<Value>
where
  S: IncidentStore,
{
  Json(json!({ "status": "ok", "total_records": store.len() }))
}

// ─── Integration tests ────────────────────────────────────────────────────────
