//! Core types and the query/aggregation engine for the crime analytics API.
//!
//! This crate is deliberately free of HTTP and storage dependencies. Every
//! operation here is a synchronous, pure transformation over a slice of
//! [`incident::Incident`] records obtained from an [`store::IncidentStore`].

pub mod aggregate;
pub mod error;
pub mod forecast;
pub mod incident;
pub mod ingest;
pub mod query;
pub mod store;

pub use error::{Error, Invalid, Result};
