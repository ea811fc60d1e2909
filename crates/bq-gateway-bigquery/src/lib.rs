// crates/bq-gateway-bigquery/src/lib.rs
// ============================================================================
// Module: BQ Gateway BigQuery Adapter
// Description: BigQuery REST v2 implementation of the warehouse client.
// Purpose: Connect the gateway core to a live BigQuery project.
// Dependencies: bq-gateway-config, bq-gateway-core, reqwest, time, tokio, url
// ============================================================================

//! ## Overview
//! This crate provides [`BigQueryClient`], the production
//! [`bq_gateway_core::WarehouseClient`]. It authenticates with a bearer token
//! from the configured [`TokenSource`], runs statements through the
//! `jobs.query` API, and decodes typed cells into JSON rows.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod auth;
pub mod client;
pub mod wire;

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use auth::CREDENTIALS_REASON;
pub use auth::TokenSource;
pub use client::BigQueryClient;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while constructing the adapter at startup.
#[derive(Debug, Error)]
pub enum AdapterBuildError {
    /// A configured URL could not be parsed or cannot carry a path.
    #[error("invalid warehouse url: {0}")]
    InvalidUrl(String),
    /// The HTTP client could not be built.
    #[error("http client build failed: {0}")]
    HttpClient(String),
}
