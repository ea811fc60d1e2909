// crates/bq-gateway-config/src/lib.rs
// ============================================================================
// Module: BQ Gateway Config Library
// Description: Canonical config model, validation, and example template.
// Purpose: Single source of truth for bq-gateway.toml semantics.
// Dependencies: bq-gateway-core, serde, toml
// ============================================================================

//! ## Overview
//! `bq-gateway-config` defines the canonical configuration model for
//! BQ Gateway. It provides strict, fail-closed validation and a deterministic
//! example template.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
