// crates/bq-gateway-cli/src/lib.rs
// ============================================================================
// Module: BQ Gateway CLI Library
// Description: Shared helpers for the BQ Gateway command-line interface.
// Purpose: Provide the message catalog for the CLI binary and tests.
// Dependencies: Standard library.
// ============================================================================

//! ## Overview
//! Houses the CLI message catalog. The binary entry point (`src/main.rs`)
//! routes every user-facing line through [`t!`] so wording stays consistent
//! across commands.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Message catalog and formatting helpers.
pub mod i18n;
