// crates/bq-gateway-contract/src/lib.rs
// ============================================================================
// Module: BQ Gateway Contract Library
// Description: Tool contracts, capability catalog, and artifact generation.
// Purpose: Single source of truth for the operation surface description.
// Dependencies: bq-gateway-config, bq-gateway-core, serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! `bq-gateway-contract` describes the seven gateway operations as typed
//! contracts with JSON schemas and examples. The MCP server lists tools from
//! here, the HTTP server publishes the catalog at `/capabilities`, and the
//! CLI writes and checks the generated docs bundle.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod contract;
pub mod tooling;
pub mod types;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use contract::ContractBuilder;
pub use tooling::capability_catalog;
pub use tooling::tool_contract;
pub use tooling::tool_contracts;
pub use tooling::tool_definitions;
pub use tooling::tooling_markdown;
pub use types::CapabilityCatalog;
pub use types::ContractBundle;
pub use types::ContractManifest;
pub use types::ToolContract;
pub use types::ToolDefinition;
pub use types::ToolName;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while generating or verifying contract artifacts.
#[derive(Debug, Error)]
pub enum ContractError {
    /// Filesystem failure.
    #[error("contract io error: {0}")]
    Io(String),
    /// Serialization failure.
    #[error("contract serialization error: {0}")]
    Serialization(String),
    /// Generation or verification failure.
    #[error("contract generation error: {0}")]
    Generation(String),
    /// Output path is invalid or unsafe.
    #[error("invalid contract output path: {}", .0.display())]
    OutputPath(PathBuf),
}
