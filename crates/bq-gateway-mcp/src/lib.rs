// crates/bq-gateway-mcp/src/lib.rs
// ============================================================================
// Module: BQ Gateway MCP Library
// Description: HTTP and MCP transports for the BQ Gateway.
// Purpose: Serve warehouse operations over HTTP GET routes and JSON-RPC.
// Dependencies: bq-gateway-core, bq-gateway-contract, axum, tokio
// ============================================================================

//! ## Overview
//! This crate wires configuration, the BigQuery client, and the operation
//! dispatcher into a server. The same [`ToolRouter`] backs the HTTP GET
//! routes, JSON-RPC at `POST /mcp`, and the Content-Length framed stdio
//! transport. Security posture: all inputs are untrusted; statements and
//! identifiers never appear in audit output.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod server;
pub mod tools;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::GatewayAuditEvent;
pub use audit::GatewayAuditSink;
pub use audit::GatewayFileAuditSink;
pub use audit::GatewayNoopAuditSink;
pub use audit::GatewayStderrAuditSink;
pub use bq_gateway_config::GatewayConfig;
pub use server::GatewayServer;
pub use server::GatewayServerError;
pub use tools::ToolError;
pub use tools::ToolRouter;
