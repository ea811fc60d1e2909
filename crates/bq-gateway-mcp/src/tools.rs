// crates/bq-gateway-mcp/src/tools.rs
// ============================================================================
// Module: Tool Router
// Description: Routes MCP tool calls and HTTP operations to the dispatcher.
// Purpose: Parse untrusted arguments into typed operation requests.
// Dependencies: bq-gateway-contract, bq-gateway-core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`ToolRouter`] is the single entry point shared by every transport. Tool
//! names and arguments are parsed strictly (unknown fields are rejected), then
//! handed to the [`Dispatcher`]. Business rejections come back as
//! [`OperationResult::Rejected`]; only protocol and warehouse faults surface
//! as [`ToolError`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use bq_gateway_core::DispatchError;
use bq_gateway_core::Dispatcher;
use bq_gateway_core::OperationName;
use bq_gateway_core::OperationRequest;
use bq_gateway_core::OperationResult;
use bq_gateway_core::RemoteWarehouseError;
use serde_json::Value;
use thiserror::Error;

pub use bq_gateway_contract::ToolDefinition;
use bq_gateway_contract::tool_definitions;

// ============================================================================
// SECTION: Router
// ============================================================================

/// Tool router shared by all transports.
#[derive(Clone)]
pub struct ToolRouter {
    /// Operation dispatcher.
    dispatcher: Dispatcher,
}

impl ToolRouter {
    /// Creates a router over a dispatcher.
    #[must_use]
    pub const fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
        }
    }

    /// Lists the tools exposed over MCP.
    #[must_use]
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        tool_definitions()
    }

    /// Handles an MCP tool call by name.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] when the tool is unknown, the arguments do not
    /// match the tool's input shape, or the warehouse fails.
    pub async fn handle_tool_call(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<OperationResult, ToolError> {
        let operation = OperationName::parse(name).ok_or(ToolError::UnknownTool)?;
        let request = parse_arguments(operation, arguments)?;
        self.dispatch(request).await
    }

    /// Dispatches an already-typed operation request.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] when the warehouse fails or returns rows of an
    /// unexpected shape.
    pub async fn dispatch(&self, request: OperationRequest) -> Result<OperationResult, ToolError> {
        self.dispatcher.dispatch(request).await.map_err(ToolError::from)
    }
}

/// Parses tool arguments into a typed request.
fn parse_arguments(
    operation: OperationName,
    arguments: Value,
) -> Result<OperationRequest, ToolError> {
    OperationRequest::from_json(operation, arguments)
        .map_err(|err| ToolError::InvalidParams(format!("invalid {operation} arguments: {err}")))
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Tool routing errors.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool name is not registered.
    #[error("unknown tool")]
    UnknownTool,
    /// Tool arguments failed to parse.
    #[error("{0}")]
    InvalidParams(String),
    /// The warehouse rejected or failed the request.
    #[error(transparent)]
    Warehouse(RemoteWarehouseError),
    /// Unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),
    /// Result serialization failed.
    #[error("serialization failed")]
    Serialization,
}

impl ToolError {
    /// Returns a stable label for audit logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTool => "unknown_tool",
            Self::InvalidParams(_) => "invalid_params",
            Self::Warehouse(_) => "remote_warehouse",
            Self::Internal(_) => "internal",
            Self::Serialization => "serialization",
        }
    }
}

impl From<DispatchError> for ToolError {
    fn from(error: DispatchError) -> Self {
        match error {
            DispatchError::Remote(err) => Self::Warehouse(err),
            DispatchError::ResultShape(message) => Self::Internal(message),
        }
    }
}
