// crates/bq-gateway-mcp/src/audit.rs
// ============================================================================
// Module: Gateway Audit Logging
// Description: Structured audit events for gateway request handling.
// Purpose: Emit one redacted JSON line per request without a logging stack.
// Dependencies: bq-gateway-config, bq-gateway-core, serde
// ============================================================================

//! ## Overview
//! Every request handled by the gateway produces exactly one
//! [`GatewayAuditEvent`], written as a JSON line to the configured sink.
//! Events carry the operation name, outcome, and latency but never the query
//! text or warehouse identifiers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use bq_gateway_config::ServerAuditConfig;
use bq_gateway_config::ServerTransport;
use bq_gateway_core::OperationName;
use serde::Serialize;

/// Event identifier for request audit records.
pub const REQUEST_EVENT: &str = "gateway_request";
/// Redaction label: statements and identifiers are never logged.
pub const REDACTION_LABEL: &str = "identifiers_omitted";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Request surface classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayMethod {
    /// JSON-RPC `initialize`.
    Initialize,
    /// JSON-RPC `tools/list`.
    ToolsList,
    /// JSON-RPC `tools/call`.
    ToolsCall,
    /// HTTP GET operation route.
    HttpRoute,
    /// HTTP capability catalog route.
    Capabilities,
    /// Unparseable or oversized request.
    Invalid,
    /// Unsupported JSON-RPC method.
    Other,
}

impl GatewayMethod {
    /// Classifies a JSON-RPC method name.
    #[must_use]
    pub fn from_jsonrpc(method: &str) -> Self {
        match method {
            "initialize" => Self::Initialize,
            "tools/list" => Self::ToolsList,
            "tools/call" => Self::ToolsCall,
            _ => Self::Other,
        }
    }
}

/// Request outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestOutcome {
    /// The request produced a success payload.
    Ok,
    /// The request was refused with a business error.
    Rejected,
    /// The request failed.
    Error,
}

/// Gateway audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct GatewayAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Request identifier when available.
    pub request_id: Option<String>,
    /// Transport used for the request.
    pub transport: ServerTransport,
    /// Request surface classification.
    pub method: GatewayMethod,
    /// Operation name when the request targeted one.
    pub operation: Option<OperationName>,
    /// Request outcome.
    pub outcome: RequestOutcome,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Wall-clock handling time in milliseconds.
    pub latency_ms: u64,
    /// Redaction classification for payload logging.
    pub redaction: &'static str,
}

/// Inputs required to construct an audit event.
#[derive(Debug, Clone)]
pub struct GatewayAuditEventParams {
    /// Request identifier when available.
    pub request_id: Option<String>,
    /// Transport used for the request.
    pub transport: ServerTransport,
    /// Request surface classification.
    pub method: GatewayMethod,
    /// Operation name when the request targeted one.
    pub operation: Option<OperationName>,
    /// Request outcome.
    pub outcome: RequestOutcome,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Wall-clock handling time.
    pub latency: Duration,
}

impl GatewayAuditEvent {
    /// Builds a request audit event stamped with the current time.
    #[must_use]
    pub fn new(params: GatewayAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: REQUEST_EVENT,
            timestamp_ms,
            request_id: params.request_id,
            transport: params.transport,
            method: params.method,
            operation: params.operation,
            outcome: params.outcome,
            error_kind: params.error_kind,
            latency_ms: u64::try_from(params.latency.as_millis()).unwrap_or(u64::MAX),
            redaction: REDACTION_LABEL,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for gateway request logging.
pub trait GatewayAuditSink: Send + Sync {
    /// Records an audit event.
    fn record(&self, event: &GatewayAuditEvent);
}

/// Shared audit sink handle.
pub type SharedAuditSink = Arc<dyn GatewayAuditSink>;

/// Audit sink that logs JSON lines to stderr.
pub struct GatewayStderrAuditSink;

impl GatewayAuditSink for GatewayStderrAuditSink {
    fn record(&self, event: &GatewayAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct GatewayFileAuditSink {
    /// Audit log file handle.
    file: Mutex<File>,
}

impl GatewayFileAuditSink {
    /// Opens a file-backed audit sink in append mode.
    ///
    /// # Errors
    ///
    /// Returns [`io::Error`] when the file cannot be opened.
    pub fn new(path: &Path) -> Result<Self, io::Error> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl GatewayAuditSink for GatewayFileAuditSink {
    fn record(&self, event: &GatewayAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink used when audit logging is disabled.
pub struct GatewayNoopAuditSink;

impl GatewayAuditSink for GatewayNoopAuditSink {
    fn record(&self, _event: &GatewayAuditEvent) {}
}

/// Builds the audit sink selected by configuration.
///
/// # Errors
///
/// Returns [`io::Error`] when a configured audit file cannot be opened.
pub fn audit_sink_from_config(config: &ServerAuditConfig) -> Result<SharedAuditSink, io::Error> {
    if !config.enabled {
        return Ok(Arc::new(GatewayNoopAuditSink));
    }
    match config.path.as_deref() {
        Some(path) => Ok(Arc::new(GatewayFileAuditSink::new(Path::new(path))?)),
        None => Ok(Arc::new(GatewayStderrAuditSink)),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        reason = "Test-only assertions."
    )]

    use std::time::Duration;

    use bq_gateway_config::ServerAuditConfig;
    use bq_gateway_config::ServerTransport;
    use bq_gateway_core::OperationName;
    use serde_json::Value;

    use super::GatewayAuditEvent;
    use super::GatewayAuditEventParams;
    use super::GatewayMethod;
    use super::REDACTION_LABEL;
    use super::RequestOutcome;
    use super::audit_sink_from_config;

    fn sample_event() -> GatewayAuditEvent {
        GatewayAuditEvent::new(GatewayAuditEventParams {
            request_id: Some("7".to_string()),
            transport: ServerTransport::Http,
            method: GatewayMethod::ToolsCall,
            operation: Some(OperationName::RunQuery),
            outcome: RequestOutcome::Rejected,
            error_kind: Some("safety"),
            latency: Duration::from_millis(12),
        })
    }

    #[test]
    fn event_serializes_labels_without_payloads() {
        let value = serde_json::to_value(sample_event()).unwrap();
        assert_eq!(value["event"], "gateway_request");
        assert_eq!(value["transport"], "http");
        assert_eq!(value["method"], "tools_call");
        assert_eq!(value["operation"], "get_data_from_bigquery");
        assert_eq!(value["outcome"], "rejected");
        assert_eq!(value["error_kind"], "safety");
        assert_eq!(value["latency_ms"], 12);
        assert_eq!(value["redaction"], REDACTION_LABEL);
        assert!(value.get("query").is_none());
    }

    #[test]
    fn file_sink_appends_one_line_per_event() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("audit.jsonl");
        let sink = audit_sink_from_config(&ServerAuditConfig {
            enabled: true,
            path: Some(path.display().to_string()),
        })
        .unwrap();
        sink.record(&sample_event());
        sink.record(&sample_event());
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["request_id"], "7");
    }

    #[test]
    fn disabled_audit_writes_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("audit.jsonl");
        let sink = audit_sink_from_config(&ServerAuditConfig {
            enabled: false,
            path: Some(path.display().to_string()),
        })
        .unwrap();
        sink.record(&sample_event());
        assert!(!path.exists());
    }

    #[test]
    fn jsonrpc_methods_are_classified() {
        assert_eq!(GatewayMethod::from_jsonrpc("initialize"), GatewayMethod::Initialize);
        assert_eq!(GatewayMethod::from_jsonrpc("tools/list"), GatewayMethod::ToolsList);
        assert_eq!(GatewayMethod::from_jsonrpc("tools/call"), GatewayMethod::ToolsCall);
        assert_eq!(GatewayMethod::from_jsonrpc("resources/list"), GatewayMethod::Other);
    }
}
