// crates/bq-gateway-mcp/tests/common/mod.rs
// ============================================================================
// Module: Gateway Test Fixtures
// Description: Fake warehouse client and server bootstrap helpers.
// Purpose: Drive the HTTP and JSON-RPC surfaces without a real warehouse.
// ============================================================================

//! ## Overview
//! [`FakeWarehouse`] records every call so tests can assert that rejected
//! requests never reach the warehouse. [`spawn_gateway`] serves the full HTTP
//! application on an ephemeral loopback port.

#![allow(dead_code, reason = "Shared test helpers may be unused in some suites.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use bq_gateway_core::ColumnSchema;
use bq_gateway_core::DatasetId;
use bq_gateway_core::ProjectId;
use bq_gateway_core::RemoteWarehouseError;
use bq_gateway_core::Row;
use bq_gateway_core::TableId;
use bq_gateway_core::TableSchema;
use bq_gateway_core::WarehouseClient;
use bq_gateway_mcp::GatewayConfig;
use bq_gateway_mcp::GatewayServer;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Fake Warehouse
// ============================================================================

/// Scripted warehouse client that records statements and listings.
#[derive(Default)]
pub struct FakeWarehouse {
    /// Observed calls, one label per call.
    pub calls: Mutex<Vec<String>>,
    /// Rows returned from `run_query`.
    pub rows: Vec<Row>,
    /// Error returned from every call when set.
    pub failure: Option<RemoteWarehouseError>,
}

impl FakeWarehouse {
    /// Returns a fake with a small catalog and one result row.
    pub fn with_catalog() -> Self {
        Self {
            rows: vec![row(&[("x", json!(1))])],
            ..Self::default()
        }
    }

    /// Returns a fake whose every call fails remotely.
    pub fn failing() -> Self {
        Self {
            failure: Some(RemoteWarehouseError::new(403, "Forbidden", "access denied")),
            ..Self::default()
        }
    }

    /// Returns the calls observed so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Records a call and returns the scripted failure, if any.
    fn record(&self, call: String) -> Result<(), RemoteWarehouseError> {
        self.calls.lock().expect("calls lock").push(call);
        self.failure.clone().map_or(Ok(()), Err)
    }
}

#[async_trait]
impl WarehouseClient for FakeWarehouse {
    async fn run_query(&self, statement: &str) -> Result<Vec<Row>, RemoteWarehouseError> {
        self.record(format!("query:{statement}"))?;
        Ok(self.rows.clone())
    }

    async fn list_projects(&self) -> Result<Vec<ProjectId>, RemoteWarehouseError> {
        self.record("projects".to_string())?;
        Ok(vec![ProjectId::new("alpha"), ProjectId::new("beta")])
    }

    async fn list_datasets(
        &self,
        project: &ProjectId,
    ) -> Result<Vec<DatasetId>, RemoteWarehouseError> {
        self.record(format!("datasets:{project}"))?;
        Ok(vec![DatasetId::new("sales")])
    }

    async fn list_tables(
        &self,
        project: &ProjectId,
        dataset: &DatasetId,
    ) -> Result<Vec<TableId>, RemoteWarehouseError> {
        self.record(format!("tables:{project}.{dataset}"))?;
        Ok(vec![TableId::new("orders"), TableId::new("customers")])
    }

    async fn describe_schema(
        &self,
        project: &ProjectId,
        dataset: &DatasetId,
        table: &TableId,
    ) -> Result<TableSchema, RemoteWarehouseError> {
        self.record(format!("schema:{project}.{dataset}.{table}"))?;
        Ok(TableSchema::from_columns(vec![
            ColumnSchema::new("b", "INT64"),
            ColumnSchema::new("a", "STRING"),
        ]))
    }
}

/// Builds a row from `(column, value)` pairs in order.
pub fn row(pairs: &[(&str, Value)]) -> Row {
    pairs.iter().map(|(name, value)| ((*name).to_string(), value.clone())).collect()
}

// ============================================================================
// SECTION: Server Bootstrap
// ============================================================================

/// Builds a validated HTTP config that writes audit lines to `audit_path`.
pub fn gateway_config(audit_path: &Path) -> GatewayConfig {
    let toml = format!(
        "[server]\ntransport = \"http\"\nbind = \"127.0.0.1:0\"\n\n\
         [server.audit]\npath = \"{}\"\n\n\
         [warehouse]\nproject_id = \"billing-project\"\n",
        audit_path.display()
    );
    GatewayConfig::from_toml_str(&toml).expect("gateway config")
}

/// Builds a validated stdio config that writes audit lines to `audit_path`.
pub fn stdio_config(audit_path: &Path) -> GatewayConfig {
    let toml = format!(
        "[server]\ntransport = \"stdio\"\n\n\
         [server.audit]\npath = \"{}\"\n\n\
         [warehouse]\nproject_id = \"billing-project\"\n",
        audit_path.display()
    );
    GatewayConfig::from_toml_str(&toml).expect("stdio config")
}

/// Serves the gateway HTTP application on an ephemeral port.
pub async fn spawn_gateway(config: GatewayConfig, warehouse: Arc<FakeWarehouse>) -> SocketAddr {
    let server = GatewayServer::with_client(config, warehouse).expect("gateway server");
    let app = server.http_router();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Reads audit events written so far.
pub fn audit_events(path: &Path) -> Vec<Value> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(|line| serde_json::from_str(line).expect("audit json"))
        .collect()
}

/// Sends a JSON-RPC request to `/mcp` and returns status plus body.
pub async fn rpc(addr: SocketAddr, body: Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/mcp"))
        .json(&body)
        .send()
        .await
        .expect("rpc send");
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.expect("rpc body");
    (status, body)
}

/// Sends a GET request and returns status plus JSON body.
pub async fn get_json(addr: SocketAddr, path: &str) -> (u16, Value) {
    let response =
        reqwest::get(format!("http://{addr}{path}")).await.expect("http get");
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.expect("json body");
    (status, body)
}
