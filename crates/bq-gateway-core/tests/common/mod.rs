// crates/bq-gateway-core/tests/common/mod.rs
// ============================================================================
// Module: Core Test Fixtures
// Description: Recording warehouse client used by dispatcher tests.
// ============================================================================
//! ## Overview
//! Provides a scripted [`WarehouseClient`] that records every call so tests
//! can assert which requests reached the warehouse.

#![allow(dead_code, reason = "Fixtures are shared across test binaries.")]

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use bq_gateway_core::DatasetId;
use bq_gateway_core::ProjectId;
use bq_gateway_core::RemoteWarehouseError;
use bq_gateway_core::Row;
use bq_gateway_core::TableId;
use bq_gateway_core::TableSchema;
use bq_gateway_core::WarehouseClient;

// ============================================================================
// SECTION: Recorded Calls
// ============================================================================

/// Calls observed by [`RecordingClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `run_query` with the statement text.
    Query(String),
    /// `list_projects`.
    Projects,
    /// `list_datasets` for a project.
    Datasets(String),
    /// `list_tables` for a project and dataset.
    Tables(String, String),
    /// `describe_schema` for a table.
    Schema(String, String, String),
}

// ============================================================================
// SECTION: Recording Client
// ============================================================================

/// Scripted warehouse client.
#[derive(Default)]
pub struct RecordingClient {
    /// Observed calls in order.
    pub calls: Mutex<Vec<Call>>,
    /// Rows returned from `run_query`.
    pub rows: Vec<Row>,
    /// Projects returned from `list_projects`.
    pub projects: Vec<ProjectId>,
    /// Datasets returned from `list_datasets`.
    pub datasets: Vec<DatasetId>,
    /// Tables returned from `list_tables`.
    pub tables: Vec<TableId>,
    /// Schema returned from `describe_schema`.
    pub schema: TableSchema,
    /// Error returned from every call when set.
    pub failure: Option<RemoteWarehouseError>,
}

impl RecordingClient {
    /// Wraps the client for injection while keeping a handle for assertions.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Returns the calls observed so far.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Records a call and returns the scripted failure, if any.
    fn record(&self, call: Call) -> Result<(), RemoteWarehouseError> {
        self.calls.lock().expect("calls lock").push(call);
        self.failure.clone().map_or(Ok(()), Err)
    }
}

#[async_trait]
impl WarehouseClient for RecordingClient {
    async fn run_query(&self, statement: &str) -> Result<Vec<Row>, RemoteWarehouseError> {
        self.record(Call::Query(statement.to_string()))?;
        Ok(self.rows.clone())
    }

    async fn list_projects(&self) -> Result<Vec<ProjectId>, RemoteWarehouseError> {
        self.record(Call::Projects)?;
        Ok(self.projects.clone())
    }

    async fn list_datasets(
        &self,
        project: &ProjectId,
    ) -> Result<Vec<DatasetId>, RemoteWarehouseError> {
        self.record(Call::Datasets(project.to_string()))?;
        Ok(self.datasets.clone())
    }

    async fn list_tables(
        &self,
        project: &ProjectId,
        dataset: &DatasetId,
    ) -> Result<Vec<TableId>, RemoteWarehouseError> {
        self.record(Call::Tables(project.to_string(), dataset.to_string()))?;
        Ok(self.tables.clone())
    }

    async fn describe_schema(
        &self,
        project: &ProjectId,
        dataset: &DatasetId,
        table: &TableId,
    ) -> Result<TableSchema, RemoteWarehouseError> {
        self.record(Call::Schema(project.to_string(), dataset.to_string(), table.to_string()))?;
        Ok(self.schema.clone())
    }
}

/// Builds a row from `(column, value)` pairs in order.
pub fn row(pairs: &[(&str, serde_json::Value)]) -> Row {
    pairs.iter().map(|(name, value)| ((*name).to_string(), value.clone())).collect()
}
