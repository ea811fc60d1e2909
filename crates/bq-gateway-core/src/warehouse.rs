// crates/bq-gateway-core/src/warehouse.rs
// ============================================================================
// Module: Warehouse Client Interface
// Description: Backend-agnostic contract for the remote warehouse.
// Purpose: Define the only surface through which the core reaches the warehouse.
// Dependencies: async-trait, thiserror
// ============================================================================

//! ## Overview
//! [`WarehouseClient`] is the narrow adapter the dispatcher calls. Every
//! method resolves only once the remote operation reaches a terminal state;
//! job handles and pagination stay inside the implementation. Implementations
//! must not retry: failures surface immediately as [`RemoteWarehouseError`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::identifiers::DatasetId;
use crate::identifiers::ProjectId;
use crate::identifiers::TableId;
use crate::results::Row;
use crate::results::TableSchema;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure reported by (or while reaching) the remote warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("warehouse error ({status} {reason}): {message}")]
pub struct RemoteWarehouseError {
    /// Remote status code; `0` when no response was received.
    pub status: u16,
    /// Remote status label (e.g. `NOT_FOUND`, `transport`).
    pub reason: String,
    /// Remote error message.
    pub message: String,
}

impl RemoteWarehouseError {
    /// Creates a remote error.
    #[must_use]
    pub fn new(status: u16, reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
            message: message.into(),
        }
    }

    /// Creates an error for failures before any response arrived.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(0, "transport", message)
    }
}

// ============================================================================
// SECTION: Client Trait
// ============================================================================

/// Remote warehouse operations used by the dispatcher.
#[async_trait]
pub trait WarehouseClient: Send + Sync {
    /// Submits a statement, waits for the job to finish, and returns every row.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteWarehouseError`] when submission, polling, or paging fails.
    async fn run_query(&self, statement: &str) -> Result<Vec<Row>, RemoteWarehouseError>;

    /// Lists project identifiers visible to the credentials.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteWarehouseError`] when the listing fails.
    async fn list_projects(&self) -> Result<Vec<ProjectId>, RemoteWarehouseError>;

    /// Lists dataset identifiers in a project.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteWarehouseError`] when the listing fails.
    async fn list_datasets(
        &self,
        project: &ProjectId,
    ) -> Result<Vec<DatasetId>, RemoteWarehouseError>;

    /// Lists table identifiers in a dataset.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteWarehouseError`] when the listing fails.
    async fn list_tables(
        &self,
        project: &ProjectId,
        dataset: &DatasetId,
    ) -> Result<Vec<TableId>, RemoteWarehouseError>;

    /// Fetches a table's schema in declared column order.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteWarehouseError`] when the table cannot be read.
    async fn describe_schema(
        &self,
        project: &ProjectId,
        dataset: &DatasetId,
        table: &TableId,
    ) -> Result<TableSchema, RemoteWarehouseError>;
}

/// Shared, immutable warehouse client handle.
pub type SharedWarehouseClient = Arc<dyn WarehouseClient>;
