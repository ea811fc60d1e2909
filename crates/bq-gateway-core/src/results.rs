// crates/bq-gateway-core/src/results.rs
// ============================================================================
// Module: Operation Results
// Description: Uniform response envelope for gateway operations.
// Purpose: Shape warehouse output and business rejections into one type.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every dispatched operation completes with an [`OperationResult`]: either a
//! success payload or a [`Rejection`] carrying a human-readable reason. The
//! enum makes the two mutually exclusive. Serialization matches the wire
//! shapes callers consume (`{"query_results": [...]}`, `{"error": "..."}`),
//! with column and row order preserved as the warehouse reported it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeMap;
use serde_json::Map;
use serde_json::Value;

use crate::identifiers::DatasetId;
use crate::identifiers::ProjectId;
use crate::identifiers::TableId;

// ============================================================================
// SECTION: Row and Schema Types
// ============================================================================

/// A single result row: column name to decoded value, in column order.
pub type Row = Map<String, Value>;

/// Declared column in a table schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    /// Column name.
    pub name: String,
    /// Declared type string as reported by the warehouse (e.g. `INT64`).
    pub field_type: String,
}

impl ColumnSchema {
    /// Creates a column declaration.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
        }
    }
}

/// Ordered table schema, serialized as a `{name: type}` object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSchema {
    /// Columns in warehouse order.
    columns: Vec<ColumnSchema>,
}

impl TableSchema {
    /// Builds a schema from columns in warehouse order.
    #[must_use]
    pub const fn from_columns(columns: Vec<ColumnSchema>) -> Self {
        Self {
            columns,
        }
    }

    /// Returns the columns in declared order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }
}

impl Serialize for TableSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for column in &self.columns {
            map.serialize_entry(&column.name, &column.field_type)?;
        }
        map.end()
    }
}

/// A single model prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Row identifier taken from the caller-selected id column.
    pub id: Value,
    /// Predicted label.
    pub predicted_label: Value,
}

// ============================================================================
// SECTION: Envelope
// ============================================================================

/// Success payloads, one shape per operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OperationPayload {
    /// Rows returned by a query.
    QueryResults {
        /// Result rows in warehouse order.
        query_results: Vec<Row>,
    },
    /// Project identifiers.
    Projects {
        /// Projects in warehouse order.
        projects: Vec<ProjectId>,
    },
    /// Dataset identifiers.
    Datasets {
        /// Datasets in warehouse order.
        datasets: Vec<DatasetId>,
    },
    /// Table identifiers.
    Tables {
        /// Tables in warehouse order.
        tables: Vec<TableId>,
    },
    /// Table schema.
    Schema {
        /// Column name to declared type.
        schema: TableSchema,
    },
    /// Model training completed.
    ModelCreated {
        /// Fully qualified model name.
        model_name: String,
        /// Completion status label.
        status: String,
    },
    /// Model predictions.
    Predictions {
        /// Predictions ordered by the id column.
        predictions: Vec<Prediction>,
    },
}

/// Business rejection categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    /// A required identifier was missing or malformed.
    Validation,
    /// The statement matched the safety denylist.
    Safety,
}

impl RejectionKind {
    /// Returns a stable label for audit logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Safety => "safety",
        }
    }
}

/// Structured business error returned instead of a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    /// Rejection category (not part of the wire body).
    #[serde(skip)]
    pub kind: RejectionKind,
    /// Human-readable reason.
    #[serde(rename = "error")]
    pub reason: String,
}

/// Outcome of a completed operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OperationResult {
    /// The operation produced a payload.
    Success(OperationPayload),
    /// The request was rejected before reaching the warehouse.
    Rejected(Rejection),
}

impl OperationResult {
    /// Builds a validation rejection.
    #[must_use]
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Rejected(Rejection {
            kind: RejectionKind::Validation,
            reason: reason.into(),
        })
    }

    /// Builds a safety rejection.
    #[must_use]
    pub fn safety(reason: impl Into<String>) -> Self {
        Self::Rejected(Rejection {
            kind: RejectionKind::Safety,
            reason: reason.into(),
        })
    }

    /// Returns the payload when the operation succeeded.
    #[must_use]
    pub const fn payload(&self) -> Option<&OperationPayload> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Rejected(_) => None,
        }
    }

    /// Returns the rejection when the request was refused.
    #[must_use]
    pub const fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Success(_) => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }

    /// Serializes the envelope into a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when a payload value fails to serialize.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
