// crates/bq-gateway-core/src/operations.rs
// ============================================================================
// Module: Gateway Operations
// Description: Canonical operation identifiers and request payloads.
// Purpose: Shared operation naming across the dispatcher, catalog, and transports.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Operation names are part of the external contract surface: they are used
//! as MCP tool names, HTTP route prefixes, and catalog keys. Request payloads
//! carry raw, untrusted parameters; validation happens in the dispatcher.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Operation Names
// ============================================================================

/// Canonical operation names exposed by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OperationName {
    /// Run a read-only SQL statement and return all rows.
    #[serde(rename = "get_data_from_bigquery")]
    RunQuery,
    /// List projects visible to the gateway credentials.
    #[serde(rename = "get_project_list_from_bigquery")]
    ListProjects,
    /// List datasets in a project.
    #[serde(rename = "get_dataset_list_from_bigquery")]
    ListDatasets,
    /// List tables in a dataset.
    #[serde(rename = "get_table_list_from_bigquery")]
    ListTables,
    /// Describe a table's column names and declared types.
    #[serde(rename = "get_table_schema_from_bigquery")]
    DescribeSchema,
    /// Train a logistic regression model.
    #[serde(rename = "create_logistic_reg_model_by_bigquery_ml")]
    CreateModel,
    /// Predict labels with a trained model.
    #[serde(rename = "predict_by_bigquery_ml")]
    Predict,
}

impl OperationName {
    /// Returns the canonical string name for the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RunQuery => "get_data_from_bigquery",
            Self::ListProjects => "get_project_list_from_bigquery",
            Self::ListDatasets => "get_dataset_list_from_bigquery",
            Self::ListTables => "get_table_list_from_bigquery",
            Self::DescribeSchema => "get_table_schema_from_bigquery",
            Self::CreateModel => "create_logistic_reg_model_by_bigquery_ml",
            Self::Predict => "predict_by_bigquery_ml",
        }
    }

    /// Returns all operation names in canonical order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::RunQuery,
            Self::ListProjects,
            Self::ListDatasets,
            Self::ListTables,
            Self::DescribeSchema,
            Self::CreateModel,
            Self::Predict,
        ]
    }

    /// Parses an operation name from its string representation.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|operation| operation.as_str() == name)
    }
}

impl fmt::Display for OperationName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Request Parameters
// ============================================================================

/// Parameters for [`OperationName::RunQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryParams {
    /// SQL statement text.
    pub query: String,
}

/// Parameters for [`OperationName::ListDatasets`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetListParams {
    /// Project to list datasets from.
    pub project_id: String,
}

/// Parameters for [`OperationName::ListTables`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableListParams {
    /// Project containing the dataset.
    pub project_id: String,
    /// Dataset to list tables from.
    pub dataset_id: String,
}

/// Parameters for [`OperationName::DescribeSchema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableSchemaParams {
    /// Project containing the dataset.
    pub project_id: String,
    /// Dataset containing the table.
    pub dataset_id: String,
    /// Table to describe.
    pub table_id: String,
}

/// Parameters for [`OperationName::CreateModel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateModelParams {
    /// Model name (created or replaced in the dataset).
    pub model_name: String,
    /// Project containing the dataset.
    pub project_id: String,
    /// Dataset holding the training table and the model.
    pub dataset_id: String,
    /// Training table.
    pub train_table_id: String,
    /// Target column used as the label.
    pub target_variable: String,
}

/// Parameters for [`OperationName::Predict`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictParams {
    /// Trained model name.
    pub model_name: String,
    /// Project containing the dataset.
    pub project_id: String,
    /// Dataset holding the test table and the model.
    pub dataset_id: String,
    /// Table with rows to score.
    pub test_table_id: String,
    /// Column used as the row identifier and sort key.
    pub id: String,
    /// Maximum number of predictions returned.
    pub limit: i64,
}

// ============================================================================
// SECTION: Operation Request
// ============================================================================

/// A single operation request with typed, still-unvalidated parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationRequest {
    /// Run a raw query.
    RunQuery(QueryParams),
    /// List projects.
    ListProjects,
    /// List datasets in a project.
    ListDatasets(DatasetListParams),
    /// List tables in a dataset.
    ListTables(TableListParams),
    /// Describe a table schema.
    DescribeSchema(TableSchemaParams),
    /// Train a model.
    CreateModel(CreateModelParams),
    /// Predict with a model.
    Predict(PredictParams),
}

impl OperationRequest {
    /// Returns the operation this request targets.
    #[must_use]
    pub const fn operation(&self) -> OperationName {
        match self {
            Self::RunQuery(_) => OperationName::RunQuery,
            Self::ListProjects => OperationName::ListProjects,
            Self::ListDatasets(_) => OperationName::ListDatasets,
            Self::ListTables(_) => OperationName::ListTables,
            Self::DescribeSchema(_) => OperationName::DescribeSchema,
            Self::CreateModel(_) => OperationName::CreateModel,
            Self::Predict(_) => OperationName::Predict,
        }
    }

    /// Decodes a JSON argument payload for the named operation.
    ///
    /// A `null` payload is accepted for operations without parameters.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when the payload does not match the
    /// operation's parameter shape.
    pub fn from_json(operation: OperationName, payload: Value) -> Result<Self, serde_json::Error> {
        let request = match operation {
            OperationName::RunQuery => Self::RunQuery(serde_json::from_value(payload)?),
            OperationName::ListProjects => {
                if !payload.is_null() {
                    serde_json::from_value::<NoParams>(payload)?;
                }
                Self::ListProjects
            }
            OperationName::ListDatasets => Self::ListDatasets(serde_json::from_value(payload)?),
            OperationName::ListTables => Self::ListTables(serde_json::from_value(payload)?),
            OperationName::DescribeSchema => {
                Self::DescribeSchema(serde_json::from_value(payload)?)
            }
            OperationName::CreateModel => Self::CreateModel(serde_json::from_value(payload)?),
            OperationName::Predict => Self::Predict(serde_json::from_value(payload)?),
        };
        Ok(request)
    }
}

/// Empty parameter object for parameterless operations.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoParams {}

// ============================================================================
// SECTION: Tests
// ============================================================================
