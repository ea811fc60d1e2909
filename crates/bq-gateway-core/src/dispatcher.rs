// crates/bq-gateway-core/src/dispatcher.rs
// ============================================================================
// Module: Operation Dispatcher
// Description: Validates operation requests and routes them to the warehouse.
// Purpose: Single entry point shared by every transport.
// Dependencies: crate::{identifiers, operations, results, safety, statements, warehouse}
// ============================================================================

//! ## Overview
//! The dispatcher owns the per-request flow: validate parameters, guard raw
//! statements with the [`SafetyFilter`], make exactly one warehouse call, and
//! shape the output into an [`OperationResult`]. Validation failures and
//! safety rejections short-circuit to a business result without touching the
//! warehouse. Warehouse failures are faults and surface as [`DispatchError`].
//!
//! Security posture: request parameters are untrusted. Identifiers embedded
//! into generated statements pass strict shape checks first.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::identifiers::DatasetId;
use crate::identifiers::ProjectId;
use crate::identifiers::TableId;
use crate::operations::CreateModelParams;
use crate::operations::DatasetListParams;
use crate::operations::OperationRequest;
use crate::operations::PredictParams;
use crate::operations::QueryParams;
use crate::operations::TableListParams;
use crate::operations::TableSchemaParams;
use crate::results::OperationPayload;
use crate::results::OperationResult;
use crate::results::Prediction;
use crate::results::Row;
use crate::safety::SafetyFilter;
use crate::safety::SafetyVerdict;
use crate::statements::GeneratedStatement;
use crate::statements::ModelTrainingSpec;
use crate::statements::PredictionSpec;
use crate::warehouse::RemoteWarehouseError;
use crate::warehouse::SharedWarehouseClient;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Status label reported after a training statement completes.
const MODEL_CREATED_STATUS: &str = "created";
/// Default upper bound on prediction rows.
pub const DEFAULT_MAX_PREDICT_ROWS: u32 = 10_000;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Faults raised while dispatching an operation.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The warehouse rejected or failed the request.
    #[error(transparent)]
    Remote(#[from] RemoteWarehouseError),
    /// The warehouse returned rows that do not fit the expected shape.
    #[error("unexpected result shape: {0}")]
    ResultShape(String),
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Dispatch-time limits and toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchPolicy {
    /// Run generated model statements through the safety filter too.
    pub check_generated_statements: bool,
    /// Largest prediction limit a caller may request.
    pub max_predict_rows: u32,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            check_generated_statements: true,
            max_predict_rows: DEFAULT_MAX_PREDICT_ROWS,
        }
    }
}

// ============================================================================
// SECTION: Dispatcher
// ============================================================================

/// Routes validated operations to the warehouse client.
#[derive(Clone)]
pub struct Dispatcher {
    /// Warehouse client shared across requests.
    client: SharedWarehouseClient,
    /// Raw statement guard.
    filter: SafetyFilter,
    /// Limits and toggles.
    policy: DispatchPolicy,
}

impl Dispatcher {
    /// Creates a dispatcher over an injected warehouse client.
    #[must_use]
    pub fn new(
        client: SharedWarehouseClient,
        filter: SafetyFilter,
        policy: DispatchPolicy,
    ) -> Self {
        Self {
            client,
            filter,
            policy,
        }
    }

    /// Dispatches one operation and waits for it to reach a terminal state.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when the warehouse fails or returns rows of
    /// an unexpected shape. Validation and safety failures are returned as
    /// [`OperationResult::Rejected`] instead.
    pub async fn dispatch(
        &self,
        request: OperationRequest,
    ) -> Result<OperationResult, DispatchError> {
        match request {
            OperationRequest::RunQuery(params) => self.run_query(params).await,
            OperationRequest::ListProjects => {
                let projects = self.client.list_projects().await?;
                Ok(OperationResult::Success(OperationPayload::Projects {
                    projects,
                }))
            }
            OperationRequest::ListDatasets(params) => self.list_datasets(params).await,
            OperationRequest::ListTables(params) => self.list_tables(params).await,
            OperationRequest::DescribeSchema(params) => self.describe_schema(params).await,
            OperationRequest::CreateModel(params) => self.create_model(params).await,
            OperationRequest::Predict(params) => self.predict(params).await,
        }
    }

    /// Runs a caller-supplied statement after the safety check.
    async fn run_query(&self, params: QueryParams) -> Result<OperationResult, DispatchError> {
        if params.query.trim().is_empty() {
            return Ok(OperationResult::validation("query must not be empty"));
        }
        if let SafetyVerdict::Rejected {
            reason, ..
        } = self.filter.check(&params.query)
        {
            return Ok(OperationResult::safety(reason));
        }
        let query_results = self.client.run_query(&params.query).await?;
        Ok(OperationResult::Success(OperationPayload::QueryResults {
            query_results,
        }))
    }

    /// Lists datasets after a non-empty project check.
    async fn list_datasets(
        &self,
        params: DatasetListParams,
    ) -> Result<OperationResult, DispatchError> {
        if let Some(rejection) = require_present(&[("project_id", &params.project_id)]) {
            return Ok(rejection);
        }
        let project = ProjectId::new(params.project_id);
        let datasets = self.client.list_datasets(&project).await?;
        Ok(OperationResult::Success(OperationPayload::Datasets {
            datasets,
        }))
    }

    /// Lists tables after non-empty identifier checks.
    async fn list_tables(&self, params: TableListParams) -> Result<OperationResult, DispatchError> {
        if let Some(rejection) = require_present(&[
            ("project_id", &params.project_id),
            ("dataset_id", &params.dataset_id),
        ]) {
            return Ok(rejection);
        }
        let project = ProjectId::new(params.project_id);
        let dataset = DatasetId::new(params.dataset_id);
        let tables = self.client.list_tables(&project, &dataset).await?;
        Ok(OperationResult::Success(OperationPayload::Tables {
            tables,
        }))
    }

    /// Describes a table schema after non-empty identifier checks.
    async fn describe_schema(
        &self,
        params: TableSchemaParams,
    ) -> Result<OperationResult, DispatchError> {
        if let Some(rejection) = require_present(&[
            ("project_id", &params.project_id),
            ("dataset_id", &params.dataset_id),
            ("table_id", &params.table_id),
        ]) {
            return Ok(rejection);
        }
        let project = ProjectId::new(params.project_id);
        let dataset = DatasetId::new(params.dataset_id);
        let table = TableId::new(params.table_id);
        let schema = self.client.describe_schema(&project, &dataset, &table).await?;
        Ok(OperationResult::Success(OperationPayload::Schema {
            schema,
        }))
    }

    /// Trains a model through a generated statement.
    async fn create_model(
        &self,
        params: CreateModelParams,
    ) -> Result<OperationResult, DispatchError> {
        let spec = ModelTrainingSpec {
            model: params.model_name.into(),
            project: params.project_id.into(),
            dataset: params.dataset_id.into(),
            train_table: params.train_table_id.into(),
            target_column: params.target_variable.into(),
        };
        let statement = match spec.build() {
            Ok(statement) => statement,
            Err(err) => return Ok(OperationResult::validation(err.to_string())),
        };
        if let Some(rejection) = self.check_generated(&statement) {
            return Ok(rejection);
        }
        self.client.run_query(statement.sql()).await?;
        Ok(OperationResult::Success(OperationPayload::ModelCreated {
            model_name: statement.model_name().to_string(),
            status: MODEL_CREATED_STATUS.to_string(),
        }))
    }

    /// Scores a table with a trained model through a generated statement.
    async fn predict(&self, params: PredictParams) -> Result<OperationResult, DispatchError> {
        let max = self.policy.max_predict_rows;
        let limit = match u32::try_from(params.limit) {
            Ok(limit) if (1..=max).contains(&limit) => limit,
            _ => {
                return Ok(OperationResult::validation(format!(
                    "limit must be between 1 and {max}"
                )));
            }
        };
        let spec = PredictionSpec {
            model: params.model_name.into(),
            project: params.project_id.into(),
            dataset: params.dataset_id.into(),
            test_table: params.test_table_id.into(),
            id_column: params.id.into(),
            limit,
        };
        let statement = match spec.build() {
            Ok(statement) => statement,
            Err(err) => return Ok(OperationResult::validation(err.to_string())),
        };
        if let Some(rejection) = self.check_generated(&statement) {
            return Ok(rejection);
        }
        let rows = self.client.run_query(statement.sql()).await?;
        // The statement's LIMIT is not trusted to bound the adapter's rows.
        let bound = usize::try_from(limit).unwrap_or(usize::MAX);
        let predictions =
            rows.into_iter().take(bound).map(prediction_from_row).collect::<Result<_, _>>()?;
        Ok(OperationResult::Success(OperationPayload::Predictions {
            predictions,
        }))
    }

    /// Applies the safety filter to generated statements when enabled.
    fn check_generated(&self, statement: &GeneratedStatement) -> Option<OperationResult> {
        if !self.policy.check_generated_statements {
            return None;
        }
        match self.filter.check(statement.sql()) {
            SafetyVerdict::Allowed => None,
            SafetyVerdict::Rejected {
                reason, ..
            } => Some(OperationResult::safety(reason)),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns a validation rejection for the first blank field, if any.
fn require_present(fields: &[(&str, &String)]) -> Option<OperationResult> {
    fields
        .iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| OperationResult::validation(format!("{name} must not be empty")))
}

/// Converts a prediction row into a [`Prediction`].
fn prediction_from_row(mut row: Row) -> Result<Prediction, DispatchError> {
    let id = row
        .remove("id")
        .ok_or_else(|| DispatchError::ResultShape("prediction row missing id".to_string()))?;
    let predicted_label = row.remove("predicted_label").ok_or_else(|| {
        DispatchError::ResultShape("prediction row missing predicted_label".to_string())
    })?;
    Ok(Prediction {
        id,
        predicted_label,
    })
}
