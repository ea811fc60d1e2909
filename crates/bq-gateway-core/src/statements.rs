// crates/bq-gateway-core/src/statements.rs
// ============================================================================
// Module: Model Lifecycle Statements
// Description: Builders for model training and prediction statements.
// Purpose: Embed only shape-validated, backtick-quoted identifiers into SQL.
// Dependencies: crate::identifiers
// ============================================================================

//! ## Overview
//! Training and prediction are expressed as generated SQL statements executed
//! through the ordinary query path. Every identifier is validated against the
//! strict allow-list for its kind *before* it is quoted and embedded, so no
//! caller-supplied text reaches the statement unchecked.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::identifiers::ColumnName;
use crate::identifiers::DatasetId;
use crate::identifiers::IdentifierError;
use crate::identifiers::IdentifierKind;
use crate::identifiers::ModelId;
use crate::identifiers::ProjectId;
use crate::identifiers::TableId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Model type used for training statements.
const MODEL_TYPE: &str = "LOGISTIC_REG";
/// Alias the target column is renamed to during training.
const LABEL_ALIAS: &str = "label";

// ============================================================================
// SECTION: Generated Statement
// ============================================================================

/// A statement built from validated identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedStatement {
    /// Statement text.
    sql: String,
    /// Fully qualified model name (`project.dataset.model`).
    model_name: String,
}

impl GeneratedStatement {
    /// Returns the statement text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the fully qualified model name the statement targets.
    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

// ============================================================================
// SECTION: Training
// ============================================================================

/// Inputs for a logistic regression training statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTrainingSpec {
    /// Model to create or replace.
    pub model: ModelId,
    /// Project containing the dataset.
    pub project: ProjectId,
    /// Dataset holding the training table and the model.
    pub dataset: DatasetId,
    /// Training table.
    pub train_table: TableId,
    /// Target column used as the label.
    pub target_column: ColumnName,
}

impl ModelTrainingSpec {
    /// Builds the `CREATE OR REPLACE MODEL` statement.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when any identifier fails its shape check.
    pub fn build(&self) -> Result<GeneratedStatement, IdentifierError> {
        IdentifierKind::Project.validate(self.project.as_str())?;
        IdentifierKind::Dataset.validate(self.dataset.as_str())?;
        IdentifierKind::Model.validate(self.model.as_str())?;
        IdentifierKind::Table.validate(self.train_table.as_str())?;
        IdentifierKind::Column.validate(self.target_column.as_str())?;

        let model_name = qualified(&self.project, &self.dataset, self.model.as_str());
        let table_name = qualified(&self.project, &self.dataset, self.train_table.as_str());
        let target = self.target_column.as_str();
        let sql = format!(
            "CREATE OR REPLACE MODEL `{model_name}` OPTIONS(model_type='{MODEL_TYPE}', \
             input_label_cols=['{LABEL_ALIAS}']) AS SELECT * EXCEPT(`{target}`), `{target}` AS \
             {LABEL_ALIAS} FROM `{table_name}`"
        );
        Ok(GeneratedStatement {
            sql,
            model_name,
        })
    }
}

// ============================================================================
// SECTION: Prediction
// ============================================================================

/// Inputs for a prediction statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionSpec {
    /// Trained model.
    pub model: ModelId,
    /// Project containing the dataset.
    pub project: ProjectId,
    /// Dataset holding the test table and the model.
    pub dataset: DatasetId,
    /// Table with rows to score.
    pub test_table: TableId,
    /// Column used as the row identifier and sort key.
    pub id_column: ColumnName,
    /// Maximum number of rows returned; must be positive.
    pub limit: u32,
}

impl PredictionSpec {
    /// Builds the `ML.PREDICT` statement.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when any identifier fails its shape check.
    pub fn build(&self) -> Result<GeneratedStatement, IdentifierError> {
        IdentifierKind::Project.validate(self.project.as_str())?;
        IdentifierKind::Dataset.validate(self.dataset.as_str())?;
        IdentifierKind::Model.validate(self.model.as_str())?;
        IdentifierKind::Table.validate(self.test_table.as_str())?;
        IdentifierKind::Column.validate(self.id_column.as_str())?;

        let model_name = qualified(&self.project, &self.dataset, self.model.as_str());
        let table_name = qualified(&self.project, &self.dataset, self.test_table.as_str());
        let id_column = self.id_column.as_str();
        let limit = self.limit;
        let sql = format!(
            "SELECT `{id_column}` AS id, predicted_label FROM ML.PREDICT(MODEL `{model_name}`, \
             (SELECT * FROM `{table_name}`)) ORDER BY `{id_column}` LIMIT {limit}"
        );
        Ok(GeneratedStatement {
            sql,
            model_name,
        })
    }
}

/// Joins a dataset-scoped resource into `project.dataset.name`.
fn qualified(project: &ProjectId, dataset: &DatasetId, name: &str) -> String {
    format!("{project}.{dataset}.{name}")
}

// ============================================================================
// SECTION: Tests
// ============================================================================
