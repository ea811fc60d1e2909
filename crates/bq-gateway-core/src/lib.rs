// crates/bq-gateway-core/src/lib.rs
// ============================================================================
// Module: BQ Gateway Core Library
// Description: Public API surface for the BQ Gateway core.
// Purpose: Expose operation types, the warehouse interface, and the dispatcher.
// Dependencies: async-trait, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! BQ Gateway core is the boundary layer between external callers and a remote
//! data warehouse. It validates operation requests, guards raw statements with
//! a denylist filter, builds model lifecycle statements from validated
//! identifiers, and shapes warehouse results into a uniform envelope. The
//! warehouse itself is reached only through [`WarehouseClient`], so the core
//! holds no connection state of its own.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod dispatcher;
pub mod identifiers;
pub mod operations;
pub mod results;
pub mod safety;
pub mod statements;
pub mod warehouse;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use dispatcher::DEFAULT_MAX_PREDICT_ROWS;
pub use dispatcher::DispatchError;
pub use dispatcher::DispatchPolicy;
pub use dispatcher::Dispatcher;
pub use identifiers::ColumnName;
pub use identifiers::DatasetId;
pub use identifiers::IdentifierError;
pub use identifiers::IdentifierKind;
pub use identifiers::ModelId;
pub use identifiers::ProjectId;
pub use identifiers::TableId;
pub use operations::CreateModelParams;
pub use operations::DatasetListParams;
pub use operations::OperationName;
pub use operations::OperationRequest;
pub use operations::PredictParams;
pub use operations::QueryParams;
pub use operations::TableListParams;
pub use operations::TableSchemaParams;
pub use results::ColumnSchema;
pub use results::OperationPayload;
pub use results::OperationResult;
pub use results::Prediction;
pub use results::Rejection;
pub use results::RejectionKind;
pub use results::Row;
pub use results::TableSchema;
pub use safety::DEFAULT_DENYLIST;
pub use safety::SafetyFilter;
pub use safety::SafetyVerdict;
pub use safety::UNSAFE_QUERY_REASON;
pub use statements::GeneratedStatement;
pub use statements::ModelTrainingSpec;
pub use statements::PredictionSpec;
pub use warehouse::RemoteWarehouseError;
pub use warehouse::SharedWarehouseClient;
pub use warehouse::WarehouseClient;
