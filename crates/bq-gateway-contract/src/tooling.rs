// crates/bq-gateway-contract/src/tooling.rs
// ============================================================================
// Module: Operation Tool Contracts
// Description: Canonical tool definitions and schemas for BQ Gateway.
// Purpose: Provide tool contracts for the catalog, docs, and MCP listing.
// Dependencies: bq-gateway-config, bq-gateway-core, serde_json
// ============================================================================

//! ## Overview
//! This module defines the canonical operation surface. Tool contracts drive
//! the MCP tool listing, the `/capabilities` catalog, and the generated docs.
//! Nothing here executes an operation; contracts are pure data.
//! Security posture: tool inputs are untrusted and validated by the dispatcher.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use bq_gateway_config::CapabilitiesConfig;
use bq_gateway_core::UNSAFE_QUERY_REASON;
use serde_json::Value;
use serde_json::json;

use crate::types::CapabilityCatalog;
use crate::types::ToolContract;
// ============================================================================
// SECTION: Re-Exports
// ============================================================================
/// Tool definition shape used by MCP tool listings.
pub use crate::types::ToolDefinition;
use crate::types::ToolExample;
use crate::types::ToolName;

/// JSON Schema dialect used by every contract schema.
const SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

// ============================================================================
// SECTION: Tool Contracts
// ============================================================================

/// Returns the canonical tool contracts.
///
/// The order matches [`ToolName::all`] and is preserved in generated docs.
#[must_use]
pub fn tool_contracts() -> Vec<ToolContract> {
    ToolName::all().iter().copied().map(tool_contract).collect()
}

/// Builds the contract for a single operation.
#[must_use]
pub fn tool_contract(name: ToolName) -> ToolContract {
    match name {
        ToolName::RunQuery => run_query_contract(),
        ToolName::ListProjects => list_projects_contract(),
        ToolName::ListDatasets => list_datasets_contract(),
        ToolName::ListTables => list_tables_contract(),
        ToolName::DescribeSchema => describe_schema_contract(),
        ToolName::CreateModel => create_model_contract(),
        ToolName::Predict => predict_contract(),
    }
}

/// Builds the tool contract for `get_data_from_bigquery`.
fn run_query_contract() -> ToolContract {
    ToolContract {
        name: ToolName::RunQuery,
        description: "Run a read-only GoogleSQL query and return every result row.".to_string(),
        http_route: "GET /get_data_from_bigquery/{query}".to_string(),
        input_schema: tool_input_schema(
            &json!({
                "query": {
                    "type": "string",
                    "minLength": 1,
                    "description": "GoogleSQL statement text."
                }
            }),
            &["query"],
        ),
        output_schema: tool_output_schema(
            &json!({
                "query_results": {
                    "type": "array",
                    "items": { "type": "object" },
                    "description": "Result rows; keys follow the result column order."
                }
            }),
            &["query_results"],
        ),
        examples: tool_examples(ToolName::RunQuery),
        notes: vec![
            "Statements containing DROP, DELETE, or UPDATE anywhere are rejected before \
             execution, including inside literals and comments."
                .to_string(),
            "The filter is case-sensitive; grant the gateway a read-only credential as the real \
             enforcement boundary."
                .to_string(),
            "Blocks until the job completes and all result pages are read.".to_string(),
            "TIMESTAMP values are returned as RFC 3339 strings.".to_string(),
        ],
    }
}

/// Builds the tool contract for `get_project_list_from_bigquery`.
fn list_projects_contract() -> ToolContract {
    ToolContract {
        name: ToolName::ListProjects,
        description: "List the projects visible to the gateway credentials.".to_string(),
        http_route: "GET /get_project_list_from_bigquery".to_string(),
        input_schema: tool_input_schema(&json!({}), &[]),
        output_schema: tool_output_schema(
            &json!({ "projects": schema_for_string_array("Project identifiers.") }),
            &["projects"],
        ),
        examples: tool_examples(ToolName::ListProjects),
        notes: vec!["Follows every listing page before returning.".to_string()],
    }
}

/// Builds the tool contract for `get_dataset_list_from_bigquery`.
fn list_datasets_contract() -> ToolContract {
    ToolContract {
        name: ToolName::ListDatasets,
        description: "List the datasets in a project.".to_string(),
        http_route: "GET /get_dataset_list_from_bigquery/{project_id}".to_string(),
        input_schema: tool_input_schema(
            &json!({ "project_id": schema_identifier("Project identifier.") }),
            &["project_id"],
        ),
        output_schema: tool_output_schema(
            &json!({ "datasets": schema_for_string_array("Dataset identifiers.") }),
            &["datasets"],
        ),
        examples: tool_examples(ToolName::ListDatasets),
        notes: vec![
            "An empty project_id is rejected without contacting the warehouse.".to_string(),
        ],
    }
}

/// Builds the tool contract for `get_table_list_from_bigquery`.
fn list_tables_contract() -> ToolContract {
    ToolContract {
        name: ToolName::ListTables,
        description: "List the tables in a dataset.".to_string(),
        http_route: "GET /get_table_list_from_bigquery/{project_id}/{dataset_id}".to_string(),
        input_schema: tool_input_schema(
            &json!({
                "project_id": schema_identifier("Project identifier."),
                "dataset_id": schema_identifier("Dataset identifier.")
            }),
            &["project_id", "dataset_id"],
        ),
        output_schema: tool_output_schema(
            &json!({ "tables": schema_for_string_array("Table identifiers.") }),
            &["tables"],
        ),
        examples: tool_examples(ToolName::ListTables),
        notes: vec!["Empty identifiers are rejected without contacting the warehouse.".to_string()],
    }
}

/// Builds the tool contract for `get_table_schema_from_bigquery`.
fn describe_schema_contract() -> ToolContract {
    ToolContract {
        name: ToolName::DescribeSchema,
        description: "Describe a table's column names and declared types.".to_string(),
        http_route: "GET /get_table_schema_from_bigquery/{project_id}/{dataset_id}/{table_id}"
            .to_string(),
        input_schema: tool_input_schema(
            &json!({
                "project_id": schema_identifier("Project identifier."),
                "dataset_id": schema_identifier("Dataset identifier."),
                "table_id": schema_identifier("Table identifier.")
            }),
            &["project_id", "dataset_id", "table_id"],
        ),
        output_schema: tool_output_schema(
            &json!({
                "schema": {
                    "type": "object",
                    "additionalProperties": { "type": "string" },
                    "description": "Column name to declared type, in table column order."
                }
            }),
            &["schema"],
        ),
        examples: tool_examples(ToolName::DescribeSchema),
        notes: vec![
            "Nested RECORD columns report their top-level type only.".to_string(),
            "Empty identifiers are rejected without contacting the warehouse.".to_string(),
        ],
    }
}

/// Builds the tool contract for `create_logistic_reg_model_by_bigquery_ml`.
fn create_model_contract() -> ToolContract {
    ToolContract {
        name: ToolName::CreateModel,
        description: "Train (or replace) a logistic regression model on a table.".to_string(),
        http_route: "GET /create_logistic_reg_model_by_bigquery_ml/{model_name}/{project_id}/\
                     {dataset_id}/{train_table_id}/{target_variable}"
            .to_string(),
        input_schema: tool_input_schema(
            &json!({
                "model_name": schema_identifier("Model name (letters, digits, underscores)."),
                "project_id": schema_identifier("Project identifier."),
                "dataset_id": schema_identifier("Dataset holding the table and the model."),
                "train_table_id": schema_identifier("Training table identifier."),
                "target_variable": schema_identifier("Label column name.")
            }),
            &["model_name", "project_id", "dataset_id", "train_table_id", "target_variable"],
        ),
        output_schema: tool_output_schema(
            &json!({
                "model_name": {
                    "type": "string",
                    "description": "Fully qualified model name (project.dataset.model)."
                },
                "status": { "const": "created", "description": "Completion status." }
            }),
            &["model_name", "status"],
        ),
        examples: tool_examples(ToolName::CreateModel),
        notes: vec![
            "Every column other than the target is used as a feature.".to_string(),
            "Identifiers must match strict shape rules before they are embedded in SQL."
                .to_string(),
            "Blocks for the full training duration; there is no progress reporting.".to_string(),
        ],
    }
}

/// Builds the tool contract for `predict_by_bigquery_ml`.
fn predict_contract() -> ToolContract {
    ToolContract {
        name: ToolName::Predict,
        description: "Score a table with a trained model and return predicted labels."
            .to_string(),
        http_route: "GET /predict_by_bigquery_ml/{model_name}/{project_id}/{dataset_id}/\
                     {test_table_id}/{id}?limit={limit}"
            .to_string(),
        input_schema: tool_input_schema(
            &json!({
                "model_name": schema_identifier("Trained model name."),
                "project_id": schema_identifier("Project identifier."),
                "dataset_id": schema_identifier("Dataset holding the table and the model."),
                "test_table_id": schema_identifier("Table with rows to score."),
                "id": schema_identifier("Row identifier column; also the sort key."),
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Maximum number of predictions returned."
                }
            }),
            &["model_name", "project_id", "dataset_id", "test_table_id", "id", "limit"],
        ),
        output_schema: tool_output_schema(
            &json!({
                "predictions": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["id", "predicted_label"],
                        "properties": {
                            "id": { "description": "Row identifier value." },
                            "predicted_label": { "description": "Predicted label value." }
                        },
                        "additionalProperties": false
                    },
                    "description": "Predictions ordered by the id column."
                }
            }),
            &["predictions"],
        ),
        examples: tool_examples(ToolName::Predict),
        notes: vec![
            "limit is capped by models.max_predict_rows in the server configuration.".to_string(),
            "Results are ordered by the id column and contain at most limit entries.".to_string(),
        ],
    }
}

/// Returns the MCP tool definitions for tool listing.
#[must_use]
pub fn tool_definitions() -> Vec<ToolDefinition> {
    tool_contracts()
        .into_iter()
        .map(|contract| ToolDefinition {
            name: contract.name,
            description: contract.description,
            input_schema: contract.input_schema,
        })
        .collect()
}

/// Builds the capability catalog published at `/capabilities`.
#[must_use]
pub fn capability_catalog(metadata: &CapabilitiesConfig) -> CapabilityCatalog {
    CapabilityCatalog {
        name: metadata.name.clone(),
        description: metadata.description.clone(),
        base_url: metadata.base_url.clone(),
        contract_version: env!("CARGO_PKG_VERSION").to_string(),
        tools: tool_contracts(),
    }
}

// ============================================================================
// SECTION: Markdown
// ============================================================================

/// Builds markdown documentation for the tool contracts.
#[must_use]
pub fn tooling_markdown(contracts: &[ToolContract]) -> String {
    let mut out = String::new();
    out.push_str("# BQ Gateway Operations\n\n");
    out.push_str("Each operation is available as an MCP tool and as an HTTP GET route. ");
    out.push_str("Full schemas are in `tooling.json`; a configuration template is in ");
    out.push_str("`examples/bq-gateway.toml`.\n\n");
    out.push_str("Business rejections (empty identifiers, unsafe statements) return ");
    out.push_str("`{\"error\": reason}` with a success status. Warehouse failures are ");
    out.push_str("faults: HTTP 502 or a JSON-RPC error.\n\n");
    out.push_str("| Tool | Route | Description |\n");
    out.push_str("| --- | --- | --- |\n");
    for contract in contracts {
        out.push_str(&format!(
            "| {} | `{}` | {} |\n",
            contract.name, contract.http_route, contract.description
        ));
    }
    out.push('\n');
    for contract in contracts {
        out.push_str(&format!("## {}\n\n{}\n\n", contract.name, contract.description));
        out.push_str(&format!("Route: `{}`\n\n", contract.http_route));
        out.push_str("### Inputs\n\n");
        render_schema_fields(&mut out, &contract.input_schema);
        out.push('\n');
        out.push_str("### Outputs\n\n");
        let success = contract
            .output_schema
            .get("oneOf")
            .and_then(Value::as_array)
            .and_then(|options| options.first())
            .unwrap_or(&contract.output_schema);
        render_schema_fields(&mut out, success);
        out.push_str("- or `error` (string): business rejection reason.\n\n");
        if !contract.notes.is_empty() {
            out.push_str("### Notes\n\n");
            for note in &contract.notes {
                out.push_str("- ");
                out.push_str(note);
                out.push('\n');
            }
            out.push('\n');
        }
        append_tool_examples(&mut out, &contract.examples);
    }
    out
}

/// Render top-level schema fields as markdown bullet points.
fn render_schema_fields(out: &mut String, schema: &Value) {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        out.push_str("_No fields._\n");
        return;
    };
    if properties.is_empty() {
        out.push_str("_No fields._\n");
        return;
    }
    let required = required_field_set(schema);
    for (key, value) in properties {
        let required_label = if required.contains(key) { "required" } else { "optional" };
        let description = value
            .get("description")
            .and_then(Value::as_str)
            .map_or_else(|| String::from("See schema for details."), str::to_string);
        let kind = value.get("type").and_then(Value::as_str).unwrap_or("any");
        out.push_str(&format!("- `{key}` ({kind}, {required_label}): {description}\n"));
    }
}

/// Collect required field names from a JSON schema object.
fn required_field_set(schema: &Value) -> BTreeSet<String> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}

/// Append example input/output payloads for a tool.
fn append_tool_examples(out: &mut String, examples: &[ToolExample]) {
    if examples.is_empty() {
        return;
    }
    out.push_str("### Examples\n\n");
    for example in examples {
        out.push_str(&example.description);
        out.push_str("\n\nInput:\n");
        render_json_block(out, &example.input);
        out.push_str("Output:\n");
        render_json_block(out, &example.output);
    }
}

/// Render a JSON value in a fenced markdown code block.
fn render_json_block(out: &mut String, value: &Value) {
    let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|_| String::from("{}"));
    out.push_str("```json\n");
    out.push_str(&rendered);
    out.push_str("\n```\n\n");
}

// ============================================================================
// SECTION: Examples
// ============================================================================

/// Return example payloads for a tool.
fn tool_examples(tool_name: ToolName) -> Vec<ToolExample> {
    match tool_name {
        ToolName::RunQuery => vec![
            example(
                "Aggregate query.",
                json!({
                    "query": "SELECT region, COUNT(*) AS orders FROM \
                              `bq-sample-project-456713.sales.orders` GROUP BY region"
                }),
                json!({
                    "query_results": [
                        { "region": "emea", "orders": 1204 },
                        { "region": "apac", "orders": 877 }
                    ]
                }),
            ),
            example(
                "Mutating statements are rejected before execution.",
                json!({ "query": "DROP TABLE sales.orders" }),
                json!({ "error": UNSAFE_QUERY_REASON }),
            ),
        ],
        ToolName::ListProjects => vec![example(
            "List projects.",
            json!({}),
            json!({ "projects": ["bq-sample-project-456713", "analytics-prod"] }),
        )],
        ToolName::ListDatasets => vec![example(
            "List datasets in a project.",
            json!({ "project_id": "bq-sample-project-456713" }),
            json!({ "datasets": ["sales", "marketing"] }),
        )],
        ToolName::ListTables => vec![example(
            "List tables in a dataset.",
            json!({ "project_id": "bq-sample-project-456713", "dataset_id": "sales" }),
            json!({ "tables": ["orders", "customers"] }),
        )],
        ToolName::DescribeSchema => vec![example(
            "Describe a table.",
            json!({
                "project_id": "bq-sample-project-456713",
                "dataset_id": "sales",
                "table_id": "customers"
            }),
            json!({
                "schema": {
                    "customer_id": "INTEGER",
                    "name": "STRING",
                    "signup_at": "TIMESTAMP",
                    "churned": "BOOLEAN"
                }
            }),
        )],
        ToolName::CreateModel => vec![
            example(
                "Train a churn model.",
                json!({
                    "model_name": "churn_model",
                    "project_id": "bq-sample-project-456713",
                    "dataset_id": "sales",
                    "train_table_id": "customers_train",
                    "target_variable": "churned"
                }),
                json!({
                    "model_name": "bq-sample-project-456713.sales.churn_model",
                    "status": "created"
                }),
            ),
            example(
                "Identifiers with quote characters are rejected.",
                json!({
                    "model_name": "churn_model",
                    "project_id": "bq-sample-project-456713",
                    "dataset_id": "sales",
                    "train_table_id": "customers_train",
                    "target_variable": "churned` FROM secrets --"
                }),
                json!({ "error": "column contains a disallowed character" }),
            ),
        ],
        ToolName::Predict => vec![example(
            "Predict churn for the first rows of a table.",
            json!({
                "model_name": "churn_model",
                "project_id": "bq-sample-project-456713",
                "dataset_id": "sales",
                "test_table_id": "customers_test",
                "id": "customer_id",
                "limit": 2
            }),
            json!({
                "predictions": [
                    { "id": 1001, "predicted_label": false },
                    { "id": 1002, "predicted_label": true }
                ]
            }),
        )],
    }
}

/// Builds a single example.
fn example(description: &str, input: Value, output: Value) -> ToolExample {
    ToolExample {
        description: description.to_string(),
        input,
        output,
    }
}

// ============================================================================
// SECTION: Schema Helpers (Local)
// ============================================================================

/// Returns a JSON schema for a non-empty identifier string.
fn schema_identifier(description: &str) -> Value {
    json!({
        "type": "string",
        "minLength": 1,
        "description": description
    })
}

/// Returns a JSON schema for string arrays.
fn schema_for_string_array(description: &str) -> Value {
    json!({
        "type": "array",
        "items": { "type": "string" },
        "description": description
    })
}

/// Builds an object schema without the top-level `$schema` annotation.
fn object_schema(properties: &Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "required": required,
        "properties": properties,
        "additionalProperties": false
    })
}

/// Builds the business rejection schema.
fn error_schema() -> Value {
    object_schema(
        &json!({
            "error": { "type": "string", "description": "Business rejection reason." }
        }),
        &["error"],
    )
}

/// Builds a standard tool input schema wrapper.
fn tool_input_schema(properties: &Value, required: &[&str]) -> Value {
    with_schema(object_schema(properties, required))
}

/// Builds a tool output schema: the success shape or a business rejection.
fn tool_output_schema(properties: &Value, required: &[&str]) -> Value {
    with_schema(json!({ "oneOf": [object_schema(properties, required), error_schema()] }))
}

/// Adds a `$schema` header to a top-level JSON schema.
fn with_schema(schema: Value) -> Value {
    let Value::Object(mut map) = schema else {
        return schema;
    };
    map.insert(String::from("$schema"), Value::String(String::from(SCHEMA_DIALECT)));
    Value::Object(map)
}

#[cfg(test)]
mod tests;
