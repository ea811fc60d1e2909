// crates/bq-gateway-contract/src/tooling/tests.rs
// ============================================================================
// Module: Tooling Schema Unit Tests
// Description: Validates tool examples against their JSON schemas.
// Purpose: Keep contract examples in sync with schema definitions.
// Dependencies: bq-gateway-contract, jsonschema, serde_json
// ============================================================================

//! ## Overview
//! Verifies that tool input/output examples satisfy their JSON schemas and
//! that the rendered docs mention every operation.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::missing_docs_in_private_items,
    reason = "Test-only validation helpers use panic-based assertions for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use bq_gateway_config::CapabilitiesConfig;
use jsonschema::Draft;
use jsonschema::Validator;
use serde_json::Value;
use serde_json::json;

use super::capability_catalog;
use super::tool_contracts;
use super::tool_definitions;
use super::tool_examples;
use super::tooling_markdown;
use crate::types::ToolName;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

fn compile_schema(schema: &Value) -> Validator {
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(schema)
        .expect("schema compilation failed")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn tool_examples_match_tool_schemas() {
    for contract in tool_contracts() {
        let input_schema = compile_schema(&contract.input_schema);
        let output_schema = compile_schema(&contract.output_schema);
        let examples = tool_examples(contract.name);
        assert!(!examples.is_empty(), "tool examples missing for {}", contract.name);
        for example in examples {
            assert!(
                input_schema.is_valid(&example.input),
                "input example failed for {}",
                contract.name
            );
            assert!(
                output_schema.is_valid(&example.output),
                "output example failed for {}",
                contract.name
            );
        }
    }
}

#[test]
fn contracts_follow_canonical_order() {
    let names: Vec<ToolName> = tool_contracts().iter().map(|contract| contract.name).collect();
    assert_eq!(names, ToolName::all().to_vec());
}

#[test]
fn input_schemas_reject_unknown_fields() {
    let contracts = tool_contracts();
    let datasets = contracts
        .iter()
        .find(|contract| contract.name == ToolName::ListDatasets)
        .expect("list datasets contract");
    let validator = compile_schema(&datasets.input_schema);
    assert!(validator.is_valid(&json!({ "project_id": "p" })));
    assert!(!validator.is_valid(&json!({ "project_id": "p", "extra": 1 })));
    assert!(!validator.is_valid(&json!({ "project_id": "" })));
}

#[test]
fn output_schemas_accept_business_rejections() {
    for contract in tool_contracts() {
        let validator = compile_schema(&contract.output_schema);
        assert!(
            validator.is_valid(&json!({ "error": "project_id must not be empty" })),
            "rejection shape failed for {}",
            contract.name
        );
        assert!(!validator.is_valid(&json!({ "unexpected": true })));
    }
}

#[test]
fn predict_limit_must_be_positive() {
    let contract = tool_contracts()
        .into_iter()
        .find(|contract| contract.name == ToolName::Predict)
        .expect("predict contract");
    let validator = compile_schema(&contract.input_schema);
    let mut input = json!({
        "model_name": "m",
        "project_id": "p",
        "dataset_id": "d",
        "test_table_id": "t",
        "id": "row_id",
        "limit": 0
    });
    assert!(!validator.is_valid(&input));
    input["limit"] = json!(5);
    assert!(validator.is_valid(&input));
}

#[test]
fn tool_definitions_use_mcp_field_names() {
    let definitions = tool_definitions();
    assert_eq!(definitions.len(), ToolName::all().len());
    let value = serde_json::to_value(&definitions[0]).expect("serialize definition");
    assert_eq!(value["name"], json!("get_data_from_bigquery"));
    assert!(value.get("inputSchema").is_some());
    assert!(value.get("input_schema").is_none());
}

#[test]
fn markdown_lists_every_operation() {
    let contracts = tool_contracts();
    let markdown = tooling_markdown(&contracts);
    for name in ToolName::all() {
        assert!(markdown.contains(&format!("## {name}")), "missing section for {name}");
    }
    assert!(markdown.contains("- `query` (string, required)"));
    assert!(markdown.contains("- `query_results` (array, required)"));
}

#[test]
fn catalog_carries_configured_metadata() {
    let metadata = CapabilitiesConfig {
        name: String::from("Warehouse Tools"),
        description: String::from("Internal analytics gateway"),
        base_url: String::from("https://gateway.example.test"),
    };
    let catalog = capability_catalog(&metadata);
    assert_eq!(catalog.name, "Warehouse Tools");
    assert_eq!(catalog.base_url, "https://gateway.example.test");
    assert_eq!(catalog.tools.len(), 7);
    assert_eq!(catalog.contract_version, env!("CARGO_PKG_VERSION"));
}
