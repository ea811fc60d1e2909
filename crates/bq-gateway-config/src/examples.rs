// crates/bq-gateway-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payloads.
// Purpose: Deterministic template for `bq-gateway.toml`.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for BQ Gateway configuration. The template is covered by
//! a test that parses and validates it, so it cannot drift from the model.

/// Returns a canonical example `bq-gateway.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[server]
transport = "http"
bind = "127.0.0.1:8000"
max_body_bytes = 1048576

[server.audit]
enabled = true
# path = "/var/log/bq-gateway/audit.jsonl"

[warehouse]
project_id = "bq-sample-project-456713"
location = "US"
api_base_url = "https://bigquery.googleapis.com/bigquery/v2"
connect_timeout_ms = 5000
request_timeout_ms = 30000
job_poll_timeout_ms = 10000
max_results_per_page = 10000

[warehouse.auth]
type = "access_token_env"
env = "BQ_GATEWAY_ACCESS_TOKEN"
# type = "access_token_file"
# path = "/app/secrets/bq-access-token"
# type = "metadata_server"

[safety]
denylist = ["DROP", "DELETE", "UPDATE"]
check_generated_statements = true

[models]
max_predict_rows = 10000

[capabilities]
name = "BigQuery MCP"
description = "MCP server for BigQuery"
base_url = "http://localhost:8000"
"#,
    )
}
