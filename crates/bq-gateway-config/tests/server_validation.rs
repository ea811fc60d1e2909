//! Server and warehouse validation tests for bq-gateway-config.
// crates/bq-gateway-config/tests/server_validation.rs
// =============================================================================
// Module: Server and Warehouse Validation Tests
// Description: Transport, bind, timeout, and credential source checks.
// Purpose: Ensure invalid deployments fail closed before startup.
// =============================================================================

use bq_gateway_config::ServerTransport;
use bq_gateway_config::WarehouseAuthConfig;

mod common;

type TestResult = Result<(), String>;

#[test]
fn stdio_transport_rejects_bind() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.server.transport = ServerTransport::Stdio;
    config.server.bind = Some("127.0.0.1:9000".to_string());
    common::assert_invalid(config.validate(), "stdio transport does not accept a bind address")
}

#[test]
fn http_transport_rejects_unparseable_bind() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.server.bind = Some("localhost".to_string());
    common::assert_invalid(config.validate(), "invalid bind address")
}

#[test]
fn zero_body_limit_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.server.max_body_bytes = 0;
    common::assert_invalid(config.validate(), "max_body_bytes must be greater than zero")
}

#[test]
fn malformed_billing_project_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.warehouse.project_id = "My Project".to_string();
    common::assert_invalid(config.validate(), "warehouse.project_id")
}

#[test]
fn plain_http_base_url_requires_opt_in() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.warehouse.api_base_url = "http://127.0.0.1:9050/bigquery/v2".to_string();
    common::assert_invalid(config.validate(), "without allow_http")?;
    config.warehouse.allow_http = true;
    config.validate().map_err(|err| err.to_string())
}

#[test]
fn poll_wait_must_fit_inside_request_timeout() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.warehouse.job_poll_timeout_ms = 30_000;
    config.warehouse.request_timeout_ms = 30_000;
    common::assert_invalid(config.validate(), "job_poll_timeout_ms must be less than")
}

#[test]
fn connect_timeout_out_of_range_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.warehouse.connect_timeout_ms = 10;
    common::assert_invalid(config.validate(), "warehouse.connect_timeout_ms must be between")
}

#[test]
fn lowercase_token_env_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.warehouse.auth = WarehouseAuthConfig::AccessTokenEnv {
        env: "bq_token".to_string(),
    };
    common::assert_invalid(config.validate(), "warehouse.auth.env")
}

#[test]
fn metadata_server_auth_parses_with_default_endpoint() -> TestResult {
    let config = common::config_from_toml(
        "[warehouse]\nproject_id = \"p\"\n[warehouse.auth]\ntype = \"metadata_server\"\n",
    )
    .map_err(|err| err.to_string())?;
    match config.warehouse.auth {
        WarehouseAuthConfig::MetadataServer {
            endpoint,
        } if endpoint.starts_with("http://metadata.google.internal/") => Ok(()),
        other => Err(format!("unexpected auth {other:?}")),
    }
}

#[test]
fn empty_denylist_entry_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.safety.denylist.push("  ".to_string());
    common::assert_invalid(config.validate(), "safety.denylist entries must be non-empty")
}

#[test]
fn denylist_must_keep_default_tokens() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.safety.denylist = vec!["DROP".to_string(), "DELETE".to_string()];
    common::assert_invalid(config.validate(), "safety.denylist must include UPDATE")
}

#[test]
fn predict_row_ceiling_enforced() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.models.max_predict_rows = 100_001;
    common::assert_invalid(config.validate(), "models.max_predict_rows")?;
    config.models.max_predict_rows = 0;
    common::assert_invalid(config.validate(), "models.max_predict_rows")
}
