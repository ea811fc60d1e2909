//! File loading tests for bq-gateway-config.
// crates/bq-gateway-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Tests
// Description: Disk loading, size limits, and encoding checks.
// Purpose: Ensure the loader fails closed on unreadable or oversized files.
// =============================================================================

use std::fs;

use bq_gateway_config::ConfigError;
use bq_gateway_config::GatewayConfig;

mod common;

type TestResult = Result<(), String>;

#[test]
fn load_reads_explicit_path() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("bq-gateway.toml");
    fs::write(&path, common::MINIMAL_TOML).map_err(|err| err.to_string())?;
    let config = GatewayConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    if config.source_path.as_deref() != Some(path.as_path()) {
        return Err("source path not recorded".to_string());
    }
    if config.warehouse.project_id != "analytics-prod" {
        return Err("project id not loaded".to_string());
    }
    Ok(())
}

#[test]
fn missing_file_is_io_error() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    match GatewayConfig::load(Some(&dir.path().join("absent.toml"))) {
        Err(ConfigError::Io(_)) => Ok(()),
        other => Err(format!("expected io error, got {other:?}")),
    }
}

#[test]
fn oversized_file_rejected() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("big.toml");
    let mut content = common::MINIMAL_TOML.to_string();
    content.push_str(&"# padding\n".repeat(120_000));
    fs::write(&path, content).map_err(|err| err.to_string())?;
    common::assert_invalid(GatewayConfig::load(Some(&path)), "config file exceeds size limit")
}

#[test]
fn non_utf8_file_rejected() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("latin1.toml");
    fs::write(&path, [0x5b, 0xff, 0xfe, 0x5d]).map_err(|err| err.to_string())?;
    common::assert_invalid(GatewayConfig::load(Some(&path)), "config file must be utf-8")
}

#[test]
fn syntax_error_is_parse_error() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[warehouse\nproject_id = ").map_err(|err| err.to_string())?;
    match GatewayConfig::load(Some(&path)) {
        Err(ConfigError::Parse(_)) => Ok(()),
        other => Err(format!("expected parse error, got {other:?}")),
    }
}
