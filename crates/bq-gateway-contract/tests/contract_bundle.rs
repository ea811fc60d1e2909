// crates/bq-gateway-contract/tests/contract_bundle.rs
// ============================================================================
// Module: Contract Bundle Tests
// Description: Tests for deterministic contract bundle generation.
// Purpose: Validate stable outputs and the verification workflow.
// Dependencies: bq-gateway-contract, tempfile
// ============================================================================

//! ## Overview
//! These tests ensure contract generation is deterministic and that the
//! verification routine succeeds against freshly generated artifacts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use bq_gateway_contract::ContractBuilder;
use bq_gateway_contract::types::ArtifactDigest;

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Ensures contract bundle generation is deterministic.
#[test]
fn contract_bundle_is_deterministic() -> Result<(), Box<dyn std::error::Error>> {
    let builder = ContractBuilder::default();
    let first = builder.build()?;
    let second = builder.build()?;
    if first != second {
        return Err("contract bundle is not deterministic".into());
    }
    Ok(())
}

/// Ensures generated artifacts can be verified in place.
#[test]
fn contract_bundle_verifies() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let builder = ContractBuilder::new(temp.path().to_path_buf());
    builder.write()?;
    builder.verify_output(temp.path())?;
    Ok(())
}

/// Ensures the manifest lists artifacts sorted by path with matching digests.
#[test]
fn manifest_digests_match_artifacts() -> Result<(), Box<dyn std::error::Error>> {
    let bundle = ContractBuilder::default().build()?;
    let paths: Vec<&str> =
        bundle.manifest.artifacts.iter().map(|artifact| artifact.path.as_str()).collect();
    if paths != ["examples/bq-gateway.toml", "tooling.json", "tooling.md", "tools.json"] {
        return Err(format!("unexpected artifact paths: {}", paths.join(", ")).into());
    }
    for (entry, artifact) in bundle.manifest.artifacts.iter().zip(&bundle.artifacts) {
        if entry.digest != ArtifactDigest::sha256(&artifact.bytes) {
            return Err(format!("digest mismatch for {}", entry.path).into());
        }
    }
    Ok(())
}

/// Ensures verification fails when the output directory is missing.
#[test]
fn verify_output_requires_existing_dir() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let missing = temp.path().join("missing");
    let builder = ContractBuilder::new(missing.clone());
    if builder.verify_output(&missing).is_ok() {
        return Err("expected missing output dir to fail verification".into());
    }
    Ok(())
}
