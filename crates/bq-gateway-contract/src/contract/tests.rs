// crates/bq-gateway-contract/src/contract/tests.rs
// ============================================================================
// Module: Contract Builder Unit Tests
// Description: Unit coverage for contract output safety checks.
// Purpose: Ensure verification fails closed on tampered or unsafe outputs.
// Dependencies: bq-gateway-contract, tempfile, std
// ============================================================================

//! ## Overview
//! Tests verification behavior: size mismatches, stray files, and symlinks.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io;
use std::path::Path;

use super::validate_relative_path;
use crate::ContractBuilder;
use crate::ContractError;

/// Creates a symlink.
#[cfg(unix)]
fn create_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Creates a symlink.
#[cfg(windows)]
fn create_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    if src.is_dir() {
        std::os::windows::fs::symlink_dir(src, dst)
    } else {
        std::os::windows::fs::symlink_file(src, dst)
    }
}

/// Returns true when symlink creation failures should be treated as skip.
fn symlink_error_is_skip(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::PermissionDenied | io::ErrorKind::Unsupported)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn verify_output_rejects_size_mismatch() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let output_dir = temp.path().join("out");
    let builder = ContractBuilder::new(output_dir.clone());
    builder.write()?;

    let bundle = builder.build()?;
    let artifact = bundle.artifacts.first().ok_or("expected at least one artifact")?;
    let artifact_path = output_dir.join(&artifact.path);
    let mut bytes = fs::read(&artifact_path)?;
    bytes.extend_from_slice(b"extra");
    fs::write(&artifact_path, &bytes)?;

    let Err(err) = builder.verify_output(&output_dir) else {
        return Err("expected size mismatch to be rejected".into());
    };
    if !matches!(err, ContractError::Generation(_)) {
        return Err("expected generation error for size mismatch".into());
    }
    Ok(())
}

#[test]
fn verify_output_rejects_stray_files() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let builder = ContractBuilder::new(temp.path().to_path_buf());
    builder.write()?;
    fs::write(temp.path().join("notes.txt"), b"stale")?;

    let Err(err) = builder.verify_output(temp.path()) else {
        return Err("expected stray file to be rejected".into());
    };
    if !err.to_string().contains("unexpected artifact: notes.txt") {
        return Err(format!("unexpected error: {err}").into());
    }
    Ok(())
}

#[test]
fn write_rejects_symlinked_output_dir() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let output_dir = temp.path().join("out");
    fs::create_dir_all(&output_dir)?;

    let link = temp.path().join("out-link");
    if let Err(err) = create_symlink(&output_dir, &link) {
        if symlink_error_is_skip(&err) {
            return Ok(());
        }
        return Err(err.into());
    }

    let builder = ContractBuilder::new(link.clone());
    let Err(err) = builder.write() else {
        return Err("expected symlinked output dir to be rejected".into());
    };
    if !matches!(err, ContractError::OutputPath(_)) {
        return Err("expected OutputPath error for symlinked output dir".into());
    }
    Ok(())
}

#[test]
fn verify_output_rejects_symlinked_artifact_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let output_dir = temp.path().join("out");
    let builder = ContractBuilder::new(output_dir.clone());
    builder.write()?;

    let bundle = builder.build()?;
    let artifact = bundle.artifacts.first().ok_or("expected at least one artifact")?;
    let artifact_path = output_dir.join(&artifact.path);
    let replacement = temp.path().join("replacement.txt");
    fs::write(&replacement, &artifact.bytes)?;
    fs::remove_file(&artifact_path)?;

    if let Err(err) = create_symlink(&replacement, &artifact_path) {
        if symlink_error_is_skip(&err) {
            return Ok(());
        }
        return Err(err.into());
    }

    let Err(err) = builder.verify_output(&output_dir) else {
        return Err("expected symlinked artifact file to be rejected".into());
    };
    if !matches!(err, ContractError::OutputPath(_)) {
        return Err("expected OutputPath error for symlinked artifact".into());
    }
    Ok(())
}

#[test]
fn write_refuses_symlinked_artifact_subdirectory() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let output_dir = temp.path().join("out");
    let outside = temp.path().join("outside");
    fs::create_dir_all(&output_dir)?;
    fs::create_dir_all(&outside)?;

    if let Err(err) = create_symlink(&outside, &output_dir.join("examples")) {
        if symlink_error_is_skip(&err) {
            return Ok(());
        }
        return Err(err.into());
    }

    let builder = ContractBuilder::new(output_dir);
    let Err(err) = builder.write() else {
        return Err("expected symlinked subdirectory to be rejected".into());
    };
    if !matches!(err, ContractError::OutputPath(_)) {
        return Err(format!("expected OutputPath error, got {err}").into());
    }
    if fs::read_dir(&outside)?.next().is_some() {
        return Err("artifact escaped the output directory".into());
    }
    Ok(())
}

#[test]
fn write_replaces_symlinked_artifact_without_touching_target()
-> Result<(), Box<dyn std::error::Error>> {
    let temp = tempfile::tempdir()?;
    let output_dir = temp.path().join("out");
    let builder = ContractBuilder::new(output_dir.clone());
    builder.write()?;

    let victim = temp.path().join("victim.md");
    fs::write(&victim, b"keep")?;
    let artifact_path = output_dir.join("tooling.md");
    fs::remove_file(&artifact_path)?;
    if let Err(err) = create_symlink(&victim, &artifact_path) {
        if symlink_error_is_skip(&err) {
            return Ok(());
        }
        return Err(err.into());
    }

    builder.write()?;
    if fs::read(&victim)? != b"keep" {
        return Err("write followed the artifact symlink".into());
    }
    if fs::symlink_metadata(&artifact_path)?.file_type().is_symlink() {
        return Err("artifact symlink was not replaced".into());
    }
    builder.verify_output(builder.output_dir())?;
    Ok(())
}

#[test]
fn relative_paths_reject_traversal() {
    assert!(validate_relative_path("examples/bq-gateway.toml").is_ok());
    assert!(validate_relative_path("../escape.json").is_err());
    assert!(validate_relative_path("/etc/passwd").is_err());
    assert!(validate_relative_path("  ").is_err());
}
