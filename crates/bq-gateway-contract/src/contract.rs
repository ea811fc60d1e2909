// crates/bq-gateway-contract/src/contract.rs
// ============================================================================
// Module: Contract Builder
// Description: Generator for BQ Gateway contract artifacts.
// Purpose: Assemble deterministic contract outputs and write them to disk.
// Dependencies: bq-gateway-config, cap-std, serde, serde_jcs, serde_json
// ============================================================================

//! ## Overview
//! The contract builder assembles the capability bundle (tool contracts,
//! markdown docs, config template) and writes it under `docs/generated`.
//! Output ordering is deterministic and JSON uses canonical key ordering, so
//! `contract check` can diff a checked-in bundle byte for byte.
//! Security posture: the output tree is opened through `cap-std` directory
//! handles and no path component or artifact is reached through a symlink.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::io;
use std::io::ErrorKind;
use std::io::Read;
use std::io::Write;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use bq_gateway_config::config_toml_example;
use cap_primitives::fs::FollowSymlinks;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use cap_std::fs::OpenOptions;
use serde::Serialize;

use crate::ContractError;
use crate::tooling;
use crate::types::ArtifactDigest;
use crate::types::ContractArtifact;
use crate::types::ContractBundle;
use crate::types::ContractManifest;
use crate::types::ManifestArtifact;

/// Manifest file name written at the bundle root.
const MANIFEST_PATH: &str = "index.json";

// ============================================================================
// SECTION: Contract Builder
// ============================================================================

/// Builder for BQ Gateway contract artifacts.
///
/// # Invariants
/// - Artifact paths are validated as safe, relative paths before writes occur.
/// - [`ContractBuilder::build`] output is deterministic and ordered by path.
#[derive(Debug, Clone)]
pub struct ContractBuilder {
    /// Output directory for generated artifacts.
    output_dir: PathBuf,
    /// Contract version identifier.
    contract_version: String,
}

impl ContractBuilder {
    /// Creates a new contract builder targeting the provided output directory.
    #[must_use]
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            contract_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Returns the default output directory for generated artifacts.
    #[must_use]
    pub fn default_output_dir() -> PathBuf {
        PathBuf::from("docs/generated/bq-gateway")
    }

    /// Returns the configured output directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Builds the contract bundle without writing to disk.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when contract generation fails.
    pub fn build(&self) -> Result<ContractBundle, ContractError> {
        let tool_contracts = tooling::tool_contracts();
        let mut artifacts = vec![
            json_artifact("tooling.json", &tool_contracts)?,
            markdown_artifact("tooling.md", tooling::tooling_markdown(&tool_contracts)),
            json_artifact("tools.json", &tooling::tool_definitions())?,
            text_artifact("examples/bq-gateway.toml", config_toml_example(), "application/toml"),
        ];

        artifacts.sort_by(|lhs, rhs| lhs.path.cmp(&rhs.path));
        ensure_unique_paths(&artifacts)?;

        let manifest = build_manifest(&self.contract_version, &artifacts);
        Ok(ContractBundle {
            manifest,
            artifacts,
        })
    }

    /// Writes the contract bundle to the configured output directory.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when writing fails.
    pub fn write(&self) -> Result<ContractManifest, ContractError> {
        self.write_to(&self.output_dir)
    }

    /// Writes the contract bundle to the specified output directory.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when writing fails.
    pub fn write_to(&self, output_dir: &Path) -> Result<ContractManifest, ContractError> {
        let bundle = self.build()?;
        let output = open_output_dir(output_dir, true)?;
        for artifact in &bundle.artifacts {
            let relative = validate_relative_path(&artifact.path)?;
            write_artifact_bytes(&output, &relative, &artifact.bytes)?;
        }
        let manifest_bytes = serialize_json_pretty(&bundle.manifest)?;
        write_artifact_bytes(&output, Path::new(MANIFEST_PATH), &manifest_bytes)?;
        Ok(bundle.manifest)
    }

    /// Verifies the on-disk contract bundle matches the generated bundle.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when verification fails.
    pub fn verify_output(&self, output_dir: &Path) -> Result<(), ContractError> {
        let bundle = self.build()?;
        let output = open_output_dir(output_dir, false)?;
        for artifact in &bundle.artifacts {
            let relative = validate_relative_path(&artifact.path)?;
            let bytes = read_expected_bytes(&output, &relative, artifact.bytes.len())?;
            if bytes != artifact.bytes {
                return Err(ContractError::Generation(format!(
                    "artifact mismatch: {}",
                    artifact.path
                )));
            }
        }
        let manifest_bytes = serialize_json_pretty(&bundle.manifest)?;
        let actual_manifest =
            read_expected_bytes(&output, Path::new(MANIFEST_PATH), manifest_bytes.len())?;
        if actual_manifest != manifest_bytes {
            return Err(ContractError::Generation(format!("manifest mismatch: {MANIFEST_PATH}")));
        }
        let expected_files = expected_paths(&bundle);
        for path in collect_output_files(&output)? {
            if !expected_files.contains(&path) {
                return Err(ContractError::Generation(format!("unexpected artifact: {path}")));
            }
        }
        Ok(())
    }
}

impl Default for ContractBuilder {
    fn default() -> Self {
        Self::new(Self::default_output_dir())
    }
}

// ============================================================================
// SECTION: Artifact Helpers
// ============================================================================

/// Builds a JSON artifact with deterministic, pretty-printed serialization.
fn json_artifact<T: Serialize>(path: &str, value: &T) -> Result<ContractArtifact, ContractError> {
    let bytes = serialize_json_pretty(value)?;
    Ok(ContractArtifact {
        path: path.to_string(),
        content_type: String::from("application/json"),
        bytes,
    })
}

/// Builds a markdown artifact from content.
fn markdown_artifact(path: &str, content: String) -> ContractArtifact {
    text_artifact(path, content, "text/markdown")
}

/// Builds a text artifact from content.
fn text_artifact(path: &str, content: String, content_type: &str) -> ContractArtifact {
    ContractArtifact {
        path: path.to_string(),
        content_type: content_type.to_string(),
        bytes: content.into_bytes(),
    }
}

/// Serializes a value into pretty JSON bytes with canonical key ordering.
fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<Vec<u8>, ContractError> {
    let canonical =
        serde_jcs::to_vec(value).map_err(|err| ContractError::Serialization(err.to_string()))?;
    let canonical_value: serde_json::Value = serde_json::from_slice(&canonical)
        .map_err(|err| ContractError::Serialization(err.to_string()))?;
    let mut bytes = serde_json::to_vec_pretty(&canonical_value)
        .map_err(|err| ContractError::Serialization(err.to_string()))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Builds the manifest from generated artifacts.
fn build_manifest(contract_version: &str, artifacts: &[ContractArtifact]) -> ContractManifest {
    let entries = artifacts
        .iter()
        .map(|artifact| ManifestArtifact {
            path: artifact.path.clone(),
            content_type: artifact.content_type.clone(),
            digest: ArtifactDigest::sha256(&artifact.bytes),
        })
        .collect();
    ContractManifest {
        contract_version: contract_version.to_string(),
        artifacts: entries,
    }
}

/// Ensures artifact paths are unique.
fn ensure_unique_paths(artifacts: &[ContractArtifact]) -> Result<(), ContractError> {
    let mut seen = BTreeSet::new();
    for artifact in artifacts {
        if !seen.insert(&artifact.path) {
            return Err(ContractError::Generation(format!(
                "duplicate artifact path: {}",
                artifact.path
            )));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Filesystem Helpers
// ============================================================================

/// Opens the output directory as a capability handle.
///
/// Every component below the filesystem anchor is opened without following
/// symlinks, so the returned handle cannot point outside the requested tree.
///
/// # Errors
///
/// Returns [`ContractError::OutputPath`] when the path is empty, traverses a
/// parent, passes through a symlink, or names something other than a
/// directory.
fn open_output_dir(output_dir: &Path, create_missing: bool) -> Result<Dir, ContractError> {
    if output_dir.as_os_str().is_empty() {
        return Err(ContractError::OutputPath(output_dir.to_path_buf()));
    }
    let absolute = if output_dir.is_absolute() {
        output_dir.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(output_dir))
            .map_err(|err| ContractError::Io(err.to_string()))?
    };
    let (anchor, components) = split_anchor(&absolute)?;
    if components.is_empty() {
        return Err(ContractError::OutputPath(absolute));
    }
    let mut current = Dir::open_ambient_dir(&anchor, ambient_authority())
        .map_err(|err| ContractError::Io(err.to_string()))?;
    for component in components {
        current = open_child_dir(&current, Path::new(component.as_os_str()), create_missing)
            .map_err(|err| path_error(&err, output_dir))?;
    }
    Ok(current)
}

/// Splits an absolute path into its root anchor and normal components.
fn split_anchor(path: &Path) -> Result<(PathBuf, Vec<OsString>), ContractError> {
    let mut anchor = PathBuf::new();
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => anchor.push(component.as_os_str()),
            Component::CurDir => {}
            Component::Normal(value) => components.push(value.to_os_string()),
            Component::ParentDir => return Err(ContractError::OutputPath(path.to_path_buf())),
        }
    }
    if anchor.as_os_str().is_empty() {
        return Err(ContractError::OutputPath(path.to_path_buf()));
    }
    Ok((anchor, components))
}

/// Opens (or creates) a child directory without following symlinks.
fn open_child_dir(parent: &Dir, child: &Path, create_missing: bool) -> io::Result<Dir> {
    match open_dir_nofollow(parent, child) {
        Err(err) if err.kind() == ErrorKind::NotFound && create_missing => {
            parent.create_dir(child)?;
            open_dir_nofollow(parent, child)
        }
        other => other,
    }
}

/// Opens an existing child directory without following symlinks.
fn open_dir_nofollow(parent: &Dir, child: &Path) -> io::Result<Dir> {
    let mut options = OpenOptions::new();
    options.read(true);
    options._cap_fs_ext_follow(FollowSymlinks::No);
    let file = parent.open_with(child, &options)?;
    if !file.metadata()?.is_dir() {
        return Err(io::Error::new(ErrorKind::InvalidInput, "path component is not a directory"));
    }
    Ok(Dir::from_std_file(file.into_std()))
}

/// Classifies open failures: refusals become path errors, the rest are I/O.
fn path_error(err: &io::Error, path: &Path) -> ContractError {
    let refused = matches!(
        err.kind(),
        ErrorKind::NotFound
            | ErrorKind::InvalidInput
            | ErrorKind::PermissionDenied
            | ErrorKind::NotADirectory
            | ErrorKind::Unsupported
    );
    // ELOOP: the final component was a symlink.
    #[cfg(unix)]
    let refused = refused || err.raw_os_error() == Some(40);
    if refused {
        return ContractError::OutputPath(path.to_path_buf());
    }
    ContractError::Io(err.to_string())
}

/// Walks `relative` down from `root`, returning the parent handle and file name.
fn open_parent_dir(
    root: &Dir,
    relative: &Path,
    create_missing: bool,
) -> Result<(Dir, OsString), ContractError> {
    let mut current = root.try_clone().map_err(|err| ContractError::Io(err.to_string()))?;
    let mut components = relative.components().peekable();
    while let Some(component) = components.next() {
        let Component::Normal(name) = component else {
            return Err(ContractError::OutputPath(relative.to_path_buf()));
        };
        if components.peek().is_none() {
            return Ok((current, name.to_os_string()));
        }
        current = open_child_dir(&current, Path::new(name), create_missing)
            .map_err(|err| path_error(&err, relative))?;
    }
    Err(ContractError::OutputPath(relative.to_path_buf()))
}

/// Writes bytes through a temporary sibling file and renames it into place.
fn write_artifact_bytes(root: &Dir, relative: &Path, bytes: &[u8]) -> Result<(), ContractError> {
    let (parent, file_name) = open_parent_dir(root, relative, true)?;
    let file_name = Path::new(&file_name);
    for attempt in 0 .. 64_u32 {
        let temp_name = temp_file_name(file_name, attempt);
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        options._cap_fs_ext_follow(FollowSymlinks::No);
        let mut temp_file = match parent.open_with(&temp_name, &options) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(path_error(&err, relative)),
        };
        let written = temp_file
            .write_all(bytes)
            .and_then(|()| temp_file.sync_all())
            .and_then(|()| parent.rename(&temp_name, &parent, file_name));
        return written.map_err(|err| discard_temp_file(&parent, &temp_name, &err));
    }
    Err(ContractError::Generation(format!(
        "unable to allocate temporary file for {}",
        relative.display()
    )))
}

/// Removes a failed temporary file, reporting both errors if cleanup fails.
fn discard_temp_file(parent: &Dir, temp_name: &Path, cause: &io::Error) -> ContractError {
    match parent.remove_file(temp_name) {
        Ok(()) => ContractError::Io(cause.to_string()),
        Err(cleanup) => ContractError::Io(format!(
            "{cause}; temporary file {} left behind: {cleanup}",
            temp_name.display()
        )),
    }
}

/// Builds the temporary sibling name for an atomic write attempt.
fn temp_file_name(file_name: &Path, attempt: u32) -> PathBuf {
    let mut temp = OsString::from(".tmp-");
    temp.push(file_name.as_os_str());
    temp.push(format!(".{}.{attempt}", std::process::id()));
    PathBuf::from(temp)
}

/// Validates that the artifact path is relative and safe.
fn validate_relative_path(path: &str) -> Result<PathBuf, ContractError> {
    if path.trim().is_empty() {
        return Err(ContractError::Generation(String::from("artifact path is empty")));
    }
    let candidate = PathBuf::from(path);
    if candidate.is_absolute() {
        return Err(ContractError::Generation(format!("artifact path must be relative: {path}")));
    }
    for component in candidate.components() {
        if matches!(component, Component::ParentDir | Component::RootDir | Component::Prefix(_)) {
            return Err(ContractError::Generation(format!(
                "artifact path contains invalid component: {path}"
            )));
        }
    }
    Ok(candidate)
}

/// Reads a file and verifies its length matches the expected size.
fn read_expected_bytes(
    root: &Dir,
    relative: &Path,
    expected_len: usize,
) -> Result<Vec<u8>, ContractError> {
    let (parent, file_name) = open_parent_dir(root, relative, false)?;
    let mut options = OpenOptions::new();
    options.read(true);
    options._cap_fs_ext_follow(FollowSymlinks::No);
    let mut file = parent
        .open_with(Path::new(&file_name), &options)
        .map_err(|err| path_error(&err, relative))?;
    let metadata = file.metadata().map_err(|err| ContractError::Io(err.to_string()))?;
    if !metadata.is_file() {
        return Err(ContractError::OutputPath(relative.to_path_buf()));
    }
    let expected_len = u64::try_from(expected_len).map_err(|_| {
        ContractError::Generation(String::from("expected length exceeds addressable size"))
    })?;
    if metadata.len() != expected_len {
        return Err(ContractError::Generation(format!(
            "artifact size mismatch: {}",
            relative.display()
        )));
    }
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|err| ContractError::Io(err.to_string()))?;
    Ok(bytes)
}

/// Collects the expected output paths for verification.
fn expected_paths(bundle: &ContractBundle) -> BTreeSet<String> {
    let mut expected = BTreeSet::new();
    expected.insert(String::from(MANIFEST_PATH));
    for artifact in &bundle.artifacts {
        expected.insert(artifact.path.clone());
    }
    expected
}

/// Recursively collects file paths under the output directory.
fn collect_output_files(root: &Dir) -> Result<BTreeSet<String>, ContractError> {
    let mut files = BTreeSet::new();
    collect_files_recursive(root, Path::new(""), &mut files)?;
    Ok(files)
}

/// Recursively collects file paths relative to the root directory.
fn collect_files_recursive(
    current: &Dir,
    prefix: &Path,
    files: &mut BTreeSet<String>,
) -> Result<(), ContractError> {
    let entries = current.entries().map_err(|err| ContractError::Io(err.to_string()))?;
    for entry in entries {
        let entry = entry.map_err(|err| ContractError::Io(err.to_string()))?;
        let relative = prefix.join(entry.file_name());
        let file_type = entry.file_type().map_err(|err| ContractError::Io(err.to_string()))?;
        if file_type.is_symlink() {
            return Err(ContractError::OutputPath(relative));
        }
        if file_type.is_dir() {
            let child = entry.open_dir().map_err(|err| ContractError::Io(err.to_string()))?;
            collect_files_recursive(&child, &relative, files)?;
        } else if file_type.is_file() {
            let text =
                relative.to_str().ok_or_else(|| ContractError::OutputPath(relative.clone()))?;
            files.insert(text.replace('\\', "/"));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
