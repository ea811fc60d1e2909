// crates/bq-gateway-contract/src/types.rs
// ============================================================================
// Module: Contract Types
// Description: Shared data models for BQ Gateway contract artifacts.
// Purpose: Provide canonical shapes for tool contracts, catalogs, and manifests.
// Dependencies: bq-gateway-core, serde, serde_json, sha2
// ============================================================================

//! ## Overview
//! Typed contract shapes serialized into the capability catalog and the
//! generated artifacts. These structures are the single source for the MCP
//! tool listing, the `/capabilities` endpoint, and the on-disk docs.

// ============================================================================
// SECTION: Imports
// ============================================================================

/// Canonical operation names doubling as MCP tool names.
pub use bq_gateway_core::OperationName as ToolName;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use sha2::Digest;
use sha2::Sha256;

// ============================================================================
// SECTION: Manifest Types
// ============================================================================

/// Hash algorithm label recorded in manifests.
pub const DIGEST_ALGORITHM: &str = "sha256";

/// Content digest for an artifact payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDigest {
    /// Algorithm label.
    pub algorithm: String,
    /// Lowercase hex digest.
    pub value: String,
}

impl ArtifactDigest {
    /// Computes the SHA-256 digest of `bytes`.
    #[must_use]
    pub fn sha256(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        Self {
            algorithm: DIGEST_ALGORITHM.to_string(),
            value: hex_encode(&digest),
        }
    }
}

/// Manifest describing the generated contract artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractManifest {
    /// Contract version identifier (matches the crate version).
    pub contract_version: String,
    /// Artifacts included in the bundle, ordered by path.
    pub artifacts: Vec<ManifestArtifact>,
}

/// Manifest entry describing a single artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestArtifact {
    /// Relative artifact path under the output directory.
    pub path: String,
    /// Artifact content type.
    pub content_type: String,
    /// Content digest for the artifact payload.
    pub digest: ArtifactDigest,
}

// ============================================================================
// SECTION: Bundle Types
// ============================================================================

/// Generated contract bundle with artifacts and manifest metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractBundle {
    /// Manifest describing the artifacts.
    pub manifest: ContractManifest,
    /// Artifact payloads included in the bundle.
    pub artifacts: Vec<ContractArtifact>,
}

/// Artifact payload with content bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractArtifact {
    /// Relative artifact path under the output directory.
    pub path: String,
    /// MIME content type for the artifact.
    pub content_type: String,
    /// Serialized artifact payload bytes.
    pub bytes: Vec<u8>,
}

// ============================================================================
// SECTION: Tooling Contracts
// ============================================================================

/// Tool definition used by MCP tool listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// MCP tool name.
    pub name: ToolName,
    /// Tool description for clients.
    pub description: String,
    /// JSON schema for tool input.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Tool contract with full request and response schemas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolContract {
    /// Tool name.
    pub name: ToolName,
    /// Tool description.
    pub description: String,
    /// HTTP route template (`GET /name/{param}`).
    pub http_route: String,
    /// JSON schema for tool input payload.
    pub input_schema: Value,
    /// JSON schema for tool response payload.
    pub output_schema: Value,
    /// Example payloads for documentation.
    pub examples: Vec<ToolExample>,
    /// Notes describing tool usage and safety considerations.
    pub notes: Vec<String>,
}

/// Tool example with input/output payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolExample {
    /// Short example description.
    pub description: String,
    /// Example input payload.
    pub input: Value,
    /// Example output payload.
    pub output: Value,
}

// ============================================================================
// SECTION: Capability Catalog
// ============================================================================

/// Machine-readable description of every operation the gateway exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityCatalog {
    /// Server display name.
    pub name: String,
    /// Server description.
    pub description: String,
    /// Base URL for the HTTP routes.
    pub base_url: String,
    /// Contract version identifier.
    pub contract_version: String,
    /// Operation contracts in canonical order.
    pub tools: Vec<ToolContract>,
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(char::from(HEX[usize::from(byte >> 4)]));
        out.push(char::from(HEX[usize::from(byte & 0x0f)]));
    }
    out
}
