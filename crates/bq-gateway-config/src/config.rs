// crates/bq-gateway-config/src/config.rs
// ============================================================================
// Module: BQ Gateway Configuration
// Description: Configuration loading and validation for BQ Gateway.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: bq-gateway-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed: the gateway never starts
//! with a partially understood configuration.
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use bq_gateway_core::DEFAULT_DENYLIST;
use bq_gateway_core::DEFAULT_MAX_PREDICT_ROWS;
use bq_gateway_core::DispatchPolicy;
use bq_gateway_core::IdentifierKind;
use bq_gateway_core::SafetyFilter;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "bq-gateway.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "BQ_GATEWAY_CONFIG";
/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Bind address used by the HTTP transport when none is configured.
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
/// Default maximum request body size.
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
/// Largest accepted request body size.
const MAX_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;
/// Default warehouse REST endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://bigquery.googleapis.com/bigquery/v2";
/// Default environment variable holding a bearer token.
pub const DEFAULT_TOKEN_ENV: &str = "BQ_GATEWAY_ACCESS_TOKEN";
/// Default metadata server token endpoint.
pub const DEFAULT_METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";
/// Default connect timeout in milliseconds.
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;
/// Default per-request timeout in milliseconds.
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
/// Default server-side wait per job poll in milliseconds.
const DEFAULT_JOB_POLL_TIMEOUT_MS: u64 = 10_000;
/// Default page size for result and listing pages.
const DEFAULT_MAX_RESULTS_PER_PAGE: u32 = 10_000;
/// Minimum connect timeout in milliseconds.
const MIN_CONNECT_TIMEOUT_MS: u64 = 100;
/// Maximum connect timeout in milliseconds.
const MAX_CONNECT_TIMEOUT_MS: u64 = 60_000;
/// Minimum request timeout in milliseconds.
const MIN_REQUEST_TIMEOUT_MS: u64 = 500;
/// Maximum request timeout in milliseconds.
const MAX_REQUEST_TIMEOUT_MS: u64 = 600_000;
/// Minimum job poll wait in milliseconds.
const MIN_JOB_POLL_TIMEOUT_MS: u64 = 100;
/// Maximum job poll wait in milliseconds.
const MAX_JOB_POLL_TIMEOUT_MS: u64 = 300_000;
/// Maximum page size.
const MAX_RESULTS_PER_PAGE: u32 = 100_000;
/// Maximum prediction row limit an operator may configure.
const MAX_PREDICT_ROWS_CEILING: u32 = 100_000;
/// Maximum number of denylist entries.
const MAX_DENYLIST_ENTRIES: usize = 64;
/// Maximum length of a denylist entry.
const MAX_DENYLIST_ENTRY_LENGTH: usize = 64;
/// Maximum length of capability metadata strings.
const MAX_CAPABILITY_TEXT_LENGTH: usize = 1024;

// ============================================================================
// SECTION: Root Configuration
// ============================================================================

/// BQ Gateway configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Warehouse connection configuration.
    pub warehouse: WarehouseConfig,
    /// Raw statement safety configuration.
    #[serde(default)]
    pub safety: SafetyConfig,
    /// Model lifecycle limits.
    #[serde(default)]
    pub models: ModelsConfig,
    /// Capability catalog metadata.
    #[serde(default)]
    pub capabilities: CapabilitiesConfig,
    /// Path the configuration was loaded from (not deserialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl GatewayConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: explicit path, then `BQ_GATEWAY_CONFIG`, then
    /// `bq-gateway.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config = Self::from_toml_str(content)?;
        config.source_path = Some(resolved);
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.warehouse.validate()?;
        self.safety.validate()?;
        self.models.validate()?;
        self.capabilities.validate()?;
        Ok(())
    }

    /// Builds the safety filter from the configured denylist.
    #[must_use]
    pub fn safety_filter(&self) -> SafetyFilter {
        SafetyFilter::new(self.safety.denylist.iter().map(|token| token.trim().to_string()))
    }

    /// Builds the dispatch policy from safety and model settings.
    #[must_use]
    pub const fn dispatch_policy(&self) -> DispatchPolicy {
        DispatchPolicy {
            check_generated_statements: self.safety.check_generated_statements,
            max_predict_rows: self.models.max_predict_rows,
        }
    }
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// Supported transport types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServerTransport {
    /// HTTP routes plus JSON-RPC at `/mcp`.
    #[default]
    Http,
    /// Content-Length framed JSON-RPC over stdin/stdout.
    Stdio,
}

impl ServerTransport {
    /// Returns a stable label for logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Stdio => "stdio",
        }
    }
}

/// Server transport configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Transport type.
    #[serde(default)]
    pub transport: ServerTransport,
    /// Bind address for the HTTP transport (defaults to `127.0.0.1:8000`).
    #[serde(default)]
    pub bind: Option<String>,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Audit logging configuration.
    #[serde(default)]
    pub audit: ServerAuditConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: ServerTransport::Http,
            bind: None,
            max_body_bytes: default_max_body_bytes(),
            audit: ServerAuditConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Returns the socket address the HTTP transport listens on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the bind address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let bind = self.bind.as_deref().unwrap_or(DEFAULT_BIND).trim();
        bind.parse().map_err(|_| ConfigError::Invalid("invalid bind address".to_string()))
    }

    /// Validates server transport configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_body_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_body_bytes > MAX_MAX_BODY_BYTES {
            return Err(ConfigError::Invalid(format!(
                "max_body_bytes must not exceed {MAX_MAX_BODY_BYTES}"
            )));
        }
        self.audit.validate()?;
        match self.transport {
            ServerTransport::Http => {
                self.bind_addr()?;
            }
            ServerTransport::Stdio => {
                if self.bind.is_some() {
                    return Err(ConfigError::Invalid(
                        "stdio transport does not accept a bind address".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Audit logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerAuditConfig {
    /// Enable structured audit logging.
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    /// Optional audit log path (JSON lines); stderr when unset.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for ServerAuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            path: None,
        }
    }
}

impl ServerAuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("server.audit.path", path)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Warehouse
// ============================================================================

/// Warehouse connection configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WarehouseConfig {
    /// Billing project that owns query jobs.
    pub project_id: String,
    /// Optional job location (e.g. `US`, `europe-west1`).
    #[serde(default)]
    pub location: Option<String>,
    /// REST API base URL.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Allow a plain `http://` base URL (explicit opt-in).
    #[serde(default)]
    pub allow_http: bool,
    /// TCP connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Per-HTTP-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Server-side wait per job poll in milliseconds.
    #[serde(default = "default_job_poll_timeout_ms")]
    pub job_poll_timeout_ms: u64,
    /// Page size for result and listing pages.
    #[serde(default = "default_max_results_per_page")]
    pub max_results_per_page: u32,
    /// Credential source.
    #[serde(default)]
    pub auth: WarehouseAuthConfig,
}

impl WarehouseConfig {
    /// Creates a configuration for a billing project with default settings.
    #[must_use]
    pub fn for_project(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            location: None,
            api_base_url: default_api_base_url(),
            allow_http: false,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            job_poll_timeout_ms: DEFAULT_JOB_POLL_TIMEOUT_MS,
            max_results_per_page: DEFAULT_MAX_RESULTS_PER_PAGE,
            auth: WarehouseAuthConfig::default(),
        }
    }

    /// Validates warehouse settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when warehouse settings are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        IdentifierKind::Project
            .validate(self.project_id.trim())
            .map_err(|err| ConfigError::Invalid(format!("warehouse.project_id: {err}")))?;
        if let Some(location) = &self.location {
            let trimmed = location.trim();
            if trimmed.is_empty()
                || !trimmed.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
            {
                return Err(ConfigError::Invalid(
                    "warehouse.location must be a non-empty region name".to_string(),
                ));
            }
        }
        validate_base_url("warehouse.api_base_url", &self.api_base_url, self.allow_http)?;
        validate_timeout_range(
            "warehouse.connect_timeout_ms",
            self.connect_timeout_ms,
            MIN_CONNECT_TIMEOUT_MS,
            MAX_CONNECT_TIMEOUT_MS,
        )?;
        validate_timeout_range(
            "warehouse.request_timeout_ms",
            self.request_timeout_ms,
            MIN_REQUEST_TIMEOUT_MS,
            MAX_REQUEST_TIMEOUT_MS,
        )?;
        validate_timeout_range(
            "warehouse.job_poll_timeout_ms",
            self.job_poll_timeout_ms,
            MIN_JOB_POLL_TIMEOUT_MS,
            MAX_JOB_POLL_TIMEOUT_MS,
        )?;
        if self.job_poll_timeout_ms >= self.request_timeout_ms {
            return Err(ConfigError::Invalid(
                "warehouse.job_poll_timeout_ms must be less than request_timeout_ms".to_string(),
            ));
        }
        if self.max_results_per_page == 0 || self.max_results_per_page > MAX_RESULTS_PER_PAGE {
            return Err(ConfigError::Invalid(format!(
                "warehouse.max_results_per_page must be between 1 and {MAX_RESULTS_PER_PAGE}"
            )));
        }
        self.auth.validate()
    }
}

/// Credential source for warehouse requests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WarehouseAuthConfig {
    /// Bearer token read from an environment variable on every request.
    AccessTokenEnv {
        /// Environment variable name.
        #[serde(default = "default_token_env")]
        env: String,
    },
    /// Bearer token read from a file on every request.
    AccessTokenFile {
        /// Token file path.
        path: String,
    },
    /// Token fetched from the compute metadata server and cached.
    MetadataServer {
        /// Token endpoint URL.
        #[serde(default = "default_metadata_token_url")]
        endpoint: String,
    },
}

impl Default for WarehouseAuthConfig {
    fn default() -> Self {
        Self::AccessTokenEnv {
            env: default_token_env(),
        }
    }
}

impl WarehouseAuthConfig {
    /// Validates the credential source.
    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::AccessTokenEnv {
                env,
            } => {
                let valid = !env.is_empty()
                    && env
                        .chars()
                        .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '_');
                if !valid {
                    return Err(ConfigError::Invalid(
                        "warehouse.auth.env must be an upper-case environment variable name"
                            .to_string(),
                    ));
                }
                Ok(())
            }
            Self::AccessTokenFile {
                path,
            } => validate_path_string("warehouse.auth.path", path),
            Self::MetadataServer {
                endpoint,
            } => validate_base_url("warehouse.auth.endpoint", endpoint, true),
        }
    }
}

// ============================================================================
// SECTION: Safety and Models
// ============================================================================

/// Raw statement safety configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SafetyConfig {
    /// Denylisted tokens (case-sensitive substring match).
    #[serde(default = "default_denylist")]
    pub denylist: Vec<String>,
    /// Also check generated model statements.
    #[serde(default = "default_check_generated_statements")]
    pub check_generated_statements: bool,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            denylist: default_denylist(),
            check_generated_statements: default_check_generated_statements(),
        }
    }
}

impl SafetyConfig {
    /// Validates and normalizes the denylist.
    fn validate(&mut self) -> Result<(), ConfigError> {
        if self.denylist.len() > MAX_DENYLIST_ENTRIES {
            return Err(ConfigError::Invalid(format!(
                "safety.denylist exceeds {MAX_DENYLIST_ENTRIES} entries"
            )));
        }
        let mut normalized: Vec<String> = Vec::with_capacity(self.denylist.len());
        for entry in &self.denylist {
            let token = entry.trim();
            if token.is_empty() {
                return Err(ConfigError::Invalid(
                    "safety.denylist entries must be non-empty".to_string(),
                ));
            }
            if token.len() > MAX_DENYLIST_ENTRY_LENGTH {
                return Err(ConfigError::Invalid("safety.denylist entry too long".to_string()));
            }
            if !normalized.iter().any(|existing| existing == token) {
                normalized.push(token.to_string());
            }
        }
        for required in DEFAULT_DENYLIST {
            if !normalized.iter().any(|token| token == required) {
                return Err(ConfigError::Invalid(format!(
                    "safety.denylist must include {required}"
                )));
            }
        }
        self.denylist = normalized;
        Ok(())
    }
}

/// Model lifecycle limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelsConfig {
    /// Largest prediction limit a caller may request.
    #[serde(default = "default_max_predict_rows")]
    pub max_predict_rows: u32,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            max_predict_rows: default_max_predict_rows(),
        }
    }
}

impl ModelsConfig {
    /// Validates model limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_predict_rows == 0 || self.max_predict_rows > MAX_PREDICT_ROWS_CEILING {
            return Err(ConfigError::Invalid(format!(
                "models.max_predict_rows must be between 1 and {MAX_PREDICT_ROWS_CEILING}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Capabilities
// ============================================================================

/// Metadata published with the capability catalog.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CapabilitiesConfig {
    /// Server display name.
    #[serde(default = "default_capability_name")]
    pub name: String,
    /// Server description.
    #[serde(default = "default_capability_description")]
    pub description: String,
    /// Base URL where the HTTP routes are reachable.
    #[serde(default = "default_capability_base_url")]
    pub base_url: String,
}

impl Default for CapabilitiesConfig {
    fn default() -> Self {
        Self {
            name: default_capability_name(),
            description: default_capability_description(),
            base_url: default_capability_base_url(),
        }
    }
}

impl CapabilitiesConfig {
    /// Validates capability metadata.
    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in
            [("capabilities.name", &self.name), ("capabilities.description", &self.description)]
        {
            if value.trim().is_empty() || value.len() > MAX_CAPABILITY_TEXT_LENGTH {
                return Err(ConfigError::Invalid(format!(
                    "{field} must be non-empty and at most {MAX_CAPABILITY_TEXT_LENGTH} bytes"
                )));
            }
        }
        validate_base_url("capabilities.base_url", &self.base_url, true)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates an absolute http(s) URL.
fn validate_base_url(field: &str, value: &str, allow_http: bool) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    let rest = if let Some(rest) = trimmed.strip_prefix("https://") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("http://") {
        if !allow_http {
            return Err(ConfigError::Invalid(format!("{field} uses http:// without allow_http")));
        }
        rest
    } else {
        return Err(ConfigError::Invalid(format!("{field} must include http:// or https://")));
    };
    if rest.is_empty() || rest.starts_with('/') || rest.chars().any(char::is_whitespace) {
        return Err(ConfigError::Invalid(format!("{field} must include a host")));
    }
    Ok(())
}

/// Validates a timeout value against bounds.
fn validate_timeout_range(
    field: &str,
    value_ms: u64,
    min_ms: u64,
    max_ms: u64,
) -> Result<(), ConfigError> {
    if value_ms < min_ms || value_ms > max_ms {
        return Err(ConfigError::Invalid(format!(
            "{field} must be between {min_ms} and {max_ms} milliseconds",
        )));
    }
    Ok(())
}

/// Default max body size.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Audit logging is on unless disabled.
const fn default_audit_enabled() -> bool {
    true
}

/// Default REST base URL.
fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

/// Default connect timeout.
const fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

/// Default request timeout.
const fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

/// Default job poll wait.
const fn default_job_poll_timeout_ms() -> u64 {
    DEFAULT_JOB_POLL_TIMEOUT_MS
}

/// Default page size.
const fn default_max_results_per_page() -> u32 {
    DEFAULT_MAX_RESULTS_PER_PAGE
}

/// Default token environment variable.
fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

/// Default metadata server token URL.
fn default_metadata_token_url() -> String {
    DEFAULT_METADATA_TOKEN_URL.to_string()
}

/// Default denylist.
fn default_denylist() -> Vec<String> {
    DEFAULT_DENYLIST.iter().map(ToString::to_string).collect()
}

/// Generated statements are checked unless disabled.
const fn default_check_generated_statements() -> bool {
    true
}

/// Default prediction row ceiling.
const fn default_max_predict_rows() -> u32 {
    DEFAULT_MAX_PREDICT_ROWS
}

/// Default capability name.
fn default_capability_name() -> String {
    "BigQuery MCP".to_string()
}

/// Default capability description.
fn default_capability_description() -> String {
    "MCP server for BigQuery".to_string()
}

/// Default capability base URL.
fn default_capability_base_url() -> String {
    "http://localhost:8000".to_string()
}
