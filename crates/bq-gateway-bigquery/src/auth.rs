// crates/bq-gateway-bigquery/src/auth.rs
// ============================================================================
// Module: Access Token Sources
// Description: Bearer token resolution for BigQuery REST requests.
// Purpose: Read tokens from env, file, or the compute metadata server.
// Dependencies: bq-gateway-config, reqwest, serde, tokio
// ============================================================================

//! ## Overview
//! Env and file sources are read on every request so rotated tokens take
//! effect without a restart. Metadata server tokens are cached behind a
//! `tokio::sync::Mutex` until shortly before expiry; concurrent requests that
//! find the cache stale wait on the same refresh.
//! Security posture: tokens are never logged or included in error messages.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;
use std::time::Instant;

use bq_gateway_config::WarehouseAuthConfig;
use bq_gateway_core::RemoteWarehouseError;
use reqwest::Client;
use reqwest::header::HeaderValue;
use serde::Deserialize;
use tokio::sync::Mutex;
use url::Url;

use crate::AdapterBuildError;
use crate::wire::remote_error;

/// Reason label for credential failures.
pub const CREDENTIALS_REASON: &str = "credentials";
/// Cached metadata tokens are refreshed this long before they expire.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);
/// Header required by the metadata server.
const METADATA_FLAVOR_HEADER: &str = "metadata-flavor";

// ============================================================================
// SECTION: Token Source
// ============================================================================

/// Resolves bearer tokens for warehouse requests.
#[derive(Debug)]
pub struct TokenSource {
    /// Where tokens come from.
    kind: TokenKind,
    /// Cached metadata server token.
    cache: Mutex<Option<CachedToken>>,
}

/// Token origin.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    /// Environment variable name.
    Env(String),
    /// Token file path.
    File(PathBuf),
    /// Metadata server token endpoint.
    Metadata(Url),
}

/// Metadata token with its refresh deadline.
#[derive(Debug, Clone)]
struct CachedToken {
    /// Token value.
    value: String,
    /// Instant after which the token is refreshed.
    refresh_at: Instant,
}

/// Metadata server token response.
#[derive(Debug, Deserialize)]
struct MetadataTokenResponse {
    /// Access token.
    access_token: String,
    /// Lifetime in seconds.
    expires_in: u64,
}

impl TokenSource {
    /// Builds a token source from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterBuildError`] when the metadata endpoint is not a URL.
    pub fn from_config(config: &WarehouseAuthConfig) -> Result<Self, AdapterBuildError> {
        let kind = match config {
            WarehouseAuthConfig::AccessTokenEnv {
                env,
            } => TokenKind::Env(env.clone()),
            WarehouseAuthConfig::AccessTokenFile {
                path,
            } => TokenKind::File(PathBuf::from(path)),
            WarehouseAuthConfig::MetadataServer {
                endpoint,
            } => TokenKind::Metadata(
                Url::parse(endpoint)
                    .map_err(|err| AdapterBuildError::InvalidUrl(format!("{endpoint}: {err}")))?,
            ),
        };
        Ok(Self {
            kind,
            cache: Mutex::new(None),
        })
    }

    /// Returns a bearer token for the next request.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteWarehouseError`] with reason `credentials` when no
    /// token is available, or the metadata server's failure.
    pub async fn bearer_token(&self, http: &Client) -> Result<String, RemoteWarehouseError> {
        match &self.kind {
            TokenKind::Env(name) => {
                let value = std::env::var(name).map_err(|_| {
                    credentials_error(format!("environment variable {name} is not set"))
                })?;
                non_empty_token(value, || format!("environment variable {name} is empty"))
            }
            TokenKind::File(path) => {
                let value = tokio::fs::read_to_string(path).await.map_err(|err| {
                    credentials_error(format!("token file {} unreadable: {err}", path.display()))
                })?;
                non_empty_token(value, || format!("token file {} is empty", path.display()))
            }
            TokenKind::Metadata(endpoint) => self.metadata_token(http, endpoint).await,
        }
    }

    /// Returns the cached metadata token, refreshing it when stale.
    async fn metadata_token(
        &self,
        http: &Client,
        endpoint: &Url,
    ) -> Result<String, RemoteWarehouseError> {
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref()
            && Instant::now() < cached.refresh_at
        {
            return Ok(cached.value.clone());
        }
        let response = http
            .get(endpoint.clone())
            .header(METADATA_FLAVOR_HEADER, HeaderValue::from_static("Google"))
            .send()
            .await
            .map_err(|err| credentials_error(format!("metadata server unreachable: {err}")))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| credentials_error(format!("metadata server read failed: {err}")))?;
        if !status.is_success() {
            return Err(remote_error(
                status.as_u16(),
                status.canonical_reason().unwrap_or(CREDENTIALS_REASON),
                &body,
            ));
        }
        let token: MetadataTokenResponse = serde_json::from_slice(&body)
            .map_err(|err| credentials_error(format!("metadata token malformed: {err}")))?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(REFRESH_MARGIN);
        let value = non_empty_token(token.access_token, || "metadata token is empty".to_string())?;
        *cache = Some(CachedToken {
            value: value.clone(),
            refresh_at: Instant::now() + lifetime,
        });
        Ok(value)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a credential failure.
fn credentials_error(message: String) -> RemoteWarehouseError {
    RemoteWarehouseError::new(0, CREDENTIALS_REASON, message)
}

/// Trims a token and rejects empty values.
fn non_empty_token(
    value: String,
    message: impl FnOnce() -> String,
) -> Result<String, RemoteWarehouseError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(credentials_error(message()));
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_tokens_are_trimmed() -> Result<(), Box<dyn std::error::Error>> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("token");
        std::fs::write(&path, "ya29.file-token\n")?;
        let source = TokenSource::from_config(&WarehouseAuthConfig::AccessTokenFile {
            path: path.display().to_string(),
        })?;
        let token = source.bearer_token(&Client::new()).await?;
        assert_eq!(token, "ya29.file-token");
        Ok(())
    }

    #[tokio::test]
    async fn empty_token_file_is_a_credentials_error() -> Result<(), Box<dyn std::error::Error>> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("token");
        std::fs::write(&path, "  \n")?;
        let source = TokenSource::from_config(&WarehouseAuthConfig::AccessTokenFile {
            path: path.display().to_string(),
        })?;
        let Err(err) = source.bearer_token(&Client::new()).await else {
            return Err("expected empty token to be rejected".into());
        };
        assert_eq!(err.reason, CREDENTIALS_REASON);
        assert_eq!(err.status, 0);
        Ok(())
    }

    #[tokio::test]
    async fn missing_env_token_is_a_credentials_error() -> Result<(), Box<dyn std::error::Error>> {
        let source = TokenSource::from_config(&WarehouseAuthConfig::AccessTokenEnv {
            env: "BQ_GATEWAY_TEST_TOKEN_THAT_IS_NEVER_SET".to_string(),
        })?;
        let Err(err) = source.bearer_token(&Client::new()).await else {
            return Err("expected missing env token to be rejected".into());
        };
        assert_eq!(err.reason, CREDENTIALS_REASON);
        assert!(!err.message.contains("ya29"));
        Ok(())
    }

    #[test]
    fn invalid_metadata_endpoint_fails_build() {
        let result = TokenSource::from_config(&WarehouseAuthConfig::MetadataServer {
            endpoint: "not a url".to_string(),
        });
        assert!(matches!(result, Err(AdapterBuildError::InvalidUrl(_))));
    }
}
