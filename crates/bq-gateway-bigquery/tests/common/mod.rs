// crates/bq-gateway-bigquery/tests/common/mod.rs
// =============================================================================
// Module: BigQuery Stub Helpers
// Description: Axum stub of the BigQuery REST API for adapter tests.
// Purpose: Serve canned responses on an ephemeral port and count requests.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use axum::Router;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use bq_gateway_bigquery::BigQueryClient;
use bq_gateway_config::WarehouseAuthConfig;
use bq_gateway_config::WarehouseConfig;
use tokio::net::TcpListener;

/// Bearer token the stub accepts.
pub const TEST_TOKEN: &str = "ya29.stub-token";
/// Billing project configured on test clients.
pub const BILLING_PROJECT: &str = "billing-project";

/// Shared request counter for stub handlers.
#[derive(Debug, Default)]
pub struct Hits {
    /// Number of requests seen.
    count: AtomicUsize,
}

impl Hits {
    /// Creates a shared counter.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Records one request and returns its zero-based index.
    pub fn record(&self) -> usize {
        self.count.fetch_add(1, Ordering::SeqCst)
    }

    /// Returns the number of requests seen.
    pub fn get(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

/// Serves `router` on an ephemeral loopback port.
pub async fn spawn_stub(router: Router) -> Result<SocketAddr, std::io::Error> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(addr)
}

/// Returns true when the request carries the stub bearer token.
pub fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {TEST_TOKEN}"))
}

/// Rejection returned for requests without the stub bearer token.
pub fn unauthorized() -> (StatusCode, String) {
    (
        StatusCode::UNAUTHORIZED,
        r#"{"error":{"code":401,"status":"UNAUTHENTICATED","message":"missing token"}}"#
            .to_string(),
    )
}

/// Writes the stub token to `dir/token` and returns warehouse settings that
/// target the stub at `addr`.
pub fn stub_config(addr: SocketAddr, dir: &Path) -> Result<WarehouseConfig, std::io::Error> {
    let token_path = dir.join("token");
    std::fs::write(&token_path, format!("{TEST_TOKEN}\n"))?;
    let mut config = WarehouseConfig::for_project(BILLING_PROJECT);
    config.api_base_url = format!("http://{addr}/bigquery/v2");
    config.allow_http = true;
    config.auth = WarehouseAuthConfig::AccessTokenFile {
        path: token_path.display().to_string(),
    };
    Ok(config)
}

/// Builds a client against the stub at `addr`.
pub fn stub_client(
    addr: SocketAddr,
    dir: &Path,
) -> Result<BigQueryClient, Box<dyn std::error::Error>> {
    let config = stub_config(addr, dir)?;
    Ok(BigQueryClient::from_config(&config)?)
}
