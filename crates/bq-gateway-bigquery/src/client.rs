// crates/bq-gateway-bigquery/src/client.rs
// ============================================================================
// Module: BigQuery REST Client
// Description: WarehouseClient implementation over the BigQuery REST v2 API.
// Purpose: Submit query jobs, wait for completion, and read listings.
// Dependencies: bq-gateway-config, bq-gateway-core, reqwest, url
// ============================================================================

//! ## Overview
//! [`BigQueryClient`] is built once from [`WarehouseConfig`] and shared by
//! every request. Each trait method resolves only when the remote operation is
//! terminal: query jobs are polled with a server-side wait until
//! `jobComplete`, and every result or listing page is followed to the end.
//! There are no retries; the first remote or transport failure is returned.
//! Security posture: identifiers are percent-encoded as single path segments.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bq_gateway_config::WarehouseConfig;
use bq_gateway_core::ColumnSchema;
use bq_gateway_core::DatasetId;
use bq_gateway_core::ProjectId;
use bq_gateway_core::RemoteWarehouseError;
use bq_gateway_core::Row;
use bq_gateway_core::SharedWarehouseClient;
use bq_gateway_core::TableId;
use bq_gateway_core::TableSchema;
use bq_gateway_core::WarehouseClient;
use reqwest::Client;
use reqwest::RequestBuilder;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderValue;
use reqwest::redirect::Policy;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::AdapterBuildError;
use crate::auth::TokenSource;
use crate::wire::DatasetList;
use crate::wire::FormatOptions;
use crate::wire::ProjectList;
use crate::wire::QueryRequest;
use crate::wire::QueryResponse;
use crate::wire::TableList;
use crate::wire::TableResource;
use crate::wire::decode_rows;
use crate::wire::invalid_response;
use crate::wire::remote_error;

// ============================================================================
// SECTION: Client
// ============================================================================

/// BigQuery REST v2 warehouse client.
///
/// # Invariants
/// - `base_url` can carry path segments (not a `cannot-be-a-base` URL).
#[derive(Debug)]
pub struct BigQueryClient {
    /// HTTP client with connect and request timeouts.
    http: Client,
    /// REST API base URL.
    base_url: Url,
    /// Billing project that owns query jobs.
    billing_project: String,
    /// Optional job location.
    location: Option<String>,
    /// Server-side wait per query call.
    job_poll_timeout_ms: u64,
    /// Page size for results and listings.
    page_size: u32,
    /// Bearer token source.
    tokens: TokenSource,
}

impl BigQueryClient {
    /// Builds a client from validated warehouse configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterBuildError`] when the base URL or HTTP client is invalid.
    pub fn from_config(config: &WarehouseConfig) -> Result<Self, AdapterBuildError> {
        let base_url = Url::parse(config.api_base_url.trim_end_matches('/')).map_err(|err| {
            AdapterBuildError::InvalidUrl(format!("{}: {err}", config.api_base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AdapterBuildError::InvalidUrl(config.api_base_url.clone()));
        }
        let http = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .redirect(Policy::none())
            .build()
            .map_err(|err| AdapterBuildError::HttpClient(err.to_string()))?;
        Ok(Self {
            http,
            base_url,
            billing_project: config.project_id.trim().to_string(),
            location: config.location.clone(),
            job_poll_timeout_ms: config.job_poll_timeout_ms,
            page_size: config.max_results_per_page,
            tokens: TokenSource::from_config(&config.auth)?,
        })
    }

    /// Wraps the client in a shared handle for injection.
    #[must_use]
    pub fn into_shared(self) -> SharedWarehouseClient {
        Arc::new(self)
    }

    /// Builds an endpoint URL from path segments and query pairs.
    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    /// Sends a GET request and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, RemoteWarehouseError> {
        self.send_json(self.http.get(url)).await
    }

    /// Sends a POST request with a JSON body and decodes the JSON response.
    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, RemoteWarehouseError> {
        let payload = serde_json::to_vec(body)
            .map_err(|err| invalid_response(format!("request serialization failed: {err}")))?;
        let request = self
            .http
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(payload);
        self.send_json(request).await
    }

    /// Authenticates and sends a request, mapping failures to remote errors.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, RemoteWarehouseError> {
        let token = self.tokens.bearer_token(&self.http).await?;
        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| RemoteWarehouseError::transport(err.to_string()))?;
        let status = response.status();
        let body =
            response.bytes().await.map_err(|err| RemoteWarehouseError::transport(err.to_string()))?;
        if !status.is_success() {
            return Err(remote_error(
                status.as_u16(),
                status.canonical_reason().unwrap_or("error"),
                &body,
            ));
        }
        serde_json::from_slice(&body)
            .map_err(|err| invalid_response(format!("unexpected response body: {err}")))
    }

    /// Fetches a results page for an existing job.
    async fn query_results(
        &self,
        project: &str,
        job_id: &str,
        location: Option<&str>,
        page_token: Option<&str>,
    ) -> Result<QueryResponse, RemoteWarehouseError> {
        let timeout = self.job_poll_timeout_ms.to_string();
        let page_size = self.page_size.to_string();
        let mut query = vec![
            ("timeoutMs", timeout.as_str()),
            ("maxResults", page_size.as_str()),
            ("formatOptions.useInt64Timestamp", "true"),
        ];
        if let Some(location) = location {
            query.push(("location", location));
        }
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }
        let url = self.endpoint(&["projects", project, "queries", job_id], &query);
        self.get_json(url).await
    }

    /// Follows `nextPageToken` for a listing endpoint and collects entries.
    async fn collect_pages<P, F>(
        &self,
        segments: &[&str],
        mut next: F,
    ) -> Result<Vec<String>, RemoteWarehouseError>
    where
        P: DeserializeOwned + Send,
        F: FnMut(P) -> (Vec<String>, Option<String>) + Send,
    {
        let page_size = self.page_size.to_string();
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut query = vec![("maxResults", page_size.as_str())];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }
            let page: P = self.get_json(self.endpoint(segments, &query)).await?;
            let (entries, token) = next(page);
            ids.extend(entries);
            match token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => return Ok(ids),
            }
        }
    }
}

// ============================================================================
// SECTION: WarehouseClient
// ============================================================================

#[async_trait]
impl WarehouseClient for BigQueryClient {
    async fn run_query(&self, statement: &str) -> Result<Vec<Row>, RemoteWarehouseError> {
        let request = QueryRequest {
            query: statement,
            use_legacy_sql: false,
            location: self.location.as_deref(),
            timeout_ms: self.job_poll_timeout_ms,
            max_results: self.page_size,
            format_options: FormatOptions {
                use_int64_timestamp: true,
            },
        };
        let url = self.endpoint(&["projects", self.billing_project.as_str(), "queries"], &[]);
        let mut page: QueryResponse = self.post_json(url, &request).await?;
        let job = page.job_reference.clone();

        while !page.job_complete {
            let job = job.as_ref().ok_or_else(|| invalid_response("incomplete job has no id"))?;
            page = self
                .query_results(&job.project_id, &job.job_id, job.location.as_deref(), None)
                .await?;
        }

        let Some(schema) = page.schema.take() else {
            return Ok(Vec::new());
        };
        let mut rows = decode_rows(&schema, std::mem::take(&mut page.rows))?;
        let mut page_token = page.page_token.take();
        while let Some(token) = page_token.filter(|token| !token.is_empty()) {
            let job = job.as_ref().ok_or_else(|| invalid_response("paged result has no job"))?;
            let location = job.location.as_deref();
            let mut next =
                self.query_results(&job.project_id, &job.job_id, location, Some(&token)).await?;
            rows.extend(decode_rows(&schema, std::mem::take(&mut next.rows))?);
            page_token = next.page_token.take();
        }
        Ok(rows)
    }

    async fn list_projects(&self) -> Result<Vec<ProjectId>, RemoteWarehouseError> {
        let ids = self
            .collect_pages(&["projects"], |page: ProjectList| {
                let ids = page
                    .projects
                    .into_iter()
                    .map(|entry| entry.project_reference.project_id)
                    .collect();
                (ids, page.next_page_token)
            })
            .await?;
        Ok(ids.into_iter().map(ProjectId::new).collect())
    }

    async fn list_datasets(
        &self,
        project: &ProjectId,
    ) -> Result<Vec<DatasetId>, RemoteWarehouseError> {
        let ids = self
            .collect_pages(&["projects", project.as_str(), "datasets"], |page: DatasetList| {
                let ids = page
                    .datasets
                    .into_iter()
                    .map(|entry| entry.dataset_reference.dataset_id)
                    .collect();
                (ids, page.next_page_token)
            })
            .await?;
        Ok(ids.into_iter().map(DatasetId::new).collect())
    }

    async fn list_tables(
        &self,
        project: &ProjectId,
        dataset: &DatasetId,
    ) -> Result<Vec<TableId>, RemoteWarehouseError> {
        let segments = ["projects", project.as_str(), "datasets", dataset.as_str(), "tables"];
        let ids = self
            .collect_pages(&segments, |page: TableList| {
                let ids =
                    page.tables.into_iter().map(|entry| entry.table_reference.table_id).collect();
                (ids, page.next_page_token)
            })
            .await?;
        Ok(ids.into_iter().map(TableId::new).collect())
    }

    async fn describe_schema(
        &self,
        project: &ProjectId,
        dataset: &DatasetId,
        table: &TableId,
    ) -> Result<TableSchema, RemoteWarehouseError> {
        let segments = [
            "projects",
            project.as_str(),
            "datasets",
            dataset.as_str(),
            "tables",
            table.as_str(),
        ];
        let url = self.endpoint(&segments, &[]);
        let resource: TableResource = self.get_json(url).await?;
        let columns = resource
            .schema
            .fields
            .into_iter()
            .map(|field| ColumnSchema::new(field.name, field.field_type))
            .collect();
        Ok(TableSchema::from_columns(columns))
    }
}
