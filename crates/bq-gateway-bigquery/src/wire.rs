// crates/bq-gateway-bigquery/src/wire.rs
// ============================================================================
// Module: BigQuery REST Payloads
// Description: Request/response shapes for the BigQuery REST v2 API.
// Purpose: Deserialize job, listing, and table payloads and decode cells.
// Dependencies: bq-gateway-core, serde, serde_json, time
// ============================================================================

//! ## Overview
//! Only the fields the gateway reads are modeled; unknown fields are ignored.
//! Result cells arrive as strings in the `{f: [{v}]}` row encoding and are
//! decoded against the declared field type. TIMESTAMP cells are requested as
//! int64 microseconds and rendered as RFC 3339 strings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use bq_gateway_core::RemoteWarehouseError;
use bq_gateway_core::Row;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Number;
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Reason label used when a response cannot be decoded.
pub const INVALID_RESPONSE_REASON: &str = "invalid_response";

// ============================================================================
// SECTION: Query Jobs
// ============================================================================

/// Body for `POST projects/{project}/queries`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest<'a> {
    /// Statement text.
    pub query: &'a str,
    /// Always `false`: statements are GoogleSQL.
    pub use_legacy_sql: bool,
    /// Optional job location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<&'a str>,
    /// Server-side wait before returning an incomplete job.
    pub timeout_ms: u64,
    /// Page size for the first result page.
    pub max_results: u32,
    /// Output formatting options.
    pub format_options: FormatOptions,
}

/// Result formatting options.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatOptions {
    /// Request TIMESTAMP cells as int64 microseconds.
    pub use_int64_timestamp: bool,
}

/// Response from `jobs.query` and `jobs.getQueryResults`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    /// Job reference used for polling and paging.
    #[serde(default)]
    pub job_reference: Option<JobReference>,
    /// Whether the job reached a terminal state.
    #[serde(default)]
    pub job_complete: bool,
    /// Result schema (absent for statements without a result set).
    #[serde(default)]
    pub schema: Option<SchemaWire>,
    /// Result rows on this page.
    #[serde(default)]
    pub rows: Vec<RowWire>,
    /// Token for the next result page.
    #[serde(default)]
    pub page_token: Option<String>,
}

/// Remote job handle; never leaves the adapter.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReference {
    /// Project that owns the job.
    pub project_id: String,
    /// Job identifier.
    pub job_id: String,
    /// Job location, when reported.
    #[serde(default)]
    pub location: Option<String>,
}

/// Table or result schema.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaWire {
    /// Top-level fields in declared order.
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

/// Declared field with optional nested fields.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldSchema {
    /// Column name.
    pub name: String,
    /// Declared type (`STRING`, `INT64`, `RECORD`, ...).
    #[serde(rename = "type")]
    pub field_type: String,
    /// Field mode (`NULLABLE`, `REQUIRED`, `REPEATED`).
    #[serde(default)]
    pub mode: Option<String>,
    /// Nested fields for RECORD/STRUCT columns.
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

impl FieldSchema {
    /// Returns true for REPEATED fields.
    fn is_repeated(&self) -> bool {
        self.mode.as_deref().is_some_and(|mode| mode.eq_ignore_ascii_case("REPEATED"))
    }
}

/// Encoded row: `{f: [{v: ...}, ...]}`.
#[derive(Debug, Deserialize)]
pub struct RowWire {
    /// Cells in schema order.
    #[serde(default)]
    pub f: Vec<CellWire>,
}

/// Encoded cell.
#[derive(Debug, Deserialize)]
pub struct CellWire {
    /// Cell value.
    #[serde(default)]
    pub v: Value,
}

// ============================================================================
// SECTION: Listings
// ============================================================================

/// Response from `projects.list`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectList {
    /// Projects on this page.
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    /// Token for the next page.
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Project listing entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    /// Project reference.
    pub project_reference: ProjectReference,
}

/// Project reference.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReference {
    /// Project identifier.
    pub project_id: String,
}

/// Response from `datasets.list`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetList {
    /// Datasets on this page.
    #[serde(default)]
    pub datasets: Vec<DatasetEntry>,
    /// Token for the next page.
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Dataset listing entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetEntry {
    /// Dataset reference.
    pub dataset_reference: DatasetReference,
}

/// Dataset reference.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetReference {
    /// Dataset identifier.
    pub dataset_id: String,
}

/// Response from `tables.list`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableList {
    /// Tables on this page.
    #[serde(default)]
    pub tables: Vec<TableEntry>,
    /// Token for the next page.
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Table listing entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableEntry {
    /// Table reference.
    pub table_reference: TableReference,
}

/// Table reference.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableReference {
    /// Table identifier.
    pub table_id: String,
}

/// Response from `tables.get`.
#[derive(Debug, Deserialize)]
pub struct TableResource {
    /// Table schema.
    #[serde(default)]
    pub schema: SchemaWire,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Error envelope: `{error: {code, status, message}}`.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    /// Error body.
    pub error: ErrorBody,
}

/// Error body.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    /// HTTP-equivalent code.
    #[serde(default)]
    pub code: Option<u16>,
    /// Canonical status label.
    #[serde(default)]
    pub status: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}

/// Maps a non-success response into a [`RemoteWarehouseError`].
#[must_use]
pub fn remote_error(status: u16, canonical: &str, body: &[u8]) -> RemoteWarehouseError {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) => RemoteWarehouseError::new(
            envelope.error.code.unwrap_or(status),
            envelope.error.status.unwrap_or_else(|| canonical.to_string()),
            envelope.error.message,
        ),
        Err(_) => {
            let preview = String::from_utf8_lossy(body);
            RemoteWarehouseError::new(status, canonical, preview.trim())
        }
    }
}

/// Builds an error for a response that does not match the expected shape.
#[must_use]
pub fn invalid_response(message: impl Into<String>) -> RemoteWarehouseError {
    RemoteWarehouseError::new(0, INVALID_RESPONSE_REASON, message)
}

// ============================================================================
// SECTION: Cell Decoding
// ============================================================================

/// Decodes encoded rows against the result schema.
///
/// # Errors
///
/// Returns [`RemoteWarehouseError`] when a row does not match the schema.
pub fn decode_rows(
    schema: &SchemaWire,
    rows: Vec<RowWire>,
) -> Result<Vec<Row>, RemoteWarehouseError> {
    rows.into_iter().map(|row| decode_record(&schema.fields, row.f)).collect()
}

/// Decodes one record's cells into an ordered map.
fn decode_record(
    fields: &[FieldSchema],
    cells: Vec<CellWire>,
) -> Result<Row, RemoteWarehouseError> {
    if cells.len() != fields.len() {
        return Err(invalid_response(format!(
            "row has {} cells but schema has {} fields",
            cells.len(),
            fields.len()
        )));
    }
    let mut row = Map::with_capacity(fields.len());
    for (field, cell) in fields.iter().zip(cells) {
        row.insert(field.name.clone(), decode_cell(field, cell.v)?);
    }
    Ok(row)
}

/// Decodes a cell, expanding REPEATED fields into arrays.
fn decode_cell(field: &FieldSchema, value: Value) -> Result<Value, RemoteWarehouseError> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    if !field.is_repeated() {
        return decode_value(field, value);
    }
    let Value::Array(items) = value else {
        return Err(invalid_response(format!("repeated field {} is not an array", field.name)));
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(mut wrapper) => {
                decode_value(field, wrapper.remove("v").unwrap_or(Value::Null))
            }
            other => decode_value(field, other),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

/// Decodes a single non-repeated value by declared type.
fn decode_value(field: &FieldSchema, value: Value) -> Result<Value, RemoteWarehouseError> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    match field.field_type.to_ascii_uppercase().as_str() {
        "RECORD" | "STRUCT" => {
            let cells = serde_json::from_value::<RowWire>(value).map_err(|err| {
                invalid_response(format!("record field {} is malformed: {err}", field.name))
            })?;
            decode_record(&field.fields, cells.f).map(Value::Object)
        }
        "INTEGER" | "INT64" => {
            let text = cell_text(field, &value)?;
            text.parse::<i64>().map(Value::from).map_err(|_| {
                invalid_response(format!("field {} is not an integer: {text}", field.name))
            })
        }
        "FLOAT" | "FLOAT64" => {
            let text = cell_text(field, &value)?;
            let parsed = text.parse::<f64>().map_err(|_| {
                invalid_response(format!("field {} is not a float: {text}", field.name))
            })?;
            Ok(Number::from_f64(parsed)
                .map_or_else(|| Value::String(text.to_string()), Value::Number))
        }
        "BOOLEAN" | "BOOL" => match cell_text(field, &value)? {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            other => {
                Err(invalid_response(format!("field {} is not a boolean: {other}", field.name)))
            }
        },
        "NUMERIC" | "BIGNUMERIC" | "DECIMAL" | "BIGDECIMAL" => {
            let text = cell_text(field, &value)?;
            decimal_number(text).ok_or_else(|| {
                invalid_response(format!("field {} is not a decimal: {text}", field.name))
            })
        }
        "TIMESTAMP" => {
            let text = cell_text(field, &value)?;
            timestamp_from_micros(text).map(Value::String).ok_or_else(|| {
                invalid_response(format!("field {} is not a timestamp: {text}", field.name))
            })
        }
        _ => match value {
            Value::String(_) => Ok(value),
            other => Ok(Value::String(other.to_string())),
        },
    }
}

/// Returns a cell's string payload.
fn cell_text<'a>(field: &FieldSchema, value: &'a Value) -> Result<&'a str, RemoteWarehouseError> {
    value
        .as_str()
        .ok_or_else(|| invalid_response(format!("field {} is not string-encoded", field.name)))
}

/// Renders a decimal cell as a JSON number.
///
/// Integral values become integers when they fit in 64 bits; everything else
/// becomes a float. Values outside the f64 range stay strings.
fn decimal_number(text: &str) -> Option<Value> {
    let integral = !text.contains(['.', 'e', 'E']);
    if integral {
        if let Ok(int) = text.parse::<i64>() {
            return Some(Value::from(int));
        }
        if let Ok(int) = text.parse::<u64>() {
            return Some(Value::from(int));
        }
    }
    let float = text.parse::<f64>().ok()?;
    Some(Number::from_f64(float).map_or_else(|| Value::String(text.to_string()), Value::Number))
}

/// Renders int64 epoch microseconds as RFC 3339.
fn timestamp_from_micros(text: &str) -> Option<String> {
    let micros = text.parse::<i64>().ok()?;
    let nanos = i128::from(micros).checked_mul(1_000)?;
    let timestamp = OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()?;
    timestamp.format(&Rfc3339).ok()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn field(name: &str, field_type: &str) -> FieldSchema {
        FieldSchema {
            name: name.to_string(),
            field_type: field_type.to_string(),
            mode: None,
            fields: Vec::new(),
        }
    }

    fn decode_one(fields: Vec<FieldSchema>, row: Value) -> Result<Row, RemoteWarehouseError> {
        let schema = SchemaWire {
            fields,
        };
        let rows: Vec<RowWire> =
            serde_json::from_value(json!([row])).map_err(|err| invalid_response(err.to_string()))?;
        let mut decoded = decode_rows(&schema, rows)?;
        decoded.pop().ok_or_else(|| invalid_response("no row"))
    }

    #[test]
    fn scalars_decode_by_declared_type() -> Result<(), RemoteWarehouseError> {
        let row = decode_one(
            vec![
                field("n", "INT64"),
                field("x", "FLOAT"),
                field("ok", "BOOLEAN"),
                field("name", "STRING"),
                field("amount", "NUMERIC"),
                field("missing", "STRING"),
            ],
            json!({"f": [
                {"v": "42"}, {"v": "1.5"}, {"v": "true"},
                {"v": "alice"}, {"v": "10.25"}, {"v": null}
            ]}),
        )?;
        assert_eq!(Value::Object(row), json!({
            "n": 42, "x": 1.5, "ok": true, "name": "alice", "amount": 10.25, "missing": null
        }));
        Ok(())
    }

    #[test]
    fn decimals_decode_as_numbers() -> Result<(), RemoteWarehouseError> {
        let row = decode_one(
            vec![
                field("whole", "NUMERIC"),
                field("fraction", "NUMERIC"),
                field("big", "BIGNUMERIC"),
                field("negative", "NUMERIC"),
            ],
            json!({"f": [
                {"v": "120"}, {"v": "0.5"}, {"v": "18446744073709551615"}, {"v": "-7.25"}
            ]}),
        )?;
        assert_eq!(Value::Object(row), json!({
            "whole": 120, "fraction": 0.5, "big": 18_446_744_073_709_551_615_u64, "negative": -7.25
        }));

        let result = decode_one(vec![field("bad", "NUMERIC")], json!({"f": [{"v": "ten"}]}));
        assert!(matches!(result, Err(err) if err.reason == INVALID_RESPONSE_REASON));
        Ok(())
    }

    #[test]
    fn columns_keep_schema_order() -> Result<(), RemoteWarehouseError> {
        let row = decode_one(
            vec![field("zeta", "STRING"), field("alpha", "STRING")],
            json!({"f": [{"v": "z"}, {"v": "a"}]}),
        )?;
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha"]);
        Ok(())
    }

    #[test]
    fn timestamps_render_as_rfc3339() -> Result<(), RemoteWarehouseError> {
        let row = decode_one(
            vec![field("at", "TIMESTAMP")],
            json!({"f": [{"v": "1700000000123456"}]}),
        )?;
        assert_eq!(row.get("at"), Some(&json!("2023-11-14T22:13:20.123456Z")));
        Ok(())
    }

    #[test]
    fn records_and_repeated_fields_nest() -> Result<(), RemoteWarehouseError> {
        let mut tags = field("tags", "STRING");
        tags.mode = Some("REPEATED".to_string());
        let mut address = field("address", "RECORD");
        address.fields = vec![field("city", "STRING"), field("zip", "INTEGER")];
        let row = decode_one(
            vec![tags, address],
            json!({"f": [
                {"v": [{"v": "a"}, {"v": "b"}]},
                {"v": {"f": [{"v": "Oslo"}, {"v": "150"}]}}
            ]}),
        )?;
        assert_eq!(Value::Object(row), json!({
            "tags": ["a", "b"],
            "address": {"city": "Oslo", "zip": 150}
        }));
        Ok(())
    }

    #[test]
    fn mismatched_cells_are_rejected() {
        let result = decode_one(vec![field("a", "STRING")], json!({"f": []}));
        assert!(matches!(result, Err(err) if err.reason == INVALID_RESPONSE_REASON));
    }

    #[test]
    fn error_envelopes_map_to_remote_errors() {
        let body =
            br#"{"error":{"code":404,"status":"NOT_FOUND","message":"Not found: Table p:d.t"}}"#;
        let err = remote_error(404, "Not Found", body);
        assert_eq!(err, RemoteWarehouseError::new(404, "NOT_FOUND", "Not found: Table p:d.t"));

        let err = remote_error(503, "Service Unavailable", b"upstream down");
        assert_eq!(err, RemoteWarehouseError::new(503, "Service Unavailable", "upstream down"));
    }
}
