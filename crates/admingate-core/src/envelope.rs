use serde::Serialize;
use serde_json::Value;

use crate::error::{GatewayError, Result};

/// Discriminated view of a backend response body.
///
/// The backend's shape is not guaranteed consistent across resources: some
/// controllers return `{ "data": [...], "total": n }`, some return a bare
/// array, and single-record endpoints return an object wrapped or not. The
/// parse is explicit: try the `data` field first, fall back to a bare array,
/// fail otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEnvelope {
    /// `{ "data": [...], "total": n? }`
    Wrapped { data: Value, total: Option<u64> },
    /// Bare array or bare object.
    Bare(Value),
}

impl BackendEnvelope {
    pub fn parse(body: &Value) -> Self {
        if let Some(obj) = body.as_object() {
            if let Some(data) = obj.get("data") {
                let total = obj.get("total").and_then(Value::as_u64);
                return Self::Wrapped {
                    data: data.clone(),
                    total,
                };
            }
        }
        Self::Bare(body.clone())
    }

    /// Extract the collection items for list post-processing.
    ///
    /// Accepts either a bare array or an object with an array `data` field.
    /// Anything else is a contract violation on the backend's side and maps
    /// to a transport-class error.
    pub fn into_collection(self) -> Result<Vec<Value>> {
        let items = match self {
            Self::Wrapped { data, .. } => data,
            Self::Bare(value) => value,
        };
        match items {
            Value::Array(items) => Ok(items),
            other => Err(GatewayError::transport(format!(
                "backend returned a non-collection body (got {})",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Uniform list envelope returned to callers for emulated lists.
///
/// Invariants: `total_pages == ceil(total / limit)` and
/// `data.len() <= limit`, both enforced by [`NormalizedListResponse::new`].
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedListResponse {
    pub data: Vec<Value>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl NormalizedListResponse {
    /// Build the envelope for an already-sliced page.
    ///
    /// `total` is the filtered count (post-search, pre-pagination): the
    /// pagination metadata reflects the filtered result set, not the raw
    /// backend collection.
    pub fn new(data: Vec<Value>, total: u64, page: u64, limit: u64) -> Self {
        debug_assert!(limit >= 1, "limit must be clamped before this point");
        debug_assert!(data.len() as u64 <= limit);
        Self {
            data,
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit.max(1)),
        }
    }

    /// An empty list envelope, used by special routes that synthesize a
    /// response without a backend call.
    pub fn empty(page: u64, limit: u64) -> Self {
        Self::new(Vec::new(), 0, page, limit)
    }
}
