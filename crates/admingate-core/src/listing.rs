use indexmap::IndexMap;
use serde_json::Value;

use crate::envelope::NormalizedListResponse;

/// Hard ceiling applied when the configuration does not narrow it further.
pub const DEFAULT_MAX_LIMIT: u64 = 1000;

/// Recognized list query parameters plus verbatim pass-through filters.
///
/// `page` and `limit` are clamped on construction: `page` to `[1, ∞)`,
/// `limit` to `[1, max_limit]`. Non-numeric values fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u64,
    pub limit: u64,
    pub search: Option<String>,
    /// Arbitrary caller-supplied filters, forwarded verbatim to the backend
    /// in the order the caller sent them.
    pub filters: IndexMap<String, String>,
}

impl ListQuery {
    /// Build from raw query pairs.
    ///
    /// `page`, `limit` and `search` are recognized generically; every other
    /// pair is kept as a pass-through filter.
    pub fn from_params<'a, I>(params: I, default_limit: u64, max_limit: u64) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut page = 1u64;
        let mut limit = default_limit;
        let mut search = None;
        let mut filters = IndexMap::new();

        for (key, value) in params {
            match key {
                "page" => page = value.parse().unwrap_or(1),
                "limit" => limit = value.parse().unwrap_or(default_limit),
                "search" => {
                    if !value.is_empty() {
                        search = Some(value.to_string());
                    }
                }
                _ => {
                    filters.insert(key.to_string(), value.to_string());
                }
            }
        }

        Self {
            page: page.max(1),
            limit: limit.clamp(1, max_limit.max(1)),
            search,
            filters,
        }
    }
}

/// Client-side search filtering and pagination slicing.
///
/// Applied only to resources whose backend lacks query-level filtering and
/// pagination. Correct search requires materializing the whole collection,
/// which bounds this path to small-to-medium resources; large collections
/// belong on the backend-delegated path.
pub fn apply_post_processing(
    items: Vec<Value>,
    query: &ListQuery,
    search_fields: &[&str],
) -> NormalizedListResponse {
    let filtered: Vec<Value> = match &query.search {
        Some(term) => {
            let needle = term.to_lowercase();
            items
                .into_iter()
                .filter(|item| matches_search(item, &needle, search_fields))
                .collect()
        }
        None => items,
    };

    // total reflects the filtered set, not the raw backend collection
    let total = filtered.len() as u64;
    let start = (query.page - 1).saturating_mul(query.limit);
    let data: Vec<Value> = filtered
        .into_iter()
        .skip(start as usize)
        .take(query.limit as usize)
        .collect();

    NormalizedListResponse::new(data, total, query.page, query.limit)
}

/// Case-insensitive substring match across the resource's string fields.
///
/// Non-string field values are rendered to text first so that, e.g., a
/// numeric status still matches its textual form.
fn matches_search(item: &Value, needle: &str, search_fields: &[&str]) -> bool {
    search_fields.iter().any(|field| {
        item.get(field).is_some_and(|value| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Null => return false,
                other => other.to_string(),
            };
            text.to_lowercase().contains(needle)
        })
    })
}
