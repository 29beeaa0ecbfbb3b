//! Page requests and the backend's list envelope.
//!
//! List endpoints answer with
//! `{ "data": { "items": [...], "pagination": { "total": n, "pages": m } } }`.
//! Some endpoints name the row array after the resource (`users`, `cases`)
//! and a few older ones return `data` as a bare array; all three shapes
//! decode into the same [`Page`].

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DomainError, DomainResult};
use crate::sort::SortState;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query for one page of a resource list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
    search: Option<String>,
    filters: BTreeMap<String, String>,
    sort: SortState,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_PAGE_SIZE),
            search: None,
            filters: BTreeMap::new(),
            sort: SortState::default(),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn sort_mut(&mut self) -> &mut SortState {
        &mut self.sort
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Blank search text clears the search.
    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        let trimmed = term.trim();
        self.search = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    /// `None` or a blank value removes the filter.
    pub fn set_filter(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        match value.filter(|v| !v.trim().is_empty()) {
            Some(v) => {
                self.filters.insert(key, v);
            }
            None => {
                self.filters.remove(&key);
            }
        }
    }

    pub fn clear_filters(&mut self) {
        self.search = None;
        self.filters.clear();
    }

    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.sort = sort;
        self
    }

    /// Query string pairs: `page`, `limit`, then `search` and filters when
    /// present, then `sortBy` / `sortOrder`.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        for (key, value) in &self.filters {
            pairs.push((key.clone(), value.clone()));
        }
        pairs.push(("sortBy".to_string(), self.sort.column().to_string()));
        pairs.push((
            "sortOrder".to_string(),
            self.sort.direction().as_param().to_string(),
        ));
        pairs
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// Totals reported by the backend for pagination controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total: u64,
    #[serde(default, alias = "total_pages", alias = "totalPages")]
    pub pages: u32,
}

/// One fetched page of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn total(&self) -> u64 {
        self.pagination.total
    }

    pub fn pages(&self) -> u32 {
        self.pagination.pages
    }

    fn unpaged(items: Vec<T>) -> Self {
        let total = items.len() as u64;
        let pages = if items.is_empty() { 0 } else { 1 };
        Self {
            items,
            pagination: Pagination { total, pages },
        }
    }
}

impl<T: DeserializeOwned> Page<T> {
    /// Decode a list envelope.
    ///
    /// The row array is read from `data.items`, then `data.<collection_key>`,
    /// then `data` itself when it is an array, then the body itself when it
    /// is an array. Pagination is read next to the rows or next to `data`;
    /// missing counts fall back to a single page holding every row.
    pub fn from_envelope(body: Value, collection_key: &str) -> DomainResult<Self> {
        let mut root = match body {
            Value::Object(root) => root,
            Value::Array(_) => return Ok(Self::unpaged(decode_items(body)?)),
            _ => return Err(DomainError::malformed("list response is not an object")),
        };
        let data = root
            .remove("data")
            .ok_or_else(|| DomainError::malformed("list response has no `data` field"))?;

        match data {
            Value::Array(_) => {
                let items = decode_items(data)?;
                match root.remove("pagination") {
                    Some(p) => Ok(Self { items, pagination: decode_pagination(p)? }),
                    None => Ok(Self::unpaged(items)),
                }
            }
            Value::Object(mut fields) => {
                let rows = fields
                    .remove("items")
                    .or_else(|| fields.remove(collection_key))
                    .ok_or_else(|| {
                        DomainError::malformed(format!(
                            "list response has neither `items` nor `{collection_key}`"
                        ))
                    })?;
                let items = decode_items(rows)?;
                match fields.remove("pagination") {
                    Some(p) => Ok(Self { items, pagination: decode_pagination(p)? }),
                    None => Ok(Self::unpaged(items)),
                }
            }
            _ => Err(DomainError::malformed("`data` is neither an array nor an object")),
        }
    }
}

fn decode_pagination(raw: Value) -> DomainResult<Pagination> {
    serde_json::from_value(raw).map_err(|e| DomainError::malformed(format!("pagination: {e}")))
}

fn decode_items<T: DeserializeOwned>(rows: Value) -> DomainResult<Vec<T>> {
    serde_json::from_value(rows).map_err(|e| DomainError::malformed(format!("rows: {e}")))
}

/// Decode an unpaginated sub-collection (sessions, payments, versions...).
///
/// Accepts a bare array, `{ "data": [...] }`, or a full list envelope.
pub fn decode_rows<T: DeserializeOwned>(body: Value, collection_key: &str) -> DomainResult<Vec<T>> {
    match body {
        Value::Array(_) => decode_items(body),
        other => Page::from_envelope(other, collection_key).map(|page| page.items),
    }
}
