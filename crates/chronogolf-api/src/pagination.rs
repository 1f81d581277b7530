//! Response envelopes and pagination metadata

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Pagination metadata normalized from a list response.
///
/// Absent (or zero) page counters default to 1; absent totals default to 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub next_page_url: Option<String>,
    pub prev_page_url: Option<String>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            per_page: 0,
            total_items: 0,
            next_page_url: None,
            prev_page_url: None,
        }
    }
}

impl Pagination {
    /// Read pagination fields from the top level of a response body.
    pub fn from_response(body: &Value) -> Self {
        let number = |key: &str| body.get(key).and_then(Value::as_u64).filter(|n| *n > 0);
        let url = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_owned);
        let defaults = Self::default();

        Self {
            current_page: number("current_page").unwrap_or(defaults.current_page),
            total_pages: number("total_pages").unwrap_or(defaults.total_pages),
            per_page: number("per_page").unwrap_or(defaults.per_page),
            total_items: number("total").unwrap_or(defaults.total_items),
            next_page_url: url("next_page_url"),
            prev_page_url: url("prev_page_url"),
        }
    }

    pub fn has_next(&self) -> bool {
        self.next_page_url.is_some() || self.current_page < self.total_pages
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T: DeserializeOwned> Page<T> {
    /// Split a list response into items and pagination.
    ///
    /// Items come from the `data` envelope when present, otherwise the body
    /// itself must be the array.
    pub fn from_response(body: Value) -> Result<Self> {
        let pagination = Pagination::from_response(&body);
        let items = match unwrap_data(body) {
            Value::Null => Vec::new(),
            data => serde_json::from_value(data).map_err(|e| Error::decode(200, e))?,
        };
        Ok(Self { items, pagination })
    }
}

/// Return the `data` member of an enveloped response, or the body itself.
pub fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if !data.is_null() => data,
            Some(_) | None => Value::Object(map),
        },
        other => other,
    }
}

/// Decode a single-resource response, unwrapping the `data` envelope.
pub(crate) fn decode<T: DeserializeOwned>(body: Value) -> Result<T> {
    serde_json::from_value(unwrap_data(body)).map_err(|e| Error::decode(200, e))
}
