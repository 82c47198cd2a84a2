//! # Response Envelope Normalization
//!
//! The backend wraps payloads in `{data, status, message?, count?, total?,
//! page?, pages?}` but is not consistent about it. A list may arrive as:
//!
//! - a bare array: `[...]`
//! - a wrapped array: `{"data": [...]}`
//! - a named wrapper: `{"echanges": [...]}` (also nested as
//!   `{"data": {"echanges": [...]}}`)
//!
//! A single entity may arrive bare, as `{"data": {...}}`, or as
//! `{"echange": {...}}`.
//!
//! [`ResponseShape`] classifies the raw JSON once. [`normalize_list`] and
//! [`extract_entity`] are the only places that look at wire shapes; callers
//! above this module only see [`Listing`] and typed entities.

use crate::infrastructure::api::error::{ApiError, ApiResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const DATA_KEY: &str = "data";

/// Pagination metadata read from an envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ListMeta {
    count: Option<u64>,
    total: Option<u64>,
    page: Option<u32>,
    pages: Option<u32>,
}

impl ListMeta {
    fn read(envelope: &Map<String, Value>) -> Self {
        let number = |key: &str| envelope.get(key).and_then(Value::as_u64);
        Self {
            count: number("count"),
            total: number("total"),
            page: number("page").and_then(|p| u32::try_from(p).ok()),
            pages: number("pages").and_then(|p| u32::try_from(p).ok()),
        }
    }
}

/// The wire shape a list response arrived in.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// `[...]`
    Array(Vec<Value>),
    /// `{"data": [...], ...meta}`
    Wrapped {
        /// The array under `data`.
        items: Vec<Value>,
        /// The envelope's metadata fields.
        envelope: Map<String, Value>,
    },
    /// `{"<key>": [...], ...meta}`, possibly nested under `data`.
    NamedWrapped {
        /// The array under the domain key.
        items: Vec<Value>,
        /// Metadata fields; inner values override outer ones when nested.
        envelope: Map<String, Value>,
    },
    /// Anything else.
    Unrecognized(Value),
}

impl ResponseShape {
    /// Classifies a list response. `key` is the domain wrapper name, such as
    /// `"echanges"`.
    #[must_use]
    pub fn classify(value: Value, key: &str) -> Self {
        match value {
            Value::Array(items) => Self::Array(items),
            Value::Object(mut envelope) => {
                if let Some(Value::Array(items)) = envelope.remove(key) {
                    return Self::NamedWrapped { items, envelope };
                }
                match envelope.remove(DATA_KEY) {
                    Some(Value::Array(items)) => Self::Wrapped { items, envelope },
                    Some(Value::Object(mut inner)) => match inner.remove(key) {
                        Some(Value::Array(items)) => {
                            for (k, v) in inner {
                                envelope.insert(k, v);
                            }
                            Self::NamedWrapped { items, envelope }
                        }
                        other => {
                            if let Some(v) = other {
                                inner.insert(key.to_string(), v);
                            }
                            envelope.insert(DATA_KEY.to_string(), Value::Object(inner));
                            Self::Unrecognized(Value::Object(envelope))
                        }
                    },
                    other => {
                        if let Some(v) = other {
                            envelope.insert(DATA_KEY.to_string(), v);
                        }
                        Self::Unrecognized(Value::Object(envelope))
                    }
                }
            }
            other => Self::Unrecognized(other),
        }
    }

    /// Short name of the shape, for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Array(_) => "array",
            Self::Wrapped { .. } => "wrapped",
            Self::NamedWrapped { .. } => "named_wrapped",
            Self::Unrecognized(_) => "unrecognized",
        }
    }

    fn into_parts(self) -> Option<(Vec<Value>, ListMeta)> {
        match self {
            Self::Array(items) => Some((items, ListMeta::default())),
            Self::Wrapped { items, envelope } | Self::NamedWrapped { items, envelope } => {
                Some((items, ListMeta::read(&envelope)))
            }
            Self::Unrecognized(_) => None,
        }
    }
}

/// A normalized page of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Number of items on this page.
    pub count: u64,
    /// Number of items across all pages.
    pub total: u64,
    /// 1-based page number.
    pub page: u32,
    /// Number of pages.
    pub pages: u32,
}

/// Normalizes a list response of any accepted shape.
///
/// Missing metadata defaults to a single page holding every returned item
/// (no pages at all when nothing was returned).
///
/// # Errors
///
/// Returns `ApiError::Decode` if the shape is unrecognized or an item does
/// not deserialize into `T`.
pub fn normalize_list<T: DeserializeOwned>(value: Value, key: &str) -> ApiResult<Listing<T>> {
    let shape = ResponseShape::classify(value, key);
    let shape_name = shape.name();
    let (raw_items, meta) = shape
        .into_parts()
        .ok_or_else(|| ApiError::decode(format!("unrecognized list response for '{}'", key)))?;

    let items = raw_items
        .into_iter()
        .map(serde_json::from_value::<T>)
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| ApiError::decode(format!("invalid '{}' item ({}): {}", key, shape_name, e)))?;

    let returned = items.len() as u64;
    let count = meta.count.unwrap_or(returned);
    let total = meta.total.unwrap_or(count);
    Ok(Listing {
        items,
        count,
        total,
        page: meta.page.unwrap_or(1).max(1),
        pages: meta.pages.unwrap_or(u32::from(total > 0)),
    })
}

/// Extracts a single entity from a response of any accepted shape.
///
/// Tries `{"<key>": {...}}`, then `{"data": {...}}` (itself possibly holding
/// `key`), then the bare value.
///
/// # Errors
///
/// Returns `ApiError::NotFound` when no shape yields a `T`.
pub fn extract_entity<T: DeserializeOwned>(value: Value, key: &str) -> ApiResult<T> {
    let mut candidates = Vec::with_capacity(3);
    if let Value::Object(envelope) = &value {
        if let Some(named @ Value::Object(_)) = envelope.get(key) {
            candidates.push(named.clone());
        }
        if let Some(Value::Object(data)) = envelope.get(DATA_KEY) {
            if let Some(named @ Value::Object(_)) = data.get(key) {
                candidates.push(named.clone());
            }
            candidates.push(Value::Object(data.clone()));
        }
    }
    candidates.push(value);

    candidates
        .into_iter()
        .find_map(|candidate| serde_json::from_value::<T>(candidate).ok())
        .ok_or_else(|| ApiError::not_found(format!("no '{}' in response", key)))
}
