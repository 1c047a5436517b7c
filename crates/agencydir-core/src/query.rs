//! Discovery seeds loaded from the JSON query template file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::text::normalize_text;
use crate::ConfigError;

/// One discovery seed. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
}

impl SearchQuery {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            country: None,
            platforms: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct QueryFileEntry {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    platforms: Option<Vec<String>>,
}

/// Load and normalize queries from a JSON file.
///
/// The file is expected to hold an array of `{query, country?, platforms?}`
/// objects. A top-level value that is not an array yields no queries;
/// entries without a usable `query` are skipped.
///
/// # Errors
///
/// Returns [`ConfigError::QueryFileIo`] if the file cannot be read and
/// [`ConfigError::QueryFileParse`] if it is not valid JSON.
pub fn load_queries(path: &Path) -> Result<Vec<SearchQuery>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::QueryFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_queries(&content).map_err(|e| ConfigError::QueryFileParse {
        path: path.display().to_string(),
        source: e,
    })
}

fn parse_queries(content: &str) -> Result<Vec<SearchQuery>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let serde_json::Value::Array(items) = value else {
        return Ok(Vec::new());
    };

    let queries = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<QueryFileEntry>(item).ok())
        .filter_map(|entry| {
            let query = entry.query.as_deref().map(str::trim).unwrap_or_default();
            if query.is_empty() {
                return None;
            }
            let country = entry
                .country
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string);
            Some(SearchQuery {
                query: query.to_string(),
                country,
                platforms: normalize_platform_tokens(&entry.platforms.unwrap_or_default()),
            })
        })
        .collect();

    Ok(queries)
}

/// Split comma-joined platform tokens, lowercase, trim, and dedupe in order.
///
/// `["Zapier, make", "zapier"]` → `["zapier", "make"]`.
#[must_use]
pub fn normalize_platform_tokens(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for token in values.iter().flat_map(|v| v.split(',')) {
        let token = normalize_text(&token.to_lowercase());
        if !token.is_empty() && !out.contains(&token) {
            out.push(token);
        }
    }
    out
}
