// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Query parameter encoding
//!
//! Persisted GraphQL queries take their arguments as query-string values holding
//! compact JSON text, not as native query arrays or objects.

use serde_json::{Map, Value};

/// Static list of named boolean toggles
pub type Toggles = &'static [(&'static str, bool)];

/// Build a JSON object from `baseline`, letting `overrides` win on conflicts
pub fn merge_toggles(baseline: &[(&str, bool)], overrides: &[(&str, bool)]) -> Map<String, Value> {
    baseline
        .iter()
        .chain(overrides)
        .map(|(name, enabled)| ((*name).to_string(), Value::Bool(*enabled)))
        .collect()
}

/// Encode every object-valued entry of `params` as compact JSON text
///
/// Null fields inside each object are dropped before serializing. Entries whose
/// value is not an object are not sent at all.
pub fn encode_params(params: &Map<String, Value>) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(name, value)| match value {
            Value::Object(fields) => {
                let kept: Map<String, Value> = fields
                    .iter()
                    .filter(|(_, field)| !field.is_null())
                    .map(|(key, field)| (key.clone(), field.clone()))
                    .collect();
                Some((name.clone(), Value::Object(kept).to_string()))
            }
            _ => None,
        })
        .collect()
}

/// The `variables` / `features` pair sent with every query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphqlParams {
    /// Query arguments
    pub variables: Map<String, Value>,
    /// Feature flags selecting the response schema variant
    pub features: Map<String, Value>,
}

impl GraphqlParams {
    /// Create a parameter set
    pub fn new(variables: Map<String, Value>, features: Map<String, Value>) -> Self {
        Self {
            variables,
            features,
        }
    }

    /// Set or replace the pagination cursor
    pub fn set_cursor(&mut self, cursor: impl Into<String>) {
        self.variables
            .insert("cursor".to_string(), Value::String(cursor.into()));
    }

    /// Current pagination cursor, if any
    pub fn cursor(&self) -> Option<&str> {
        self.variables.get("cursor").and_then(Value::as_str)
    }

    /// Query-string pairs ready to hand to an HTTP client
    pub fn encode(&self) -> Vec<(String, String)> {
        let mut params = Map::new();
        params.insert(
            "variables".to_string(),
            Value::Object(self.variables.clone()),
        );
        params.insert("features".to_string(), Value::Object(self.features.clone()));
        encode_params(&params)
    }
}
