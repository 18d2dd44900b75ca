// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Generic GraphQL-over-GET plumbing
//!
//! Some GraphQL backends are only reachable through persisted queries issued as
//! plain `GET` requests, with every complex argument stringified into the query
//! string. This crate holds the pieces that do not depend on a particular backend.
//!
//! # Core Abstractions
//!
//! - **Navigator**: [`navigator::find_key`] and friends search arbitrarily nested
//!   JSON for a key, so extractors survive schema drift
//! - **Parameters**: [`params::encode_params`] turns nested parameter objects into
//!   compact JSON query values, [`params::merge_toggles`] layers feature flags
//! - **Operations**: [`Operation`] describes one remote query as data: its id, its
//!   default toggles and the decoder for its result
//! - **Decoding errors**: [`DecodeError`] reports payloads that do not match the
//!   expected shape

use serde_json::{Map, Value};
use thiserror::Error;

pub mod navigator;
pub mod params;

pub use navigator::{find_key, find_key_with_prefix, lookup, lookup_any};
pub use params::{GraphqlParams, Toggles, encode_params, merge_toggles};

/// Errors raised when a payload does not have the expected shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum DecodeError {
    /// A required field is absent under every known path
    #[error("missing field `{field}`")]
    MissingField { field: String },

    /// A field is present but holds an unusable value
    #[error("invalid field `{field}`: {message}")]
    InvalidField { field: String, message: String },
}

impl DecodeError {
    /// Shorthand for [`DecodeError::MissingField`]
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Shorthand for [`DecodeError::InvalidField`]
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Turns a raw response into a typed record
pub type Decoder<T> = fn(&Value) -> Result<T, DecodeError>;

/// Descriptor of one remote query
///
/// Endpoints are data rather than types: a facade binds an `Operation` to a
/// client and only adds the per-call variables.
#[derive(Debug)]
pub struct Operation<T> {
    /// Path segment selecting the query, `<hash>/<Name>`
    pub id: &'static str,
    /// Feature flags layered over the client baseline
    pub features: Toggles,
    /// Boolean variables sent with every call
    pub variables: Toggles,
    /// Decoder for the response payload
    pub decode: Decoder<T>,
}

impl<T> Clone for Operation<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Operation<T> {}

impl<T> Operation<T> {
    /// Human-readable query name, the part after the hash
    pub fn name(&self) -> &'static str {
        self.id.rsplit('/').next().unwrap_or(self.id)
    }

    /// Default variables with the call-specific ones layered on top
    pub fn variables_with(&self, call_variables: Map<String, Value>) -> Map<String, Value> {
        let mut variables = merge_toggles(self.variables, &[]);
        variables.extend(call_variables);
        variables
    }

    /// Feature flags for this operation over the given baseline
    pub fn features_over(&self, baseline: Toggles) -> Map<String, Value> {
        merge_toggles(baseline, self.features)
    }
}
