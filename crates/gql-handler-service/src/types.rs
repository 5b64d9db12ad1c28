//! Transport-agnostic request and result types.
//!
//! Used by the execution service and by transport adapters. No HTTP
//! dependencies.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Variable bindings keyed by variable name.
pub type Variables = serde_json::Map<String, Value>;

/// Normalized query request: what the engine gets, however the client
/// encoded it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestOptions {
    /// Query document text. May be empty; the engine rejects that itself.
    #[serde(deserialize_with = "null_as_default")]
    pub query: String,
    /// Variable bindings. Absent and `null` both decode to an empty map.
    #[serde(deserialize_with = "null_as_default")]
    pub variables: Variables,
    /// Operation to run when the document holds several.
    #[serde(deserialize_with = "null_as_default")]
    pub operation_name: String,
}

impl RequestOptions {
    /// Creates options carrying only a query document.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Sets the variable bindings.
    pub fn with_variables(self, variables: Variables) -> Self {
        Self { variables, ..self }
    }

    /// Sets the operation name.
    pub fn with_operation_name(self, operation_name: impl Into<String>) -> Self {
        Self {
            operation_name: operation_name.into(),
            ..self
        }
    }

    /// True when every field is empty.
    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.variables.is_empty() && self.operation_name.is_empty()
    }
}

/// Same shape as [`RequestOptions`] but with `variables` still JSON-encoded
/// as a string. Some clients encode the variables object twice.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestOptionsCompatibility {
    #[serde(deserialize_with = "null_as_default")]
    pub query: String,
    #[serde(deserialize_with = "null_as_default")]
    pub variables: String,
    #[serde(deserialize_with = "null_as_default")]
    pub operation_name: String,
}

impl RequestOptionsCompatibility {
    /// Decodes the embedded variables string.
    ///
    /// `query` and `operation_name` are always carried over. When the
    /// variables string is not a JSON object the options come back with
    /// empty variables alongside the decode error.
    pub fn into_options(self) -> (RequestOptions, Option<serde_json::Error>) {
        let (variables, err) = match decode_variables(&self.variables) {
            Ok(vars) => (vars, None),
            Err(e) => (Variables::new(), Some(e)),
        };
        let options = RequestOptions {
            query: self.query,
            variables,
            operation_name: self.operation_name,
        };
        (options, err)
    }
}

/// Decodes a JSON-encoded variables object. A blank string means no
/// variables.
pub fn decode_variables(raw: &str) -> Result<Variables, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(Variables::new());
    }
    let vars: Option<Variables> = serde_json::from_str(raw)?;
    Ok(vars.unwrap_or_default())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Everything the engine needs to run one request.
#[derive(Debug)]
pub struct ExecutionParams<S> {
    pub schema: Arc<S>,
    pub query: String,
    pub variables: Variables,
    pub operation_name: String,
}

impl<S> ExecutionParams<S> {
    /// Binds resolved request options to a schema.
    pub fn new(schema: Arc<S>, options: RequestOptions) -> Self {
        Self {
            schema,
            query: options.query,
            variables: options.variables,
            operation_name: options.operation_name,
        }
    }
}

/// Result object produced by the engine and rendered as the response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQLError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Map<String, Value>>,
}

impl ExecutionResult {
    /// A successful result.
    pub fn from_data(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    /// A result carrying a single error and no data.
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            errors: vec![GraphQLError::new(message)],
            ..Self::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// A single entry of the `errors` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Map<String, Value>>,
}

impl GraphQLError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: None,
            extensions: None,
        }
    }

    /// Adds a source location (1-based line and column).
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.locations.push(Location { line, column });
        self
    }
}

/// Position in the query document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}
