//! Request options resolution.
//!
//! Turns any supported client encoding into a [`RequestOptions`]:
//! URL parameters first, then a `POST` body dispatched on its content type.
//! Decoding never fails outright. Malformed input yields empty or partial
//! options plus a [`ResolveError`] describing what was dropped.

use axum::extract::Request;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method};
use serde::Deserialize;
use serde_json::{Map, Value};
use gql_handler_service::types::{
    RequestOptions, RequestOptionsCompatibility, Variables, decode_variables,
};

use crate::error::ResolveError;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_GRAPHQL: &str = "application/graphql";
pub const CONTENT_TYPE_FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Best-effort options and, when something was dropped, the reason.
#[derive(Debug, Default)]
pub struct Resolution {
    pub options: RequestOptions,
    pub issue: Option<ResolveError>,
}

impl Resolution {
    fn resolved(options: RequestOptions) -> Self {
        Self {
            options,
            issue: None,
        }
    }

    fn degraded(issue: impl Into<ResolveError>) -> Self {
        Self {
            options: RequestOptions::default(),
            issue: Some(issue.into()),
        }
    }

    pub fn into_options(self) -> RequestOptions {
        self.options
    }
}

/// How a `POST` body is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    /// Body is the query document.
    GraphQL,
    /// `query`, `variables`, `operationName` form fields.
    Form,
    /// JSON object, with the string-variables fallback. Also the default.
    Json,
}

impl BodyKind {
    fn from_mime(mime: Option<&str>) -> Self {
        match mime {
            Some(m) if m.eq_ignore_ascii_case(CONTENT_TYPE_GRAPHQL) => Self::GraphQL,
            Some(m) if m.eq_ignore_ascii_case(CONTENT_TYPE_FORM_URLENCODED) => Self::Form,
            _ => Self::Json,
        }
    }
}

/// Stateless resolver.
pub struct RequestOptionsResolver;

impl RequestOptionsResolver {
    /// Resolves options for one request.
    ///
    /// The body is only read for `POST` requests without a `query` URL
    /// parameter, and at most `body_limit` bytes of it.
    pub async fn resolve(request: Request, body_limit: usize) -> Resolution {
        let (parts, body) = request.into_parts();

        if let Some(resolution) = Self::from_query_string(parts.uri.query()) {
            return resolution;
        }
        if parts.method != Method::POST {
            return Resolution::default();
        }

        let bytes = match axum::body::to_bytes(body, body_limit).await {
            Ok(bytes) => bytes,
            Err(e) => return Resolution::degraded(ResolveError::BodyRead(e)),
        };
        if bytes.is_empty() {
            return Resolution::default();
        }

        Self::from_body(mime_type(&parts.headers), &bytes)
    }

    /// Resolves from URL parameters alone.
    ///
    /// Returns `None` unless a non-empty `query` parameter is present.
    pub fn from_query_string(query_string: Option<&str>) -> Option<Resolution> {
        let fields = FormFields::parse(query_string?.as_bytes()).ok()?;
        let query = fields.query.filter(|q| !q.is_empty())?;

        let raw_variables = fields.variables.as_deref().unwrap_or_default();
        let (variables, issue) = match decode_variables(raw_variables) {
            Ok(vars) => (vars, None),
            Err(e) => (Variables::new(), Some(ResolveError::InvalidVariables(e))),
        };

        Some(Resolution {
            options: RequestOptions {
                query,
                variables,
                operation_name: fields.operation_name.unwrap_or_default(),
            },
            issue,
        })
    }

    /// Decodes a non-empty `POST` body according to its MIME type.
    pub fn from_body(mime: Option<&str>, body: &[u8]) -> Resolution {
        match BodyKind::from_mime(mime) {
            BodyKind::GraphQL => match std::str::from_utf8(body) {
                Ok(query) => Resolution::resolved(RequestOptions::new(query)),
                Err(e) => Resolution::degraded(e),
            },
            BodyKind::Form => Self::from_form(body),
            BodyKind::Json => Self::from_json(body),
        }
    }

    fn from_form(body: &[u8]) -> Resolution {
        let fields = match FormFields::parse(body) {
            Ok(fields) => fields,
            Err(e) => return Resolution::degraded(e),
        };
        let variables = match decode_variables(fields.variables.as_deref().unwrap_or_default()) {
            Ok(vars) => vars,
            Err(e) => return Resolution::degraded(ResolveError::InvalidVariables(e)),
        };

        Resolution::resolved(RequestOptions {
            query: fields.query.unwrap_or_default(),
            variables,
            operation_name: fields.operation_name.unwrap_or_default(),
        })
    }

    /// Only a JSON object is accepted; a repeated key keeps its last value.
    fn from_json(body: &[u8]) -> Resolution {
        let object = match serde_json::from_slice::<Map<String, Value>>(body) {
            Ok(map) => Value::Object(map),
            Err(e) => return Resolution::degraded(ResolveError::InvalidJson(e)),
        };

        let direct_err = match RequestOptions::deserialize(&object) {
            Ok(options) => return Resolution::resolved(options),
            Err(e) => e,
        };

        // Variables may have been sent as a JSON-encoded string.
        if let Ok(compat) = RequestOptionsCompatibility::deserialize(&object) {
            let (options, err) = compat.into_options();
            return Resolution {
                options,
                issue: err.map(ResolveError::InvalidVariables),
            };
        }

        // Neither shape fits: keep whichever string fields survive.
        let text = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned()
        };
        Resolution {
            options: RequestOptions {
                query: text("query"),
                variables: Variables::new(),
                operation_name: text("operationName"),
            },
            issue: Some(ResolveError::InvalidJson(direct_err)),
        }
    }
}

/// MIME portion of the `Content-Type` header, without parameters.
fn mime_type(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    value.split(';').next().map(str::trim)
}

/// The three recognized fields of a URL query string or form body.
/// Repeated keys keep their first value.
#[derive(Debug, Default)]
struct FormFields {
    query: Option<String>,
    variables: Option<String>,
    operation_name: Option<String>,
}

impl FormFields {
    fn parse(input: &[u8]) -> Result<Self, serde_urlencoded::de::Error> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(input)?;
        let mut fields = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "query" => {
                    fields.query.get_or_insert(value);
                }
                "variables" => {
                    fields.variables.get_or_insert(value);
                }
                "operationName" => {
                    fields.operation_name.get_or_insert(value);
                }
                _ => {}
            }
        }
        Ok(fields)
    }
}
