//! Diagnostics produced while decoding a request.
//!
//! None of these reach the client. The resolver falls back to empty or
//! partial options and hands the error alongside for logging.

/// Why request options could only be partially resolved.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Body could not be read, or exceeded the configured limit.
    #[error("failed to read request body: {0}")]
    BodyRead(#[source] axum::Error),

    /// `application/graphql` body that is not UTF-8.
    #[error("request body is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("invalid form body: {0}")]
    InvalidForm(#[from] serde_urlencoded::de::Error),

    /// JSON body matched neither the direct nor the string-variables shape.
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// `variables` is not a JSON-encoded object.
    #[error("invalid variables: {0}")]
    InvalidVariables(#[source] serde_json::Error),
}
