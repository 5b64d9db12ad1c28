//! Service-layer error types.
//!
//! `ConfigError` is raised once, while a handler is being built.
//! `ServiceError` covers the execution dispatch; the HTTP transport folds
//! it into the result body instead of mapping it to a status code.

/// Handler configuration rejected at construction time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No schema was supplied.
    #[error("undefined GraphQL schema")]
    MissingSchema,
}

/// Execution dispatch failure.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The engine did not deliver a result within the configured timeout.
    #[error("query execution timed out")]
    Timeout,

    /// The engine worker finished without sending a result.
    #[error("execution engine terminated without a result")]
    ResultDropped,
}
