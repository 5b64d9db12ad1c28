//! Handler configuration.

use std::sync::Arc;
use std::time::Duration;

use crate::error::ConfigError;

/// Request bodies larger than this are treated as unreadable.
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Configuration fixed when a handler is built.
///
/// The default has no schema, which a handler refuses to start with.
pub struct HandlerConfig<S> {
    /// Schema handed to the engine on every request.
    pub schema: Option<Arc<S>>,
    /// Indent rendered JSON.
    pub pretty: bool,
    /// How long to wait for the engine. `None` or zero waits forever.
    pub execution_timeout: Option<Duration>,
    /// Maximum request body size in bytes.
    pub body_limit: usize,
}

impl<S> Default for HandlerConfig<S> {
    fn default() -> Self {
        Self {
            schema: None,
            pretty: true,
            execution_timeout: None,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl<S> Clone for HandlerConfig<S> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            pretty: self.pretty,
            execution_timeout: self.execution_timeout,
            body_limit: self.body_limit,
        }
    }
}

impl<S> std::fmt::Debug for HandlerConfig<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerConfig")
            .field("schema", &self.schema.as_ref().map(|_| ".."))
            .field("pretty", &self.pretty)
            .field("execution_timeout", &self.execution_timeout)
            .field("body_limit", &self.body_limit)
            .finish()
    }
}

impl<S> HandlerConfig<S> {
    /// Default configuration bound to `schema`.
    pub fn new(schema: impl Into<Arc<S>>) -> Self {
        Self::default().with_schema(schema)
    }

    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<Arc<S>>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    #[must_use]
    pub fn execution_timeout(mut self, timeout: Duration) -> Self {
        self.execution_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    /// Returns the schema, or `MissingSchema` when none was configured.
    pub fn require_schema(&self) -> Result<Arc<S>, ConfigError> {
        self.schema.clone().ok_or(ConfigError::MissingSchema)
    }

    /// Timeout actually applied to dispatch; zero means disabled.
    pub fn effective_timeout(&self) -> Option<Duration> {
        self.execution_timeout.filter(|t| !t.is_zero())
    }
}
