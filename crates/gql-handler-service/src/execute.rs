//! Execution dispatch.
//!
//! The engine runs on a blocking worker and hands its result back over a
//! one-shot channel. The caller waits for exactly one message, optionally
//! bounded by a timeout.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;

use crate::error::ServiceError;
use crate::types::{ExecutionParams, ExecutionResult};

/// A GraphQL execution engine.
///
/// `execute` is a plain blocking call; it is always invoked on a worker
/// thread, never on the async runtime. Validation and execution errors
/// belong inside the returned result.
pub trait ExecutionEngine: Send + Sync + 'static {
    /// Opaque schema the engine executes against.
    type Schema: Send + Sync + 'static;

    fn execute(&self, params: ExecutionParams<Self::Schema>) -> ExecutionResult;
}

/// Stateless dispatch helpers; the engine is borrowed from the handler.
pub struct ExecutionService;

impl ExecutionService {
    /// Runs one request through `engine` and waits for its result.
    ///
    /// With a timeout, the wait is abandoned once it elapses; the worker
    /// itself keeps running until the engine returns.
    pub async fn execute<E: ExecutionEngine>(
        engine: &Arc<E>,
        params: ExecutionParams<E::Schema>,
        timeout: Option<Duration>,
    ) -> Result<ExecutionResult, ServiceError> {
        let (tx, rx) = oneshot::channel();
        let engine = Arc::clone(engine);

        tokio::task::spawn_blocking(move || {
            let result = engine.execute(params);
            // Err only when the receiver stopped waiting.
            let _ = tx.send(result);
        });

        receive_with_timeout(rx, timeout).await
    }
}

async fn receive_with_timeout(
    rx: oneshot::Receiver<ExecutionResult>,
    timeout: Option<Duration>,
) -> Result<ExecutionResult, ServiceError> {
    if let Some(dur) = timeout
        && !dur.is_zero()
    {
        match tokio::time::timeout(dur, rx).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(_)) => Err(ServiceError::ResultDropped),
            Err(_) => {
                tracing::warn!("query execution timed out after {dur:?}");
                Err(ServiceError::Timeout)
            }
        }
    } else {
        rx.await.map_err(|_| ServiceError::ResultDropped)
    }
}
