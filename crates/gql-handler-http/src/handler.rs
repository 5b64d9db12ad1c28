//! The GraphQL request handler: resolve, execute, render.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::Response;
use gql_handler_service::{
    ConfigError, ExecutionEngine, ExecutionParams, ExecutionResult, ExecutionService,
    HandlerConfig, RequestOptions, ServiceError,
};

use crate::render::JsonRenderer;
use crate::resolve::{RequestOptionsResolver, Resolution};

/// Serves GraphQL requests against a fixed schema.
///
/// Cheap to clone; all clones share the same engine, schema and renderer.
pub struct GraphQLHandler<E: ExecutionEngine> {
    inner: Arc<HandlerInner<E>>,
}

struct HandlerInner<E: ExecutionEngine> {
    engine: Arc<E>,
    schema: Arc<E::Schema>,
    renderer: JsonRenderer,
    execution_timeout: Option<Duration>,
    body_limit: usize,
}

impl<E: ExecutionEngine> Clone for GraphQLHandler<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: ExecutionEngine> GraphQLHandler<E> {
    /// Builds a handler.
    ///
    /// `None` stands for the default configuration, which has no schema,
    /// so it is rejected just like an explicit config without one.
    pub fn new(engine: E, config: Option<HandlerConfig<E::Schema>>) -> Result<Self, ConfigError> {
        let config = config.unwrap_or_default();
        let schema = config.require_schema()?;

        Ok(Self {
            inner: Arc::new(HandlerInner {
                engine: Arc::new(engine),
                schema,
                renderer: JsonRenderer::new(config.pretty),
                execution_timeout: config.effective_timeout(),
                body_limit: config.body_limit,
            }),
        })
    }

    pub fn schema(&self) -> &Arc<E::Schema> {
        &self.inner.schema
    }

    pub fn pretty(&self) -> bool {
        self.inner.renderer.indent()
    }

    /// Handles one HTTP request.
    ///
    /// The status is always 200; engine and dispatch errors travel in the
    /// body's `errors` list.
    pub async fn handle(&self, request: Request) -> Response {
        let Resolution { options, issue } =
            RequestOptionsResolver::resolve(request, self.inner.body_limit).await;
        if let Some(issue) = issue {
            tracing::debug!(%issue, "request options partially resolved");
        }

        let result = self.execute(options).await;
        self.inner.renderer.json(StatusCode::OK, &result)
    }

    /// Runs resolved options through the engine.
    pub async fn execute(&self, options: RequestOptions) -> ExecutionResult {
        tracing::debug!(
            operation = %options.operation_name,
            query_len = options.query.len(),
            variables = options.variables.len(),
            "executing GraphQL request",
        );

        let params = ExecutionParams::new(Arc::clone(&self.inner.schema), options);
        match ExecutionService::execute(&self.inner.engine, params, self.inner.execution_timeout)
            .await
        {
            Ok(result) => result,
            Err(err) => {
                if matches!(err, ServiceError::ResultDropped) {
                    tracing::error!(%err, "no execution result delivered");
                }
                ExecutionResult::from_error(err.to_string())
            }
        }
    }
}

/// axum handler backing [`crate::router`].
pub async fn graphql_endpoint<E: ExecutionEngine>(
    State(handler): State<GraphQLHandler<E>>,
    request: Request,
) -> Response {
    handler.handle(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Method;
    use axum::http::header::CONTENT_TYPE;
    use serde_json::{Value, json};

    use crate::render::APPLICATION_JSON_UTF8;

    struct EchoEngine;

    impl ExecutionEngine for EchoEngine {
        type Schema = String;

        fn execute(&self, params: ExecutionParams<String>) -> ExecutionResult {
            if params.query.is_empty() {
                return ExecutionResult::from_error("Must provide an operation.");
            }
            ExecutionResult::from_data(json!({
                "schema": *params.schema,
                "query": params.query,
                "variables": params.variables,
                "operationName": params.operation_name,
            }))
        }
    }

    struct SleepyEngine;

    impl ExecutionEngine for SleepyEngine {
        type Schema = ();

        fn execute(&self, _params: ExecutionParams<()>) -> ExecutionResult {
            std::thread::sleep(Duration::from_millis(500));
            ExecutionResult::from_data(json!(null))
        }
    }

    struct CrashingEngine;

    impl ExecutionEngine for CrashingEngine {
        type Schema = ();

        fn execute(&self, _params: ExecutionParams<()>) -> ExecutionResult {
            panic!("engine crashed");
        }
    }

    fn echo_handler(pretty: bool) -> GraphQLHandler<EchoEngine> {
        let config = HandlerConfig::<String>::new("schema-v1".to_string()).pretty(pretty);
        GraphQLHandler::new(EchoEngine, Some(config)).unwrap()
    }

    fn json_post(body: &str) -> Request {
        axum::http::Request::builder()
            .method(Method::POST)
            .uri("/graphql")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    async fn json_body(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn missing_config_is_rejected() {
        let res = GraphQLHandler::new(EchoEngine, None);
        assert_eq!(res.err(), Some(ConfigError::MissingSchema));
    }

    #[test]
    fn config_without_schema_is_rejected() {
        let res = GraphQLHandler::new(EchoEngine, Some(HandlerConfig::default()));
        assert_eq!(res.err(), Some(ConfigError::MissingSchema));
    }

    #[test]
    fn pretty_is_the_default() {
        let config = HandlerConfig::<String>::new("s".to_string());
        let handler = GraphQLHandler::new(EchoEngine, Some(config)).unwrap();
        assert!(handler.pretty());
        assert_eq!(handler.schema().as_str(), "s");
    }

    #[tokio::test]
    async fn handle_executes_resolved_options() {
        let handler = echo_handler(true);
        let resp = handler
            .handle(json_post(
                r#"{"query":"Q","variables":{"a":1},"operationName":"Op"}"#,
            ))
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], APPLICATION_JSON_UTF8);
        assert_eq!(
            json_body(resp).await,
            json!({"data": {
                "schema": "schema-v1",
                "query": "Q",
                "variables": {"a": 1},
                "operationName": "Op",
            }})
        );
    }

    #[tokio::test]
    async fn malformed_body_still_renders_200() {
        let handler = echo_handler(false);
        let resp = handler.handle(json_post("{{{")).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            json_body(resp).await,
            json!({"errors": [{"message": "Must provide an operation."}]})
        );
    }

    #[tokio::test]
    async fn timeout_is_reported_in_body() {
        let config = HandlerConfig::<()>::new(()).execution_timeout(Duration::from_millis(20));
        let handler = GraphQLHandler::new(SleepyEngine, Some(config)).unwrap();

        let resp = handler.handle(json_post(r#"{"query":"{ a }"}"#)).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            json_body(resp).await,
            json!({"errors": [{"message": "query execution timed out"}]})
        );
    }

    #[tokio::test]
    async fn crashed_engine_is_reported_in_body() {
        let handler = GraphQLHandler::new(CrashingEngine, Some(HandlerConfig::new(()))).unwrap();

        let resp = handler.handle(json_post(r#"{"query":"{ a }"}"#)).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], APPLICATION_JSON_UTF8);
        assert_eq!(
            json_body(resp).await,
            json!({"errors": [{"message": "execution engine terminated without a result"}]})
        );
    }

    #[tokio::test]
    async fn clones_share_schema() {
        let handler = echo_handler(true);
        let other = handler.clone();
        assert!(Arc::ptr_eq(handler.schema(), other.schema()));
    }
}
