//! gql-handler HTTP — axum transport adapter.
//!
//! Provides:
//! - request options resolution from URL parameters and `POST` bodies
//!   (`application/graphql`, form-encoded, JSON with string-variables
//!   fallback)
//! - the [`GraphQLHandler`] that resolves, executes and renders
//! - a method-agnostic [`router`] for mounting the handler

pub mod error;
pub mod handler;
pub mod render;
pub mod resolve;

use axum::Router;
use gql_handler_service::ExecutionEngine;
use tower_http::trace::TraceLayer;

pub use error::ResolveError;
pub use handler::GraphQLHandler;
pub use render::JsonRenderer;
pub use resolve::{RequestOptionsResolver, Resolution};

/// Wraps a handler in a `Router` that answers every method on every path.
///
/// Mount it under a prefix with `Router::nest_service`, or merge it as the
/// application's fallback.
pub fn router<E: ExecutionEngine>(handler: GraphQLHandler<E>) -> Router {
    Router::new()
        .fallback(handler::graphql_endpoint::<E>)
        .layer(TraceLayer::new_for_http())
        .with_state(handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use gql_handler_service::{ExecutionParams, ExecutionResult, HandlerConfig};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct QueryEcho;

    impl ExecutionEngine for QueryEcho {
        type Schema = ();

        fn execute(&self, params: ExecutionParams<()>) -> ExecutionResult {
            ExecutionResult::from_data(json!({ "query": params.query }))
        }
    }

    fn app() -> Router {
        let handler = GraphQLHandler::new(QueryEcho, Some(HandlerConfig::new(()))).unwrap();
        router(handler)
    }

    async fn call(req: Request<Body>) -> (StatusCode, Value) {
        let resp = app().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn router_serves_get() {
        let req = Request::builder()
            .uri("/anything?query=%7B%20a%20%7D")
            .body(Body::empty())
            .unwrap();

        let (status, body) = call(req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"data": {"query": "{ a }"}}));
    }

    #[tokio::test]
    async fn router_serves_graphql_post() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/")
            .header("content-type", "application/graphql")
            .body(Body::from("{ hello }"))
            .unwrap();

        let (status, body) = call(req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"data": {"query": "{ hello }"}}));
    }

    #[tokio::test]
    async fn router_accepts_other_methods() {
        let req = Request::builder()
            .method(Method::DELETE)
            .uri("/")
            .body(Body::empty())
            .unwrap();

        let (status, body) = call(req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"data": {"query": ""}}));
    }
}
