//! gql-handler - serve a GraphQL execution engine over HTTP.
//!
//! Requests are accepted however the client encodes them (URL parameters,
//! `application/graphql`, form fields, or JSON with `variables` as an
//! object or a JSON-encoded string), normalized, executed, and rendered as
//! a JSON result with status 200.
//!
//! - `gql_handler_service` holds the transport-agnostic types, the
//!   [`ExecutionEngine`] trait and the execution dispatch.
//! - `gql_handler_http` holds request decoding, rendering, and the axum
//!   [`GraphQLHandler`].

pub use gql_handler_http::{
    GraphQLHandler, JsonRenderer, RequestOptionsResolver, Resolution, ResolveError, router,
};
pub use gql_handler_service::{
    ConfigError, ExecutionEngine, ExecutionParams, ExecutionResult, GraphQLError, HandlerConfig,
    Location, RequestOptions, RequestOptionsCompatibility, ServiceError, Variables,
};

pub use gql_handler_http as http;
pub use gql_handler_service as service;
