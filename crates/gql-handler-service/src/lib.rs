//! gql-handler service — transport-agnostic core of the GraphQL HTTP adapter.
//!
//! This crate holds everything that does not depend on a web framework:
//! the normalized request options, the execution result shape, handler
//! configuration, and the one-shot dispatch to an execution engine.
//!
//! The HTTP transport (`gql-handler-http`) depends on this crate and
//! provides request decoding and response rendering.

pub mod config;
pub mod error;
pub mod execute;
pub mod types;

pub use config::HandlerConfig;
pub use error::{ConfigError, ServiceError};
pub use execute::{ExecutionEngine, ExecutionService};
pub use types::{
    ExecutionParams, ExecutionResult, GraphQLError, Location, RequestOptions,
    RequestOptionsCompatibility, Variables,
};
