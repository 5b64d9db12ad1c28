//! JSON response rendering.

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

pub const APPLICATION_JSON_UTF8: &str = "application/json; charset=UTF-8";

/// Writes serializable payloads as JSON responses.
#[derive(Debug, Clone, Copy)]
pub struct JsonRenderer {
    indent: bool,
}

impl JsonRenderer {
    pub fn new(indent: bool) -> Self {
        Self { indent }
    }

    pub fn indent(&self) -> bool {
        self.indent
    }

    /// Renders `payload` with `status`.
    ///
    /// Serialization failures become a plain-text 500, as `axum::Json` does.
    pub fn json<T: Serialize + ?Sized>(&self, status: StatusCode, payload: &T) -> Response {
        let encoded = if self.indent {
            serde_json::to_vec_pretty(payload)
        } else {
            serde_json::to_vec(payload)
        };

        match encoded {
            Ok(bytes) => (
                status,
                [(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON_UTF8))],
                bytes,
            )
                .into_response(),
            Err(err) => {
                tracing::error!(%err, "failed to serialize response body");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    [(
                        CONTENT_TYPE,
                        HeaderValue::from_static("text/plain; charset=utf-8"),
                    )],
                    err.to_string(),
                )
                    .into_response()
            }
        }
    }
}
