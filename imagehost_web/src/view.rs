//! Handlers select a template and supply model data; rendering itself is an
//! external collaborator downstream of this service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

/// A selected view plus the model attributes it renders with.
#[derive(Debug, Serialize)]
pub struct View {
    pub template: &'static str,
    pub model: Value,
}

impl View {
    pub fn new(template: &'static str, model: impl Serialize) -> Self {
        // Our own view models serialize infallibly
        let model = serde_json::to_value(model).unwrap_or(Value::Null);
        Self { template, model }
    }
}

impl IntoResponse for View {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Generic failure page for uncaught persistence faults. No detail leaks to
/// the client; the cause has already been logged.
pub fn error_page() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        View::new("error", serde_json::json!({})),
    )
        .into_response()
}
