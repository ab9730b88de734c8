//! Per-request context handed to every catalog operation.

use tracing::Span;

/// Explicit logging handle for one inbound request.
///
/// Catalog operations log inside child spans of the request span
/// instead of relying on whatever span happens to be current.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    span: Span,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        let request_id = request_id.into();
        let span = tracing::info_span!("request", request_id = %request_id);
        Self { request_id, span }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Child span for one catalog operation.
    pub(crate) fn operation(&self, name: &'static str) -> Span {
        tracing::debug_span!(parent: &self.span, "catalog", operation = name)
    }
}
