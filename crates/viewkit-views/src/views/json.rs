//! A view answering GET with the path parameters as JSON.

use async_trait::async_trait;

use viewkit_core::ViewResult;
use viewkit_http::{HttpRequest, HttpResponse};

use super::class_based::{ContextMixin, TemplateResponseMixin, View};
use super::renderer::{JsonEncoder, JsonRenderer, ResponseRenderer};

/// Renders `{"params": {...}}` for the matched path parameters.
///
/// Requesting `/users/john/` routed as `/users/{user}/` answers
/// `{"params": {"user": "john"}}`. Wrap the view, or implement
/// [`ContextMixin`] on your own type, to serve other data.
#[derive(Clone, Default)]
pub struct JsonView {
    renderer: JsonRenderer,
}

impl JsonView {
    /// Creates a view using [`StandardEncoder`](super::renderer::StandardEncoder).
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `encoder` for the context.
    #[must_use]
    pub fn with_encoder(mut self, encoder: impl JsonEncoder + 'static) -> Self {
        self.renderer = JsonRenderer::new(encoder);
        self
    }

    /// Indents the output.
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.renderer = self.renderer.pretty(pretty);
        self
    }
}

impl ContextMixin for JsonView {}

impl TemplateResponseMixin for JsonView {
    fn renderer(&self) -> &dyn ResponseRenderer {
        &self.renderer
    }
}

#[async_trait]
impl View for JsonView {
    fn allowed_methods(&self) -> Vec<http::Method> {
        vec![http::Method::GET, http::Method::HEAD, http::Method::OPTIONS]
    }

    async fn get(&self, request: HttpRequest) -> ViewResult<HttpResponse> {
        let context = self.get_context_data(request.kwargs());
        self.render_to_response(&context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_params_as_json() {
        let request = HttpRequest::builder()
            .path("/users/john/")
            .kwarg("user", "john")
            .build();
        let response = JsonView::new().dispatch(request).await;
        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(response.content_type(), "application/json");
        let body: serde_json::Value = serde_json::from_str(&response.text().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"params": {"user": "john"}}));
    }

    #[tokio::test]
    async fn test_no_params() {
        let response = JsonView::new().dispatch(HttpRequest::builder().build()).await;
        assert_eq!(response.text().unwrap(), r#"{"params":{}}"#);
    }

    #[tokio::test]
    async fn test_post_not_allowed() {
        let request = HttpRequest::builder().method(http::Method::POST).build();
        let response = JsonView::new().dispatch(request).await;
        assert_eq!(response.status(), http::StatusCode::METHOD_NOT_ALLOWED);
    }
}
