//! The [`View`] trait and the context and template mixins.
//!
//! Handlers return [`ViewResult<HttpResponse>`]. A handler that cannot find
//! its record or page propagates the error with `?`, and
//! [`View::dispatch`] turns it into a response with the error's status.
//!
//! ## Key Types
//!
//! - [`View`] - method dispatch
//! - [`ContextMixin`] - builds the context for a request
//! - [`TemplateResponseMixin`] - hands a context to a renderer
//! - [`TemplateView`] - renders a template with the path parameters

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use viewkit_core::{ViewError, ViewResult};
use viewkit_db::Value;
use viewkit_http::{HttpRequest, HttpResponse};
use viewkit_template::Engine;

use super::renderer::{ResponseRenderer, TemplateRenderer};

/// A context handed to renderers.
pub type Context = BTreeMap<String, Value>;

/// A boxed async request handler, produced by [`View::as_view`].
pub type ViewFunction = Box<
    dyn Fn(HttpRequest) -> Pin<Box<dyn Future<Output = HttpResponse> + Send>> + Send + Sync,
>;

/// The base trait for views.
///
/// Every method handler returns `405 Method Not Allowed` unless overridden.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use viewkit_core::ViewResult;
/// use viewkit_http::{HttpRequest, HttpResponse};
/// use viewkit_views::View;
///
/// struct Hello;
///
/// #[async_trait]
/// impl View for Hello {
///     async fn get(&self, _request: HttpRequest) -> ViewResult<HttpResponse> {
///         Ok(HttpResponse::ok("Hello"))
///     }
/// }
/// ```
#[async_trait]
pub trait View: Send + Sync {
    /// Returns the HTTP methods this view accepts.
    fn allowed_methods(&self) -> Vec<http::Method> {
        vec![
            http::Method::GET,
            http::Method::POST,
            http::Method::PUT,
            http::Method::PATCH,
            http::Method::DELETE,
            http::Method::HEAD,
            http::Method::OPTIONS,
        ]
    }

    /// Routes the request to its method handler and converts errors into
    /// responses.
    async fn dispatch(&self, request: HttpRequest) -> HttpResponse {
        let method = request.method().clone();
        let path = request.path().to_string();

        let result = if self.allowed_methods().contains(&method) {
            match method {
                http::Method::GET => self.get(request).await,
                http::Method::POST => self.post(request).await,
                http::Method::PUT => self.put(request).await,
                http::Method::PATCH => self.patch(request).await,
                http::Method::DELETE => self.delete(request).await,
                http::Method::HEAD => self.head(request).await,
                http::Method::OPTIONS => self.options(request).await,
                _ => Err(ViewError::MethodNotAllowed(method.to_string())),
            }
        } else {
            Err(ViewError::MethodNotAllowed(method.to_string()))
        };

        match result {
            Ok(response) => response,
            Err(ViewError::MethodNotAllowed(_)) => {
                tracing::warn!(%method, %path, "method not allowed");
                let methods = self.allowed_methods();
                let names: Vec<&str> = methods.iter().map(http::Method::as_str).collect();
                HttpResponse::not_allowed(&names)
            }
            Err(err) => {
                if err.status_code() >= 500 {
                    tracing::error!(%method, %path, error = %err, "view failed");
                } else {
                    tracing::warn!(%method, %path, error = %err, "view returned an error");
                }
                HttpResponse::from_error(&err)
            }
        }
    }

    /// Handles GET.
    async fn get(&self, request: HttpRequest) -> ViewResult<HttpResponse> {
        Err(ViewError::MethodNotAllowed(request.method().to_string()))
    }

    /// Handles POST.
    async fn post(&self, request: HttpRequest) -> ViewResult<HttpResponse> {
        Err(ViewError::MethodNotAllowed(request.method().to_string()))
    }

    /// Handles PUT.
    async fn put(&self, request: HttpRequest) -> ViewResult<HttpResponse> {
        Err(ViewError::MethodNotAllowed(request.method().to_string()))
    }

    /// Handles PATCH.
    async fn patch(&self, request: HttpRequest) -> ViewResult<HttpResponse> {
        Err(ViewError::MethodNotAllowed(request.method().to_string()))
    }

    /// Handles DELETE.
    async fn delete(&self, request: HttpRequest) -> ViewResult<HttpResponse> {
        Err(ViewError::MethodNotAllowed(request.method().to_string()))
    }

    /// Handles HEAD by delegating to `get`.
    async fn head(&self, request: HttpRequest) -> ViewResult<HttpResponse> {
        self.get(request).await
    }

    /// Answers OPTIONS with an `Allow` header.
    async fn options(&self, _request: HttpRequest) -> ViewResult<HttpResponse> {
        let methods = self.allowed_methods();
        let names: Vec<&str> = methods.iter().map(http::Method::as_str).collect();
        let mut response = HttpResponse::ok("");
        if let Ok(value) = http::header::HeaderValue::from_str(&names.join(", ")) {
            response.headers_mut().insert(http::header::ALLOW, value);
        }
        Ok(response)
    }

    /// Wraps the view in a boxed handler function.
    #[allow(clippy::wrong_self_convention)]
    fn as_view(self) -> ViewFunction
    where
        Self: Sized + 'static,
    {
        let view = Arc::new(self);
        Box::new(move |request: HttpRequest| -> Pin<Box<dyn Future<Output = HttpResponse> + Send>> {
            let view = Arc::clone(&view);
            Box::pin(async move { view.dispatch(request).await })
        })
    }
}

/// Converts path parameters into a plain JSON object value.
pub fn params_value(kwargs: &HashMap<String, String>) -> Value {
    let map: serde_json::Map<String, serde_json::Value> = kwargs
        .iter()
        .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
        .collect();
    Value::Json(serde_json::Value::Object(map))
}

/// Builds the context for a request.
pub trait ContextMixin {
    /// Returns the base context. The default holds the path parameters
    /// under `params`.
    fn get_context_data(&self, kwargs: &HashMap<String, String>) -> Context {
        let mut context = Context::new();
        context.insert("params".to_string(), params_value(kwargs));
        context
    }
}

/// Hands a context to the view's renderer.
pub trait TemplateResponseMixin {
    /// Returns the renderer used for responses.
    fn renderer(&self) -> &dyn ResponseRenderer;

    /// Renders the context into a response.
    fn render_to_response(&self, context: &Context) -> ViewResult<HttpResponse> {
        self.renderer().render(context)
    }
}

/// Renders a template with the path parameters.
///
/// The parameters are available both under `params` and at the top level,
/// so `/news/{category}/` can use `{{ category }}` or `{{ params.category }}`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use viewkit_template::Engine;
/// use viewkit_views::TemplateView;
///
/// let engine = Arc::new(Engine::new());
/// engine.add_string_template("about.html", "About {{ site }}").unwrap();
/// let view = TemplateView::new(engine, "about.html").with_context("site", "viewkit");
/// ```
pub struct TemplateView {
    renderer: TemplateRenderer,
    extra_context: Context,
}

impl TemplateView {
    /// Creates a view rendering `template_name` with `engine`.
    pub fn new(engine: Arc<Engine>, template_name: impl Into<String>) -> Self {
        Self {
            renderer: TemplateRenderer::new(engine, template_name),
            extra_context: Context::new(),
        }
    }

    /// Adds a fixed entry to every context.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_context.insert(key.into(), value.into());
        self
    }
}

impl ContextMixin for TemplateView {
    fn get_context_data(&self, kwargs: &HashMap<String, String>) -> Context {
        let mut context = self.extra_context.clone();
        for (key, value) in kwargs {
            context.insert(key.clone(), Value::from(value.as_str()));
        }
        context.insert("params".to_string(), params_value(kwargs));
        context
    }
}

impl TemplateResponseMixin for TemplateView {
    fn renderer(&self) -> &dyn ResponseRenderer {
        &self.renderer
    }
}

#[async_trait]
impl View for TemplateView {
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

    struct Echo;

    #[async_trait]
    impl View for Echo {
        async fn get(&self, request: HttpRequest) -> ViewResult<HttpResponse> {
            Ok(HttpResponse::ok(format!("GET {}", request.path())))
        }

        async fn post(&self, _request: HttpRequest) -> ViewResult<HttpResponse> {
            Err(ViewError::NotFound("nothing here".into()))
        }
    }

    struct GetOnly;

    #[async_trait]
    impl View for GetOnly {
        fn allowed_methods(&self) -> Vec<http::Method> {
            vec![http::Method::GET]
        }

        async fn get(&self, _request: HttpRequest) -> ViewResult<HttpResponse> {
            Ok(HttpResponse::ok("ok"))
        }
    }

    fn request(method: http::Method, path: &str) -> HttpRequest {
        HttpRequest::builder().method(method).path(path).build()
    }

    #[tokio::test]
    async fn test_dispatch_get() {
        let response = Echo.dispatch(request(http::Method::GET, "/a/")).await;
        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(response.text().unwrap(), "GET /a/");
    }

    #[tokio::test]
    async fn test_dispatch_converts_errors() {
        let response = Echo.dispatch(request(http::Method::POST, "/a/")).await;
        assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unimplemented_method_is_405() {
        let response = Echo.dispatch(request(http::Method::DELETE, "/a/")).await;
        assert_eq!(response.status(), http::StatusCode::METHOD_NOT_ALLOWED);
        assert!(response.headers().contains_key(http::header::ALLOW));
    }

    #[tokio::test]
    async fn test_disallowed_method_is_405() {
        let response = GetOnly.dispatch(request(http::Method::POST, "/")).await;
        assert_eq!(response.status(), http::StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(http::header::ALLOW).unwrap(), "GET");
    }

    #[tokio::test]
    async fn test_head_delegates_to_get() {
        let response = Echo.dispatch(request(http::Method::HEAD, "/h/")).await;
        assert_eq!(response.status(), http::StatusCode::OK);
    }

    #[tokio::test]
    async fn test_options_lists_methods() {
        let response = Echo.dispatch(request(http::Method::OPTIONS, "/")).await;
        let allow = response.headers().get(http::header::ALLOW).unwrap().to_str().unwrap();
        assert!(allow.contains("GET"));
        assert!(allow.contains("OPTIONS"));
    }

    #[tokio::test]
    async fn test_as_view() {
        let handler = Echo.as_view();
        let response = handler(request(http::Method::GET, "/x/")).await;
        assert_eq!(response.text().unwrap(), "GET /x/");
    }

    struct Plain;
    impl ContextMixin for Plain {}

    #[test]
    fn test_default_context_has_params() {
        let mut kwargs = HashMap::new();
        kwargs.insert("slug".to_string(), "intro".to_string());
        let context = Plain.get_context_data(&kwargs);
        assert_eq!(
            context.get("params").map(Value::to_json),
            Some(serde_json::json!({"slug": "intro"}))
        );
    }

    #[tokio::test]
    async fn test_template_view() {
        let engine = Arc::new(Engine::new());
        engine
            .add_string_template("news.html", "{{ site }}:{{ category }}:{{ params.category }}")
            .unwrap();
        let view = TemplateView::new(engine, "news.html").with_context("site", "vk");
        let request = HttpRequest::builder().path("/news/").kwarg("category", "tech").build();
        let response = view.dispatch(request).await;
        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(response.text().unwrap(), "vk:tech:tech");
    }

    #[tokio::test]
    async fn test_template_view_missing_template_is_500() {
        let view = TemplateView::new(Arc::new(Engine::new()), "missing.html");
        let response = view.dispatch(request(http::Method::GET, "/")).await;
        assert_eq!(response.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_template_view_rejects_post() {
        let view = TemplateView::new(Arc::new(Engine::new()), "x.html");
        let response = view.dispatch(request(http::Method::POST, "/")).await;
        assert_eq!(response.status(), http::StatusCode::METHOD_NOT_ALLOWED);
    }
}
