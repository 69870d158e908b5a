//! Builds [`HttpRequest`]s for calling views directly, without a router.
//!
//! ```rust
//! use viewkit_test::RequestFactory;
//!
//! let factory = RequestFactory::new();
//! let request = factory.get("/articles/?page=2");
//! assert_eq!(request.method(), &http::Method::GET);
//! assert_eq!(request.path(), "/articles/");
//! assert_eq!(request.get().get("page"), Some("2"));
//! ```
//!
//! Path parameters are normally filled in by the router. Use
//! [`RequestFactory::builder`] to set them by hand:
//!
//! ```rust
//! use viewkit_test::RequestFactory;
//!
//! let request = RequestFactory::new()
//!     .builder(http::Method::GET, "/users/42/")
//!     .kwarg("id", "42")
//!     .build();
//! assert_eq!(request.kwarg("id"), Some("42"));
//! ```

use http::Method;

use viewkit_http::request::HttpRequestBuilder;
use viewkit_http::HttpRequest;

/// Creates requests sharing a set of default headers.
#[derive(Debug, Clone, Default)]
pub struct RequestFactory {
    default_headers: Vec<(String, String)>,
}

impl RequestFactory {
    /// Creates a factory with no default headers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header sent with every request.
    #[must_use]
    pub fn with_default_header(mut self, name: &str, value: &str) -> Self {
        self.default_headers
            .push((name.to_string(), value.to_string()));
        self
    }

    /// Returns a builder for `method` and `path`. A `?query` suffix on the
    /// path becomes the query string.
    pub fn builder(&self, method: Method, path: &str) -> HttpRequestBuilder {
        let (path, query) = path.split_once('?').unwrap_or((path, ""));
        let mut builder = HttpRequest::builder()
            .method(method)
            .path(path)
            .query_string(query);
        for (name, value) in &self.default_headers {
            builder = builder.header(name, value);
        }
        builder
    }

    /// Builds a GET.
    pub fn get(&self, path: &str) -> HttpRequest {
        self.builder(Method::GET, path).build()
    }

    /// Builds a form-encoded POST.
    pub fn post(&self, path: &str, data: &[(&str, &str)]) -> HttpRequest {
        self.builder(Method::POST, path).form(data).build()
    }

    /// Builds a form-encoded PUT.
    pub fn put(&self, path: &str, data: &[(&str, &str)]) -> HttpRequest {
        self.builder(Method::PUT, path).form(data).build()
    }

    /// Builds a DELETE.
    pub fn delete(&self, path: &str) -> HttpRequest {
        self.builder(Method::DELETE, path).build()
    }

    /// Builds a HEAD.
    pub fn head(&self, path: &str) -> HttpRequest {
        self.builder(Method::HEAD, path).build()
    }

    /// Builds an OPTIONS.
    pub fn options(&self, path: &str) -> HttpRequest {
        self.builder(Method::OPTIONS, path).build()
    }
}
