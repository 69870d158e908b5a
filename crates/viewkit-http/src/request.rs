//! HTTP request type.
//!
//! [`HttpRequest`] gives views access to the request method, path, headers,
//! query parameters, form-encoded body, and the keyword arguments captured
//! from the URL path by the router.

use std::collections::HashMap;

use http::{HeaderMap, Method};

use crate::querydict::QueryDict;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// A request as handed to a view.
///
/// The server converts incoming axum requests with
/// [`HttpRequest::from_axum`]; tests usually go through
/// [`HttpRequest::builder`].
///
/// # Examples
///
/// ```
/// use viewkit_http::HttpRequest;
///
/// let request = HttpRequest::builder()
///     .method(http::Method::GET)
///     .path("/news/4/")
///     .query_string("page=2")
///     .kwarg("category", "news")
///     .build();
///
/// assert_eq!(request.path(), "/news/4/");
/// assert_eq!(request.get().get("page"), Some("2"));
/// assert_eq!(request.kwarg("category"), Some("news"));
/// ```
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    path: String,
    query_string: String,
    content_type: Option<String>,
    get: QueryDict,
    post: QueryDict,
    headers: HeaderMap,
    body: Vec<u8>,
    kwargs: HashMap<String, String>,
}

impl HttpRequest {
    /// Starts a request for `GET /`.
    pub fn builder() -> HttpRequestBuilder {
        HttpRequestBuilder::default()
    }

    /// Converts axum request parts and the collected body.
    ///
    /// The router fills in the path parameters afterwards with
    /// [`HttpRequest::set_kwargs`].
    pub fn from_axum(parts: http::request::Parts, body: Vec<u8>) -> Self {
        let content_type = parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let mut request = Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            query_string: parts.uri.query().unwrap_or_default().to_string(),
            content_type,
            get: QueryDict::new(),
            post: QueryDict::new(),
            headers: parts.headers,
            body,
            kwargs: HashMap::new(),
        };
        request.parse_params();
        request
    }

    /// Fills `get` from the query string and `post` from a form body.
    fn parse_params(&mut self) {
        self.get = QueryDict::parse(&self.query_string);
        self.post = match self.content_type.as_deref() {
            Some(ct) if ct.starts_with(FORM_URLENCODED) => {
                QueryDict::parse(&String::from_utf8_lossy(&self.body))
            }
            _ => QueryDict::new(),
        };
    }

    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// The path, without the query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The query string, without the leading `?`.
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Query string parameters.
    pub const fn get(&self) -> &QueryDict {
        &self.get
    }

    /// Submitted form fields. Empty unless the body is
    /// `application/x-www-form-urlencoded`.
    pub const fn post(&self) -> &QueryDict {
        &self.post
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Parameters captured from the route pattern, e.g. `id` for `/users/{id}/`.
    pub const fn kwargs(&self) -> &HashMap<String, String> {
        &self.kwargs
    }

    /// One captured route parameter.
    pub fn kwarg(&self, name: &str) -> Option<&str> {
        self.kwargs.get(name).map(String::as_str)
    }

    /// Replaces the captured route parameters.
    pub fn set_kwargs(&mut self, kwargs: HashMap<String, String>) {
        self.kwargs = kwargs;
    }

    /// The path followed by `?query` when there is one.
    ///
    /// ```
    /// use viewkit_http::HttpRequest;
    ///
    /// let request = HttpRequest::builder()
    ///     .path("/articles/")
    ///     .query_string("page=2")
    ///     .build();
    /// assert_eq!(request.get_full_path(), "/articles/?page=2");
    /// ```
    pub fn get_full_path(&self) -> String {
        match self.query_string.as_str() {
            "" => self.path.clone(),
            query => format!("{}?{query}", self.path),
        }
    }
}

/// Assembles an [`HttpRequest`] by hand, mostly for tests.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    request: HttpRequest,
}

impl Default for HttpRequestBuilder {
    fn default() -> Self {
        Self {
            request: HttpRequest {
                method: Method::GET,
                path: "/".to_string(),
                query_string: String::new(),
                content_type: None,
                get: QueryDict::new(),
                post: QueryDict::new(),
                headers: HeaderMap::new(),
                body: Vec::new(),
                kwargs: HashMap::new(),
            },
        }
    }
}

impl HttpRequestBuilder {
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.request.method = method;
        self
    }

    #[must_use]
    pub fn path(mut self, path: &str) -> Self {
        self.request.path = path.to_string();
        self
    }

    /// Sets the query string, given without `?`.
    #[must_use]
    pub fn query_string(mut self, query: &str) -> Self {
        self.request.query_string = query.to_string();
        self
    }

    #[must_use]
    pub fn content_type(mut self, content_type: &str) -> Self {
        self.request.content_type = Some(content_type.to_string());
        self
    }

    /// Adds a header. Invalid names or values are skipped.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        let name = http::header::HeaderName::from_bytes(name.as_bytes());
        let value = http::header::HeaderValue::from_str(value);
        if let (Ok(name), Ok(value)) = (name, value) {
            self.request.headers.insert(name, value);
        }
        self
    }

    #[must_use]
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.request.body = body;
        self
    }

    /// Encodes `pairs` as the body and marks it form-urlencoded.
    #[must_use]
    pub fn form(self, pairs: &[(&str, &str)]) -> Self {
        let encoded = QueryDict::from_pairs(pairs.iter().copied()).urlencode();
        self.content_type(FORM_URLENCODED).body(encoded.into_bytes())
    }

    /// Adds a route parameter.
    #[must_use]
    pub fn kwarg(mut self, name: &str, value: &str) -> Self {
        self.request
            .kwargs
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn build(mut self) -> HttpRequest {
        self.request.parse_params();
        self.request
    }
}
