//! Responses produced by views.
//!
//! [`HttpResponse`] carries a status, headers, a content type and a body.
//! [`JsonResponse`], [`HttpResponseRedirect`] and [`HttpResponseNotFound`]
//! build the common shapes, and [`HttpResponse::from_error`] turns a
//! [`ViewError`] that ended a request into the page the client sees.

use axum::response::IntoResponse;
use http::{HeaderMap, HeaderValue, StatusCode};

use viewkit_core::ViewError;

const HTML: &str = "text/html";
const JSON: &str = "application/json";

/// A response produced by a view.
///
/// Text and JSON content types are sent with `; charset=utf-8`.
///
/// # Examples
///
/// ```
/// use viewkit_http::HttpResponse;
///
/// let response = HttpResponse::ok("Hello, World!");
/// assert_eq!(response.status(), http::StatusCode::OK);
/// assert_eq!(response.text(), Some("Hello, World!"));
/// ```
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    content_type: String,
    body: Vec<u8>,
}

impl HttpResponse {
    /// An HTML response.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            content_type: HTML.to_string(),
            body: body.into().into_bytes(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    pub fn not_found(body: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, body)
    }

    pub fn bad_request(body: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, body)
    }

    /// A 405 listing `permitted` in the body and the `Allow` header.
    pub fn not_allowed(permitted: &[&str]) -> Self {
        let methods = permitted.join(", ");
        let mut response = Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            format!("Method Not Allowed. Permitted: {methods}"),
        );
        if let Ok(value) = HeaderValue::from_str(&methods) {
            response.headers.insert(http::header::ALLOW, value);
        }
        response
    }

    /// The response for an error that ended request handling.
    ///
    /// Client errors show the message; server errors show a fixed body.
    pub fn from_error(error: &ViewError) -> Self {
        let status = StatusCode::from_u16(error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            Self::new(status, "Internal Server Error")
        } else {
            Self::new(status, error.to_string())
        }
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// The media type, without charset.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.content_type = content_type.into();
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body as text, or `None` when it is not UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// The redirect target.
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(http::header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    fn content_type_header(&self) -> Option<HeaderValue> {
        let textual = self.content_type.starts_with("text/") || self.content_type.contains("json");
        let value = if textual {
            format!("{}; charset=utf-8", self.content_type)
        } else {
            self.content_type.clone()
        };
        HeaderValue::from_str(&value).ok()
    }
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> axum::response::Response {
        let content_type = self.content_type_header();
        let mut response = axum::response::Response::new(axum::body::Body::from(self.body));
        *response.status_mut() = self.status;
        let headers = response.headers_mut();
        if let Some(value) = content_type {
            headers.insert(http::header::CONTENT_TYPE, value);
        }
        headers.extend(self.headers);
        response
    }
}

/// 200 responses with an `application/json` body.
pub struct JsonResponse;

impl JsonResponse {
    /// Wraps JSON that is already encoded.
    pub fn from_string(json: impl Into<String>) -> HttpResponse {
        let mut response = HttpResponse::ok(json);
        response.set_content_type(JSON);
        response
    }

    /// Serializes `data`. A serialization failure is answered with a 500.
    pub fn new<T: serde::Serialize>(data: &T) -> HttpResponse {
        serde_json::to_string(data).map_or_else(
            |e| HttpResponse::from_error(&ViewError::from(e)),
            Self::from_string,
        )
    }
}

/// 302 Found redirects.
pub struct HttpResponseRedirect;

impl HttpResponseRedirect {
    /// Redirects to `url`. A URL that is not a valid header value is dropped.
    pub fn new(url: &str) -> HttpResponse {
        let mut response = HttpResponse::new(StatusCode::FOUND, "");
        if let Ok(value) = HeaderValue::from_str(url) {
            response.headers.insert(http::header::LOCATION, value);
        }
        response
    }
}

/// 404 pages.
pub struct HttpResponseNotFound;

impl HttpResponseNotFound {
    pub fn new(body: impl Into<String>) -> HttpResponse {
        HttpResponse::not_found(body)
    }
}
