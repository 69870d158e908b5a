//! A client that sends requests through an axum router in-process.
//!
//! ```rust,no_run
//! use axum::routing::get;
//! use axum::Router;
//! use viewkit_test::TestClient;
//!
//! # async fn example() {
//! let app = Router::new().route("/hello", get(|| async { "Hello" }));
//! let client = TestClient::new(app);
//!
//! let response = client.get("/hello").await;
//! assert_eq!(response.status_code(), 200);
//! assert_eq!(response.text(), "Hello");
//! # }
//! ```

use axum::Router;
use http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use viewkit_core::{ViewError, ViewResult};
use viewkit_http::QueryDict;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Sends requests to a router without opening a socket.
#[derive(Clone)]
pub struct TestClient {
    app: Router,
}

impl TestClient {
    /// Wraps `app`.
    pub const fn new(app: Router) -> Self {
        Self { app }
    }

    /// Sends a GET. The path may carry a query string.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path, Vec::new(), None).await
    }

    /// Sends a form-encoded POST.
    pub async fn post(&self, path: &str, data: &[(&str, &str)]) -> TestResponse {
        self.request(Method::POST, path, encode_form(data), Some(FORM_URLENCODED))
            .await
    }

    /// Sends a form-encoded PUT.
    pub async fn put(&self, path: &str, data: &[(&str, &str)]) -> TestResponse {
        self.request(Method::PUT, path, encode_form(data), Some(FORM_URLENCODED))
            .await
    }

    /// Sends a DELETE.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request(Method::DELETE, path, Vec::new(), None).await
    }

    /// Sends a HEAD.
    pub async fn head(&self, path: &str) -> TestResponse {
        self.request(Method::HEAD, path, Vec::new(), None).await
    }

    /// Sends an OPTIONS.
    pub async fn options(&self, path: &str) -> TestResponse {
        self.request(Method::OPTIONS, path, Vec::new(), None).await
    }

    /// Sends an arbitrary request.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(ct) = content_type {
            builder = builder.header(http::header::CONTENT_TYPE, ct);
        }
        let request = builder
            .body(axum::body::Body::from(body))
            .expect("test request should be well-formed");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .map_or_else(|_| Vec::new(), |collected| collected.to_bytes().to_vec());

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

fn encode_form(data: &[(&str, &str)]) -> Vec<u8> {
    QueryDict::from_pairs(data.iter().copied())
        .urlencode()
        .into_bytes()
}

/// A response collected by [`TestClient`].
#[derive(Debug)]
pub struct TestResponse {
    /// The status code.
    pub status: StatusCode,
    /// The response headers.
    pub headers: HeaderMap,
    /// The body bytes.
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Returns the body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parses the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> ViewResult<T> {
        serde_json::from_slice(&self.body).map_err(ViewError::from)
    }

    /// Returns the numeric status code.
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns `true` if the header is present.
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }

    /// Returns the `Location` header.
    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }

    /// Returns `true` if the body contains `text`.
    pub fn contains(&self, text: &str) -> bool {
        self.text().contains(text)
    }
}
