//! # viewkit-http
//!
//! HTTP layer for viewkit. Provides the request and response types that views
//! consume and produce, and the conversion into axum responses.
//!
//! ## Modules
//!
//! - [`request`] - [`HttpRequest`] and its builder
//! - [`querydict`] - [`QueryDict`] for query string and form data
//! - [`response`] - [`HttpResponse`], JSON and redirect constructors

pub mod querydict;
pub mod request;
pub mod response;

pub use querydict::QueryDict;
pub use request::{HttpRequest, HttpRequestBuilder};
pub use response::{
    HttpResponse, HttpResponseNotFound, HttpResponseRedirect, JsonResponse,
};
