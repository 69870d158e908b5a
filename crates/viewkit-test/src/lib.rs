//! # viewkit-test
//!
//! Helpers for testing viewkit views.
//!
//! - [`RequestFactory`] builds [`HttpRequest`](viewkit_http::HttpRequest)s to
//!   hand straight to a view's `dispatch`.
//! - [`TestClient`] drives a whole axum router and returns [`TestResponse`]s.
//! - [`assertions`] holds panicking checks with readable failure messages.

pub mod assertions;
pub mod client;
pub mod request_factory;

pub use client::{TestClient, TestResponse};
pub use request_factory::RequestFactory;
