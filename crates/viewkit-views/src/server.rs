//! Mounting views on an axum router.
//!
//! [`App`] routes each path pattern to a [`View`]. Path parameters declared
//! in the pattern (`/users/{id}/`) reach the view as `kwargs`. Every request
//! runs inside a span carrying a generated request id, which is also
//! returned in the `x-request-id` response header.
//!
//! # Examples
//!
//! ```no_run
//! use viewkit_core::Settings;
//! use viewkit_views::{App, JsonView};
//!
//! # async fn example() -> viewkit_core::ViewResult<()> {
//! App::new(Settings::default())
//!     .route("/users/{user}/", JsonView::new())
//!     .run("127.0.0.1:8000")
//!     .await
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequestParts, Path, Request};
use axum::response::IntoResponse;
use axum::routing::any;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use viewkit_core::logging::request_span;
use viewkit_core::{Settings, ViewError, ViewResult};
use viewkit_http::{HttpRequest, HttpResponse};

use crate::views::View;

/// Largest request body read into memory.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Builds an axum [`Router`](axum::Router) out of views.
pub struct App {
    settings: Settings,
    router: axum::Router,
    routes: usize,
}

impl App {
    /// Creates an application with no routes.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            router: axum::Router::new(),
            routes: 0,
        }
    }

    /// Returns the settings.
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the number of mounted views.
    pub const fn route_count(&self) -> usize {
        self.routes
    }

    /// Mounts `view` at `path`, using axum's `{param}` syntax.
    #[must_use]
    pub fn route(self, path: &str, view: impl View + 'static) -> Self {
        self.route_shared(path, Arc::new(view))
    }

    /// Mounts a view that is shared with other routes.
    #[must_use]
    pub fn route_shared(mut self, path: &str, view: Arc<dyn View>) -> Self {
        tracing::debug!(path, "mounting view");
        let handler = move |req: Request| {
            let view = Arc::clone(&view);
            async move { handle(view, req).await }
        };
        self.router = self.router.route(path, any(handler));
        self.routes += 1;
        self
    }

    /// Returns the router, with a 404 fallback and request tracing.
    pub fn into_router(self) -> axum::Router {
        self.router
            .fallback(|| async { HttpResponse::not_found("Not Found").into_response() })
            .layer(TraceLayer::new_for_http())
    }

    /// Serves the application on `addr`.
    pub async fn run(self, addr: &str) -> ViewResult<()> {
        let debug_mode = self.settings.debug;
        let router = self.into_router();
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            ViewError::ImproperlyConfigured(format!("failed to bind to {addr}: {e}"))
        })?;

        tracing::info!(debug = debug_mode, "Starting server at http://{addr}/");

        axum::serve(listener, router)
            .await
            .map_err(|e| ViewError::InternalServerError(format!("server error: {e}")))
    }
}

async fn handle(view: Arc<dyn View>, req: Request) -> axum::response::Response {
    let (mut parts, body) = req.into_parts();
    let kwargs = match Path::<HashMap<String, String>>::from_request_parts(&mut parts, &()).await {
        Ok(Path(kwargs)) => kwargs,
        Err(PathRejection::MissingPathParams(_)) => HashMap::new(),
        Err(rejection) => {
            tracing::warn!(error = %rejection, path = parts.uri.path(), "bad path parameters");
            return HttpResponse::bad_request("Invalid path parameters").into_response();
        }
    };

    let request_id = uuid::Uuid::new_v4().to_string();
    let span = request_span(&request_id, parts.method.as_str(), parts.uri.path());

    let mut response = async move {
        let body = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read request body");
                return HttpResponse::bad_request("Could not read request body");
            }
        };
        let mut request = HttpRequest::from_axum(parts, body);
        request.set_kwargs(kwargs);
        let response = view.dispatch(request).await;
        tracing::debug!(status = response.status().as_u16(), "view responded");
        response
    }
    .instrument(span)
    .await;

    if let Ok(value) = http::HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response.into_response()
}
