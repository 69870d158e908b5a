//! # viewkit
//!
//! Composable class-based views for axum.
//!
//! This is the meta-crate that re-exports the sub-crates. Depend on `viewkit`
//! to get everything, or on individual crates for finer-grained control.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use viewkit::prelude::*;
//!
//! # async fn example() -> ViewResult<()> {
//! let settings = Settings::default();
//! let engine = Arc::new(Engine::from_settings(&settings)?);
//! App::new(settings)
//!     .route("/", TemplateView::new(engine, "home.html"))
//!     .route("/echo/{name}/", JsonView::new())
//!     .run("127.0.0.1:8000")
//!     .await
//! # }
//! ```

/// Settings, errors and logging.
pub use viewkit_core as core;

/// Requests, responses and query strings.
#[cfg(feature = "http")]
pub use viewkit_http as http;

/// Records, filters and document stores.
#[cfg(feature = "db")]
pub use viewkit_db as db;

/// Forms, fields and widgets.
#[cfg(feature = "forms")]
pub use viewkit_forms as forms;

/// The Tera-backed template engine.
#[cfg(feature = "template")]
pub use viewkit_template as template;

/// Class-based views and the axum application builder.
#[cfg(feature = "views")]
pub use viewkit_views as views;

/// Request factory, test client and assertions.
#[cfg(feature = "testing")]
pub use viewkit_test as test;

// Third-party crates applications usually need alongside viewkit.
pub use async_trait::async_trait;
pub use axum;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tracing;

/// The types most applications import.
pub mod prelude {
    pub use viewkit_core::logging::setup_logging;
    pub use viewkit_core::{settings_loader, Settings, ViewError, ViewResult};

    #[cfg(feature = "db")]
    pub use viewkit_db::{Document, DocumentStore, Fields, Filter, MemoryStore, ObjectId, Value};

    #[cfg(feature = "forms")]
    pub use viewkit_forms::{BaseForm, Form, FormFieldDef, FormFieldType};

    #[cfg(feature = "http")]
    pub use viewkit_http::{HttpRequest, HttpResponse, QueryDict};

    #[cfg(feature = "template")]
    pub use viewkit_template::Engine;

    #[cfg(feature = "views")]
    pub use viewkit_views::{
        App, ContextMixin, CreateView, DetailView, FormMixin, FormView, JsonDetailView,
        JsonListView, JsonView, ListView, TemplateResponseMixin, TemplateView, UpdateView, View,
    };
}
