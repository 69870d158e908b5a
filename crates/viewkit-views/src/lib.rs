//! # viewkit-views
//!
//! Generic views for viewkit. Views look up records in a
//! [`DocumentStore`](viewkit_db::DocumentStore) from URL parameters, build a
//! context, and hand it to a renderer that produces HTML through a template
//! or JSON through an encoder.
//!
//! ## Modules
//!
//! - [`views`] - the [`View`](views::View) trait and the generic views
//! - [`pagination`] - page arithmetic for list views
//! - [`server`] - mounting views on an axum router

pub mod pagination;
pub mod server;
pub mod views;

#[cfg(test)]
mod testing;

pub use pagination::PageDescriptor;
pub use server::App;
pub use views::{
    Context, ContextMixin, CreateView, DetailView, DocumentEncoder, FormMixin, FormView,
    JsonDetailView, JsonEncoder, JsonListView, JsonRenderer, JsonView, ListView, ModelFormMixin,
    MultipleObject, ResponseRenderer, SingleObject, StandardEncoder, TemplateRenderer,
    TemplateResponseMixin, TemplateView, UpdateView, View, ViewFunction,
};
