//! Views.
//!
//! - [`class_based`] - the [`View`] trait, context and template mixins, [`TemplateView`]
//! - [`renderer`] - template and JSON renderers and JSON encoders
//! - [`json`] - [`JsonView`]
//! - [`detail`] - single-record views
//! - [`list`] - paginated multi-record views
//! - [`edit`] - form, create and update views

pub mod class_based;
pub mod detail;
pub mod edit;
pub mod json;
pub mod list;
pub mod renderer;

pub use class_based::{Context, ContextMixin, TemplateResponseMixin, TemplateView, View, ViewFunction};
pub use detail::{DetailView, JsonDetailView, SingleObject};
pub use edit::{CreateView, FormMixin, FormView, ModelFormMixin, UpdateView};
pub use json::JsonView;
pub use list::{JsonListView, ListView, MultipleObject, Page};
pub use renderer::{
    DocumentEncoder, JsonEncoder, JsonRenderer, ResponseRenderer, StandardEncoder,
    TemplateRenderer,
};
