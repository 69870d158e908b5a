//! # viewkit-forms
//!
//! Forms for viewkit views. A form is a list of [`FormFieldDef`]s; it renders
//! as HTML inputs, binds to submitted [`QueryDict`](viewkit_http::QueryDict)
//! data, cleans raw strings into typed [`Value`](viewkit_db::Value)s, and can
//! copy the cleaned data onto a [`Document`](viewkit_db::Document).
//!
//! ## Modules
//!
//! - [`fields`] - field definitions and per-field cleaning
//! - [`widgets`] - HTML rendering of inputs
//! - [`bound_field`] - a field paired with its display value and errors
//! - [`form`] - the [`Form`] trait and [`BaseForm`]
//! - [`validation`] - the field cleaning pass
//! - [`model_form`] - populating records from cleaned data

pub mod bound_field;
pub mod fields;
pub mod form;
pub mod model_form;
pub mod validation;
pub mod widgets;

pub use bound_field::BoundField;
pub use fields::{clean_field_value, FormFieldDef, FormFieldType};
pub use form::{BaseForm, Form};
pub use model_form::populate_document;
pub use validation::clean_fields;
pub use widgets::WidgetType;
