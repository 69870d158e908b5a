//! # viewkit-template
//!
//! Template rendering for viewkit views. The [`Engine`] wraps a
//! [`tera::Tera`] instance that can be loaded from directories or filled
//! with in-memory templates, and renders a named template against a JSON
//! context map.

pub mod engine;

pub use engine::Engine;
