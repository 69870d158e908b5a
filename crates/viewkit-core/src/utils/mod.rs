//! Utility functions shared by the viewkit crates.
//!
//! - [`text`]: String helpers (HTML escaping, context naming, labels).

pub mod text;
