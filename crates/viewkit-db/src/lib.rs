//! # viewkit-db
//!
//! Document layer for viewkit. Views read and write records through the
//! [`DocumentStore`] trait; records implement [`Document`] so that views can
//! look them up by URL parameters and read or write fields by name.
//!
//! ## Modules
//!
//! - [`object_id`] - 12-byte document identifiers
//! - [`value`] - the dynamic [`Value`] type for field contents
//! - [`document`] - the [`Document`] trait
//! - [`filter`] - equality filters built from URL parameters
//! - [`store`] - the async [`DocumentStore`] trait
//! - [`memory`] - an in-memory [`MemoryStore`]

pub mod document;
pub mod filter;
pub mod memory;
pub mod object_id;
pub mod store;
pub mod value;

pub use document::Document;
pub use filter::Filter;
pub use memory::MemoryStore;
pub use object_id::{ObjectId, ParseObjectIdError};
pub use store::DocumentStore;
pub use value::{Fields, Value};
