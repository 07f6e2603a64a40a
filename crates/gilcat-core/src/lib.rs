//! Core domain types for the gilcat stray-cat tracker.
//!
//! This crate is deliberately free of HTTP and I/O dependencies.
//! All other crates depend on it; it depends on nothing heavier than serde.

pub mod cat;
pub mod community;
pub mod error;
pub mod geo;
pub mod model;
pub mod query;
pub mod recent;

pub use error::{Error, Result};
pub use model::CatModel;
