//! INI document store for inifold.
//!
//! This crate provides the mutable section/option/value model that the
//! override engine operates on: insertion-ordered sections, a
//! distinguished default section whose options are visible as fall-backs
//! from every other section, and a plain line-oriented INI reader and
//! writer.

mod document;
mod error;
mod read;
mod transform;
mod write;

pub use document::{DEFAULT_SECTION, IniStore, Section};
pub use error::StoreError;
pub use transform::OptionTransform;
