//! Override resolution loader.
//!
//! Responsibilities:
//! - Provide the builder-pattern [`OverrideLoader`] that reads INI
//!   sources and applies the selected override policy.
//! - Select exactly one of the six precedence strategies from the
//!   loader's settings (see select.rs) and execute it (see strategy.rs).
//!
//! Does NOT handle:
//! - INI parsing itself (the store crate's concern).
//! - Typed materialization (see convert.rs).
//!
//! Invariants / Assumptions:
//! - The environment pass runs before the direct pass, so direct
//!   overrides win on any key both sources touch.
//! - Strategy selection happens before any override mutation; a
//!   `PolicyNotImplemented` failure leaves the store exactly as read
//!   from the files.

mod builder;
mod select;
mod strategy;

pub use builder::OverrideLoader;

#[cfg(test)]
mod tests;
