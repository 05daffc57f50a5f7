//! Test-only crate: workspace architecture invariants live in `tests/`.
