//! vkb-manager library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the `vkb-layout` binary share the same module tree.

pub mod application;
pub mod infrastructure;
