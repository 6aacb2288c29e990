//! Infrastructure layer of the layout manager.
//!
//! Contains the file-system adapters: TOML configuration and a
//! directory-backed layout resource provider.
//!
//! **Dependency rule**: this layer may depend on `application` and `vkb_core`,
//! but MUST NOT be imported by the `application` layer.

pub mod resources;
pub mod storage;
