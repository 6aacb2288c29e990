//! Application layer of the layout manager.
//!
//! Use cases here orchestrate `vkb_core` types to serve keyboards.  They
//! depend on the [`vkb_core::ResourceProvider`] abstraction rather than on a
//! concrete resource location, and perform no file-system access themselves.
//!
//! # Sub-modules
//!
//! - **`layout_manager`** – The [`layout_manager::LayoutManager`] service:
//!   one-time definition loading plus the bounded resolver cache.

pub mod layout_manager;
