//! # vkb-core
//!
//! Geometry core of the virtual keyboard: layout definitions, the layout-set
//! engine, and the legacy flat layout table.
//!
//! The crate performs no I/O of its own.  Layout resources arrive through the
//! [`ResourceProvider`] trait, and every computation after loading is pure,
//! synchronous, and safe to call from several threads.
//!
//! # Architecture overview (for beginners)
//!
//! An on-screen keyboard is described abstractly as rows of keys.  Given a
//! target size and a handful of feature flags, this crate works out the exact
//! position and size of every key so a renderer can draw it and a touch
//! handler can hit-test it.
//!
//! - **`domain`** – Value types: [`KeyDescriptor`], [`LayoutRequest`],
//!   [`LayoutElement`], [`ResolvedKeyboard`], and the legacy [`LayoutTable`]
//!   with its builder.
//!
//! - **`definition`** – The JSON schema of layout resources and the
//!   [`LayoutDefinitionStore`] that parses them once at startup.
//!
//! - **`engine`** – The [`LayoutSetResolver`]: expands rows, applies feature
//!   flags (number row, arrow row, period key, bottom action key, secondary
//!   locales), lays the rows out in natural units, then rescales them to the
//!   requested size so that `base_width`/`base_height` match exactly.

pub mod definition;
pub mod domain;
pub mod engine;

// Re-export the most-used types at the crate root so callers can write
// `vkb_core::LayoutRequest` instead of `vkb_core::domain::request::LayoutRequest`.
pub use definition::provider::{BundledResources, ResourceProvider};
pub use definition::store::LayoutDefinitionStore;
pub use domain::element::{LayoutElement, LayoutKind, LayoutPage};
pub use domain::error::LayoutError;
pub use domain::key::{KeyCode, KeyDescriptor};
pub use domain::keyboard::ResolvedKeyboard;
pub use domain::legacy::{LayoutTable, LegacyLayoutBuilder};
pub use domain::locale::{Locale, Script};
pub use domain::request::{ComputedSize, LayoutRequest, LayoutSetKey};
pub use engine::resolver::{LayoutSetResolver, PreparedLayoutSet};
