//! Error taxonomy shared by the definition store and the layout-set engine.
//!
//! Every failure is deterministic: nothing in the geometry core retries, so
//! each variant maps to one caller decision (fall back to a default layout,
//! fall back to a default element, or treat the resource data as broken).

use thiserror::Error;

/// Errors produced while loading layout definitions or resolving keyboards.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LayoutError {
    /// No definition matches the layout id for the locale or any of its fallbacks.
    #[error("layout not found: {layout_set_id} (locale {locale})")]
    NotFound {
        layout_set_id: String,
        locale: String,
    },

    /// The requested kind/page combination does not exist for this layout set.
    #[error("layout set {layout_set_id} has no keyboard for element {element}")]
    UnsupportedElement {
        layout_set_id: String,
        element: String,
    },

    /// The natural layout of a definition has zero width or height.
    #[error("invalid layout geometry: {0}")]
    InvalidGeometry(String),

    /// The request was rejected before any geometry was computed.
    #[error("malformed layout request: {0}")]
    MalformedRequest(String),

    /// A lookup was attempted before the definitions were loaded.
    #[error("layout definitions have not been initialized")]
    NotInitialized,

    /// The host resource provider failed to supply data.
    #[error("resource access failed: {0}")]
    Resource(String),

    /// A layout or locale resource could not be parsed.
    #[error("failed to parse resource {name}: {message}")]
    Parse { name: String, message: String },
}

impl LayoutError {
    pub(crate) fn not_found(layout_set_id: &str, locale: impl ToString) -> Self {
        Self::NotFound {
            layout_set_id: layout_set_id.to_string(),
            locale: locale.to_string(),
        }
    }

    pub(crate) fn unsupported(layout_set_id: &str, element: impl ToString) -> Self {
        Self::UnsupportedElement {
            layout_set_id: layout_set_id.to_string(),
            element: element.to_string(),
        }
    }

    pub(crate) fn parse(name: &str, message: impl ToString) -> Self {
        Self::Parse {
            name: name.to_string(),
            message: message.to_string(),
        }
    }
}
