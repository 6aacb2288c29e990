//! Host-provided access to raw layout and locale resources.
//!
//! # Testability
//!
//! The [`ResourceProvider`] trait lets tests and hosts supply definitions
//! from anywhere: the bundled set compiled into this crate, a directory on
//! disk, or an in-memory mock.

use crate::domain::error::LayoutError;

/// Source of raw layout definitions and locale data.
#[cfg_attr(test, mockall::automock)]
pub trait ResourceProvider: Send + Sync {
    /// Names of every layout resource this provider can read.
    fn layout_names(&self) -> Result<Vec<String>, LayoutError>;

    /// Raw JSON text of the layout resource `name`.
    fn read_layout(&self, name: &str) -> Result<String, LayoutError>;

    /// Raw JSON text of the locale table.
    fn read_locale_data(&self) -> Result<String, LayoutError>;
}

const BUNDLED_LAYOUTS: &[(&str, &str)] = &[
    ("qwerty", include_str!("../../resources/layouts/qwerty.json")),
    ("qwerty_es", include_str!("../../resources/layouts/qwerty_es.json")),
    ("azerty", include_str!("../../resources/layouts/azerty.json")),
    ("arabic", include_str!("../../resources/layouts/arabic.json")),
    ("arabic_alt0", include_str!("../../resources/layouts/arabic_alt0.json")),
    ("symbols", include_str!("../../resources/layouts/symbols.json")),
    ("symbols_shifted", include_str!("../../resources/layouts/symbols_shifted.json")),
    ("phone", include_str!("../../resources/layouts/phone.json")),
    ("phone_symbols", include_str!("../../resources/layouts/phone_symbols.json")),
    ("number", include_str!("../../resources/layouts/number.json")),
    ("number_basic", include_str!("../../resources/layouts/number_basic.json")),
];

const BUNDLED_LOCALES: &str = include_str!("../../resources/locales.json");

/// The layouts and locale table compiled into this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledResources;

impl BundledResources {
    /// The bundled locale table, for providers that only override layouts.
    pub fn locale_data() -> &'static str {
        BUNDLED_LOCALES
    }
}

impl ResourceProvider for BundledResources {
    fn layout_names(&self) -> Result<Vec<String>, LayoutError> {
        Ok(BUNDLED_LAYOUTS.iter().map(|(name, _)| name.to_string()).collect())
    }

    fn read_layout(&self, name: &str) -> Result<String, LayoutError> {
        BUNDLED_LAYOUTS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, text)| text.to_string())
            .ok_or_else(|| LayoutError::Resource(format!("no bundled layout named {name}")))
    }

    fn read_locale_data(&self) -> Result<String, LayoutError> {
        Ok(BUNDLED_LOCALES.to_string())
    }
}
