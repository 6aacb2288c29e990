//! The layout definition store.
//!
//! Definitions are parsed once by [`LayoutDefinitionStore::init`] and are
//! immutable afterwards.  Reads go through a [`OnceLock`], so lookups never
//! take a lock once the store is populated.
//!
//! Lookup falls back from the exact locale to the language-only locale to the
//! family default (the definition without a locale).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::{debug, info};

use super::provider::ResourceProvider;
use super::schema::{LayoutDefinition, LocaleData, LocaleTable};
use crate::domain::error::LayoutError;
use crate::domain::locale::Locale;

type DefinitionKey = (String, Option<Locale>);

struct LoadedResources {
    definitions: HashMap<DefinitionKey, Arc<LayoutDefinition>>,
    locales: LocaleTable,
}

/// Parsed layout definitions and locale data, loaded once.
#[derive(Default)]
pub struct LayoutDefinitionStore {
    loaded: OnceLock<LoadedResources>,
    init_lock: Mutex<()>,
}

impl LayoutDefinitionStore {
    /// Creates an empty, uninitialized store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store and initializes it from `provider`.
    ///
    /// # Errors
    ///
    /// Propagates every error of [`LayoutDefinitionStore::init`].
    pub fn from_provider(provider: &dyn ResourceProvider) -> Result<Self, LayoutError> {
        let store = Self::new();
        store.init(provider)?;
        Ok(store)
    }

    /// Loads every definition and the locale table from `provider`.
    ///
    /// A second call is a no-op: nothing is re-read or re-parsed.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Resource`] when the provider fails and
    /// [`LayoutError::Parse`] for malformed JSON or two definitions sharing an
    /// id and locale.  A failed init leaves the store uninitialized.
    pub fn init(&self, provider: &dyn ResourceProvider) -> Result<(), LayoutError> {
        if self.loaded.get().is_some() {
            debug!("layout definition store already initialized");
            return Ok(());
        }

        let _guard = self.init_lock.lock().unwrap_or_else(|e| e.into_inner());
        if self.loaded.get().is_some() {
            return Ok(());
        }

        let resources = load_resources(provider)?;
        info!(
            definitions = resources.definitions.len(),
            locales = resources.locales.len(),
            "layout definitions loaded"
        );
        // Only this thread can set the cell while holding the init lock.
        let _ = self.loaded.set(resources);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.loaded.get().is_some()
    }

    fn resources(&self) -> Result<&LoadedResources, LayoutError> {
        self.loaded.get().ok_or(LayoutError::NotInitialized)
    }

    /// Finds the definition of `layout_set_id` best matching `locale`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::NotInitialized`] before `init` and
    /// [`LayoutError::NotFound`] when no fallback matches.
    pub fn load(&self, layout_set_id: &str, locale: &Locale) -> Result<Arc<LayoutDefinition>, LayoutError> {
        let resources = self.resources()?;
        let candidates = [
            Some(locale.clone()),
            Some(locale.language_only()),
            None,
        ];

        for candidate in candidates {
            let key = (layout_set_id.to_string(), candidate);
            if let Some(def) = resources.definitions.get(&key) {
                if key.1.as_ref() != Some(locale) {
                    debug!(
                        layout_set_id,
                        requested = %locale,
                        matched = ?key.1.as_ref().map(Locale::to_string),
                        "layout definition locale fallback"
                    );
                }
                return Ok(Arc::clone(def));
            }
        }

        Err(LayoutError::not_found(layout_set_id, locale))
    }

    /// Locale data for `locale`, falling back to its language.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::NotInitialized`] before `init`.
    pub fn locale_data(&self, locale: &Locale) -> Result<Option<&LocaleData>, LayoutError> {
        let resources = self.resources()?;
        Ok(resources
            .locales
            .get(locale)
            .or_else(|| resources.locales.get(&locale.language_only())))
    }

    /// Sorted, de-duplicated layout set ids.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::NotInitialized`] before `init`.
    pub fn layout_ids(&self) -> Result<Vec<String>, LayoutError> {
        let resources = self.resources()?;
        let mut ids: Vec<String> = resources.definitions.keys().map(|(id, _)| id.clone()).collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}

fn load_resources(provider: &dyn ResourceProvider) -> Result<LoadedResources, LayoutError> {
    let mut definitions = HashMap::new();

    for name in provider.layout_names()? {
        let text = provider.read_layout(&name)?;
        let def: LayoutDefinition =
            serde_json::from_str(&text).map_err(|e| LayoutError::parse(&name, e))?;
        let key = (def.id.clone(), def.locale.clone());
        if definitions.contains_key(&key) {
            return Err(LayoutError::parse(
                &name,
                format!(
                    "duplicate definition for {} ({})",
                    key.0,
                    key.1.as_ref().map_or_else(|| "default".to_string(), Locale::to_string)
                ),
            ));
        }
        debug!(resource = %name, id = %def.id, "parsed layout definition");
        definitions.insert(key, Arc::new(def));
    }

    let locale_text = provider.read_locale_data()?;
    let locales: LocaleTable =
        serde_json::from_str(&locale_text).map_err(|e| LayoutError::parse("locales", e))?;

    Ok(LoadedResources {
        definitions,
        locales,
    })
}
