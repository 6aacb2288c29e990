//! The layout-set resolver.
//!
//! Resolution is split along the size boundary:
//!
//! - [`PreparedLayoutSet`] owns everything that does not depend on the
//!   target size: the base definition, feature-flag transforms, and the
//!   natural geometry of each element.
//! - [`LayoutSetResolver`] pairs a prepared set with one [`ComputedSize`] and
//!   rescales natural geometry into [`ResolvedKeyboard`]s.
//!
//! A size change therefore only repeats the rescaling step.  Both levels
//! memoize per element and never hold their lock while computing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use super::natural::{arrange, NaturalLayout};
use super::rows::{expand_key, expand_rows, DEFAULT_CURRENCY};
use super::scale::scale;
use super::transform::{
    alternative_period_allowed, apply_page, apply_transforms, resolve_contextual_keys, NumberRowPlan,
    TransformPlan,
};
use crate::definition::schema::LayoutDefinition;
use crate::definition::store::LayoutDefinitionStore;
use crate::domain::element::{LayoutElement, LayoutKind};
use crate::domain::error::LayoutError;
use crate::domain::key::KeyVisualStyle;
use crate::domain::keyboard::{most_common, ResolvedKeyboard};
use crate::domain::locale::{Locale, Script};
use crate::domain::request::{ComputedSize, LayoutRequest, LayoutSetKey};

/// Size-independent geometry of one element.
#[derive(Debug, Clone, PartialEq)]
pub struct NaturalKeyboard {
    pub element: LayoutElement,
    /// Id of the definition the element was built from.
    pub layout_id: String,
    pub script: Script,
    pub layout: NaturalLayout,
}

/// The size-independent half of a resolved layout set.
pub struct PreparedLayoutSet {
    store: Arc<LayoutDefinitionStore>,
    key: LayoutSetKey,
    layout_set_id: String,
    locale: Locale,
    secondary_locales: Vec<Locale>,
    base: Arc<LayoutDefinition>,
    naturals: Mutex<HashMap<LayoutElement, Arc<NaturalKeyboard>>>,
}

impl PreparedLayoutSet {
    /// Fetches the base definition for `key`.
    ///
    /// Editor private options may force a different layout id or locale; a
    /// forced locale also disables multilingual typing.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::NotFound`] when no definition matches, or
    /// [`LayoutError::NotInitialized`] for an empty store.
    pub fn new(store: Arc<LayoutDefinitionStore>, key: LayoutSetKey) -> Result<Self, LayoutError> {
        let context = &key.editor_context;
        let layout_set_id = context
            .forced_layout()
            .unwrap_or(&key.keyboard_layout_set_id)
            .to_string();
        let (locale, secondary_locales) = match context.forced_locale() {
            Some(forced) => (forced, Vec::new()),
            None => (key.locale.clone(), key.multilingual_typing_locales.clone()),
        };
        if layout_set_id != key.keyboard_layout_set_id || locale != key.locale {
            debug!(
                requested = %key.keyboard_layout_set_id,
                layout = %layout_set_id,
                locale = %locale,
                "editor forced layout or locale"
            );
        }

        let base = store.load(&layout_set_id, &locale)?;
        Ok(Self {
            store,
            key,
            layout_set_id,
            locale,
            secondary_locales,
            base,
            naturals: Mutex::new(HashMap::new()),
        })
    }

    pub fn key(&self) -> &LayoutSetKey {
        &self.key
    }

    /// Effective layout set id after editor overrides.
    pub fn layout_set_id(&self) -> &str {
        &self.layout_set_id
    }

    /// Effective locale after editor overrides.
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Natural geometry of `element`, computed once.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnsupportedElement`] when the layout set has no
    /// keyboard for `element`, and [`LayoutError::InvalidGeometry`] when its
    /// definition has no extent.
    pub fn natural(&self, element: LayoutElement) -> Result<Arc<NaturalKeyboard>, LayoutError> {
        if let Some(found) = self.lock_naturals().get(&element) {
            return Ok(Arc::clone(found));
        }

        let built = Arc::new(self.build(element)?);
        let mut naturals = self.lock_naturals();
        Ok(Arc::clone(naturals.entry(element).or_insert(built)))
    }

    fn lock_naturals(&self) -> std::sync::MutexGuard<'_, HashMap<LayoutElement, Arc<NaturalKeyboard>>> {
        self.naturals.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn unsupported(&self, element: LayoutElement) -> LayoutError {
        LayoutError::unsupported(&self.layout_set_id, element)
    }

    /// The definition serving `element`.
    fn definition_for(&self, element: LayoutElement) -> Result<Arc<LayoutDefinition>, LayoutError> {
        let normalized = element.normalize();
        let id = match (normalized.kind, normalized.page.alt_index()) {
            (LayoutKind::Alphabet, None) => return Ok(Arc::clone(&self.base)),
            (LayoutKind::Alphabet, Some(index)) => self.base.alt_pages.get(index).map(String::as_str),
            (kind, _) => self.base.elements.layout_for(kind, normalized.page),
        };
        let id = id.ok_or_else(|| self.unsupported(element))?;

        self.store.load(id, &self.locale).map_err(|e| match e {
            LayoutError::NotFound { .. } => self.unsupported(element),
            other => other,
        })
    }

    fn build(&self, element: LayoutElement) -> Result<NaturalKeyboard, LayoutError> {
        let definition = self.definition_for(element)?;
        let context = &self.key.editor_context;
        let language = self.locale.language();
        let alphabet = element.kind == LayoutKind::Alphabet;
        let main_page = alphabet && element.page.alt_index().is_none();

        let primary_data = self.store.locale_data(&self.locale)?;
        let currency = primary_data
            .and_then(|data| data.currency.as_deref())
            .unwrap_or(DEFAULT_CURRENCY);

        let mut rows = expand_rows(&definition.rows, context.mode, context.action);
        resolve_contextual_keys(&mut rows, currency, definition.use_zwnj_key);

        let mut plan = TransformPlan {
            arrow_row: self.key.arrow_row && matches!(element.kind, LayoutKind::Alphabet | LayoutKind::Symbols),
            ..TransformPlan::default()
        };

        if main_page && definition.number_row_policy.applies(self.key.number_row) {
            plan.number_row = Some(NumberRowPlan {
                mode: self.key.number_row_mode,
                custom: definition.number_row.as_ref().map(|specs| {
                    specs
                        .iter()
                        .filter_map(|spec| expand_key(spec, context.mode, context.action))
                        .collect()
                }),
                local_digits: primary_data.and_then(|data| data.digits.as_deref()),
                use_local_numbers: self.key.use_local_numbers,
            });
        }

        if main_page && self.key.alternative_period_key {
            if alternative_period_allowed(language) {
                plan.alternative_period_key = true;
            } else {
                warn!(language, "alternative period key is not available for this language");
            }
        }

        if matches!(element.kind, LayoutKind::Alphabet | LayoutKind::Symbols) {
            plan.bottom_action_key = self.key.bottom_action_key;
        }

        if main_page {
            plan.more_key_sources.extend(primary_data);
            for secondary in &self.secondary_locales {
                plan.more_key_sources.extend(self.store.locale_data(secondary)?);
            }
        }

        apply_transforms(&mut rows, &plan);

        let script = definition
            .script
            .or(self.base.script)
            .unwrap_or_else(|| self.locale.script());
        if alphabet {
            apply_page(&mut rows, element.page, language, script.has_letter_case());
        }

        let layout = arrange(&rows, definition.columns).map_err(|e| match e {
            LayoutError::InvalidGeometry(reason) => {
                LayoutError::InvalidGeometry(format!("{}: {reason}", definition.id))
            }
            other => other,
        })?;
        debug!(
            layout = %definition.id,
            %element,
            rows = layout.rows.len(),
            width = layout.width,
            height = layout.height,
            "natural layout computed"
        );

        Ok(NaturalKeyboard {
            element,
            layout_id: definition.id.clone(),
            script,
            layout,
        })
    }
}

/// Resolves the keyboards of one layout set at one size.
///
/// Cheap to build from an existing [`PreparedLayoutSet`]; discard it when the
/// size changes.
pub struct LayoutSetResolver {
    prepared: Arc<PreparedLayoutSet>,
    computed_size: ComputedSize,
    keyboards: Mutex<HashMap<LayoutElement, Arc<ResolvedKeyboard>>>,
}

impl LayoutSetResolver {
    /// Validates `request` and loads its base definition from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::MalformedRequest`] for an invalid request and
    /// [`LayoutError::NotFound`] for an unknown layout set.
    pub fn new(store: Arc<LayoutDefinitionStore>, request: &LayoutRequest) -> Result<Self, LayoutError> {
        request.validate()?;
        let prepared = PreparedLayoutSet::new(store, request.layout_set_key())?;
        Self::from_prepared(Arc::new(prepared), request.computed_size)
    }

    /// A resolver over an already prepared layout set.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::MalformedRequest`] for an unusable size.
    pub fn from_prepared(prepared: Arc<PreparedLayoutSet>, computed_size: ComputedSize) -> Result<Self, LayoutError> {
        computed_size.validate()?;
        Ok(Self {
            prepared,
            computed_size,
            keyboards: Mutex::new(HashMap::new()),
        })
    }

    /// A resolver for the same layout set at another size.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::MalformedRequest`] for an unusable size.
    pub fn with_computed_size(&self, computed_size: ComputedSize) -> Result<Self, LayoutError> {
        Self::from_prepared(Arc::clone(&self.prepared), computed_size)
    }

    pub fn computed_size(&self) -> ComputedSize {
        self.computed_size
    }

    pub fn prepared(&self) -> &Arc<PreparedLayoutSet> {
        &self.prepared
    }

    /// The keyboard for `element`, rescaled to this resolver's size.
    ///
    /// Repeated calls return the same `Arc`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnsupportedElement`] when the layout set has no
    /// such keyboard, [`LayoutError::InvalidGeometry`] for a degenerate
    /// definition, and [`LayoutError::MalformedRequest`] when the size is too
    /// small for the keys.
    pub fn get_keyboard(&self, element: LayoutElement) -> Result<Arc<ResolvedKeyboard>, LayoutError> {
        if let Some(found) = self.lock_keyboards().get(&element) {
            return Ok(Arc::clone(found));
        }

        let resolved = Arc::new(self.resolve(element)?);
        let mut keyboards = self.lock_keyboards();
        Ok(Arc::clone(keyboards.entry(element).or_insert(resolved)))
    }

    fn lock_keyboards(&self) -> std::sync::MutexGuard<'_, HashMap<LayoutElement, Arc<ResolvedKeyboard>>> {
        self.keyboards.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn resolve(&self, element: LayoutElement) -> Result<ResolvedKeyboard, LayoutError> {
        let natural = self.prepared.natural(element)?;
        let scaled = scale(&natural.layout, &self.computed_size)?;

        let regular_widths: Vec<i32> = scaled
            .keys
            .iter()
            .filter(|k| k.visual_style == KeyVisualStyle::Normal)
            .map(|k| k.width)
            .collect();
        let most_common_key_width = if regular_widths.is_empty() {
            most_common(scaled.keys.iter().map(|k| k.width))
        } else {
            most_common(regular_widths)
        };
        let most_common_key_height = most_common(scaled.keys.iter().map(|k| k.height));

        Ok(ResolvedKeyboard {
            element,
            layout_id: natural.layout_id.clone(),
            locale: self.prepared.locale().clone(),
            script: natural.script,
            base_width: self.computed_size.width(),
            base_height: self.computed_size.height(),
            padding: self.computed_size.padding(),
            horizontal_gap: scaled.horizontal_gap,
            vertical_gap: scaled.vertical_gap,
            most_common_key_width,
            most_common_key_height,
            keys: scaled.keys,
        })
    }
}
