//! LayoutManager: definition loading and the resolver cache.
//!
//! Renderers and hit-testers go through [`LayoutManager::get_keyboard`].  The
//! manager owns the [`LayoutDefinitionStore`] and a small LRU cache of
//! resolvers keyed by the size-independent part of the request.
//!
//! # Why key the cache without the size? (for beginners)
//!
//! Rotating the device or resizing a floating keyboard changes only
//! `computed_size`.  Everything expensive (definition lookup, row transforms,
//! natural layout) lives in a [`PreparedLayoutSet`] that does not depend on
//! the size, so the cache keeps the prepared set and builds a new resolver
//! around it.  Only the final rescale runs again.
//!
//! The cache lock is held for lookups and inserts only.  Resolution happens
//! outside it, so threads resolving different requests never wait on each
//! other's geometry.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use lru::LruCache;

use tracing::{debug, info};
use vkb_core::{
    LayoutDefinitionStore, LayoutElement, LayoutError, LayoutRequest, LayoutSetKey,
    LayoutSetResolver, PreparedLayoutSet, ResolvedKeyboard, ResourceProvider,
};

/// Cache capacity when none is configured: current keyboard, symbols, emoji.
pub const DEFAULT_CACHE_CAPACITY: usize = 3;

/// Clamps a configured capacity to at least one slot.
pub fn cache_capacity(configured: usize) -> NonZeroUsize {
    NonZeroUsize::new(configured).unwrap_or(NonZeroUsize::MIN)
}

/// One cache slot: the prepared set plus the resolver for the last size.
struct CachedLayoutSet {
    prepared: Arc<PreparedLayoutSet>,
    resolver: Arc<LayoutSetResolver>,
}

/// Owns layout definitions and caches recently used layout sets.
pub struct LayoutManager {
    store: RwLock<Option<Arc<LayoutDefinitionStore>>>,
    cache: Mutex<LruCache<LayoutSetKey, CachedLayoutSet>>,
}

impl Default for LayoutManager {
    fn default() -> Self {
        Self::new(cache_capacity(DEFAULT_CACHE_CAPACITY))
    }
}

impl LayoutManager {
    /// Creates an uninitialized manager caching up to `cache_capacity` sets.
    pub fn new(cache_capacity: NonZeroUsize) -> Self {
        Self {
            store: RwLock::new(None),
            cache: Mutex::new(LruCache::new(cache_capacity)),
        }
    }

    /// Loads every layout definition from `provider`.
    ///
    /// Later calls return `Ok(())` without touching `provider` or the cache.
    ///
    /// # Errors
    ///
    /// Propagates [`LayoutError::Resource`] and [`LayoutError::Parse`] from
    /// the store.  A failed init leaves the manager uninitialized.
    pub fn init(&self, provider: &dyn ResourceProvider) -> Result<(), LayoutError> {
        if self.is_initialized() {
            debug!("layout manager already initialized");
            return Ok(());
        }

        let mut slot = self.store.write().unwrap_or_else(|e| e.into_inner());
        if slot.is_some() {
            return Ok(());
        }
        let store = LayoutDefinitionStore::from_provider(provider)?;
        *slot = Some(Arc::new(store));
        info!("layout manager initialized");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.store.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    /// The loaded definition store.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::NotInitialized`] before [`LayoutManager::init`].
    pub fn store(&self) -> Result<Arc<LayoutDefinitionStore>, LayoutError> {
        self.store
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(Arc::clone)
            .ok_or(LayoutError::NotInitialized)
    }

    /// The resolver for `request`, reusing cached work where possible.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::NotInitialized`] before `init`,
    /// [`LayoutError::MalformedRequest`] for an invalid request, and
    /// [`LayoutError::NotFound`] for an unknown layout set.
    pub fn resolver(&self, request: &LayoutRequest) -> Result<Arc<LayoutSetResolver>, LayoutError> {
        request.validate()?;
        let store = self.store()?;
        let key = request.layout_set_key();

        let prepared = match self.lock_cache().get(&key) {
            Some(cached) if cached.resolver.computed_size() == request.computed_size => {
                debug!(layout = %key.keyboard_layout_set_id, "resolver cache hit");
                return Ok(Arc::clone(&cached.resolver));
            }
            Some(cached) => Some(Arc::clone(&cached.prepared)),
            None => None,
        };

        let resolver = match prepared {
            Some(prepared) => {
                debug!(layout = %key.keyboard_layout_set_id, "size changed, reusing prepared layout set");
                LayoutSetResolver::from_prepared(prepared, request.computed_size)?
            }
            None => {
                debug!(layout = %key.keyboard_layout_set_id, locale = %key.locale, "resolver cache miss");
                LayoutSetResolver::new(store, request)?
            }
        };
        let resolver = Arc::new(resolver);

        let entry = CachedLayoutSet {
            prepared: Arc::clone(resolver.prepared()),
            resolver: Arc::clone(&resolver),
        };
        // `push` also hands back the replaced entry of the same key.
        if let Some((old, _)) = self.lock_cache().push(key.clone(), entry) {
            if old != key {
                debug!(layout = %old.keyboard_layout_set_id, locale = %old.locale, "evicted layout set");
            }
        }
        Ok(resolver)
    }

    /// The keyboard for `element` under `request`.
    ///
    /// # Errors
    ///
    /// Everything [`LayoutManager::resolver`] and
    /// [`LayoutSetResolver::get_keyboard`] can return.
    pub fn get_keyboard(
        &self,
        request: &LayoutRequest,
        element: LayoutElement,
    ) -> Result<Arc<ResolvedKeyboard>, LayoutError> {
        self.resolver(request)?.get_keyboard(element)
    }

    /// Number of cached layout sets.
    pub fn cache_len(&self) -> usize {
        self.lock_cache().len()
    }

    /// Drops every cached layout set and releases the store.
    ///
    /// A later [`LayoutManager::init`] loads definitions afresh.
    pub fn shutdown(&self) {
        self.lock_cache().clear();
        *self.store.write().unwrap_or_else(|e| e.into_inner()) = None;
        info!("layout manager shut down");
    }

    fn lock_cache(&self) -> MutexGuard<'_, LruCache<LayoutSetKey, CachedLayoutSet>> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vkb_core::{BundledResources, ComputedSize, Locale};

    fn request(id: &str, width: i32, height: i32) -> LayoutRequest {
        let locale = Locale::parse("en-US").expect("valid tag");
        LayoutRequest::new(id, locale, ComputedSize::regular(width, height))
    }

    fn initialized(capacity: usize) -> LayoutManager {
        let manager = LayoutManager::new(cache_capacity(capacity));
        manager.init(&BundledResources).expect("bundled data");
        manager
    }

    #[test]
    fn test_get_keyboard_before_init_is_not_initialized() {
        let manager = LayoutManager::default();
        let result = manager.get_keyboard(&request("qwerty", 1080, 600), LayoutElement::ALPHABET);
        assert_eq!(result.map(|_| ()), Err(LayoutError::NotInitialized));
    }

    #[test]
    fn test_same_request_reuses_resolver() {
        // Arrange
        let manager = initialized(3);
        let req = request("qwerty", 1080, 600);

        // Act
        let first = manager.resolver(&req).expect("first");
        let second = manager.resolver(&req).expect("second");

        // Assert
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(manager.cache_len(), 1);
    }

    #[test]
    fn test_size_change_reuses_prepared_set() {
        let manager = initialized(3);
        let big = manager.resolver(&request("qwerty", 1080, 600)).expect("big");
        let small = manager.resolver(&request("qwerty", 540, 300)).expect("small");

        assert!(!Arc::ptr_eq(&big, &small));
        assert!(Arc::ptr_eq(big.prepared(), small.prepared()));
        assert_eq!(manager.cache_len(), 1);
    }

    #[test]
    fn test_cache_is_bounded_by_capacity() {
        let manager = initialized(2);
        for id in ["qwerty", "azerty", "arabic"] {
            let mut req = request(id, 1080, 600);
            if id == "arabic" {
                req.locale = Locale::parse("ar").expect("valid tag");
            }
            manager.resolver(&req).expect("resolver");
        }
        assert_eq!(manager.cache_len(), 2);
    }

    #[test]
    fn test_malformed_request_is_rejected() {
        let manager = initialized(3);
        let result = manager.resolver(&request("qwerty", -5, 600));
        assert!(matches!(result, Err(LayoutError::MalformedRequest(_))));
        assert_eq!(manager.cache_len(), 0);
    }

    #[test]
    fn test_cache_evicts_least_recently_used_set() {
        // Arrange
        let manager = initialized(2);
        let qwerty = request("qwerty", 1080, 600);
        let first = manager.resolver(&qwerty).expect("qwerty");
        manager.resolver(&request("azerty", 1080, 600)).expect("azerty");

        // Act: touch qwerty, then push a third set.
        manager.resolver(&qwerty).expect("qwerty again");
        let mut arabic = request("arabic", 1080, 600);
        arabic.locale = Locale::parse("ar").expect("valid tag");
        manager.resolver(&arabic).expect("arabic");

        // Assert: azerty went, qwerty is still the cached resolver.
        assert_eq!(manager.cache_len(), 2);
        assert!(Arc::ptr_eq(&first, &manager.resolver(&qwerty).expect("cached")));
    }

    #[test]
    fn test_zero_capacity_keeps_one_slot() {
        let manager = initialized(0);
        manager.resolver(&request("qwerty", 1080, 600)).expect("qwerty");
        manager.resolver(&request("azerty", 1080, 600)).expect("azerty");
        assert_eq!(manager.cache_len(), 1);
    }

    #[test]
    fn test_shutdown_clears_cache_and_store() {
        // Arrange
        let manager = initialized(3);
        manager.resolver(&request("qwerty", 1080, 600)).expect("resolver");

        // Act
        manager.shutdown();

        // Assert
        assert_eq!(manager.cache_len(), 0);
        assert!(!manager.is_initialized());
        assert!(matches!(manager.store(), Err(LayoutError::NotInitialized)));
    }
}
