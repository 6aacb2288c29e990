//! Integration tests for the layout manager.
//!
//! These tests exercise the manager end-to-end: `LayoutManager` + the
//! `vkb_core` resolver + bundled and directory-backed resources.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use vkb_core::{
    BundledResources, ComputedSize, LayoutElement, LayoutError, LayoutRequest, Locale,
    ResourceProvider,
};
use vkb_manager::application::layout_manager::LayoutManager;
use vkb_manager::infrastructure::resources::directory::DirectoryResources;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Bundled resources that count how often the layout list is read.
#[derive(Default)]
struct CountingProvider {
    listings: AtomicUsize,
}

impl ResourceProvider for CountingProvider {
    fn layout_names(&self) -> Result<Vec<String>, LayoutError> {
        self.listings.fetch_add(1, Ordering::SeqCst);
        BundledResources.layout_names()
    }

    fn read_layout(&self, name: &str) -> Result<String, LayoutError> {
        BundledResources.read_layout(name)
    }

    fn read_locale_data(&self) -> Result<String, LayoutError> {
        BundledResources.read_locale_data()
    }
}

fn request(height: i32) -> LayoutRequest {
    let locale = Locale::parse("en-US").expect("valid tag");
    LayoutRequest::new("qwerty", locale, ComputedSize::regular(1080, height))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_init_twice_does_not_reload_or_invalidate_cache() {
    // Arrange
    let provider = CountingProvider::default();
    let manager = LayoutManager::default();
    manager.init(&provider).expect("first init");
    let before = manager
        .get_keyboard(&request(600), LayoutElement::ALPHABET)
        .expect("keyboard");

    // Act
    manager.init(&provider).expect("second init");
    let after = manager
        .get_keyboard(&request(600), LayoutElement::ALPHABET)
        .expect("keyboard");

    // Assert
    assert_eq!(provider.listings.load(Ordering::SeqCst), 1, "definitions were reloaded");
    assert!(Arc::ptr_eq(&before, &after), "cache was invalidated by init");
    assert_eq!(manager.cache_len(), 1);
}

#[test]
fn test_base_height_matches_request_through_manager() {
    let manager = LayoutManager::default();
    manager.init(&BundledResources).expect("init");

    for height in [600, 1200, 67, 185, 4440] {
        let keyboard = manager
            .get_keyboard(&request(height), LayoutElement::SYMBOLS)
            .expect("keyboard");
        assert_eq!(keyboard.base_height, height);
        assert_eq!(keyboard.base_width, 1080);
    }
    // Only the size changed, so one layout set is cached.
    assert_eq!(manager.cache_len(), 1);
}

#[test]
fn test_concurrent_requests_share_one_manager() {
    // Arrange
    let manager = Arc::new(LayoutManager::default());
    manager.init(&BundledResources).expect("init");

    // Act
    let handles: Vec<_> = [600, 700, 800, 900]
        .into_iter()
        .map(|height| {
            let manager = Arc::clone(&manager);
            std::thread::spawn(move || {
                manager
                    .get_keyboard(&request(height), LayoutElement::ALPHABET)
                    .map(|kb| kb.base_height)
            })
        })
        .collect();

    // Assert
    for (handle, height) in handles.into_iter().zip([600, 700, 800, 900]) {
        let resolved = handle.join().expect("thread must not panic");
        assert_eq!(resolved, Ok(height));
    }
}

#[test]
fn test_init_after_shutdown_loads_again() {
    let provider = CountingProvider::default();
    let manager = LayoutManager::default();
    manager.init(&provider).expect("init");

    manager.shutdown();
    manager.init(&provider).expect("re-init");

    assert_eq!(provider.listings.load(Ordering::SeqCst), 2);
    assert!(manager.get_keyboard(&request(600), LayoutElement::ALPHABET).is_ok());
}

#[test]
fn test_directory_resources_serve_custom_layout() {
    // Arrange
    let dir = std::env::temp_dir().join(format!("vkb_manager_it_{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    std::fs::write(
        dir.join("tiny.json"),
        r#"{ "id": "tiny", "rows": [["a", "b", "c"], [{ "template": "space" }]] }"#,
    )
    .expect("write layout");
    let manager = LayoutManager::default();
    manager.init(&DirectoryResources::new(PathBuf::from(&dir))).expect("init");
    let locale = Locale::parse("en").expect("valid tag");
    let req = LayoutRequest::new("tiny", locale, ComputedSize::regular(300, 200));

    // Act
    let keyboard = manager.get_keyboard(&req, LayoutElement::ALPHABET).expect("keyboard");

    // Assert
    assert_eq!(keyboard.keys.len(), 4);
    assert_eq!(keyboard.row(1).next().map(|k| k.x + k.width + k.horizontal_gap), Some(300));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_unknown_layout_surfaces_not_found() {
    let manager = LayoutManager::default();
    manager.init(&BundledResources).expect("init");
    let locale = Locale::parse("en-US").expect("valid tag");
    let req = LayoutRequest::new("colemak", locale, ComputedSize::regular(1080, 600));

    let result = manager.get_keyboard(&req, LayoutElement::ALPHABET);

    assert!(matches!(result, Err(LayoutError::NotFound { .. })));
}
