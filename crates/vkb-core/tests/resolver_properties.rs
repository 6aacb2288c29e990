//! Integration tests for the layout-set resolver.
//!
//! These tests drive the public API against the bundled layouts and check the
//! geometric guarantees every renderer relies on: exact target size, stable
//! memoization, and rounding that never pulls adjacent keys apart.

use std::sync::Arc;

use vkb_core::domain::request::{BottomActionKey, NumberRowMode};
use vkb_core::{
    BundledResources, ComputedSize, LayoutDefinitionStore, LayoutElement, LayoutKind, LayoutPage,
    LayoutRequest, LayoutSetResolver, LegacyLayoutBuilder, Locale, ResolvedKeyboard,
};

const HEIGHTS: [i32; 5] = [600, 1200, 67, 185, 4440];
const WIDTH: i32 = 1080;

fn store() -> Arc<LayoutDefinitionStore> {
    Arc::new(LayoutDefinitionStore::from_provider(&BundledResources).expect("bundled data must load"))
}

fn en_us() -> Locale {
    Locale::parse("en-US").expect("valid tag")
}

fn elements() -> Vec<LayoutElement> {
    vec![
        LayoutElement::ALPHABET,
        LayoutElement::new(LayoutKind::Alphabet, LayoutPage::Shifted),
        LayoutElement::new(LayoutKind::Alphabet, LayoutPage::ManuallyShifted),
        LayoutElement::new(LayoutKind::Alphabet, LayoutPage::ShiftLocked),
        LayoutElement::SYMBOLS,
        LayoutElement::new(LayoutKind::Symbols, LayoutPage::Shifted),
        LayoutElement::new(LayoutKind::Phone, LayoutPage::Base),
        LayoutElement::new(LayoutKind::Phone, LayoutPage::Shifted),
        LayoutElement::new(LayoutKind::Number, LayoutPage::Base),
        LayoutElement::new(LayoutKind::NumberBasic, LayoutPage::Base),
    ]
}

/// Every request variant the property tests sweep over.
fn requests(height: i32) -> Vec<LayoutRequest> {
    let base = LayoutRequest::new("qwerty", en_us(), ComputedSize::regular(WIDTH, height));
    vec![
        base.clone(),
        base.clone().with_number_row(true, NumberRowMode::Default),
        base.clone().with_number_row(true, NumberRowMode::Classic),
        base.clone().with_arrow_row(true),
        base.clone()
            .with_number_row(true, NumberRowMode::Default)
            .with_arrow_row(true)
            .with_bottom_action_key(Some(BottomActionKey::Emoji))
            .with_alternative_period_key(true),
    ]
}

fn assert_adjacent_keys_share_edges(keyboard: &ResolvedKeyboard) {
    for pair in keyboard.keys.windows(2) {
        let (left, right) = (&pair[0], &pair[1]);
        if left.row == right.row && left.column + 1 == right.column {
            assert_eq!(
                left.x + left.width + left.horizontal_gap,
                right.x,
                "{:?}: keys {:?} and {:?} are not edge-aligned",
                keyboard.element,
                left.label,
                right.label
            );
        }
    }
}

#[test]
fn test_base_height_matches_every_requested_height() {
    let store = store();
    for height in HEIGHTS {
        for request in requests(height) {
            let resolver = LayoutSetResolver::new(Arc::clone(&store), &request).expect("resolver must build");
            for element in elements() {
                let keyboard = resolver.get_keyboard(element).expect("bundled elements must resolve");
                assert_eq!(keyboard.base_height, height, "{element} at height {height}");
                assert_eq!(keyboard.base_width, WIDTH, "{element} at height {height}");
            }
        }
    }
}

#[test]
fn test_keys_stay_inside_requested_box() {
    let store = store();
    for height in HEIGHTS {
        let request = LayoutRequest::new("qwerty", en_us(), ComputedSize::regular(WIDTH, height));
        let resolver = LayoutSetResolver::new(Arc::clone(&store), &request).expect("resolver must build");
        let keyboard = resolver.get_keyboard(LayoutElement::ALPHABET).expect("alphabet");
        for key in &keyboard.keys {
            assert!(key.is_valid(), "{:?} at height {height}", key.label);
            assert!(key.x >= 0 && key.allocation_right() <= WIDTH);
            assert!(key.y >= 0 && key.allocation_bottom() <= height);
        }
    }
}

#[test]
fn test_adjacent_keys_remain_edge_aligned_after_rescale() {
    let store = store();
    for height in HEIGHTS {
        for request in requests(height) {
            let resolver = LayoutSetResolver::new(Arc::clone(&store), &request).expect("resolver must build");
            for element in elements() {
                let keyboard = resolver.get_keyboard(element).expect("element must resolve");
                assert_adjacent_keys_share_edges(&keyboard);
            }
        }
    }
}

#[test]
fn test_full_width_top_row_spans_target_width() {
    // Arrange
    let request = LayoutRequest::new("qwerty", en_us(), ComputedSize::regular(1079, 413));
    let resolver = LayoutSetResolver::new(store(), &request).expect("resolver must build");

    // Act
    let keyboard = resolver.get_keyboard(LayoutElement::ALPHABET).expect("alphabet");

    // Assert
    let top: Vec<_> = keyboard.row(0).collect();
    assert_eq!(top.len(), 10);
    assert_eq!(top[0].x, 0);
    assert_eq!(top[9].allocation_right(), 1079);
}

#[test]
fn test_get_keyboard_is_idempotent() {
    let request = LayoutRequest::new("qwerty", en_us(), ComputedSize::regular(WIDTH, 185));
    let resolver = LayoutSetResolver::new(store(), &request).expect("resolver must build");

    for element in elements() {
        let first = resolver.get_keyboard(element).expect("first call");
        let second = resolver.get_keyboard(element).expect("second call");
        assert!(Arc::ptr_eq(&first, &second), "{element} was recomputed");
        assert_eq!(*first, *second);
    }
}

#[test]
fn test_resolved_keyboard_feeds_legacy_builder() {
    // Arrange
    let request = LayoutRequest::new("qwerty", en_us(), ComputedSize::regular(WIDTH, 600));
    let keyboard = LayoutSetResolver::new(store(), &request)
        .expect("resolver must build")
        .get_keyboard(LayoutElement::ALPHABET)
        .expect("alphabet");

    // Act
    let table = LegacyLayoutBuilder::build(
        &keyboard.keys,
        keyboard.most_common_key_width,
        keyboard.most_common_key_height,
        keyboard.base_width,
        keyboard.base_height,
    );

    // Assert
    assert_eq!(table.len(), keyboard.keys.len());
    assert_eq!(table, keyboard.to_layout_table());
    for (i, key) in keyboard.keys.iter().enumerate() {
        assert_eq!(table.key_x_coordinates[i], key.x + key.horizontal_gap / 2);
        assert_eq!(table.key_y_coordinates[i], key.y);
        assert_eq!(table.key_widths[i], key.width);
    }
}
