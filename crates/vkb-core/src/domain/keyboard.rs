//! The realized geometry of one layout element.

use std::collections::HashMap;

use serde::Serialize;

use super::element::LayoutElement;
use super::key::{KeyCode, KeyDescriptor};
use super::legacy::{LayoutTable, LegacyLayoutBuilder};
use super::locale::{Locale, Script};
use super::request::Insets;

/// Positioned keys for one element, rescaled to the requested size.
///
/// `base_width`/`base_height` always equal the request's target size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedKeyboard {
    pub element: LayoutElement,
    pub layout_id: String,
    pub locale: Locale,
    pub script: Script,
    pub base_width: i32,
    pub base_height: i32,
    pub padding: Insets,
    pub horizontal_gap: i32,
    pub vertical_gap: i32,
    pub most_common_key_width: i32,
    pub most_common_key_height: i32,
    pub keys: Vec<KeyDescriptor>,
}

impl ResolvedKeyboard {
    /// Adapts this keyboard to the flat legacy table.
    pub fn to_layout_table(&self) -> LayoutTable {
        LegacyLayoutBuilder::build(
            &self.keys,
            self.most_common_key_width,
            self.most_common_key_height,
            self.base_width,
            self.base_height,
        )
    }

    /// First key producing `code`.
    pub fn key_by_code(&self, code: KeyCode) -> Option<&KeyDescriptor> {
        self.keys.iter().find(|k| k.code == code)
    }

    /// Keys of logical row `row`, left to right.
    pub fn row(&self, row: usize) -> impl Iterator<Item = &KeyDescriptor> {
        self.keys.iter().filter(move |k| k.row == row)
    }

    pub fn row_count(&self) -> usize {
        self.keys.iter().map(|k| k.row + 1).max().unwrap_or(0)
    }
}

/// Most frequent value; ties go to the larger value.  Zero when empty.
pub(crate) fn most_common(values: impl IntoIterator<Item = i32>) -> i32 {
    let mut counts: HashMap<i32, usize> = HashMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|(va, ca), (vb, cb)| ca.cmp(cb).then(va.cmp(vb)))
        .map_or(0, |(v, _)| v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::key::codes;

    fn keyboard(keys: Vec<KeyDescriptor>) -> ResolvedKeyboard {
        ResolvedKeyboard {
            element: LayoutElement::ALPHABET,
            layout_id: "qwerty".to_string(),
            locale: Locale::parse("en").expect("valid tag"),
            script: Script::Latin,
            base_width: 300,
            base_height: 200,
            padding: Insets::default(),
            horizontal_gap: 10,
            vertical_gap: 20,
            most_common_key_width: 90,
            most_common_key_height: 80,
            keys,
        }
    }

    #[test]
    fn test_most_common_prefers_larger_on_tie() {
        assert_eq!(most_common([90, 90, 91, 91, 10]), 91);
        assert_eq!(most_common([5, 5, 5, 7]), 5);
        assert_eq!(most_common(std::iter::empty()), 0);
    }

    #[test]
    fn test_to_layout_table_centers_keys_and_keeps_summary() {
        // Arrange
        let keys = vec![
            KeyDescriptor::new(97, "a", 90, 80).with_position(0, 0).with_gaps(10, 20),
            KeyDescriptor::new(98, "b", 90, 80).with_position(100, 0).with_gaps(10, 20),
        ];
        let kb = keyboard(keys);

        // Act
        let table = kb.to_layout_table();

        // Assert
        assert_eq!(table.key_x_coordinates, vec![5, 105]);
        assert_eq!(table.keyboard_width, 300);
        assert_eq!(table.keyboard_height, 200);
        assert_eq!(table.most_common_key_width, 90);
    }

    #[test]
    fn test_key_by_code_and_rows() {
        let keys = vec![
            KeyDescriptor::new(97, "a", 90, 80).with_grid(0, 0),
            KeyDescriptor::new(codes::SHIFT, "⇧", 90, 80).with_grid(1, 0),
            KeyDescriptor::new(98, "b", 90, 80).with_grid(1, 1),
        ];
        let kb = keyboard(keys);

        assert_eq!(kb.key_by_code(codes::SHIFT).map(|k| k.row), Some(1));
        assert_eq!(kb.row(1).count(), 2);
        assert_eq!(kb.row_count(), 2);
        assert!(kb.key_by_code(codes::DELETE).is_none());
    }
}
