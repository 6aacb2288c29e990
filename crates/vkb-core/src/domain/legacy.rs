//! Flat, column-oriented layout tables for callers that already hold
//! positioned key descriptors.
//!
//! The builder is a pure adapter: it centers each key horizontally within its
//! allocation and copies everything else through.  It never subtracts a gap,
//! because [`KeyDescriptor`] widths and heights are gap-excluded already.

use serde::Serialize;

use super::key::{KeyCode, KeyDescriptor};

/// Parallel per-key arrays plus the summary cell and keyboard dimensions.
///
/// Index `i` in every vector refers to the `i`-th input key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayoutTable {
    pub key_codes: Vec<KeyCode>,
    pub key_widths: Vec<i32>,
    pub key_heights: Vec<i32>,
    pub key_x_coordinates: Vec<i32>,
    pub key_y_coordinates: Vec<i32>,
    /// Typical key cell width, used by hit-test heuristics.
    pub most_common_key_width: i32,
    pub most_common_key_height: i32,
    pub keyboard_width: i32,
    pub keyboard_height: i32,
}

impl LayoutTable {
    /// Number of keys in the table.
    pub fn len(&self) -> usize {
        self.key_codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key_codes.is_empty()
    }

    /// Returns the index of the first key whose drawn box contains the point.
    ///
    /// Only indices present in all four geometry vectors can be hit.
    pub fn key_at(&self, x: i32, y: i32) -> Option<usize> {
        let (x, y) = (i64::from(x), i64::from(y));
        self.key_x_coordinates
            .iter()
            .zip(&self.key_y_coordinates)
            .zip(self.key_widths.iter().zip(&self.key_heights))
            .position(|((&left, &top), (&width, &height))| {
                let (left, top) = (i64::from(left), i64::from(top));
                (left..left + i64::from(width)).contains(&x)
                    && (top..top + i64::from(height)).contains(&y)
            })
    }
}

/// Builds [`LayoutTable`]s from ordered key descriptors.
pub struct LegacyLayoutBuilder;

impl LegacyLayoutBuilder {
    /// Converts `keys` into a [`LayoutTable`], preserving input order.
    ///
    /// For each key: `x' = x + horizontal_gap / 2`, `y' = y`, width and
    /// height unchanged.  An empty slice yields empty vectors with the summary
    /// scalars still taken from the arguments.
    pub fn build(
        keys: &[KeyDescriptor],
        most_common_key_width: i32,
        most_common_key_height: i32,
        keyboard_width: i32,
        keyboard_height: i32,
    ) -> LayoutTable {
        let mut table = LayoutTable {
            key_codes: Vec::with_capacity(keys.len()),
            key_widths: Vec::with_capacity(keys.len()),
            key_heights: Vec::with_capacity(keys.len()),
            key_x_coordinates: Vec::with_capacity(keys.len()),
            key_y_coordinates: Vec::with_capacity(keys.len()),
            most_common_key_width,
            most_common_key_height,
            keyboard_width,
            keyboard_height,
        };

        for key in keys {
            table.key_codes.push(key.code);
            table.key_widths.push(key.width);
            table.key_heights.push(key.height);
            table.key_x_coordinates.push(key.x + key.horizontal_gap / 2);
            // Vertical gap is trailing margin below the key, not a y shift.
            table.key_y_coordinates.push(key.y);
        }

        table
    }
}
