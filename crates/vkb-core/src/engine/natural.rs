//! Natural (unscaled) geometry of a row set.
//!
//! A regular key cell is [`KEY_UNIT`] layout units wide and a regular row is
//! [`ROW_UNIT`] tall.  The row capacity is the definition's column count, or
//! the widest row's regular-key count, times the key unit.
//!
//! Within a row:
//! - regular and custom keys take their fixed widths;
//! - functional keys share one width across the keyboard: the tightest
//!   leftover among rows without grow keys, clamped to
//!   [`MIN_FUNCTIONAL_KEYS`]..=[`MAX_FUNCTIONAL_KEYS`] key units;
//! - grow keys split whatever the row has left;
//! - leftover space in rows without grow keys becomes two gaps that center
//!   the row.  Anchored keys stay at their edge: if only one edge is
//!   anchored, the whole gap goes to the other edge.
//!
//! Adjacent entries share their boundary value exactly, so rounding the same
//! boundary later yields the same integer for both keys.

use super::rows::{KeyRow, RowKey};
use crate::definition::schema::WidthToken;
use crate::domain::error::LayoutError;

pub const KEY_UNIT: f64 = 100.0;
pub const ROW_UNIT: f64 = 100.0;
/// Horizontal gap per key in layout units.
pub const HORIZONTAL_GAP: f64 = 8.0;
/// Vertical gap per row in layout units, twice the horizontal gap.
pub const VERTICAL_GAP: f64 = 2.0 * HORIZONTAL_GAP;

pub const MIN_FUNCTIONAL_KEYS: f64 = 1.25;
pub const MAX_FUNCTIONAL_KEYS: f64 = 1.5;

/// A key with its natural horizontal extent.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedKey {
    pub key: RowKey,
    pub left: f64,
    pub right: f64,
}

impl PlacedKey {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }
}

/// A row with its natural vertical extent.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRow {
    pub keys: Vec<PlacedKey>,
    pub top: f64,
    pub bottom: f64,
    pub splittable: bool,
}

/// The natural bounding box and every key within it.
#[derive(Debug, Clone, PartialEq)]
pub struct NaturalLayout {
    pub rows: Vec<PlacedRow>,
    pub width: f64,
    pub height: f64,
}

fn fixed_width(token: WidthToken) -> Option<f64> {
    match token {
        WidthToken::Regular => Some(KEY_UNIT),
        WidthToken::Custom(factor) => Some(factor * KEY_UNIT),
        WidthToken::Functional | WidthToken::Grow => None,
    }
}

fn count(row: &KeyRow, token: WidthToken) -> usize {
    row.keys.iter().filter(|k| k.width == token).count()
}

fn fixed_sum(row: &KeyRow) -> f64 {
    row.keys.iter().filter_map(|k| fixed_width(k.width)).sum()
}

/// Row capacity in layout units.
fn capacity(rows: &[KeyRow], columns: Option<u32>) -> f64 {
    match columns {
        Some(columns) => f64::from(columns) * KEY_UNIT,
        None => {
            let widest = rows
                .iter()
                .map(|row| count(row, WidthToken::Regular))
                .max()
                .unwrap_or(0);
            widest as f64 * KEY_UNIT
        }
    }
}

/// The functional key width shared by every row.
fn functional_width(rows: &[KeyRow], capacity: f64) -> f64 {
    let min = MIN_FUNCTIONAL_KEYS * KEY_UNIT;
    let max = MAX_FUNCTIONAL_KEYS * KEY_UNIT;
    rows.iter()
        .filter(|row| count(row, WidthToken::Grow) == 0)
        .filter_map(|row| {
            let functional = count(row, WidthToken::Functional);
            (functional > 0).then(|| (capacity - fixed_sum(row)) / functional as f64)
        })
        .reduce(f64::min)
        .map_or(max, |w| w.clamp(min, max))
}

/// Computes the natural layout of `rows`.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidGeometry`] when the layout has zero width or
/// height, a row has a non-positive height, or a key ends up with no width.
pub fn arrange(rows: &[KeyRow], columns: Option<u32>) -> Result<NaturalLayout, LayoutError> {
    if let Some(row) = rows.iter().position(|r| !(r.height > 0.0)) {
        return Err(LayoutError::InvalidGeometry(format!(
            "row {row} has non-positive height"
        )));
    }

    let capacity = capacity(rows, columns);
    let functional = functional_width(rows, capacity);

    // Widths before centering; a row without grow keys may exceed capacity.
    let widths: Vec<Vec<f64>> = rows
        .iter()
        .map(|row| {
            let grow = count(row, WidthToken::Grow);
            let used: f64 = row
                .keys
                .iter()
                .map(|k| match k.width {
                    WidthToken::Functional => functional,
                    other => fixed_width(other).unwrap_or(0.0),
                })
                .sum();
            let grow_width = if grow > 0 {
                ((capacity - used) / grow as f64).max(0.0)
            } else {
                0.0
            };
            row.keys
                .iter()
                .map(|k| match k.width {
                    WidthToken::Functional => functional,
                    WidthToken::Grow => grow_width,
                    other => fixed_width(other).unwrap_or(0.0),
                })
                .collect()
        })
        .collect();

    let width = widths
        .iter()
        .map(|w| w.iter().sum::<f64>())
        .fold(capacity, f64::max);
    let height: f64 = rows.iter().map(|r| r.height * ROW_UNIT).sum();

    if !(width > 0.0) || !(height > 0.0) {
        return Err(LayoutError::InvalidGeometry(format!(
            "natural layout is {width}x{height}"
        )));
    }

    let mut placed_rows = Vec::with_capacity(rows.len());
    let mut top = 0.0;
    for (row, row_widths) in rows.iter().zip(&widths) {
        let bottom = top + row.height * ROW_UNIT;
        let keys = place_row(&row.keys, row_widths, width)?;
        placed_rows.push(PlacedRow {
            keys,
            top,
            bottom,
            splittable: row.splittable,
        });
        top = bottom;
    }

    Ok(NaturalLayout {
        rows: placed_rows,
        width,
        height,
    })
}

/// Positions one row's keys, inserting centering gaps.
fn place_row(keys: &[RowKey], widths: &[f64], layout_width: f64) -> Result<Vec<PlacedKey>, LayoutError> {
    let total: f64 = widths.iter().sum();
    let leftover = (layout_width - total).max(0.0);

    // Gaps go before the first and after the last unanchored key.
    let first_free = keys.iter().position(|k| !k.anchored).unwrap_or(0);
    let last_free = keys
        .iter()
        .rposition(|k| !k.anchored)
        .unwrap_or(keys.len().saturating_sub(1));
    let anchored_left = first_free != 0;
    let anchored_right = last_free + 1 != keys.len();

    let (gap_left, gap_right) = match (anchored_left, anchored_right) {
        (true, false) => (0.0, leftover),
        (false, true) => (leftover, 0.0),
        _ => (leftover / 2.0, leftover / 2.0),
    };

    let mut placed = Vec::with_capacity(keys.len());
    let mut cursor = 0.0;
    for (i, (key, &w)) in keys.iter().zip(widths).enumerate() {
        if i == first_free {
            cursor += gap_left;
        }
        if !key.spacer && !(w > 0.0) {
            return Err(LayoutError::InvalidGeometry(format!(
                "key {:?} has no natural width",
                key.label
            )));
        }
        let left = cursor;
        cursor += w;
        placed.push(PlacedKey {
            key: key.clone(),
            left,
            right: cursor,
        });
        if i == last_free {
            cursor += gap_right;
        }
    }
    Ok(placed)
}
