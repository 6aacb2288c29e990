//! Rescaling a natural layout into the requested [`ComputedSize`].
//!
//! x and y scale independently.  Every key edge is scaled and rounded on its
//! own, and sizes are differences of rounded edges.  Keys that share a
//! natural boundary therefore share the rounded boundary too.
//!
//! Split sizes map each splittable row through two segments, one per half,
//! hugging the left and right edges.  A key crossing the middle is cut in two
//! at the midpoint.

use super::natural::{NaturalLayout, HORIZONTAL_GAP, VERTICAL_GAP};
use crate::domain::error::LayoutError;
use crate::domain::key::KeyDescriptor;
use crate::domain::request::{ComputedSize, OneHandedDirection};

/// Scaled keys plus the gaps they were built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaledLayout {
    pub keys: Vec<KeyDescriptor>,
    pub horizontal_gap: i32,
    pub vertical_gap: i32,
}

/// Maps natural x in `start..end` to `origin + (x - start) * scale`.
#[derive(Debug, Clone, Copy)]
struct Segment {
    start: f64,
    end: f64,
    origin: f64,
    scale: f64,
}

impl Segment {
    fn map(&self, x: f64) -> i32 {
        (self.origin + (x - self.start) * self.scale).round() as i32
    }
}

/// Horizontal placement of the whole keyboard.
struct Frame {
    full: Segment,
    /// Left and right halves, only for split sizes.
    halves: Option<[Segment; 2]>,
}

impl Frame {
    fn new(size: &ComputedSize, natural_width: f64) -> Self {
        let padding = size.padding();
        let left = f64::from(padding.left);
        let content = size.content_width() as f64;
        let whole = |origin: f64, width: f64| Segment {
            start: 0.0,
            end: natural_width,
            origin,
            scale: width / natural_width,
        };

        match *size {
            ComputedSize::OneHanded {
                layout_width,
                direction,
                ..
            } => {
                let width = f64::from(layout_width).min(content);
                let origin = match direction {
                    OneHandedDirection::Left => left,
                    OneHandedDirection::Right => left + content - width,
                };
                Self {
                    full: whole(origin, width),
                    halves: None,
                }
            }
            ComputedSize::Split {
                split_layout_width,
                ..
            } => {
                let half = f64::from(split_layout_width).min(content) / 2.0;
                let mid = natural_width / 2.0;
                let scale = half / mid;
                Self {
                    full: whole(left, content),
                    halves: Some([
                        Segment {
                            start: 0.0,
                            end: mid,
                            origin: left,
                            scale,
                        },
                        Segment {
                            start: mid,
                            end: natural_width,
                            origin: left + content - half,
                            scale,
                        },
                    ]),
                }
            }
            ComputedSize::Regular { .. } | ComputedSize::Floating { .. } => Self {
                full: whole(left, content),
                halves: None,
            },
        }
    }

    fn segments(&self, splittable: bool) -> &[Segment] {
        match &self.halves {
            Some(halves) if splittable => halves.as_slice(),
            _ => std::slice::from_ref(&self.full),
        }
    }

    /// Scale used for the horizontal gap.
    fn gap_scale(&self) -> f64 {
        self.halves.map_or(self.full.scale, |[left, _]| left.scale)
    }
}

/// Rescales `layout` into `size`.
///
/// # Errors
///
/// Returns [`LayoutError::MalformedRequest`] when the target is too small for
/// some key to keep a positive size after gaps are removed.
pub fn scale(layout: &NaturalLayout, size: &ComputedSize) -> Result<ScaledLayout, LayoutError> {
    let padding = size.padding();
    let frame = Frame::new(size, layout.width);
    let top = f64::from(padding.top);
    let sy = size.content_height() as f64 / layout.height;
    let map_y = |y: f64| (top + y * sy).round() as i32;

    let horizontal_gap = (HORIZONTAL_GAP * frame.gap_scale()).round() as i32;
    let vertical_gap = (VERTICAL_GAP * sy).round() as i32;

    let mut keys = Vec::new();
    for (row_index, row) in layout.rows.iter().enumerate() {
        let (y_top, y_bottom) = (map_y(row.top), map_y(row.bottom));
        let mut column = 0;

        for placed in &row.keys {
            if placed.key.spacer {
                column += 1;
                continue;
            }
            for segment in frame.segments(row.splittable) {
                let left = placed.left.max(segment.start);
                let right = placed.right.min(segment.end);
                if right <= left {
                    continue;
                }

                let (x_left, x_right) = (segment.map(left), segment.map(right));
                let key = &placed.key;
                let mut descriptor = KeyDescriptor::from_allocation(
                    key.code,
                    key.label.clone(),
                    (x_left, y_top),
                    (x_right - x_left, y_bottom - y_top),
                    (horizontal_gap, vertical_gap),
                )
                .with_grid(row_index, column)
                .with_style(key.style)
                .with_hint(key.hint.clone())
                .with_more_keys(key.more_keys.clone());
                descriptor.label_flags = key.label_flags();
                descriptor.action_flags = key.action_flags();
                descriptor.is_fast_long_press = key.fast_long_press;

                if !descriptor.is_valid() {
                    return Err(LayoutError::MalformedRequest(format!(
                        "target {}x{} is too small for key {:?}",
                        size.width(),
                        size.height(),
                        key.label
                    )));
                }
                keys.push(descriptor);
                column += 1;
            }
        }
    }

    Ok(ScaledLayout {
        keys,
        horizontal_gap,
        vertical_gap,
    })
}
