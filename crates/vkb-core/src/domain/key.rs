//! The key descriptor: a key's identity together with its placement.
//!
//! # Coordinate contract
//!
//! `x`/`y` are the top-left corner of the key's *allocation box*, the cell
//! the row layout reserved for it.  `width`/`height` are the drawable extent
//! with the gap already removed.  A renderer draws the key at
//! `(x + horizontal_gap / 2, y)` and leaves `vertical_gap` as trailing margin
//! below it.
//!
//! [`KeyDescriptor::from_allocation`] is the only place that subtracts a gap.
//! Everything downstream, including the legacy table builder, treats
//! `width`/`height` as final.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Integer key identity: a Unicode scalar value or one of the negative
/// functional codes in [`codes`].
pub type KeyCode = i32;

/// Functional key codes.  Printable keys use their Unicode scalar value.
pub mod codes {
    use super::KeyCode;

    pub const SHIFT: KeyCode = -1;
    pub const CAPSLOCK: KeyCode = -2;
    pub const SWITCH_ALPHA_SYMBOL: KeyCode = -3;
    pub const OUTPUT_TEXT: KeyCode = -4;
    pub const DELETE: KeyCode = -5;
    pub const SETTINGS: KeyCode = -6;
    pub const SHORTCUT: KeyCode = -7;
    pub const ACTION_NEXT: KeyCode = -8;
    pub const ACTION_PREVIOUS: KeyCode = -9;
    pub const LANGUAGE_SWITCH: KeyCode = -10;
    pub const EMOJI: KeyCode = -11;
    pub const SHIFT_ENTER: KeyCode = -12;
    pub const UNSPECIFIED: KeyCode = -13;
    pub const SWITCH_NUMBER_LAYOUT: KeyCode = -14;
    pub const SWITCH_ALT_0: KeyCode = -15;
    pub const SWITCH_ALT_1: KeyCode = -16;
    pub const SWITCH_ALT_2: KeyCode = -17;
    pub const ARROW_LEFT: KeyCode = -21;
    pub const ARROW_RIGHT: KeyCode = -22;
    pub const ARROW_UP: KeyCode = -23;
    pub const ARROW_DOWN: KeyCode = -24;

    pub const ENTER: KeyCode = '\n' as KeyCode;
    pub const SPACE: KeyCode = ' ' as KeyCode;
    pub const PERIOD: KeyCode = '.' as KeyCode;
    pub const COMMA: KeyCode = ',' as KeyCode;
    pub const ZWNJ: KeyCode = '\u{200C}' as KeyCode;
    pub const ZWJ: KeyCode = '\u{200D}' as KeyCode;

    /// Returns `true` for the negative functional codes.
    pub fn is_functional(code: KeyCode) -> bool {
        code < 0
    }

    /// Derives the code a plain text label produces: its codepoint when the
    /// label is one character, [`OUTPUT_TEXT`] otherwise.
    pub fn for_label(label: &str) -> KeyCode {
        let mut chars = label.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => c as KeyCode,
            (None, _) => UNSPECIFIED,
            _ => OUTPUT_TEXT,
        }
    }
}

bitflags! {
    /// Rendering hints for a key's label.  Opaque to geometry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct LabelFlags: u32 {
        const ALIGN_HINT_LABEL_TO_BOTTOM = 0x02;
        const ALIGN_ICON_TO_BOTTOM = 0x04;
        const ALIGN_LABEL_OFF_CENTER = 0x08;
        const FOLLOW_KEY_LARGE_LETTER_RATIO = 0x40;
        const FOLLOW_KEY_LETTER_RATIO = 0x80;
        const FOLLOW_KEY_LABEL_RATIO = 0xC0;
        const FOLLOW_KEY_HINT_LABEL_RATIO = 0x140;
        const HAS_HINT_LABEL = 0x800;
        const AUTO_X_SCALE = 0x4000;
    }
}

bitflags! {
    /// Touch behaviour flags for a key.  Opaque to geometry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ActionFlags: u32 {
        const IS_REPEATABLE = 0x01;
        const NO_KEY_PREVIEW = 0x02;
        const ALT_CODE_WHILE_TYPING = 0x04;
        const ENABLE_LONG_PRESS = 0x08;
    }
}

/// Background treatment of a key.  Affects rendering only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyVisualStyle {
    #[default]
    Normal,
    NoBackground,
    Functional,
    StickyOff,
    StickyOn,
    Action,
    Spacebar,
    MoreKey,
}

/// A long-press alternate offered by a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoreKey {
    pub code: KeyCode,
    pub label: String,
}

impl MoreKey {
    /// Builds a more-key whose code is derived from its label.
    pub fn from_label(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            code: codes::for_label(&label),
            label,
        }
    }
}

/// Immutable description of one positioned key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyDescriptor {
    pub code: KeyCode,
    pub label: String,
    pub hint_label: String,
    pub label_flags: LabelFlags,
    pub action_flags: ActionFlags,
    /// Drawable width, gap excluded.
    pub width: i32,
    /// Drawable height, gap excluded.
    pub height: i32,
    pub horizontal_gap: i32,
    pub vertical_gap: i32,
    /// Left edge of the allocation box.
    pub x: i32,
    /// Top edge of the allocation box.
    pub y: i32,
    pub visual_style: KeyVisualStyle,
    pub is_fast_long_press: bool,
    pub row: usize,
    pub column: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub more_keys: Vec<MoreKey>,
}

impl KeyDescriptor {
    /// Creates a key with an already gap-excluded size.
    pub fn new(code: KeyCode, label: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            code,
            label: label.into(),
            hint_label: String::new(),
            label_flags: LabelFlags::empty(),
            action_flags: ActionFlags::empty(),
            width,
            height,
            horizontal_gap: 0,
            vertical_gap: 0,
            x: 0,
            y: 0,
            visual_style: KeyVisualStyle::Normal,
            is_fast_long_press: false,
            row: 0,
            column: 0,
            more_keys: Vec::new(),
        }
    }

    /// Creates a key from its allocation box, removing the gaps exactly once.
    ///
    /// The allocation is `alloc_width × alloc_height` at `(x, y)`; the
    /// resulting key is `alloc_width - horizontal_gap` wide and
    /// `alloc_height - vertical_gap` tall.
    pub fn from_allocation(
        code: KeyCode,
        label: impl Into<String>,
        (x, y): (i32, i32),
        (alloc_width, alloc_height): (i32, i32),
        (horizontal_gap, vertical_gap): (i32, i32),
    ) -> Self {
        Self {
            x,
            y,
            horizontal_gap,
            vertical_gap,
            ..Self::new(
                code,
                label,
                alloc_width - horizontal_gap,
                alloc_height - vertical_gap,
            )
        }
    }

    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_gaps(mut self, horizontal_gap: i32, vertical_gap: i32) -> Self {
        self.horizontal_gap = horizontal_gap;
        self.vertical_gap = vertical_gap;
        self
    }

    pub fn with_grid(mut self, row: usize, column: usize) -> Self {
        self.row = row;
        self.column = column;
        self
    }

    pub fn with_style(mut self, style: KeyVisualStyle) -> Self {
        self.visual_style = style;
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint_label = hint.into();
        if !self.hint_label.is_empty() {
            self.label_flags |= LabelFlags::HAS_HINT_LABEL;
        }
        self
    }

    pub fn with_more_keys(mut self, more_keys: Vec<MoreKey>) -> Self {
        self.more_keys = more_keys;
        self
    }

    /// Checks the size and gap invariants: positive extent, non-negative gaps.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0 && self.horizontal_gap >= 0 && self.vertical_gap >= 0
    }

    /// Right edge of the allocation box.
    pub fn allocation_right(&self) -> i32 {
        self.x + self.width + self.horizontal_gap
    }

    /// Bottom edge of the allocation box.
    pub fn allocation_bottom(&self) -> i32 {
        self.y + self.height + self.vertical_gap
    }

    /// Left edge of the drawn key, centered within its allocation.
    pub fn draw_x(&self) -> i32 {
        self.x + self.horizontal_gap / 2
    }
}
