//! Layout requests: everything that determines one layout set.
//!
//! A [`LayoutRequest`] is built per keyboard-open event.  Its full equality is
//! cache identity for resolved geometry; [`LayoutSetKey`] is the subset that
//! does not depend on the target size, so a resize can reuse everything but
//! the final rescale.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::LayoutError;
use super::key::{codes, KeyCode};
use super::locale::Locale;

/// Private editor option that forces a layout set id.
pub const FORCE_LAYOUT_OPTION: &str = "org.futo.inputmethod.latin.ForceLayout";
/// Private editor option that forces a locale.
pub const FORCE_LOCALE_OPTION: &str = "org.futo.inputmethod.latin.ForceLocale";

// ── Size classes ──────────────────────────────────────────────────────────────

/// Padding around the key area, in target units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Insets {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Insets {
    pub const fn uniform(v: i32) -> Self {
        Self {
            left: v,
            top: v,
            right: v,
            bottom: v,
        }
    }

    /// `left + right`, widened so large insets cannot overflow.
    pub fn horizontal(&self) -> i64 {
        i64::from(self.left) + i64::from(self.right)
    }

    pub fn vertical(&self) -> i64 {
        i64::from(self.top) + i64::from(self.bottom)
    }

    fn is_non_negative(&self) -> bool {
        self.left >= 0 && self.top >= 0 && self.right >= 0 && self.bottom >= 0
    }
}

/// Which edge a one-handed keyboard hugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OneHandedDirection {
    Left,
    Right,
}

/// The target geometry a keyboard must be rescaled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComputedSize {
    Regular {
        width: i32,
        height: i32,
        padding: Insets,
    },
    /// Splittable rows are divided into halves totalling `split_layout_width`,
    /// hugging the left and right edges.
    Split {
        width: i32,
        height: i32,
        padding: Insets,
        split_layout_width: i32,
    },
    /// Keys occupy `layout_width` against one edge.
    OneHanded {
        width: i32,
        height: i32,
        padding: Insets,
        layout_width: i32,
        direction: OneHandedDirection,
    },
    /// Free-floating keyboard anchored at `bottom_origin` on screen.
    Floating {
        width: i32,
        height: i32,
        padding: Insets,
        bottom_origin: (i32, i32),
    },
}

impl ComputedSize {
    /// A regular size with no padding.
    pub fn regular(width: i32, height: i32) -> Self {
        Self::Regular {
            width,
            height,
            padding: Insets::default(),
        }
    }

    pub fn width(&self) -> i32 {
        match *self {
            Self::Regular { width, .. }
            | Self::Split { width, .. }
            | Self::OneHanded { width, .. }
            | Self::Floating { width, .. } => width,
        }
    }

    pub fn height(&self) -> i32 {
        match *self {
            Self::Regular { height, .. }
            | Self::Split { height, .. }
            | Self::OneHanded { height, .. }
            | Self::Floating { height, .. } => height,
        }
    }

    pub fn padding(&self) -> Insets {
        match *self {
            Self::Regular { padding, .. }
            | Self::Split { padding, .. }
            | Self::OneHanded { padding, .. }
            | Self::Floating { padding, .. } => padding,
        }
    }

    /// Width inside the padding; negative when the padding does not fit.
    pub fn content_width(&self) -> i64 {
        i64::from(self.width()) - self.padding().horizontal()
    }

    /// Height inside the padding; negative when the padding does not fit.
    pub fn content_height(&self) -> i64 {
        i64::from(self.height()) - self.padding().vertical()
    }

    /// Rejects sizes no keyboard can be laid out in.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::MalformedRequest`] for non-positive dimensions,
    /// negative padding, padding that leaves no content box, or a non-positive
    /// split/one-handed layout width.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let (width, height, padding) = (self.width(), self.height(), self.padding());
        if width <= 0 || height <= 0 {
            return Err(LayoutError::MalformedRequest(format!(
                "target size must be positive, got {width}x{height}"
            )));
        }
        if !padding.is_non_negative() {
            return Err(LayoutError::MalformedRequest("padding must not be negative".into()));
        }
        if self.content_width() <= 0 || self.content_height() <= 0 {
            return Err(LayoutError::MalformedRequest(format!(
                "padding leaves no room for keys in {width}x{height}"
            )));
        }
        match *self {
            Self::Split {
                split_layout_width, ..
            } if split_layout_width <= 0 => Err(LayoutError::MalformedRequest(
                "split layout width must be positive".into(),
            )),
            Self::OneHanded { layout_width, .. } if layout_width <= 0 => Err(
                LayoutError::MalformedRequest("one-handed layout width must be positive".into()),
            ),
            _ => Ok(()),
        }
    }
}

// ── Editor context ────────────────────────────────────────────────────────────

/// Input mode of the focused editor, used to filter mode-specific keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardMode {
    #[default]
    Text,
    Url,
    Email,
    Im,
    Phone,
    Number,
    Date,
    Time,
    DateTime,
}

/// Action the editor wants the enter key to perform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorAction {
    #[default]
    None,
    Go,
    Search,
    Send,
    Next,
    Previous,
    Done,
}

impl EditorAction {
    /// Label shown on the enter key.
    pub fn enter_label(self) -> &'static str {
        match self {
            Self::None => "⏎",
            Self::Go => "Go",
            Self::Search => "Search",
            Self::Send => "Send",
            Self::Next => "Next",
            Self::Previous => "Prev",
            Self::Done => "Done",
        }
    }
}

/// Input-type hints from the host editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditorContext {
    pub mode: KeyboardMode,
    pub action: EditorAction,
    /// Private `key=value` options set by the editor.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub private_options: BTreeMap<String, String>,
}

impl EditorContext {
    pub fn with_mode(mode: KeyboardMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Parses a comma-separated `key=value` private option string.
    ///
    /// Entries without `=` are kept as flags with an empty value.
    pub fn parse_private_options(options: &str) -> BTreeMap<String, String> {
        options
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| match entry.split_once('=') {
                Some((k, v)) => (k.trim().to_string(), v.trim().to_string()),
                None => (entry.to_string(), String::new()),
            })
            .collect()
    }

    /// Layout set id the editor insists on, if any.
    pub fn forced_layout(&self) -> Option<&str> {
        self.private_options
            .get(FORCE_LAYOUT_OPTION)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Locale the editor insists on, if it parses.
    pub fn forced_locale(&self) -> Option<Locale> {
        self.private_options
            .get(FORCE_LOCALE_OPTION)
            .and_then(|tag| Locale::parse(tag).ok())
    }
}

// ── Feature flags ─────────────────────────────────────────────────────────────

/// Shape of the inserted number row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberRowMode {
    /// Compact row; each digit hints its shifted symbol.
    #[default]
    Default,
    /// Full-height row of plain digits.
    Classic,
}

/// Extra key placed in the bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottomActionKey {
    Emoji,
    LanguageSwitch,
    Settings,
    VoiceInput,
}

impl BottomActionKey {
    pub fn code(self) -> KeyCode {
        match self {
            Self::Emoji => codes::EMOJI,
            Self::LanguageSwitch => codes::LANGUAGE_SWITCH,
            Self::Settings => codes::SETTINGS,
            Self::VoiceInput => codes::SHORTCUT,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Emoji => "☺",
            Self::LanguageSwitch => "🌐",
            Self::Settings => "⚙",
            Self::VoiceInput => "🎤",
        }
    }
}

// ── Request ───────────────────────────────────────────────────────────────────

/// Everything needed to resolve one layout set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutRequest {
    pub computed_size: ComputedSize,
    pub keyboard_layout_set_id: String,
    pub locale: Locale,
    #[serde(default)]
    pub editor_context: EditorContext,
    #[serde(default)]
    pub number_row: bool,
    #[serde(default)]
    pub arrow_row: bool,
    #[serde(default)]
    pub bottom_action_key: Option<BottomActionKey>,
    #[serde(default)]
    pub multilingual_typing_locales: Vec<Locale>,
    #[serde(default)]
    pub number_row_mode: NumberRowMode,
    #[serde(default)]
    pub use_local_numbers: bool,
    #[serde(default)]
    pub alternative_period_key: bool,
}

impl LayoutRequest {
    /// A request with every feature flag off.
    pub fn new(layout_set_id: impl Into<String>, locale: Locale, computed_size: ComputedSize) -> Self {
        Self {
            computed_size,
            keyboard_layout_set_id: layout_set_id.into(),
            locale,
            editor_context: EditorContext::default(),
            number_row: false,
            arrow_row: false,
            bottom_action_key: None,
            multilingual_typing_locales: Vec::new(),
            number_row_mode: NumberRowMode::Default,
            use_local_numbers: false,
            alternative_period_key: false,
        }
    }

    /// Copy of this request with a different target size.
    pub fn with_computed_size(&self, computed_size: ComputedSize) -> Self {
        Self {
            computed_size,
            ..self.clone()
        }
    }

    pub fn with_number_row(mut self, enabled: bool, mode: NumberRowMode) -> Self {
        self.number_row = enabled;
        self.number_row_mode = mode;
        self
    }

    pub fn with_arrow_row(mut self, enabled: bool) -> Self {
        self.arrow_row = enabled;
        self
    }

    pub fn with_bottom_action_key(mut self, key: Option<BottomActionKey>) -> Self {
        self.bottom_action_key = key;
        self
    }

    pub fn with_multilingual_locales(mut self, locales: Vec<Locale>) -> Self {
        self.multilingual_typing_locales = locales;
        self
    }

    pub fn with_local_numbers(mut self, enabled: bool) -> Self {
        self.use_local_numbers = enabled;
        self
    }

    pub fn with_alternative_period_key(mut self, enabled: bool) -> Self {
        self.alternative_period_key = enabled;
        self
    }

    pub fn with_editor_context(mut self, context: EditorContext) -> Self {
        self.editor_context = context;
        self
    }

    /// Rejects requests that cannot produce geometry.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::MalformedRequest`] for an empty layout id or an
    /// unusable [`ComputedSize`].
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.keyboard_layout_set_id.trim().is_empty() {
            return Err(LayoutError::MalformedRequest("layout set id is empty".into()));
        }
        self.computed_size.validate()
    }

    /// The size-independent part of this request.
    pub fn layout_set_key(&self) -> LayoutSetKey {
        LayoutSetKey {
            keyboard_layout_set_id: self.keyboard_layout_set_id.clone(),
            locale: self.locale.clone(),
            editor_context: self.editor_context.clone(),
            number_row: self.number_row,
            arrow_row: self.arrow_row,
            bottom_action_key: self.bottom_action_key,
            multilingual_typing_locales: self.multilingual_typing_locales.clone(),
            number_row_mode: self.number_row_mode,
            use_local_numbers: self.use_local_numbers,
            alternative_period_key: self.alternative_period_key,
        }
    }
}

/// All [`LayoutRequest`] fields except the target size.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayoutSetKey {
    pub keyboard_layout_set_id: String,
    pub locale: Locale,
    pub editor_context: EditorContext,
    pub number_row: bool,
    pub arrow_row: bool,
    pub bottom_action_key: Option<BottomActionKey>,
    pub multilingual_typing_locales: Vec<Locale>,
    pub number_row_mode: NumberRowMode,
    pub use_local_numbers: bool,
    pub alternative_period_key: bool,
}
