//! Declarative layout definitions as stored in resource files.
//!
//! A definition is one JSON document:
//!
//! ```json
//! {
//!   "id": "qwerty",
//!   "name": "QWERTY",
//!   "rows": [
//!     ["q", "w", "e", "r", "t", "y", "u", "i", "o", "p"],
//!     { "keys": [{ "template": "shift" }, "z", "x", { "template": "delete" }] },
//!     { "keys": [{ "template": "symbols" }, { "template": "space" }, { "template": "enter" }],
//!       "splittable": false }
//!   ]
//! }
//! ```
//!
//! Keys are plain labels or objects; objects may name a template and override
//! any of its attributes.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::element::{LayoutKind, LayoutPage};
use crate::domain::key::{KeyCode, KeyVisualStyle};
use crate::domain::locale::{Locale, Script};
use crate::domain::request::KeyboardMode;

/// Whether a layout accepts the optional number row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberRowPolicy {
    /// Follows the request's `number_row` flag.
    #[default]
    UserConfigurable,
    /// The number row is always inserted.
    AlwaysEnabled,
    /// The layout never shows a number row.
    AlwaysDisabled,
}

impl NumberRowPolicy {
    pub fn applies(self, requested: bool) -> bool {
        match self {
            Self::UserConfigurable => requested,
            Self::AlwaysEnabled => true,
            Self::AlwaysDisabled => false,
        }
    }
}

/// Width class of a key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidthToken {
    /// One regular key cell.
    #[default]
    Regular,
    /// Shares the width left over by regular keys, within bounds.
    Functional,
    /// Takes whatever the row has left.
    Grow,
    /// A fixed multiple of the regular key cell.
    Custom(f64),
}

/// Named key presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    Shift,
    Delete,
    Space,
    Enter,
    Symbols,
    Alphabet,
    Period,
    Comma,
    /// Placeholder for the bottom action key; dropped when none is requested.
    Action,
    /// Empty cell: occupies width, produces no key.
    Gap,
    Emoji,
    /// Switches to the numeric keypad.
    Number,
    /// Switch to the `Alt0..Alt2` pages of the layout set.
    Alt0,
    Alt1,
    Alt2,
    /// Zero-width non-joiner, with the joiner on long press.
    Zwnj,
    /// A ZWNJ key only when the layout enables it; dropped otherwise.
    #[serde(rename = "optionalzwnj")]
    OptionalZwnj,
    /// The locale's own currency sign.
    Currency,
    /// Fixed secondary currencies; `$` stands in for the one the locale
    /// already shows.
    Currency1,
    Currency2,
    Currency3,
    Currency4,
}

impl Template {
    /// Sign of a fixed currency template.
    pub fn fixed_currency(self) -> Option<&'static str> {
        match self {
            Self::Currency1 => Some("£"),
            Self::Currency2 => Some("¢"),
            Self::Currency3 => Some("€"),
            Self::Currency4 => Some("¥"),
            _ => None,
        }
    }
}

/// Object form of a key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct KeyObject {
    pub template: Option<Template>,
    pub label: Option<String>,
    pub code: Option<KeyCode>,
    pub hint: Option<String>,
    pub width: Option<WidthToken>,
    pub style: Option<KeyVisualStyle>,
    pub more_keys: Vec<String>,
    pub anchored: Option<bool>,
    pub repeatable: Option<bool>,
    pub fast_long_press: Option<bool>,
    /// Editor modes in which the key exists; all modes when absent.
    pub modes: Option<Vec<KeyboardMode>>,
}

/// A key entry: either a bare label or an object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum KeySpec {
    Label(String),
    Object(KeyObject),
}

impl KeySpec {
    pub fn template(&self) -> Option<Template> {
        match self {
            Self::Label(_) => None,
            Self::Object(obj) => obj.template,
        }
    }
}

fn default_row_height() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

/// Object form of a row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RowObject {
    pub keys: Vec<KeySpec>,
    /// Height as a multiple of the regular row height.
    #[serde(default = "default_row_height")]
    pub height: f64,
    #[serde(default = "default_true")]
    pub splittable: bool,
}

/// A row entry: either a bare list of keys or an object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RowSpec {
    Keys(Vec<KeySpec>),
    Object(RowObject),
}

impl RowSpec {
    pub fn keys(&self) -> &[KeySpec] {
        match self {
            Self::Keys(keys) => keys,
            Self::Object(row) => &row.keys,
        }
    }

    pub fn height(&self) -> f64 {
        match self {
            Self::Keys(_) => default_row_height(),
            Self::Object(row) => row.height,
        }
    }

    pub fn splittable(&self) -> bool {
        match self {
            Self::Keys(_) => true,
            Self::Object(row) => row.splittable,
        }
    }
}

/// Layout ids serving the non-alphabet keyboards of a layout set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ElementLayouts {
    pub symbols: Option<String>,
    pub symbols_shifted: Option<String>,
    pub phone: Option<String>,
    pub phone_shifted: Option<String>,
    pub number: Option<String>,
    pub number_basic: Option<String>,
}

impl ElementLayouts {
    /// Layout id for a non-alphabet kind and normalized page, falling back to
    /// the shared defaults.  `None` for combinations that do not exist.
    pub fn layout_for(&self, kind: LayoutKind, page: LayoutPage) -> Option<&str> {
        let (custom, default) = match (kind, page) {
            (LayoutKind::Symbols, LayoutPage::Base) => (&self.symbols, "symbols"),
            (LayoutKind::Symbols, LayoutPage::Shifted) => (&self.symbols_shifted, "symbols_shifted"),
            (LayoutKind::Phone, LayoutPage::Base) => (&self.phone, "phone"),
            (LayoutKind::Phone, LayoutPage::Shifted) => (&self.phone_shifted, "phone_symbols"),
            (LayoutKind::Number, LayoutPage::Base) => (&self.number, "number"),
            (LayoutKind::NumberBasic, LayoutPage::Base) => (&self.number_basic, "number_basic"),
            _ => return None,
        };
        Some(custom.as_deref().unwrap_or(default))
    }
}

/// One keyboard layout as declared in a resource file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LayoutDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Locale this variant is specific to; `None` for the family default.
    #[serde(default)]
    pub locale: Option<Locale>,
    #[serde(default)]
    pub script: Option<Script>,
    #[serde(default)]
    pub number_row_policy: NumberRowPolicy,
    /// Regular key cells per row; the widest row when absent.
    #[serde(default)]
    pub columns: Option<u32>,
    /// Replaces the generated number row.
    #[serde(default)]
    pub number_row: Option<Vec<KeySpec>>,
    pub rows: Vec<RowSpec>,
    #[serde(default)]
    pub elements: ElementLayouts,
    /// Layout ids of the `Alt0..Alt3` pages.
    #[serde(default)]
    pub alt_pages: Vec<String>,
    /// Keeps `optionalzwnj` keys.
    #[serde(default)]
    pub use_zwnj_key: bool,
}

/// Per-locale data: digit glyphs and accent variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LocaleData {
    /// Ten glyphs for 0–9 when the locale has its own digits.
    pub digits: Option<Vec<String>>,
    /// Long-press variants keyed by base letter.
    pub more_keys: BTreeMap<String, Vec<String>>,
    /// Currency sign shown on the symbols page; `$` when absent.
    pub currency: Option<String>,
}

/// All locale data, keyed by locale.
pub type LocaleTable = BTreeMap<Locale, LocaleData>;
