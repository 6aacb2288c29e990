//! Layout elements: the (kind, page) address of one keyboard in a layout set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::LayoutError;

/// Which keyboard of the layout set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    Alphabet,
    Symbols,
    Phone,
    Number,
    NumberBasic,
}

/// Which page of a keyboard kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPage {
    Base,
    Shifted,
    ManuallyShifted,
    ShiftLocked,
    Alt0,
    Alt1,
    Alt2,
    Alt3,
}

impl LayoutPage {
    /// Collapses the shift variants onto [`LayoutPage::Shifted`].
    pub fn normalize(self) -> Self {
        match self {
            Self::ManuallyShifted | Self::ShiftLocked => Self::Shifted,
            other => other,
        }
    }

    /// Index into the alternate pages, for `Alt0..Alt3`.
    pub fn alt_index(self) -> Option<usize> {
        match self {
            Self::Alt0 => Some(0),
            Self::Alt1 => Some(1),
            Self::Alt2 => Some(2),
            Self::Alt3 => Some(3),
            _ => None,
        }
    }

    /// `true` for every page that shows upper-case letters.
    pub fn is_shifted(self) -> bool {
        self.normalize() == Self::Shifted
    }
}

/// Numeric ids of the legacy keyboard elements.
pub mod element_id {
    pub const ALPHABET: i32 = 0;
    pub const ALPHABET_MANUAL_SHIFTED: i32 = 1;
    pub const ALPHABET_AUTOMATIC_SHIFTED: i32 = 2;
    pub const ALPHABET_SHIFT_LOCKED: i32 = 3;
    pub const ALPHABET_SHIFT_LOCK_SHIFTED: i32 = 4;
    pub const SYMBOLS: i32 = 5;
    pub const SYMBOLS_SHIFTED: i32 = 6;
    pub const PHONE: i32 = 7;
    pub const PHONE_SYMBOLS: i32 = 8;
    pub const NUMBER: i32 = 9;
}

/// One addressable keyboard: `kind × page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutElement {
    pub kind: LayoutKind,
    pub page: LayoutPage,
}

impl LayoutElement {
    pub const fn new(kind: LayoutKind, page: LayoutPage) -> Self {
        Self { kind, page }
    }

    pub const ALPHABET: Self = Self::new(LayoutKind::Alphabet, LayoutPage::Base);
    pub const SYMBOLS: Self = Self::new(LayoutKind::Symbols, LayoutPage::Base);

    /// Same kind with the page normalized.
    pub fn normalize(self) -> Self {
        Self::new(self.kind, self.page.normalize())
    }

    /// Legacy element id, when this element has one.
    pub fn element_id(self) -> Option<i32> {
        use element_id::*;
        match (self.kind, self.page) {
            (LayoutKind::Alphabet, LayoutPage::Base) => Some(ALPHABET),
            (LayoutKind::Alphabet, LayoutPage::ManuallyShifted) => Some(ALPHABET_MANUAL_SHIFTED),
            (LayoutKind::Alphabet, LayoutPage::Shifted) => Some(ALPHABET_AUTOMATIC_SHIFTED),
            (LayoutKind::Alphabet, LayoutPage::ShiftLocked) => Some(ALPHABET_SHIFT_LOCKED),
            (LayoutKind::Symbols, LayoutPage::Base) => Some(SYMBOLS),
            (LayoutKind::Symbols, LayoutPage::Shifted) => Some(SYMBOLS_SHIFTED),
            (LayoutKind::Phone, LayoutPage::Base) => Some(PHONE),
            (LayoutKind::Phone, LayoutPage::Shifted) => Some(PHONE_SYMBOLS),
            (LayoutKind::NumberBasic, LayoutPage::Base) => Some(NUMBER),
            _ => None,
        }
    }

    /// Maps a legacy element id back to an element.
    ///
    /// `NUMBER` maps to [`LayoutKind::NumberBasic`]; the richer number pad
    /// has no legacy id.
    pub fn from_element_id(id: i32) -> Option<Self> {
        use element_id::*;
        let (kind, page) = match id {
            ALPHABET => (LayoutKind::Alphabet, LayoutPage::Base),
            ALPHABET_MANUAL_SHIFTED => (LayoutKind::Alphabet, LayoutPage::ManuallyShifted),
            ALPHABET_AUTOMATIC_SHIFTED => (LayoutKind::Alphabet, LayoutPage::Shifted),
            ALPHABET_SHIFT_LOCKED | ALPHABET_SHIFT_LOCK_SHIFTED => {
                (LayoutKind::Alphabet, LayoutPage::ShiftLocked)
            }
            SYMBOLS => (LayoutKind::Symbols, LayoutPage::Base),
            SYMBOLS_SHIFTED => (LayoutKind::Symbols, LayoutPage::Shifted),
            PHONE => (LayoutKind::Phone, LayoutPage::Base),
            PHONE_SYMBOLS => (LayoutKind::Phone, LayoutPage::Shifted),
            NUMBER => (LayoutKind::NumberBasic, LayoutPage::Base),
            _ => return None,
        };
        Some(Self::new(kind, page))
    }
}

impl Default for LayoutElement {
    fn default() -> Self {
        Self::ALPHABET
    }
}

// ── Display / FromStr ─────────────────────────────────────────────────────────

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Alphabet => "alphabet",
            Self::Symbols => "symbols",
            Self::Phone => "phone",
            Self::Number => "number",
            Self::NumberBasic => "number_basic",
        };
        f.write_str(name)
    }
}

impl fmt::Display for LayoutPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Base => "base",
            Self::Shifted => "shifted",
            Self::ManuallyShifted => "manually_shifted",
            Self::ShiftLocked => "shift_locked",
            Self::Alt0 => "alt0",
            Self::Alt1 => "alt1",
            Self::Alt2 => "alt2",
            Self::Alt3 => "alt3",
        };
        f.write_str(name)
    }
}

impl fmt::Display for LayoutElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.page)
    }
}

impl FromStr for LayoutKind {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "alphabet" => Ok(Self::Alphabet),
            "symbols" => Ok(Self::Symbols),
            "phone" => Ok(Self::Phone),
            "number" => Ok(Self::Number),
            "number_basic" => Ok(Self::NumberBasic),
            _ => Err(LayoutError::MalformedRequest(format!("unknown layout kind: {s}"))),
        }
    }
}

impl FromStr for LayoutPage {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "base" => Ok(Self::Base),
            "shifted" => Ok(Self::Shifted),
            "manually_shifted" => Ok(Self::ManuallyShifted),
            "shift_locked" => Ok(Self::ShiftLocked),
            "alt0" => Ok(Self::Alt0),
            "alt1" => Ok(Self::Alt1),
            "alt2" => Ok(Self::Alt2),
            "alt3" => Ok(Self::Alt3),
            _ => Err(LayoutError::MalformedRequest(format!("unknown layout page: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_shift_variants() {
        assert_eq!(LayoutPage::ManuallyShifted.normalize(), LayoutPage::Shifted);
        assert_eq!(LayoutPage::ShiftLocked.normalize(), LayoutPage::Shifted);
        assert_eq!(LayoutPage::Alt2.normalize(), LayoutPage::Alt2);
        assert_eq!(LayoutPage::Base.normalize(), LayoutPage::Base);
    }

    #[test]
    fn test_alt_index_only_for_alt_pages() {
        assert_eq!(LayoutPage::Alt0.alt_index(), Some(0));
        assert_eq!(LayoutPage::Alt3.alt_index(), Some(3));
        assert_eq!(LayoutPage::Shifted.alt_index(), None);
    }

    #[test]
    fn test_element_id_round_trips_for_every_legacy_id() {
        use element_id::*;
        for id in [
            ALPHABET,
            ALPHABET_MANUAL_SHIFTED,
            ALPHABET_AUTOMATIC_SHIFTED,
            ALPHABET_SHIFT_LOCKED,
            SYMBOLS,
            SYMBOLS_SHIFTED,
            PHONE,
            PHONE_SYMBOLS,
            NUMBER,
        ] {
            let element = LayoutElement::from_element_id(id).expect("known id");
            assert_eq!(element.element_id(), Some(id));
        }
    }

    #[test]
    fn test_shift_lock_shifted_maps_to_shift_locked() {
        let element = LayoutElement::from_element_id(element_id::ALPHABET_SHIFT_LOCK_SHIFTED);
        assert_eq!(
            element,
            Some(LayoutElement::new(LayoutKind::Alphabet, LayoutPage::ShiftLocked))
        );
    }

    #[test]
    fn test_number_id_maps_to_number_basic() {
        let element = LayoutElement::from_element_id(element_id::NUMBER).expect("known id");
        assert_eq!(element.kind, LayoutKind::NumberBasic);
    }

    #[test]
    fn test_unknown_element_id_is_none() {
        assert_eq!(LayoutElement::from_element_id(42), None);
    }

    #[test]
    fn test_parse_kind_and_page_accept_display_names() {
        assert_eq!("number-basic".parse::<LayoutKind>(), Ok(LayoutKind::NumberBasic));
        assert_eq!("Shift_Locked".parse::<LayoutPage>(), Ok(LayoutPage::ShiftLocked));
        assert!("emoji".parse::<LayoutKind>().is_err());
    }

    #[test]
    fn test_display_joins_kind_and_page() {
        let element = LayoutElement::new(LayoutKind::Symbols, LayoutPage::Shifted);
        assert_eq!(element.to_string(), "symbols/shifted");
    }
}
