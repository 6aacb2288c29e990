//! Locale tags and writing scripts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::LayoutError;

/// A BCP-47-style locale reduced to language, optional script, optional region.
///
/// Parsing accepts `-` or `_` separators (`en-US`, `en_US`, `sr-Latn-RS`) and
/// normalizes case: lower-case language, title-case script, upper-case region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    language: String,
    script: Option<String>,
    region: Option<String>,
}

impl Locale {
    /// Parses a locale tag.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::MalformedRequest`] for an empty tag or a
    /// language subtag that is not 2–3 ASCII letters.
    pub fn parse(tag: &str) -> Result<Self, LayoutError> {
        let mut parts = tag.trim().split(['-', '_']).filter(|p| !p.is_empty());

        let language = parts
            .next()
            .filter(|l| (2..=3).contains(&l.len()) && l.chars().all(|c| c.is_ascii_alphabetic()))
            .ok_or_else(|| LayoutError::MalformedRequest(format!("invalid locale tag: {tag:?}")))?
            .to_ascii_lowercase();

        let mut script = None;
        let mut region = None;
        for part in parts {
            if part.len() == 4 && script.is_none() && region.is_none() {
                let mut chars = part.chars();
                let title: String = chars
                    .next()
                    .map(|c| c.to_ascii_uppercase())
                    .into_iter()
                    .chain(chars.map(|c| c.to_ascii_lowercase()))
                    .collect();
                script = Some(title);
            } else if (part.len() == 2 || part.len() == 3) && region.is_none() {
                region = Some(part.to_ascii_uppercase());
            }
            // Variants and extensions do not affect layout selection.
        }

        Ok(Self {
            language,
            script,
            region,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn script_subtag(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// The same locale without script and region.
    pub fn language_only(&self) -> Self {
        Self {
            language: self.language.clone(),
            script: None,
            region: None,
        }
    }

    pub fn is_language_only(&self) -> bool {
        self.script.is_none() && self.region.is_none()
    }

    /// The writing script: the explicit subtag when present, otherwise the
    /// usual script of the language.
    pub fn script(&self) -> Script {
        self.script
            .as_deref()
            .and_then(Script::from_tag)
            .unwrap_or_else(|| Script::for_language(&self.language))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        if let Some(script) = &self.script {
            write!(f, "-{script}")?;
        }
        if let Some(region) = &self.region {
            write!(f, "-{region}")?;
        }
        Ok(())
    }
}

impl FromStr for Locale {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = LayoutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.to_string()
    }
}

// ── Script ────────────────────────────────────────────────────────────────────

/// Writing scripts with distinct keyboard families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Script {
    #[default]
    Unknown,
    Arabic,
    Armenian,
    Bengali,
    Cyrillic,
    Devanagari,
    Georgian,
    Greek,
    Hebrew,
    Kannada,
    Khmer,
    Lao,
    Latin,
    Malayalam,
    Myanmar,
    Sinhala,
    Tamil,
    Telugu,
    Thai,
}

const SCRIPT_TAGS: [(Script, i32, &str); 19] = [
    (Script::Unknown, -1, ""),
    (Script::Arabic, 0, "Arab"),
    (Script::Armenian, 1, "Armn"),
    (Script::Bengali, 2, "Beng"),
    (Script::Cyrillic, 3, "Cyrl"),
    (Script::Devanagari, 4, "Deva"),
    (Script::Georgian, 5, "Geor"),
    (Script::Greek, 6, "Grek"),
    (Script::Hebrew, 7, "Hebr"),
    (Script::Kannada, 8, "Knda"),
    (Script::Khmer, 9, "Khmr"),
    (Script::Lao, 10, "Laoo"),
    (Script::Latin, 11, "Latn"),
    (Script::Malayalam, 12, "Mlym"),
    (Script::Myanmar, 13, "Mymr"),
    (Script::Sinhala, 14, "Sinh"),
    (Script::Tamil, 15, "Taml"),
    (Script::Telugu, 16, "Telu"),
    (Script::Thai, 17, "Thai"),
];

impl Script {
    /// Stable numeric id; `-1` for [`Script::Unknown`].
    pub fn id(self) -> i32 {
        SCRIPT_TAGS
            .iter()
            .find(|(s, _, _)| *s == self)
            .map_or(-1, |(_, id, _)| *id)
    }

    /// ISO 15924 tag, empty for [`Script::Unknown`].
    pub fn tag(self) -> &'static str {
        SCRIPT_TAGS
            .iter()
            .find(|(s, _, _)| *s == self)
            .map_or("", |(_, _, tag)| tag)
    }

    /// Looks up a script by ISO 15924 tag, case-insensitively.
    pub fn from_tag(tag: &str) -> Option<Self> {
        SCRIPT_TAGS
            .iter()
            .skip(1)
            .find(|(_, _, t)| t.eq_ignore_ascii_case(tag))
            .map(|(s, _, _)| *s)
    }

    /// The default script of a language subtag.
    pub fn for_language(language: &str) -> Self {
        match language {
            "ar" | "fa" | "ur" | "ckb" | "ps" => Self::Arabic,
            "hy" => Self::Armenian,
            "bn" | "as" => Self::Bengali,
            "ru" | "uk" | "be" | "bg" | "mk" | "sr" | "kk" | "ky" | "mn" | "tt" => Self::Cyrillic,
            "hi" | "mr" | "ne" | "new" | "sa" => Self::Devanagari,
            "ka" => Self::Georgian,
            "el" => Self::Greek,
            "he" | "iw" | "yi" => Self::Hebrew,
            "kn" => Self::Kannada,
            "km" => Self::Khmer,
            "lo" => Self::Lao,
            "ml" => Self::Malayalam,
            "my" => Self::Myanmar,
            "si" => Self::Sinhala,
            "ta" => Self::Tamil,
            "te" => Self::Telugu,
            "th" => Self::Thai,
            _ => Self::Latin,
        }
    }

    /// `true` when the script distinguishes upper and lower case.
    pub fn has_letter_case(self) -> bool {
        matches!(
            self,
            Self::Latin | Self::Cyrillic | Self::Greek | Self::Armenian | Self::Georgian
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case_and_separator() {
        let locale = Locale::parse("EN_us").expect("valid tag");
        assert_eq!(locale.language(), "en");
        assert_eq!(locale.region(), Some("US"));
        assert_eq!(locale.to_string(), "en-US");
    }

    #[test]
    fn test_parse_reads_script_subtag() {
        let locale = Locale::parse("sr-latn-rs").expect("valid tag");
        assert_eq!(locale.script_subtag(), Some("Latn"));
        assert_eq!(locale.region(), Some("RS"));
        assert_eq!(locale.script(), Script::Latin);
    }

    #[test]
    fn test_parse_accepts_numeric_region() {
        let locale = Locale::parse("es-419").expect("valid tag");
        assert_eq!(locale.region(), Some("419"));
    }

    #[test]
    fn test_parse_rejects_empty_and_non_alphabetic_language() {
        assert!(Locale::parse("").is_err());
        assert!(Locale::parse("12-US").is_err());
        assert!(Locale::parse("english").is_err());
    }

    #[test]
    fn test_language_only_drops_script_and_region() {
        let locale = Locale::parse("sr-Cyrl-RS").expect("valid tag");
        let bare = locale.language_only();
        assert_eq!(bare.to_string(), "sr");
        assert!(bare.is_language_only());
    }

    #[test]
    fn test_script_defaults_from_language() {
        assert_eq!(Locale::parse("sr").expect("valid").script(), Script::Cyrillic);
        assert_eq!(Locale::parse("fa-IR").expect("valid").script(), Script::Arabic);
        assert_eq!(Locale::parse("de").expect("valid").script(), Script::Latin);
    }

    #[test]
    fn test_script_ids_and_tags() {
        assert_eq!(Script::Unknown.id(), -1);
        assert_eq!(Script::Latin.id(), 11);
        assert_eq!(Script::Thai.tag(), "Thai");
        assert_eq!(Script::from_tag("cyrl"), Some(Script::Cyrillic));
        assert_eq!(Script::from_tag(""), None);
    }

    #[test]
    fn test_locale_serde_uses_tag_string() {
        let locale = Locale::parse("pt-BR").expect("valid tag");
        let json = serde_json::to_string(&locale).expect("serialize");
        assert_eq!(json, "\"pt-BR\"");
        let back: Locale = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, locale);
    }
}
