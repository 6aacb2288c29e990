//! Expansion of declarative rows into concrete, still unpositioned keys.

use crate::definition::schema::{KeyObject, KeySpec, RowSpec, Template, WidthToken};
use crate::domain::key::{codes, ActionFlags, KeyCode, KeyVisualStyle, LabelFlags, MoreKey};
use crate::domain::request::{EditorAction, KeyboardMode};

/// Currency sign used when the locale names none.
pub const DEFAULT_CURRENCY: &str = "$";

/// A key with its attributes resolved but no geometry yet.
#[derive(Debug, Clone, PartialEq)]
pub struct RowKey {
    pub code: KeyCode,
    pub label: String,
    pub hint: String,
    pub more_keys: Vec<MoreKey>,
    pub width: WidthToken,
    pub style: KeyVisualStyle,
    pub anchored: bool,
    pub repeatable: bool,
    pub fast_long_press: bool,
    /// Occupies width but produces no key.
    pub spacer: bool,
    pub template: Option<Template>,
}

impl RowKey {
    /// A regular-width printable key whose code follows its label.
    pub fn letter(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            code: codes::for_label(&label),
            label,
            hint: String::new(),
            more_keys: Vec::new(),
            width: WidthToken::Regular,
            style: KeyVisualStyle::Normal,
            anchored: false,
            repeatable: false,
            fast_long_press: false,
            spacer: false,
            template: None,
        }
    }

    /// Template preset before any per-key overrides.
    pub fn from_template(template: Template, action: EditorAction) -> Self {
        let (code, label, width, style) = match template {
            Template::Shift => (codes::SHIFT, "⇧", WidthToken::Functional, KeyVisualStyle::StickyOff),
            Template::Delete => (codes::DELETE, "⌫", WidthToken::Functional, KeyVisualStyle::Functional),
            Template::Space => (codes::SPACE, "space", WidthToken::Grow, KeyVisualStyle::Spacebar),
            Template::Enter => (codes::ENTER, action.enter_label(), WidthToken::Functional, KeyVisualStyle::Action),
            Template::Symbols => (codes::SWITCH_ALPHA_SYMBOL, "?123", WidthToken::Functional, KeyVisualStyle::Functional),
            Template::Alphabet => (codes::SWITCH_ALPHA_SYMBOL, "ABC", WidthToken::Functional, KeyVisualStyle::Functional),
            Template::Period => (codes::PERIOD, ".", WidthToken::Regular, KeyVisualStyle::Normal),
            Template::Comma => (codes::COMMA, ",", WidthToken::Regular, KeyVisualStyle::Normal),
            Template::Action => (codes::UNSPECIFIED, "", WidthToken::Regular, KeyVisualStyle::Functional),
            Template::Gap => (codes::UNSPECIFIED, "", WidthToken::Regular, KeyVisualStyle::NoBackground),
            Template::Emoji => (codes::EMOJI, "☺", WidthToken::Functional, KeyVisualStyle::Functional),
            Template::Number => (codes::SWITCH_NUMBER_LAYOUT, "123", WidthToken::Regular, KeyVisualStyle::Normal),
            Template::Alt0 => (codes::SWITCH_ALT_0, "0", WidthToken::Functional, KeyVisualStyle::Functional),
            Template::Alt1 => (codes::SWITCH_ALT_1, "1", WidthToken::Functional, KeyVisualStyle::Functional),
            Template::Alt2 => (codes::SWITCH_ALT_2, "2", WidthToken::Functional, KeyVisualStyle::Functional),
            Template::Zwnj | Template::OptionalZwnj => {
                (codes::ZWNJ, "ZWNJ", WidthToken::Regular, KeyVisualStyle::Normal)
            }
            Template::Currency => (codes::for_label(DEFAULT_CURRENCY), DEFAULT_CURRENCY, WidthToken::Regular, KeyVisualStyle::Normal),
            Template::Currency1 | Template::Currency2 | Template::Currency3 | Template::Currency4 => {
                let sign = template.fixed_currency().unwrap_or(DEFAULT_CURRENCY);
                (codes::for_label(sign), sign, WidthToken::Regular, KeyVisualStyle::Normal)
            }
        };
        let more_keys = match template {
            Template::Zwnj | Template::OptionalZwnj => vec![MoreKey {
                code: codes::ZWJ,
                label: "ZWJ".to_string(),
            }],
            _ => Vec::new(),
        };
        Self {
            code,
            label: label.to_string(),
            width,
            style,
            anchored: matches!(template, Template::Shift | Template::Delete),
            repeatable: template == Template::Delete,
            spacer: template == Template::Gap,
            more_keys,
            template: Some(template),
            ..Self::letter("")
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.template == Some(Template::Action)
    }

    pub fn is_letter(&self) -> bool {
        !self.spacer && self.template.is_none() && self.label.chars().count() == 1
            && self.label.chars().all(char::is_alphabetic)
    }

    pub fn action_flags(&self) -> ActionFlags {
        let mut flags = ActionFlags::empty();
        if self.repeatable {
            flags |= ActionFlags::IS_REPEATABLE;
        }
        if codes::is_functional(self.code) || self.code == codes::SPACE || self.code == codes::ENTER {
            flags |= ActionFlags::NO_KEY_PREVIEW;
        }
        if !self.more_keys.is_empty() {
            flags |= ActionFlags::ENABLE_LONG_PRESS;
        }
        flags
    }

    pub fn label_flags(&self) -> LabelFlags {
        let mut flags = if self.label.chars().count() > 1 {
            LabelFlags::AUTO_X_SCALE | LabelFlags::FOLLOW_KEY_LABEL_RATIO
        } else {
            LabelFlags::FOLLOW_KEY_LETTER_RATIO
        };
        if !self.hint.is_empty() {
            flags |= LabelFlags::HAS_HINT_LABEL;
        }
        flags
    }

    /// Appends `variants` to the more-keys, skipping codes already present.
    pub fn merge_more_keys<'a>(&mut self, variants: impl IntoIterator<Item = &'a str>) {
        for variant in variants {
            let more = MoreKey::from_label(variant);
            if more.code != self.code && !self.more_keys.iter().any(|m| m.code == more.code) {
                self.more_keys.push(more);
            }
        }
    }
}

/// A row of expanded keys.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyRow {
    pub keys: Vec<RowKey>,
    /// Multiple of the regular row height.
    pub height: f64,
    pub splittable: bool,
}

impl KeyRow {
    pub fn new(keys: Vec<RowKey>, height: f64, splittable: bool) -> Self {
        Self {
            keys,
            height,
            splittable,
        }
    }
}

/// Expands one key entry; `None` when the key does not exist in `mode`.
pub fn expand_key(spec: &KeySpec, mode: KeyboardMode, action: EditorAction) -> Option<RowKey> {
    match spec {
        KeySpec::Label(label) => Some(RowKey::letter(label.clone())),
        KeySpec::Object(obj) => expand_object(obj, mode, action),
    }
}

fn expand_object(obj: &KeyObject, mode: KeyboardMode, action: EditorAction) -> Option<RowKey> {
    if let Some(modes) = &obj.modes {
        if !modes.contains(&mode) {
            return None;
        }
    }

    let mut key = match obj.template {
        Some(template) => RowKey::from_template(template, action),
        None => RowKey::letter(obj.label.clone().unwrap_or_default()),
    };

    if let Some(label) = &obj.label {
        key.label = label.clone();
    }
    if let Some(code) = obj.code {
        key.code = code;
    }
    if let Some(hint) = &obj.hint {
        key.hint = hint.clone();
    }
    if let Some(width) = obj.width {
        key.width = width;
    }
    if let Some(style) = obj.style {
        key.style = style;
    }
    if let Some(anchored) = obj.anchored {
        key.anchored = anchored;
    }
    if let Some(repeatable) = obj.repeatable {
        key.repeatable = repeatable;
    }
    if let Some(fast) = obj.fast_long_press {
        key.fast_long_press = fast;
    }
    key.merge_more_keys(obj.more_keys.iter().map(String::as_str));

    // A key with nothing to show or send is an empty cell.
    if key.template.is_none() && key.label.is_empty() && key.code == codes::UNSPECIFIED {
        key.spacer = true;
    }
    Some(key)
}

/// Expands every row of a definition for `mode`.
pub fn expand_rows(rows: &[RowSpec], mode: KeyboardMode, action: EditorAction) -> Vec<KeyRow> {
    rows.iter()
        .map(|row| {
            let keys = row
                .keys()
                .iter()
                .filter_map(|spec| expand_key(spec, mode, action))
                .collect();
            KeyRow::new(keys, row.height(), row.splittable())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(json: &str) -> KeySpec {
        serde_json::from_str(json).expect("valid key json")
    }

    #[test]
    fn test_label_expands_to_regular_letter() {
        let key = expand_key(&KeySpec::Label("q".into()), KeyboardMode::Text, EditorAction::None)
            .expect("present");
        assert_eq!(key.code, 'q' as KeyCode);
        assert_eq!(key.width, WidthToken::Regular);
        assert!(key.is_letter());
    }

    #[test]
    fn test_template_overrides_apply() {
        // Arrange
        let spec = object(r#"{ "template": "delete", "width": "regular", "anchored": false }"#);

        // Act
        let key = expand_key(&spec, KeyboardMode::Text, EditorAction::None).expect("present");

        // Assert
        assert_eq!(key.code, codes::DELETE);
        assert_eq!(key.width, WidthToken::Regular);
        assert!(!key.anchored);
        assert!(key.repeatable);
        assert!(key.action_flags().contains(ActionFlags::IS_REPEATABLE));
    }

    #[test]
    fn test_enter_label_follows_editor_action() {
        let spec = object(r#"{ "template": "enter" }"#);
        let key = expand_key(&spec, KeyboardMode::Text, EditorAction::Search).expect("present");
        assert_eq!(key.label, "Search");
        assert_eq!(key.code, codes::ENTER);
    }

    #[test]
    fn test_mode_filter_drops_key_outside_its_modes() {
        let spec = object(r#"{ "label": "@", "modes": ["email"] }"#);
        assert!(expand_key(&spec, KeyboardMode::Text, EditorAction::None).is_none());
        assert!(expand_key(&spec, KeyboardMode::Email, EditorAction::None).is_some());
    }

    #[test]
    fn test_empty_object_becomes_spacer() {
        let key = expand_key(&object("{}"), KeyboardMode::Text, EditorAction::None).expect("present");
        assert!(key.spacer);
    }

    #[test]
    fn test_alt_templates_switch_to_alt_pages() {
        // Arrange
        let specs = [
            object(r#"{ "template": "alt0" }"#),
            object(r#"{ "template": "alt1" }"#),
            object(r#"{ "template": "alt2" }"#),
            object(r#"{ "template": "number" }"#),
        ];

        // Act
        let switches: Vec<_> = specs
            .iter()
            .filter_map(|spec| expand_key(spec, KeyboardMode::Text, EditorAction::None))
            .map(|key| key.code)
            .collect();

        // Assert
        assert_eq!(
            switches,
            vec![codes::SWITCH_ALT_0, codes::SWITCH_ALT_1, codes::SWITCH_ALT_2, codes::SWITCH_NUMBER_LAYOUT]
        );
    }

    #[test]
    fn test_optionalzwnj_template_name_parses() {
        let key = expand_key(&object(r#"{ "template": "optionalzwnj" }"#), KeyboardMode::Text, EditorAction::None)
            .expect("present");
        assert_eq!(key.template, Some(Template::OptionalZwnj));
        assert_eq!(key.code, codes::ZWNJ);
    }

    #[test]
    fn test_gap_template_is_spacer() {
        let key = RowKey::from_template(Template::Gap, EditorAction::None);
        assert!(key.spacer);
    }

    #[test]
    fn test_merge_more_keys_dedups_by_code_first_wins() {
        // Arrange
        let mut key = RowKey::letter("a");
        key.merge_more_keys(["á", "ä"]);

        // Act
        key.merge_more_keys(["ä", "a", "æ"]);

        // Assert
        let labels: Vec<_> = key.more_keys.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["á", "ä", "æ"]);
    }

    #[test]
    fn test_multi_char_label_auto_scales() {
        let key = RowKey::from_template(Template::Symbols, EditorAction::None);
        assert!(key.label_flags().contains(LabelFlags::AUTO_X_SCALE));
        assert!(key.action_flags().contains(ActionFlags::NO_KEY_PREVIEW));
    }

    #[test]
    fn test_expand_rows_keeps_row_attributes() {
        let rows: Vec<RowSpec> = serde_json::from_str(
            r#"[["a", "b"], { "keys": ["c"], "height": 0.5, "splittable": false }]"#,
        )
        .expect("valid rows");
        let expanded = expand_rows(&rows, KeyboardMode::Text, EditorAction::None);
        assert_eq!(expanded.len(), 2);
        assert_eq!(expanded[0].keys.len(), 2);
        assert_eq!(expanded[1].height, 0.5);
        assert!(!expanded[1].splittable);
    }
}
