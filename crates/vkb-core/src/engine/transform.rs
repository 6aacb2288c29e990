//! Row-level transforms driven by request feature flags.
//!
//! [`apply_transforms`] runs them in one fixed order so that any combination
//! of flags composes the same way:
//!
//! 1. number row
//! 2. arrow row
//! 3. alternative period key
//! 4. bottom action key
//! 5. multilingual more-key merge
//!
//! The shift page transform ([`apply_page`]) runs afterwards so merged
//! variants are upper-cased along with their keys.

use tracing::debug;

use super::rows::{KeyRow, RowKey, DEFAULT_CURRENCY};
use crate::definition::schema::{LocaleData, Template, WidthToken};
use crate::domain::element::LayoutPage;
use crate::domain::key::{codes, KeyVisualStyle, MoreKey};
use crate::domain::request::{BottomActionKey, NumberRowMode};

/// Symbols on the shifted digits 1–9 and 0 of a typical hardware keyboard.
const SHIFTED_DIGIT_SYMBOLS: [&str; 10] = [")", "!", "@", "#", "$", "%", "^", "&", "*", "("];

/// Long-press set of the alternative period key.
const ALTERNATIVE_PERIOD_MORE_KEYS: [&str; 3] = ["?", ",", "!"];

/// Languages whose punctuation conventions conflict with the alternative
/// period key.
const ALTERNATIVE_PERIOD_DISALLOWED: [&str; 7] = ["ar", "hi", "ckb", "fa", "new", "hy", "my"];

const COMPACT_NUMBER_ROW_HEIGHT: f64 = 0.75;
const ARROW_ROW_HEIGHT: f64 = 0.8;

/// How to build the number row.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberRowPlan<'a> {
    pub mode: NumberRowMode,
    /// Definition-supplied row replacing the generated digits.
    pub custom: Option<Vec<RowKey>>,
    /// The locale's own glyphs for 0–9.
    pub local_digits: Option<&'a [String]>,
    pub use_local_numbers: bool,
}

/// Every transform to run for one element, already gated by kind and locale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformPlan<'a> {
    pub number_row: Option<NumberRowPlan<'a>>,
    pub arrow_row: bool,
    pub alternative_period_key: bool,
    pub bottom_action_key: Option<BottomActionKey>,
    /// More-key tables, primary locale first, then secondary locales in order.
    pub more_key_sources: Vec<&'a LocaleData>,
}

/// Runs every planned transform in the fixed order.
pub fn apply_transforms(rows: &mut Vec<KeyRow>, plan: &TransformPlan<'_>) {
    if let Some(number_row) = &plan.number_row {
        insert_number_row(rows, number_row);
    }
    if plan.arrow_row {
        append_arrow_row(rows);
    }
    if plan.alternative_period_key {
        substitute_period_key(rows);
    }
    place_bottom_action_key(rows, plan.bottom_action_key);
    merge_locale_more_keys(rows, &plan.more_key_sources);
}

/// Settles templates whose key depends on the layout or locale.
///
/// `optionalzwnj` keys survive only when `use_zwnj_key` is set.  Currency
/// templates take their sign from `currency`, the locale's own sign; a fixed
/// currency equal to it shows `$` instead so no sign appears twice.
pub fn resolve_contextual_keys(rows: &mut [KeyRow], currency: &str, use_zwnj_key: bool) {
    for row in rows.iter_mut() {
        if !use_zwnj_key {
            row.keys.retain(|key| key.template != Some(Template::OptionalZwnj));
        }
        for key in &mut row.keys {
            let sign = match key.template {
                Some(Template::Currency) => currency,
                Some(template) => match template.fixed_currency() {
                    Some(fixed) if fixed == currency => DEFAULT_CURRENCY,
                    Some(fixed) => fixed,
                    None => continue,
                },
                None => continue,
            };
            key.code = codes::for_label(sign);
            key.label = sign.to_string();
        }
    }
}

/// `true` when `language` may use the alternative period key.
pub fn alternative_period_allowed(language: &str) -> bool {
    !ALTERNATIVE_PERIOD_DISALLOWED.contains(&language)
}

// ── Number row ────────────────────────────────────────────────────────────────

fn insert_number_row(rows: &mut Vec<KeyRow>, plan: &NumberRowPlan<'_>) {
    let height = match plan.mode {
        NumberRowMode::Default => COMPACT_NUMBER_ROW_HEIGHT,
        NumberRowMode::Classic => 1.0,
    };

    let keys = match &plan.custom {
        Some(custom) => custom.clone(),
        None => [1, 2, 3, 4, 5, 6, 7, 8, 9, 0]
            .into_iter()
            .map(|digit| digit_key(digit, plan))
            .collect(),
    };

    rows.insert(0, KeyRow::new(keys, height, true));
}

fn digit_key(digit: usize, plan: &NumberRowPlan<'_>) -> RowKey {
    let latin = digit.to_string();
    let local = plan
        .local_digits
        .filter(|glyphs| glyphs.len() == 10)
        .map(|glyphs| glyphs[digit].as_str());

    let mut key = match local {
        Some(local) if plan.use_local_numbers => {
            let mut key = RowKey::letter(local);
            key.merge_more_keys([latin.as_str()]);
            key
        }
        Some(local) => {
            let mut key = RowKey::letter(latin.as_str());
            key.merge_more_keys([local]);
            key
        }
        None => RowKey::letter(latin.as_str()),
    };

    if plan.mode == NumberRowMode::Default {
        let symbol = SHIFTED_DIGIT_SYMBOLS[digit];
        key.hint = symbol.to_string();
        key.more_keys.insert(0, MoreKey::from_label(symbol));
    }
    key
}

// ── Arrow row ─────────────────────────────────────────────────────────────────

fn append_arrow_row(rows: &mut Vec<KeyRow>) {
    let arrows = [
        (codes::ARROW_UP, "↑"),
        (codes::ARROW_DOWN, "↓"),
        (codes::ARROW_LEFT, "←"),
        (codes::ARROW_RIGHT, "→"),
    ];
    let keys = arrows
        .into_iter()
        .map(|(code, label)| RowKey {
            code,
            width: WidthToken::Grow,
            style: KeyVisualStyle::NoBackground,
            repeatable: true,
            ..RowKey::letter(label)
        })
        .collect();
    rows.push(KeyRow::new(keys, ARROW_ROW_HEIGHT, false));
}

// ── Alternative period key ────────────────────────────────────────────────────

fn substitute_period_key(rows: &mut [KeyRow]) {
    let period = rows
        .iter_mut()
        .rev()
        .flat_map(|row| row.keys.iter_mut())
        .find(|key| key.template == Some(Template::Period) || key.code == codes::PERIOD);

    match period {
        Some(key) => {
            key.code = codes::PERIOD;
            key.label = ".".to_string();
            key.more_keys.clear();
            key.merge_more_keys(ALTERNATIVE_PERIOD_MORE_KEYS);
            key.fast_long_press = true;
        }
        None => debug!("alternative period key requested but layout has no period key"),
    }
}

// ── Bottom action key ─────────────────────────────────────────────────────────

fn place_bottom_action_key(rows: &mut [KeyRow], action: Option<BottomActionKey>) {
    let Some(action) = action else {
        for row in rows.iter_mut() {
            row.keys.retain(|k| !k.is_placeholder());
        }
        return;
    };

    let key = RowKey {
        code: action.code(),
        style: KeyVisualStyle::Functional,
        ..RowKey::letter(action.label())
    };

    let placeholder = rows.iter().enumerate().rev().find_map(|(r, row)| {
        row.keys.iter().position(RowKey::is_placeholder).map(|c| (r, c))
    });
    if let Some((r, c)) = placeholder {
        rows[r].keys[c] = key;
        for row in rows.iter_mut() {
            row.keys.retain(|k| !k.is_placeholder());
        }
        return;
    }

    let enter = rows.iter().enumerate().rev().find_map(|(r, row)| {
        row.keys.iter().position(|k| k.code == codes::ENTER).map(|c| (r, c))
    });
    if let Some((r, c)) = enter {
        rows[r].keys.insert(c, key);
    } else if let Some(last) = rows.last_mut() {
        last.keys.push(key);
    }
}

// ── Multilingual more-keys ────────────────────────────────────────────────────

fn merge_locale_more_keys(rows: &mut [KeyRow], sources: &[&LocaleData]) {
    for source in sources {
        for key in rows.iter_mut().flat_map(|row| row.keys.iter_mut()) {
            if !key.is_letter() {
                continue;
            }
            if let Some(variants) = source.more_keys.get(&key.label) {
                key.merge_more_keys(variants.iter().map(String::as_str));
            }
        }
    }
}

// ── Shift pages ───────────────────────────────────────────────────────────────

/// Applies the shift state of `page` to letters and the shift key.
///
/// Letters are upper-cased only when `has_letter_case`; `language` selects
/// locale-specific case mappings.
pub fn apply_page(rows: &mut [KeyRow], page: LayoutPage, language: &str, has_letter_case: bool) {
    let (shift_style, shift_label) = match page {
        LayoutPage::Base => (KeyVisualStyle::StickyOff, None),
        LayoutPage::Shifted | LayoutPage::ManuallyShifted => (KeyVisualStyle::StickyOn, None),
        LayoutPage::ShiftLocked => (KeyVisualStyle::StickyOn, Some("⇪")),
        LayoutPage::Alt0 | LayoutPage::Alt1 | LayoutPage::Alt2 | LayoutPage::Alt3 => return,
    };

    for key in rows.iter_mut().flat_map(|row| row.keys.iter_mut()) {
        if key.template == Some(Template::Shift) {
            key.style = shift_style;
            if let Some(label) = shift_label {
                key.label = label.to_string();
            }
        } else if page.is_shifted() && has_letter_case && key.is_letter() {
            upper_case_key(key, language);
        }
    }
}

fn upper_case_key(key: &mut RowKey, language: &str) {
    if let Some(upper) = upper_case_letter(&key.label, language) {
        key.code = codes::for_label(&upper);
        key.label = upper;
    }
    for more in &mut key.more_keys {
        if let Some(upper) = upper_case_letter(&more.label, language) {
            *more = MoreKey::from_label(upper);
        }
    }
}

/// Upper case of a one-letter label, when it is itself one letter.
fn upper_case_letter(label: &str, language: &str) -> Option<String> {
    if label == "i" && matches!(language, "tr" | "az") {
        return Some("İ".to_string());
    }
    let upper = label.to_uppercase();
    (upper.chars().count() == 1 && upper != label).then_some(upper)
}
