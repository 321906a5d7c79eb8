/// The key combination value object.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::codes::{self, KeyCode, NO_CODE};
use super::errors::ComboError;
use super::flags::Modifiers;
use super::layout::KeyboardLayout;
use super::render::{Renderer, glyphs_for_modifiers};
use crate::validate::MenuItem;

/// Mapping key for the key code.
pub const KEY_CODE_KEY: &str = "keyCode";
/// Mapping key for the key-equivalent character.
pub const KEY_EQUIVALENT_KEY: &str = "keyEquivalent";
/// Mapping key for the modifier flags (toolkit encoding).
pub const MODIFIER_FLAGS_KEY: &str = "modifierFlags";

/// An immutable (modifiers, key code, key equivalent) triple.
///
/// The key equivalent is present exactly when the key code is. The empty
/// combination (no code) may still carry modifiers, as a recorder does while
/// modifiers are held but no key has been pressed yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "ComboRecord", into = "ComboRecord")]
pub struct KeyCombo {
    modifiers: Modifiers,
    key_code: Option<KeyCode>,
    key_equivalent: Option<String>,
}

/// Persisted shape of a [`KeyCombo`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComboRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key_equivalent: Option<String>,
    #[serde(default)]
    modifier_flags: u64,
}

impl TryFrom<ComboRecord> for KeyCombo {
    type Error = ComboError;

    fn try_from(record: ComboRecord) -> Result<Self, Self::Error> {
        let modifiers = Modifiers::from_toolkit(record.modifier_flags);
        match record.key_code {
            None | Some(NO_CODE) => Ok(Self::empty_with_modifiers(modifiers)),
            Some(code) => Self::new(
                code,
                record.key_equivalent.as_deref().unwrap_or_default(),
                modifiers,
            ),
        }
    }
}

impl From<KeyCombo> for ComboRecord {
    fn from(combo: KeyCombo) -> Self {
        Self {
            key_code: combo.key_code.map(i64::from),
            key_equivalent: combo.key_equivalent,
            modifier_flags: combo.modifiers.to_toolkit(),
        }
    }
}

impl KeyCombo {
    /// The empty combination: no code, no modifiers.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// No code, but some modifiers held.
    #[must_use]
    pub fn empty_with_modifiers(modifiers: Modifiers) -> Self {
        Self {
            modifiers,
            ..Self::default()
        }
    }

    /// Construct from a raw key code, its key equivalent and modifiers.
    ///
    /// A code of `-1` yields the empty combination and ignores `key_equivalent`.
    ///
    /// # Errors
    ///
    /// - `ComboError::InvalidKeyCode` if the code is negative or above `u16::MAX`.
    /// - `ComboError::MissingKeyEquivalent` if a real code has an empty key equivalent.
    pub fn new(code: i64, key_equivalent: &str, modifiers: Modifiers) -> Result<Self, ComboError> {
        if code == NO_CODE {
            return Ok(Self::empty_with_modifiers(modifiers));
        }
        let key_code = codes::key_code_from_raw(code).ok_or(ComboError::InvalidKeyCode(code))?;
        if key_equivalent.is_empty() {
            return Err(ComboError::MissingKeyEquivalent { code });
        }
        Ok(Self {
            modifiers,
            key_code: Some(key_code),
            key_equivalent: Some(key_equivalent.to_owned()),
        })
    }

    /// Construct from a key code, deriving the key equivalent from `layout`.
    ///
    /// Special keys use the menu key-equivalent character; printable keys use
    /// the unshifted layout character.
    ///
    /// # Errors
    ///
    /// Returns `ComboError::MissingKeyEquivalent` if the key types nothing on
    /// this layout and is not a special key.
    pub fn from_key_code(
        code: KeyCode,
        modifiers: Modifiers,
        layout: &dyn KeyboardLayout,
    ) -> Result<Self, ComboError> {
        let key_equivalent = codes::menu_key_equivalent_for_special(code)
            .or_else(|| layout.character(code, Modifiers::empty()))
            .ok_or(ComboError::MissingKeyEquivalent {
                code: i64::from(code),
            })?;
        Self::new(i64::from(code), &key_equivalent, modifiers)
    }

    /// Parse human notation: `cmd+shift+s`, `ctrl+option+space`, `⇧⌘S`, `cmd++`.
    ///
    /// Letters are case-insensitive. Symbols that need Shift on the layout
    /// (`!`, `?`) add Shift to the modifiers.
    ///
    /// # Errors
    ///
    /// Returns `ComboError` for unknown modifier or key names, or a missing key.
    pub fn parse(input: &str, layout: &dyn KeyboardLayout) -> Result<Self, ComboError> {
        let trimmed = input.trim();
        let (mods_part, key_part) = match trimmed.rsplit_once('+') {
            // "cmd++" and "+" both mean the plus key.
            Some((head, "")) if head.is_empty() || head.ends_with('+') => {
                (head.strip_suffix('+').unwrap_or(head), "+")
            }
            Some((_, "")) => return Err(ComboError::MissingKey(input.to_owned())),
            Some((head, tail)) => (head, tail),
            None => ("", trimmed),
        };

        let mut modifiers = Modifiers::empty();
        for name in mods_part.split('+').filter(|s| !s.trim().is_empty()) {
            modifiers |= Modifiers::from_modifier_name(name)
                .ok_or_else(|| ComboError::UnknownModifier(name.trim().to_owned()))?;
        }

        // Leading glyphs: "⇧⌘S".
        let mut key = key_part.trim();
        while let Some(first) = key.chars().next() {
            if key.chars().count() == 1 {
                break;
            }
            match Modifiers::from_modifier_name(&first.to_string()) {
                Some(m) => {
                    modifiers |= m;
                    key = &key[first.len_utf8()..];
                }
                None => break,
            }
        }

        if key.is_empty() {
            return Err(ComboError::MissingKey(input.to_owned()));
        }

        if let Some(code) = codes::key_code_for_name(key) {
            return Self::from_key_code(code, modifiers, layout);
        }

        let mut chars = key.chars();
        let (Some(ch), None) = (chars.next(), chars.next()) else {
            return Err(ComboError::UnknownKey(key.to_owned()));
        };
        if let Some(code) = codes::key_code_for_glyph(ch) {
            return Self::from_key_code(code, modifiers, layout);
        }
        let lookup = if ch.is_alphabetic() {
            ch.to_lowercase().next().unwrap_or(ch)
        } else {
            ch
        };
        let (code, implied) = layout
            .key_code_for_char(lookup)
            .ok_or_else(|| ComboError::UnknownKey(key.to_owned()))?;
        Self::from_key_code(code, modifiers | implied, layout)
    }

    /// Deserialize from a string-keyed mapping.
    ///
    /// A missing `keyCode` (or `-1`) yields the empty combination. Returns
    /// `None` for wrong-typed fields, out-of-range codes, or a
    /// real code without `keyEquivalent`.
    #[must_use]
    pub fn from_mapping(mapping: &Map<String, Value>) -> Option<Self> {
        serde_json::from_value(Value::Object(mapping.clone())).ok()
    }

    /// Serialize to a string-keyed mapping.
    #[must_use]
    pub fn to_mapping(&self) -> Map<String, Value> {
        let mut map = Map::new();
        if let (Some(code), Some(key_equivalent)) = (self.key_code, &self.key_equivalent) {
            map.insert(KEY_CODE_KEY.to_owned(), Value::from(code));
            map.insert(
                KEY_EQUIVALENT_KEY.to_owned(),
                Value::from(key_equivalent.as_str()),
            );
        }
        map.insert(
            MODIFIER_FLAGS_KEY.to_owned(),
            Value::from(self.modifiers.to_toolkit()),
        );
        map
    }

    /// Canonical modifier set.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Modifiers in the toolkit encoding.
    #[must_use]
    pub fn toolkit_flags(&self) -> u64 {
        self.modifiers.to_toolkit()
    }

    /// Modifiers in the legacy encoding.
    #[must_use]
    pub fn legacy_flags(&self) -> u64 {
        self.modifiers.to_legacy()
    }

    /// Key code, or `-1` when there is none.
    #[must_use]
    pub fn key_code(&self) -> i64 {
        self.key_code.map_or(NO_CODE, i64::from)
    }

    /// Key code, or `None` when there is none.
    #[must_use]
    pub fn code(&self) -> Option<KeyCode> {
        self.key_code
    }

    /// Key-equivalent character, or `""` when there is no code.
    #[must_use]
    pub fn key_equivalent(&self) -> &str {
        self.key_equivalent.as_deref().unwrap_or_default()
    }

    /// Whether there is no key code.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.key_code.is_none()
    }

    /// Glyph rendering (`⇧⌘S`).
    ///
    /// Uses the key equivalent for printable keys and falls back to the key
    /// code rendering for special keys or when there is no key equivalent.
    #[must_use]
    pub fn string(&self, renderer: &Renderer<'_>) -> String {
        let key = match (self.key_code, &self.key_equivalent) {
            (Some(code), Some(ke)) if !codes::is_special_key(code) => ke.to_uppercase(),
            _ => renderer.string_for_key_code(self.key_code()),
        };
        format!("{}{key}", glyphs_for_modifiers(self.modifiers))
    }

    /// Characters typed: the key equivalent, or the layout character.
    #[must_use]
    pub fn characters(&self, renderer: &Renderer<'_>) -> String {
        match &self.key_equivalent {
            Some(ke) => ke.clone(),
            None => renderer.character_for_key_code(self.key_code(), self.modifiers),
        }
    }

    /// Give `item` this combination as its key equivalent and modifier mask.
    pub fn configure_menu_item(&self, item: &mut MenuItem) {
        item.configure_with_key_combo(self);
    }

    /// Whether `code` is a special key (F-keys, navigation, editing, space).
    #[must_use]
    pub fn is_special_or_function_key(code: i64) -> bool {
        codes::key_code_from_raw(code).is_some_and(codes::is_special_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::codes::{KEY_F5, KEY_SPACE};
    use crate::keys::flags::{TOOLKIT_COMMAND, TOOLKIT_SHIFT};
    use crate::keys::l10n::Strings;
    use crate::keys::layout::UsAnsiLayout;

    fn cmd_s() -> KeyCombo {
        KeyCombo::new(1, "s", Modifiers::COMMAND).unwrap()
    }

    #[test]
    fn test_new_validates_code() {
        assert_eq!(
            KeyCombo::new(-5, "s", Modifiers::empty()),
            Err(ComboError::InvalidKeyCode(-5))
        );
        assert_eq!(
            KeyCombo::new(1, "", Modifiers::COMMAND),
            Err(ComboError::MissingKeyEquivalent { code: 1 })
        );
        let empty = KeyCombo::new(NO_CODE, "ignored", Modifiers::SHIFT).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.key_equivalent(), "");
        assert_eq!(empty.modifiers(), Modifiers::SHIFT);
    }

    #[test]
    fn test_mapping_round_trip() {
        let combo = cmd_s();
        let map = combo.to_mapping();
        assert_eq!(map[KEY_CODE_KEY], Value::from(1));
        assert_eq!(map[KEY_EQUIVALENT_KEY], Value::from("s"));
        assert_eq!(map[MODIFIER_FLAGS_KEY], Value::from(TOOLKIT_COMMAND));
        assert_eq!(KeyCombo::from_mapping(&map), Some(combo));

        let empty = KeyCombo::empty_with_modifiers(Modifiers::OPTION);
        assert_eq!(KeyCombo::from_mapping(&empty.to_mapping()), Some(empty));
    }

    #[test]
    fn test_mapping_without_key_code_is_empty() {
        let mut map = Map::new();
        map.insert(MODIFIER_FLAGS_KEY.to_owned(), Value::from(TOOLKIT_SHIFT));
        let combo = KeyCombo::from_mapping(&map).unwrap();
        assert_eq!(combo.key_code(), NO_CODE);
        assert_eq!(combo.key_equivalent(), "");

        let combo = KeyCombo::from_mapping(&Map::new()).unwrap();
        assert_eq!(combo, KeyCombo::empty());
    }

    #[test]
    fn test_malformed_mapping_is_none() {
        let mut map = Map::new();
        map.insert(KEY_CODE_KEY.to_owned(), Value::from("one"));
        assert_eq!(KeyCombo::from_mapping(&map), None);

        let mut map = Map::new();
        map.insert(KEY_CODE_KEY.to_owned(), Value::from(1));
        assert_eq!(KeyCombo::from_mapping(&map), None, "missing key equivalent");

        let mut map = cmd_s().to_mapping();
        map.insert(MODIFIER_FLAGS_KEY.to_owned(), Value::from(-1));
        assert_eq!(KeyCombo::from_mapping(&map), None);

        let mut map = cmd_s().to_mapping();
        map.insert(KEY_CODE_KEY.to_owned(), Value::from(70_000));
        assert_eq!(KeyCombo::from_mapping(&map), None);
    }

    #[test]
    fn test_equality_across_construction_paths() {
        let direct = cmd_s();
        let mut map = Map::new();
        map.insert(KEY_CODE_KEY.to_owned(), Value::from(1));
        map.insert(KEY_EQUIVALENT_KEY.to_owned(), Value::from("s"));
        map.insert(MODIFIER_FLAGS_KEY.to_owned(), Value::from(TOOLKIT_COMMAND));
        assert_eq!(KeyCombo::from_mapping(&map), Some(direct.clone()));
        assert_eq!(KeyCombo::parse("cmd+s", &UsAnsiLayout), Ok(direct));
        assert_ne!(cmd_s(), KeyCombo::new(1, "S", Modifiers::COMMAND).unwrap());
    }

    #[test]
    fn test_parse_variants() {
        let layout = UsAnsiLayout;
        let combo = KeyCombo::parse("Cmd+Shift+S", &layout).unwrap();
        assert_eq!(combo.modifiers(), Modifiers::COMMAND | Modifiers::SHIFT);
        assert_eq!(combo.key_code(), 1);
        assert_eq!(combo.key_equivalent(), "s");

        assert_eq!(KeyCombo::parse("⇧⌘S", &layout).unwrap(), combo);

        let plus = KeyCombo::parse("cmd++", &layout).unwrap();
        assert_eq!(plus.key_code(), 24);
        assert_eq!(plus.modifiers(), Modifiers::COMMAND | Modifiers::SHIFT);

        let space = KeyCombo::parse("ctrl+space", &layout).unwrap();
        assert_eq!(space.key_code(), i64::from(KEY_SPACE));
        assert_eq!(space.key_equivalent(), " ");

        let f5 = KeyCombo::parse("f5", &layout).unwrap();
        assert_eq!(f5.key_code(), i64::from(KEY_F5));
        assert!(f5.modifiers().is_empty());

        assert_eq!(
            KeyCombo::parse("hyper+s", &layout),
            Err(ComboError::UnknownModifier("hyper".to_owned()))
        );
        let left = KeyCombo::parse("⌥⌘←", &layout).unwrap();
        assert_eq!(left.key_code(), i64::from(crate::keys::codes::KEY_LEFT_ARROW));
        assert_eq!(left.modifiers(), Modifiers::OPTION | Modifiers::COMMAND);
        assert_eq!(KeyCombo::parse("cmd+↩", &layout).unwrap().key_code(), 36);

        assert!(matches!(
            KeyCombo::parse("cmd+banana", &layout),
            Err(ComboError::UnknownKey(_))
        ));
        assert!(matches!(
            KeyCombo::parse("cmd+", &layout),
            Err(ComboError::MissingKey(_))
        ));
    }

    #[test]
    fn test_string_and_characters() {
        let layout = UsAnsiLayout;
        let strings = Strings::default();
        let renderer = Renderer::new(&layout, &strings);

        let combo = KeyCombo::parse("cmd+shift+s", &layout).unwrap();
        assert_eq!(combo.string(&renderer), "⇧⌘S");
        assert_eq!(combo.characters(&renderer), "s");

        let f5 = KeyCombo::parse("opt+f5", &layout).unwrap();
        assert_eq!(f5.string(&renderer), "⌥F5");

        assert_eq!(KeyCombo::empty_with_modifiers(Modifiers::COMMAND).string(&renderer), "⌘");
    }

    #[test]
    fn test_serde_json_shape() {
        let json = serde_json::to_string(&cmd_s()).unwrap();
        assert_eq!(
            json,
            format!(r#"{{"keyCode":1,"keyEquivalent":"s","modifierFlags":{TOOLKIT_COMMAND}}}"#)
        );
    }

    #[test]
    fn test_configure_menu_item() {
        let mut item = MenuItem::new("Save");
        cmd_s().configure_menu_item(&mut item);
        assert_eq!(item.shortcut(), Some(("s".to_owned(), Modifiers::COMMAND)));
    }

    #[test]
    fn test_special_key_classification() {
        assert!(KeyCombo::is_special_or_function_key(i64::from(KEY_F5)));
        assert!(!KeyCombo::is_special_or_function_key(1));
        assert!(!KeyCombo::is_special_or_function_key(NO_CODE));
    }
}
