/// Localization table for spelled-out modifier names and conflict messages.
///
/// Glyph rendering bypasses this table; only readable strings and messages
/// are looked up here.
use std::collections::HashMap;

pub const MODIFIER_COMMAND: &str = "modifier.command";
pub const MODIFIER_OPTION: &str = "modifier.option";
pub const MODIFIER_CONTROL: &str = "modifier.control";
pub const MODIFIER_SHIFT: &str = "modifier.shift";
pub const KEY_SPACE: &str = "key.space";
pub const READABLE_SEPARATOR: &str = "readable.separator";
pub const CONFLICT_POLICY: &str = "conflict.policy";
pub const CONFLICT_SYSTEM: &str = "conflict.system";
pub const CONFLICT_MENU: &str = "conflict.menu";
pub const REJECT_REQUIRED: &str = "reject.required_modifiers";
pub const REJECT_BARE_KEY: &str = "reject.bare_key";
pub const REJECT_FLAGS: &str = "reject.invalid_modifiers";

const DEFAULTS: &[(&str, &str)] = &[
    (MODIFIER_COMMAND, "Command"),
    (MODIFIER_OPTION, "Option"),
    (MODIFIER_CONTROL, "Control"),
    (MODIFIER_SHIFT, "Shift"),
    (KEY_SPACE, "Space"),
    (READABLE_SEPARATOR, " + "),
    (CONFLICT_POLICY, "The key combination \"{combo}\" can't be used: {reason}"),
    (
        CONFLICT_SYSTEM,
        "The key combination \"{combo}\" can't be used because it's already used by a \
         system-wide keyboard shortcut ({function}).",
    ),
    (
        CONFLICT_MENU,
        "The key combination \"{combo}\" can't be used because it's already used by the \
         menu item \"{title}\".",
    ),
    (
        REJECT_REQUIRED,
        "The key combination \"{combo}\" is missing required modifier keys.",
    ),
    (
        REJECT_BARE_KEY,
        "The key combination \"{combo}\" needs at least one modifier key.",
    ),
    (
        REJECT_FLAGS,
        "The modifier keys of \"{combo}\" are not accepted.",
    ),
];

/// A string table keyed by fixed identifiers.
#[derive(Debug, Clone)]
pub struct Strings {
    table: HashMap<String, String>,
}

impl Default for Strings {
    fn default() -> Self {
        Self {
            table: DEFAULTS
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        }
    }
}

impl Strings {
    /// Built-in English table with `overrides` layered on top.
    #[must_use]
    pub fn with_overrides<'a>(overrides: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        let mut strings = Self::default();
        for (k, v) in overrides {
            strings.table.insert(k.clone(), v.clone());
        }
        strings
    }

    /// Look up `key`. Unknown keys return the key itself.
    #[must_use]
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.table.get(key).map_or(key, String::as_str)
    }

    /// Look up `key` and substitute `{name}` placeholders.
    #[must_use]
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut out = self.get(key).to_owned();
        for (name, value) in args {
            out = out.replace(&format!("{{{name}}}"), value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Strings::default();
        assert_eq!(s.get(MODIFIER_COMMAND), "Command");
        assert_eq!(s.get("no.such.key"), "no.such.key");
    }

    #[test]
    fn test_overrides_and_format() {
        let overrides: HashMap<String, String> =
            [(MODIFIER_COMMAND.to_owned(), "Befehl".to_owned())].into();
        let s = Strings::with_overrides(&overrides);
        assert_eq!(s.get(MODIFIER_COMMAND), "Befehl");
        assert_eq!(s.get(MODIFIER_SHIFT), "Shift");

        let msg = s.format(CONFLICT_MENU, &[("combo", "⌘S"), ("title", "Save")]);
        assert!(msg.contains("\"⌘S\""));
        assert!(msg.contains("\"Save\""));
    }
}
