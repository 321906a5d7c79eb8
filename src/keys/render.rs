/// Human-readable and glyph renderings of key codes and modifier sets.
///
/// Modifiers always render in the fixed order Control, Option, Shift, Command,
/// regardless of which encoding they arrived in. Function is not rendered.
use super::codes::{self, GLYPH_COMMAND, GLYPH_CONTROL, GLYPH_OPTION, GLYPH_SHIFT, KEY_SPACE};
use super::flags::Modifiers;
use super::l10n::{self, Strings};
use super::layout::KeyboardLayout;

/// Canonical rendering order with glyph and localization key.
const ORDER: [(Modifiers, char, &str); 4] = [
    (Modifiers::CONTROL, GLYPH_CONTROL, l10n::MODIFIER_CONTROL),
    (Modifiers::OPTION, GLYPH_OPTION, l10n::MODIFIER_OPTION),
    (Modifiers::SHIFT, GLYPH_SHIFT, l10n::MODIFIER_SHIFT),
    (Modifiers::COMMAND, GLYPH_COMMAND, l10n::MODIFIER_COMMAND),
];

/// Compact glyph sequence for a modifier set, e.g. `⌃⇧⌘`.
#[must_use]
pub fn glyphs_for_modifiers(modifiers: Modifiers) -> String {
    ORDER
        .iter()
        .filter(|(m, _, _)| modifiers.contains(*m))
        .map(|(_, glyph, _)| *glyph)
        .collect()
}

/// Glyph sequence for a legacy (Carbon) mask.
#[must_use]
pub fn string_for_legacy_flags(flags: u64) -> String {
    glyphs_for_modifiers(Modifiers::from_legacy(flags))
}

/// Glyph sequence for a toolkit (Cocoa) mask.
#[must_use]
pub fn string_for_toolkit_flags(flags: u64) -> String {
    glyphs_for_modifiers(Modifiers::from_toolkit(flags))
}

/// Renders key codes with a given keyboard layout and string table.
#[derive(Clone, Copy)]
pub struct Renderer<'a> {
    layout: &'a dyn KeyboardLayout,
    strings: &'a Strings,
}

impl<'a> Renderer<'a> {
    #[must_use]
    pub fn new(layout: &'a dyn KeyboardLayout, strings: &'a Strings) -> Self {
        Self { layout, strings }
    }

    /// Best display token for a key: glyph, `F<n>`, localized "Space", or the
    /// upper-cased layout character. Empty for [`codes::NO_CODE`] and unknown codes.
    #[must_use]
    pub fn string_for_key_code(&self, code: i64) -> String {
        let Some(code) = codes::key_code_from_raw(code) else {
            return String::new();
        };
        if let Some(glyph) = codes::glyph_for_key_code(code) {
            return glyph.to_string();
        }
        if let Some(n) = codes::function_key_number(code) {
            return format!("F{n}");
        }
        if code == KEY_SPACE {
            return self.strings.get(l10n::KEY_SPACE).to_owned();
        }
        self.layout
            .character(code, Modifiers::empty())
            .map(|s| s.to_uppercase())
            .unwrap_or_default()
    }

    /// Modifier glyphs followed directly by the key token, e.g. `⇧⌘S`.
    #[must_use]
    pub fn string_for_modifiers_and_key_code(&self, modifiers: Modifiers, code: i64) -> String {
        let mut out = glyphs_for_modifiers(modifiers);
        out.push_str(&self.string_for_key_code(code));
        out
    }

    #[must_use]
    pub fn string_for_legacy_flags_and_key_code(&self, flags: u64, code: i64) -> String {
        self.string_for_modifiers_and_key_code(Modifiers::from_legacy(flags), code)
    }

    #[must_use]
    pub fn string_for_toolkit_flags_and_key_code(&self, flags: u64, code: i64) -> String {
        self.string_for_modifiers_and_key_code(Modifiers::from_toolkit(flags), code)
    }

    /// Spelled-out, localized rendering, e.g. `Shift + Command + S`.
    #[must_use]
    pub fn readable_string_for_modifiers_and_key_code(
        &self,
        modifiers: Modifiers,
        code: i64,
    ) -> String {
        let mut parts: Vec<String> = ORDER
            .iter()
            .filter(|(m, _, _)| modifiers.contains(*m))
            .map(|(_, _, key)| self.strings.get(key).to_owned())
            .collect();
        let key = self.string_for_key_code(code);
        if !key.is_empty() {
            parts.push(key);
        }
        parts.join(self.strings.get(l10n::READABLE_SEPARATOR))
    }

    #[must_use]
    pub fn readable_string_for_legacy_flags_and_key_code(&self, flags: u64, code: i64) -> String {
        self.readable_string_for_modifiers_and_key_code(Modifiers::from_legacy(flags), code)
    }

    #[must_use]
    pub fn readable_string_for_toolkit_flags_and_key_code(&self, flags: u64, code: i64) -> String {
        self.readable_string_for_modifiers_and_key_code(Modifiers::from_toolkit(flags), code)
    }

    /// What the key actually types with these modifiers held (Shift applied).
    #[must_use]
    pub fn character_for_key_code(&self, code: i64, modifiers: Modifiers) -> String {
        codes::key_code_from_raw(code)
            .and_then(|c| self.layout.character(c, modifiers))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn character_for_key_code_and_legacy_flags(&self, code: i64, flags: u64) -> String {
        self.character_for_key_code(code, Modifiers::from_legacy(flags))
    }

    #[must_use]
    pub fn character_for_key_code_and_toolkit_flags(&self, code: i64, flags: u64) -> String {
        self.character_for_key_code(code, Modifiers::from_toolkit(flags))
    }
}

impl std::fmt::Debug for Renderer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer").finish_non_exhaustive()
    }
}
