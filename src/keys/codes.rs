/// macOS virtual key codes, special-key glyphs and key classification.
///
/// Codes identify physical keys, not the characters they type. Layout-dependent
/// characters live in [`super::layout`].

/// Sentinel for "no key code" at the I/O edges (mappings, CLI, renderer).
pub const NO_CODE: i64 = -1;

/// A macOS virtual key code.
pub type KeyCode = u16;

pub const KEY_F1: KeyCode = 122;
pub const KEY_F2: KeyCode = 120;
pub const KEY_F3: KeyCode = 99;
pub const KEY_F4: KeyCode = 118;
pub const KEY_F5: KeyCode = 96;
pub const KEY_F6: KeyCode = 97;
pub const KEY_F7: KeyCode = 98;
pub const KEY_F8: KeyCode = 100;
pub const KEY_F9: KeyCode = 101;
pub const KEY_F10: KeyCode = 109;
pub const KEY_F11: KeyCode = 103;
pub const KEY_F12: KeyCode = 111;
pub const KEY_F13: KeyCode = 105;
pub const KEY_F14: KeyCode = 107;
pub const KEY_F15: KeyCode = 113;
pub const KEY_F16: KeyCode = 106;
pub const KEY_F17: KeyCode = 64;
pub const KEY_F18: KeyCode = 79;
pub const KEY_F19: KeyCode = 80;
pub const KEY_SPACE: KeyCode = 49;
pub const KEY_DELETE_LEFT: KeyCode = 51;
pub const KEY_DELETE_RIGHT: KeyCode = 117;
pub const KEY_PAD_CLEAR: KeyCode = 71;
pub const KEY_LEFT_ARROW: KeyCode = 123;
pub const KEY_RIGHT_ARROW: KeyCode = 124;
pub const KEY_UP_ARROW: KeyCode = 126;
pub const KEY_DOWN_ARROW: KeyCode = 125;
pub const KEY_SOUTHEAST_ARROW: KeyCode = 119;
pub const KEY_NORTHWEST_ARROW: KeyCode = 115;
pub const KEY_ESCAPE: KeyCode = 53;
pub const KEY_PAGE_DOWN: KeyCode = 121;
pub const KEY_PAGE_UP: KeyCode = 116;
pub const KEY_RETURN: KeyCode = 36;
pub const KEY_PAD_ENTER: KeyCode = 76;
pub const KEY_TAB: KeyCode = 48;
pub const KEY_HELP: KeyCode = 114;

/// Function keys in order, F1 first.
pub const FUNCTION_KEYS: [KeyCode; 19] = [
    KEY_F1, KEY_F2, KEY_F3, KEY_F4, KEY_F5, KEY_F6, KEY_F7, KEY_F8, KEY_F9, KEY_F10, KEY_F11,
    KEY_F12, KEY_F13, KEY_F14, KEY_F15, KEY_F16, KEY_F17, KEY_F18, KEY_F19,
];

pub const GLYPH_COMMAND: char = '\u{2318}';
pub const GLYPH_OPTION: char = '\u{2325}';
pub const GLYPH_SHIFT: char = '\u{21E7}';
pub const GLYPH_CONTROL: char = '\u{2303}';

/// Fixed code → glyph table for non-printing keys.
///
/// F-keys and Space are not here: they render as names, not glyphs.
const GLYPHS: &[(KeyCode, char)] = &[
    (KEY_TAB, '\u{21E5}'),
    (KEY_RETURN, '\u{21A9}'),
    (KEY_PAD_ENTER, '\u{2305}'),
    (KEY_DELETE_LEFT, '\u{232B}'),
    (KEY_DELETE_RIGHT, '\u{2326}'),
    (KEY_PAD_CLEAR, '\u{2327}'),
    (KEY_LEFT_ARROW, '\u{2190}'),
    (KEY_RIGHT_ARROW, '\u{2192}'),
    (KEY_UP_ARROW, '\u{2191}'),
    (KEY_DOWN_ARROW, '\u{2193}'),
    (KEY_PAGE_UP, '\u{21DE}'),
    (KEY_PAGE_DOWN, '\u{21DF}'),
    (KEY_NORTHWEST_ARROW, '\u{2196}'),
    (KEY_SOUTHEAST_ARROW, '\u{2198}'),
    (KEY_ESCAPE, '\u{238B}'),
    (KEY_HELP, '?'),
];

/// Characters the toolkit menu system uses as key equivalents for
/// non-printing keys (`NS*FunctionKey` and control characters).
const MENU_KEY_EQUIVALENTS: &[(KeyCode, char)] = &[
    (KEY_SPACE, ' '),
    (KEY_TAB, '\t'),
    (KEY_RETURN, '\r'),
    (KEY_PAD_ENTER, '\u{3}'),
    (KEY_DELETE_LEFT, '\u{8}'),
    (KEY_DELETE_RIGHT, '\u{F728}'),
    (KEY_PAD_CLEAR, '\u{F739}'),
    (KEY_ESCAPE, '\u{1b}'),
    (KEY_UP_ARROW, '\u{F700}'),
    (KEY_DOWN_ARROW, '\u{F701}'),
    (KEY_LEFT_ARROW, '\u{F702}'),
    (KEY_RIGHT_ARROW, '\u{F703}'),
    (KEY_NORTHWEST_ARROW, '\u{F729}'),
    (KEY_SOUTHEAST_ARROW, '\u{F72B}'),
    (KEY_PAGE_UP, '\u{F72C}'),
    (KEY_PAGE_DOWN, '\u{F72D}'),
    (KEY_HELP, '\u{F746}'),
];

/// Named keys accepted by the shortcut parser.
const KEY_NAMES: &[(&str, KeyCode)] = &[
    ("space", KEY_SPACE),
    ("tab", KEY_TAB),
    ("return", KEY_RETURN),
    ("enter", KEY_PAD_ENTER),
    ("escape", KEY_ESCAPE),
    ("esc", KEY_ESCAPE),
    ("delete", KEY_DELETE_LEFT),
    ("backspace", KEY_DELETE_LEFT),
    ("forwarddelete", KEY_DELETE_RIGHT),
    ("clear", KEY_PAD_CLEAR),
    ("left", KEY_LEFT_ARROW),
    ("right", KEY_RIGHT_ARROW),
    ("up", KEY_UP_ARROW),
    ("down", KEY_DOWN_ARROW),
    ("pageup", KEY_PAGE_UP),
    ("pagedown", KEY_PAGE_DOWN),
    ("home", KEY_NORTHWEST_ARROW),
    ("end", KEY_SOUTHEAST_ARROW),
    ("help", KEY_HELP),
];

/// Glyph for a non-printing key, if it has one.
#[must_use]
pub fn glyph_for_key_code(code: KeyCode) -> Option<char> {
    GLYPHS.iter().find(|(c, _)| *c == code).map(|(_, g)| *g)
}

/// 1-based function key number (`F1` → 1) if `code` is a function key.
#[must_use]
pub fn function_key_number(code: KeyCode) -> Option<usize> {
    FUNCTION_KEYS.iter().position(|&k| k == code).map(|i| i + 1)
}

/// Whether `code` is F1–F19.
#[must_use]
pub fn is_function_key(code: KeyCode) -> bool {
    function_key_number(code).is_some()
}

/// Whether `code` is a special (non-character) key: F-keys, space, editing,
/// navigation, escape, return, tab or help.
#[must_use]
pub fn is_special_key(code: KeyCode) -> bool {
    is_function_key(code) || code == KEY_SPACE || glyph_for_key_code(code).is_some()
}

/// Keys that cancel or clear a recording: delete-left, delete-right, escape.
#[must_use]
pub fn is_cancel_key(code: KeyCode) -> bool {
    matches!(code, KEY_DELETE_LEFT | KEY_DELETE_RIGHT | KEY_ESCAPE)
}

/// Menu key-equivalent character for a non-printing key or function key.
#[must_use]
pub fn menu_key_equivalent_for_special(code: KeyCode) -> Option<String> {
    if let Some(n) = function_key_number(code) {
        // NSF1FunctionKey is U+F704; F-keys are contiguous from there.
        let c = char::from_u32(0xF704 + u32::try_from(n - 1).ok()?)?;
        return Some(c.to_string());
    }
    MENU_KEY_EQUIVALENTS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, ch)| ch.to_string())
}

/// Reverse of [`glyph_for_key_code`]. ASCII glyphs (`?` for Help) are
/// excluded so they keep their meaning as typed characters.
#[must_use]
pub fn key_code_for_glyph(glyph: char) -> Option<KeyCode> {
    if glyph.is_ascii() {
        return None;
    }
    GLYPHS.iter().find(|(_, g)| *g == glyph).map(|(code, _)| *code)
}

/// Reverse of [`menu_key_equivalent_for_special`].
///
/// `U+007F` is accepted as an alias for delete-left, as menus use both.
#[must_use]
pub fn special_for_menu_key_equivalent(key_equivalent: &str) -> Option<KeyCode> {
    let mut chars = key_equivalent.chars();
    let ch = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    if ch == '\u{7f}' {
        return Some(KEY_DELETE_LEFT);
    }
    let cp = ch as u32;
    if (0xF704..0xF704 + 19).contains(&cp) {
        let idx = usize::try_from(cp - 0xF704).ok()?;
        return FUNCTION_KEYS.get(idx).copied();
    }
    MENU_KEY_EQUIVALENTS
        .iter()
        .find(|(_, c)| *c == ch)
        .map(|(code, _)| *code)
}

/// Look up a named key (`"pageup"`, `"f5"`, ...). Case-insensitive.
#[must_use]
pub fn key_code_for_name(name: &str) -> Option<KeyCode> {
    let lower = name.trim().to_lowercase();
    if let Some(num) = lower.strip_prefix('f').and_then(|n| n.parse::<usize>().ok()) {
        return num.checked_sub(1).and_then(|i| FUNCTION_KEYS.get(i)).copied();
    }
    KEY_NAMES
        .iter()
        .find(|(n, _)| *n == lower)
        .map(|(_, code)| *code)
}

/// Name of a non-character key (`"f5"`, `"pageup"`), the reverse of
/// [`key_code_for_name`].
#[must_use]
pub fn name_for_key_code(code: KeyCode) -> Option<String> {
    if let Some(n) = function_key_number(code) {
        return Some(format!("f{n}"));
    }
    KEY_NAMES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(name, _)| (*name).to_owned())
}

/// Narrow an I/O-edge code (`-1` sentinel, signed) to a key code.
///
/// Returns `None` for the sentinel and for anything outside `u16`.
#[must_use]
pub fn key_code_from_raw(raw: i64) -> Option<KeyCode> {
    KeyCode::try_from(raw).ok()
}
