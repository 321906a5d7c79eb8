/// Keyboard layout lookup: which character a physical key types.
use super::codes::KeyCode;
use super::flags::Modifiers;

/// Source of layout-dependent characters.
pub trait KeyboardLayout {
    /// Character typed by `code` with `modifiers` held, or `None` if the key
    /// types nothing printable on this layout.
    ///
    /// Only Shift affects the result; other modifiers are ignored.
    fn character(&self, code: KeyCode, modifiers: Modifiers) -> Option<String>;

    /// Reverse lookup: the key code that types `ch` unshifted or shifted.
    fn key_code_for_char(&self, ch: char) -> Option<(KeyCode, Modifiers)>;
}

/// (code, unshifted, shifted) for the US ANSI layout.
const US_ANSI: &[(KeyCode, char, char)] = &[
    (0, 'a', 'A'),
    (1, 's', 'S'),
    (2, 'd', 'D'),
    (3, 'f', 'F'),
    (4, 'h', 'H'),
    (5, 'g', 'G'),
    (6, 'z', 'Z'),
    (7, 'x', 'X'),
    (8, 'c', 'C'),
    (9, 'v', 'V'),
    (10, '§', '±'),
    (11, 'b', 'B'),
    (12, 'q', 'Q'),
    (13, 'w', 'W'),
    (14, 'e', 'E'),
    (15, 'r', 'R'),
    (16, 'y', 'Y'),
    (17, 't', 'T'),
    (18, '1', '!'),
    (19, '2', '@'),
    (20, '3', '#'),
    (21, '4', '$'),
    (22, '6', '^'),
    (23, '5', '%'),
    (24, '=', '+'),
    (25, '9', '('),
    (26, '7', '&'),
    (27, '-', '_'),
    (28, '8', '*'),
    (29, '0', ')'),
    (30, ']', '}'),
    (31, 'o', 'O'),
    (32, 'u', 'U'),
    (33, '[', '{'),
    (34, 'i', 'I'),
    (35, 'p', 'P'),
    (37, 'l', 'L'),
    (38, 'j', 'J'),
    (39, '\'', '"'),
    (40, 'k', 'K'),
    (41, ';', ':'),
    (42, '\\', '|'),
    (43, ',', '<'),
    (44, '/', '?'),
    (45, 'n', 'N'),
    (46, 'm', 'M'),
    (47, '.', '>'),
    (50, '`', '~'),
    (65, '.', '.'),
    (67, '*', '*'),
    (69, '+', '+'),
    (75, '/', '/'),
    (78, '-', '-'),
    (81, '=', '='),
    (82, '0', '0'),
    (83, '1', '1'),
    (84, '2', '2'),
    (85, '3', '3'),
    (86, '4', '4'),
    (87, '5', '5'),
    (88, '6', '6'),
    (89, '7', '7'),
    (91, '8', '8'),
    (92, '9', '9'),
];

/// Built-in US ANSI layout.
///
/// TODO: read the active input source via `TISCopyCurrentKeyboardLayoutInputSource`
/// and `UCKeyTranslate` on macOS instead of assuming US ANSI.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsAnsiLayout;

impl KeyboardLayout for UsAnsiLayout {
    fn character(&self, code: KeyCode, modifiers: Modifiers) -> Option<String> {
        let (_, plain, shifted) = US_ANSI.iter().find(|(c, _, _)| *c == code)?;
        let ch = if modifiers.contains(Modifiers::SHIFT) {
            shifted
        } else {
            plain
        };
        Some(ch.to_string())
    }

    fn key_code_for_char(&self, ch: char) -> Option<(KeyCode, Modifiers)> {
        // Main block first so "1" resolves to the top row, not the keypad.
        US_ANSI.iter().find_map(|&(code, plain, shifted)| {
            if plain == ch {
                Some((code, Modifiers::empty()))
            } else if shifted == ch {
                Some((code, Modifiers::SHIFT))
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_lookup() {
        let layout = UsAnsiLayout;
        assert_eq!(layout.character(1, Modifiers::empty()).as_deref(), Some("s"));
        assert_eq!(layout.character(1, Modifiers::SHIFT).as_deref(), Some("S"));
        assert_eq!(
            layout.character(18, Modifiers::SHIFT | Modifiers::COMMAND).as_deref(),
            Some("!")
        );
        assert_eq!(layout.character(53, Modifiers::empty()), None);
    }

    #[test]
    fn test_reverse_lookup() {
        let layout = UsAnsiLayout;
        assert_eq!(layout.key_code_for_char('s'), Some((1, Modifiers::empty())));
        assert_eq!(layout.key_code_for_char('S'), Some((1, Modifiers::SHIFT)));
        assert_eq!(layout.key_code_for_char('1'), Some((18, Modifiers::empty())));
        assert_eq!(layout.key_code_for_char('é'), None);
    }
}
