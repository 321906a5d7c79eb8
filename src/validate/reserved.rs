/// System-wide shortcuts the OS reserves regardless of the running application.
use crate::keys::Modifiers;
use crate::keys::codes::{
    KEY_DOWN_ARROW, KEY_ESCAPE, KEY_F5, KEY_LEFT_ARROW, KEY_RIGHT_ARROW, KEY_SPACE, KEY_TAB,
    KEY_UP_ARROW, KeyCode,
};

/// A reserved combination and the OS function that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservedShortcut {
    pub key_code: KeyCode,
    pub modifiers: Modifiers,
    /// What the OS does with it (e.g., "Save picture of screen as a file").
    pub function: &'static str,
}

const CMD: Modifiers = Modifiers::COMMAND;
const SHIFT_CMD: Modifiers = Modifiers::SHIFT.union(Modifiers::COMMAND);
const OPT_CMD: Modifiers = Modifiers::OPTION.union(Modifiers::COMMAND);
const CTRL: Modifiers = Modifiers::CONTROL;
const CTRL_OPT: Modifiers = Modifiers::CONTROL.union(Modifiers::OPTION);
const CTRL_CMD: Modifiers = Modifiers::CONTROL.union(Modifiers::COMMAND);
const CTRL_SHIFT_CMD: Modifiers = CTRL_CMD.union(Modifiers::SHIFT);

const fn reserved(key_code: KeyCode, modifiers: Modifiers, function: &'static str) -> ReservedShortcut {
    ReservedShortcut {
        key_code,
        modifiers,
        function,
    }
}

/// Key codes (US ANSI positions) used below.
const KEY_Q: KeyCode = 12;
const KEY_D: KeyCode = 2;
const KEY_3: KeyCode = 20;
const KEY_4: KeyCode = 21;
const KEY_5: KeyCode = 23;
const KEY_6: KeyCode = 22;
const KEY_8: KeyCode = 28;
const KEY_GRAVE: KeyCode = 50;

/// The fixed table.
pub const RESERVED_SHORTCUTS: &[ReservedShortcut] = &[
    reserved(KEY_TAB, CMD, "Switch to the next application"),
    reserved(KEY_TAB, SHIFT_CMD, "Switch to the previous application"),
    reserved(KEY_GRAVE, CMD, "Move focus to the next window"),
    reserved(KEY_SPACE, CMD, "Show Spotlight search"),
    reserved(KEY_SPACE, OPT_CMD, "Show Finder search window"),
    reserved(KEY_SPACE, CTRL, "Select the previous input source"),
    reserved(KEY_SPACE, CTRL_OPT, "Select next source in Input menu"),
    reserved(KEY_3, SHIFT_CMD, "Save picture of screen as a file"),
    reserved(KEY_3, CTRL_SHIFT_CMD, "Copy picture of screen to the clipboard"),
    reserved(KEY_4, SHIFT_CMD, "Save picture of selected area as a file"),
    reserved(KEY_4, CTRL_SHIFT_CMD, "Copy picture of selected area to the clipboard"),
    reserved(KEY_5, SHIFT_CMD, "Screenshot and recording options"),
    reserved(KEY_6, SHIFT_CMD, "Save picture of the Touch Bar as a file"),
    reserved(KEY_UP_ARROW, CTRL, "Mission Control"),
    reserved(KEY_DOWN_ARROW, CTRL, "Application windows"),
    reserved(KEY_LEFT_ARROW, CTRL, "Move left a space"),
    reserved(KEY_RIGHT_ARROW, CTRL, "Move right a space"),
    reserved(KEY_D, OPT_CMD, "Turn Dock hiding on/off"),
    reserved(KEY_ESCAPE, OPT_CMD, "Force Quit Applications"),
    reserved(KEY_Q, CTRL_CMD, "Lock Screen"),
    reserved(KEY_Q, SHIFT_CMD, "Log Out"),
    reserved(KEY_8, OPT_CMD, "Turn zoom on or off"),
    reserved(KEY_F5, CMD, "Turn VoiceOver on or off"),
];

/// Find the reserved shortcut matching exactly `code` + `modifiers`.
///
/// Function is ignored for the comparison; the OS tracks it separately for
/// keys that always carry it.
#[must_use]
pub fn find_reserved(code: KeyCode, modifiers: Modifiers) -> Option<&'static ReservedShortcut> {
    let modifiers = modifiers.difference(Modifiers::FUNCTION);
    RESERVED_SHORTCUTS
        .iter()
        .find(|r| r.key_code == code && r.modifiers == modifiers)
}
