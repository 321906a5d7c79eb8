/// Modifier flag sets and translation between their wire encodings.
///
/// Three encodings cross the edges of this tool:
///
/// - The legacy event-manager (Carbon) layout, used by the OS hotkey subsystem.
/// - The toolkit (Cocoa) layout, used by menus and persisted key combos.
/// - The Accessibility menu-item mask (`kAXMenuItemCmdModifiers`), used when
///   reading a live menu bar.
///
/// Everything inside the crate works with the canonical [`Modifiers`] set and
/// converts only when a value enters or leaves.
use bitflags::bitflags;

/// Legacy event-manager bit for Command (`cmdKey`).
pub const LEGACY_COMMAND: u64 = 1 << 8;
/// Legacy event-manager bit for Shift (`shiftKey`).
pub const LEGACY_SHIFT: u64 = 1 << 9;
/// Legacy event-manager bit for Option (`optionKey`).
pub const LEGACY_OPTION: u64 = 1 << 11;
/// Legacy event-manager bit for Control (`controlKey`).
pub const LEGACY_CONTROL: u64 = 1 << 12;
/// Legacy event-manager bit for Function (`kEventKeyModifierFnMask`).
pub const LEGACY_FUNCTION: u64 = 1 << 17;

/// Toolkit bit for Shift (`NSEventModifierFlagShift`).
pub const TOOLKIT_SHIFT: u64 = 1 << 17;
/// Toolkit bit for Control (`NSEventModifierFlagControl`).
pub const TOOLKIT_CONTROL: u64 = 1 << 18;
/// Toolkit bit for Option (`NSEventModifierFlagOption`).
pub const TOOLKIT_OPTION: u64 = 1 << 19;
/// Toolkit bit for Command (`NSEventModifierFlagCommand`).
pub const TOOLKIT_COMMAND: u64 = 1 << 20;
/// Toolkit bit for Function (`NSEventModifierFlagFunction`).
pub const TOOLKIT_FUNCTION: u64 = 1 << 23;

/// AX menu mask bit: Shift.
const AX_SHIFT: i64 = 0x1;
/// AX menu mask bit: Option.
const AX_OPTION: i64 = 0x2;
/// AX menu mask bit: Control.
const AX_CONTROL: i64 = 0x4;
/// AX menu mask bit: Command is NOT part of the shortcut.
const AX_NO_COMMAND: i64 = 0x8;

bitflags! {
    /// Canonical modifier set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const COMMAND = 1 << 0;
        const OPTION = 1 << 1;
        const CONTROL = 1 << 2;
        const SHIFT = 1 << 3;
        const FUNCTION = 1 << 4;
    }
}

/// (canonical, legacy, toolkit) bit triples.
const BIT_TABLE: [(Modifiers, u64, u64); 5] = [
    (Modifiers::COMMAND, LEGACY_COMMAND, TOOLKIT_COMMAND),
    (Modifiers::OPTION, LEGACY_OPTION, TOOLKIT_OPTION),
    (Modifiers::CONTROL, LEGACY_CONTROL, TOOLKIT_CONTROL),
    (Modifiers::SHIFT, LEGACY_SHIFT, TOOLKIT_SHIFT),
    (Modifiers::FUNCTION, LEGACY_FUNCTION, TOOLKIT_FUNCTION),
];

/// Every recognized legacy bit.
pub const LEGACY_ALL: u64 =
    LEGACY_COMMAND | LEGACY_SHIFT | LEGACY_OPTION | LEGACY_CONTROL | LEGACY_FUNCTION;
/// Every recognized toolkit bit.
pub const TOOLKIT_ALL: u64 =
    TOOLKIT_COMMAND | TOOLKIT_SHIFT | TOOLKIT_OPTION | TOOLKIT_CONTROL | TOOLKIT_FUNCTION;

impl Modifiers {
    /// Decode a legacy (Carbon) mask. Unrecognized bits are dropped.
    #[must_use]
    pub fn from_legacy(flags: u64) -> Self {
        BIT_TABLE
            .iter()
            .filter(|(_, legacy, _)| flags & legacy != 0)
            .fold(Self::empty(), |acc, (m, _, _)| acc | *m)
    }

    /// Decode a toolkit (Cocoa) mask. Unrecognized bits are dropped.
    #[must_use]
    pub fn from_toolkit(flags: u64) -> Self {
        BIT_TABLE
            .iter()
            .filter(|(_, _, toolkit)| flags & toolkit != 0)
            .fold(Self::empty(), |acc, (m, _, _)| acc | *m)
    }

    /// Encode as a legacy (Carbon) mask.
    #[must_use]
    pub fn to_legacy(self) -> u64 {
        BIT_TABLE
            .iter()
            .filter(|(m, _, _)| self.contains(*m))
            .fold(0, |acc, (_, legacy, _)| acc | legacy)
    }

    /// Encode as a toolkit (Cocoa) mask.
    #[must_use]
    pub fn to_toolkit(self) -> u64 {
        BIT_TABLE
            .iter()
            .filter(|(m, _, _)| self.contains(*m))
            .fold(0, |acc, (_, _, toolkit)| acc | toolkit)
    }

    /// Decode the Accessibility menu-item modifier mask.
    ///
    /// The AX mask is inverted for Command: no bit set means Command is held,
    /// and `0x8` means it is not.
    #[must_use]
    pub fn from_ax_menu_mask(mask: i64) -> Self {
        let mut mods = Self::empty();
        mods.set(Self::SHIFT, mask & AX_SHIFT != 0);
        mods.set(Self::OPTION, mask & AX_OPTION != 0);
        mods.set(Self::CONTROL, mask & AX_CONTROL != 0);
        mods.set(Self::COMMAND, mask & AX_NO_COMMAND == 0);
        mods
    }

    /// Lower-case names in rendering order: control, option, shift, command,
    /// then function.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        [
            (Self::CONTROL, "control"),
            (Self::OPTION, "option"),
            (Self::SHIFT, "shift"),
            (Self::COMMAND, "command"),
            (Self::FUNCTION, "function"),
        ]
        .into_iter()
        .filter(|(m, _)| self.contains(*m))
        .map(|(_, name)| name)
        .collect()
    }

    /// Parse a comma- or plus-separated list of modifier names.
    #[must_use]
    pub fn from_names(list: &str) -> Option<Self> {
        list.split([',', '+'])
            .filter(|part| !part.trim().is_empty())
            .try_fold(Self::empty(), |acc, part| Self::from_modifier_name(part).map(|m| acc | m))
    }

    /// Parse a single modifier name (`cmd`, `option`, `⌃`, ...).
    #[must_use]
    pub fn from_modifier_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "cmd" | "command" | "meta" | "super" | "⌘" => Some(Self::COMMAND),
            "opt" | "option" | "alt" | "⌥" => Some(Self::OPTION),
            "ctrl" | "control" | "⌃" => Some(Self::CONTROL),
            "shift" | "⇧" => Some(Self::SHIFT),
            "fn" | "function" => Some(Self::FUNCTION),
            _ => None,
        }
    }
}

/// Translate a legacy mask into the toolkit encoding.
#[must_use]
pub fn legacy_to_toolkit(legacy: u64) -> u64 {
    Modifiers::from_legacy(legacy).to_toolkit()
}

/// Translate a toolkit mask into the legacy encoding.
#[must_use]
pub fn toolkit_to_legacy(toolkit: u64) -> u64 {
    Modifiers::from_toolkit(toolkit).to_legacy()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_round_trip_every_subset() {
        for bits in 0..32u8 {
            let mods = Modifiers::from_bits_truncate(bits);
            let legacy = mods.to_legacy();
            assert_eq!(toolkit_to_legacy(legacy_to_toolkit(legacy)), legacy);
        }
    }

    #[test]
    fn test_toolkit_round_trip_every_subset() {
        for bits in 0..32u8 {
            let toolkit = Modifiers::from_bits_truncate(bits).to_toolkit();
            assert_eq!(legacy_to_toolkit(toolkit_to_legacy(toolkit)), toolkit);
        }
    }

    #[test]
    fn test_known_values() {
        assert_eq!(legacy_to_toolkit(LEGACY_COMMAND), TOOLKIT_COMMAND);
        assert_eq!(legacy_to_toolkit(LEGACY_SHIFT | LEGACY_OPTION), TOOLKIT_SHIFT | TOOLKIT_OPTION);
        assert_eq!(toolkit_to_legacy(TOOLKIT_CONTROL), LEGACY_CONTROL);
        assert_eq!(toolkit_to_legacy(TOOLKIT_FUNCTION), LEGACY_FUNCTION);
    }

    #[test]
    fn test_unrecognized_bits_dropped() {
        // Caps lock (toolkit 1 << 16) and the device-dependent low bits.
        assert_eq!(toolkit_to_legacy((1 << 16) | 0xff | TOOLKIT_COMMAND), LEGACY_COMMAND);
        // alphaLock (legacy 1 << 10) has no counterpart.
        assert_eq!(legacy_to_toolkit(1 << 10), 0);
        assert_eq!(Modifiers::from_legacy(!LEGACY_ALL), Modifiers::empty());
        assert_eq!(Modifiers::from_toolkit(!TOOLKIT_ALL), Modifiers::empty());
    }

    #[test]
    fn test_ax_menu_mask() {
        assert_eq!(Modifiers::from_ax_menu_mask(0), Modifiers::COMMAND);
        assert_eq!(
            Modifiers::from_ax_menu_mask(1),
            Modifiers::COMMAND | Modifiers::SHIFT
        );
        assert_eq!(Modifiers::from_ax_menu_mask(0x4 | 0x8), Modifiers::CONTROL);
    }

    #[test]
    fn test_from_modifier_name() {
        assert_eq!(Modifiers::from_modifier_name("Cmd"), Some(Modifiers::COMMAND));
        assert_eq!(Modifiers::from_modifier_name("alt"), Some(Modifiers::OPTION));
        assert_eq!(Modifiers::from_modifier_name("⇧"), Some(Modifiers::SHIFT));
        assert_eq!(Modifiers::from_modifier_name("hyper"), None);
    }

    #[test]
    fn test_names_in_rendering_order() {
        let all = Modifiers::all();
        assert_eq!(all.names(), ["control", "option", "shift", "command", "function"]);
        assert!(Modifiers::empty().names().is_empty());
    }

    #[test]
    fn test_from_names() {
        assert_eq!(
            Modifiers::from_names("cmd, shift"),
            Some(Modifiers::COMMAND | Modifiers::SHIFT)
        );
        assert_eq!(Modifiers::from_names("ctrl+opt"), Some(Modifiers::CONTROL | Modifiers::OPTION));
        assert_eq!(Modifiers::from_names(""), Some(Modifiers::empty()));
        assert_eq!(Modifiers::from_names("cmd,hyper"), None);
    }
}
