/// The OS hotkey API behind a trait, and its `global-hotkey` implementation.
use std::collections::HashMap;

use global_hotkey::GlobalHotKeyManager;
use global_hotkey::hotkey::{Code, HotKey as NativeHotKey, Modifiers as NativeModifiers};
use tracing::debug;

use crate::keys::{KeyCode, KeyCombo, Modifiers};

use super::errors::HotKeyError;

/// Handle the OS hands back for a registration, and reports when it fires.
pub type NativeId = u32;

/// Registers combinations with the OS.
pub trait HotKeyBackend {
    /// Register `combo` under the registry's numeric `id`.
    ///
    /// # Errors
    ///
    /// Returns `HotKeyError` if the OS refuses the combination.
    fn register(&mut self, id: u32, combo: &KeyCombo) -> Result<NativeId, HotKeyError>;

    /// Release a registration.
    ///
    /// # Errors
    ///
    /// Returns `HotKeyError` if the OS refuses to release it.
    fn unregister(&mut self, native: NativeId) -> Result<(), HotKeyError>;
}

/// Backend on the `global-hotkey` crate.
///
/// Must be created on the main thread on macOS. Fired hotkeys arrive on
/// `global_hotkey::GlobalHotKeyEvent::receiver()` carrying the [`NativeId`].
pub struct GlobalHotKeyBackend {
    manager: GlobalHotKeyManager,
    registered: HashMap<NativeId, NativeHotKey>,
}

impl std::fmt::Debug for GlobalHotKeyBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalHotKeyBackend")
            .field("registered", &self.registered.len())
            .finish_non_exhaustive()
    }
}

impl GlobalHotKeyBackend {
    /// # Errors
    ///
    /// Returns `HotKeyError::Backend` if the hotkey manager cannot be created.
    pub fn new() -> Result<Self, HotKeyError> {
        let manager = GlobalHotKeyManager::new().map_err(|e| HotKeyError::Backend(e.to_string()))?;
        Ok(Self {
            manager,
            registered: HashMap::new(),
        })
    }
}

impl HotKeyBackend for GlobalHotKeyBackend {
    fn register(&mut self, id: u32, combo: &KeyCombo) -> Result<NativeId, HotKeyError> {
        let native = native_hotkey(combo)?;
        let native_id = native.id();
        if self.registered.contains_key(&native_id) {
            return Err(HotKeyError::AlreadyRegistered(native_id));
        }
        self.manager.register(native).map_err(|e| match e {
            global_hotkey::Error::AlreadyRegistered(hk) => HotKeyError::AlreadyRegistered(hk.id()),
            other => HotKeyError::Backend(other.to_string()),
        })?;
        debug!(id, native_id, "registered with OS");
        self.registered.insert(native_id, native);
        Ok(native_id)
    }

    fn unregister(&mut self, native: NativeId) -> Result<(), HotKeyError> {
        let Some(hotkey) = self.registered.remove(&native) else {
            return Ok(());
        };
        self.manager
            .unregister(hotkey)
            .map_err(|e| HotKeyError::Backend(e.to_string()))
    }
}

/// Translate a combination into the `global-hotkey` representation.
///
/// # Errors
///
/// - `HotKeyError::UnsupportedModifier` for the Function modifier.
/// - `HotKeyError::UnsupportedKey` for keys with no `Code`.
/// - `HotKeyError::EmptyCombo` for the empty combination.
pub fn native_hotkey(combo: &KeyCombo) -> Result<NativeHotKey, HotKeyError> {
    let code = combo
        .code()
        .ok_or_else(|| HotKeyError::EmptyCombo(String::new()))?;
    let modifiers = combo.modifiers();
    if modifiers.contains(Modifiers::FUNCTION) {
        return Err(HotKeyError::UnsupportedModifier("Function"));
    }

    let mut native = NativeModifiers::empty();
    // `global-hotkey` folds META into SUPER, the Command key on macOS.
    if modifiers.contains(Modifiers::COMMAND) {
        native |= NativeModifiers::SUPER;
    }
    if modifiers.contains(Modifiers::OPTION) {
        native |= NativeModifiers::ALT;
    }
    if modifiers.contains(Modifiers::CONTROL) {
        native |= NativeModifiers::CONTROL;
    }
    if modifiers.contains(Modifiers::SHIFT) {
        native |= NativeModifiers::SHIFT;
    }

    let key = code_for_key_code(code).ok_or(HotKeyError::UnsupportedKey(code))?;
    Ok(NativeHotKey::new(
        (!native.is_empty()).then_some(native),
        key,
    ))
}

/// Physical key for a macOS virtual key code.
#[must_use]
pub fn code_for_key_code(code: KeyCode) -> Option<Code> {
    CODES.iter().find(|(c, _)| *c == code).map(|(_, k)| *k)
}

const CODES: &[(KeyCode, Code)] = &[
    (0, Code::KeyA),
    (1, Code::KeyS),
    (2, Code::KeyD),
    (3, Code::KeyF),
    (4, Code::KeyH),
    (5, Code::KeyG),
    (6, Code::KeyZ),
    (7, Code::KeyX),
    (8, Code::KeyC),
    (9, Code::KeyV),
    (11, Code::KeyB),
    (12, Code::KeyQ),
    (13, Code::KeyW),
    (14, Code::KeyE),
    (15, Code::KeyR),
    (16, Code::KeyY),
    (17, Code::KeyT),
    (18, Code::Digit1),
    (19, Code::Digit2),
    (20, Code::Digit3),
    (21, Code::Digit4),
    (22, Code::Digit6),
    (23, Code::Digit5),
    (24, Code::Equal),
    (25, Code::Digit9),
    (26, Code::Digit7),
    (27, Code::Minus),
    (28, Code::Digit8),
    (29, Code::Digit0),
    (30, Code::BracketRight),
    (31, Code::KeyO),
    (32, Code::KeyU),
    (33, Code::BracketLeft),
    (34, Code::KeyI),
    (35, Code::KeyP),
    (36, Code::Enter),
    (37, Code::KeyL),
    (38, Code::KeyJ),
    (39, Code::Quote),
    (40, Code::KeyK),
    (41, Code::Semicolon),
    (42, Code::Backslash),
    (43, Code::Comma),
    (44, Code::Slash),
    (45, Code::KeyN),
    (46, Code::KeyM),
    (47, Code::Period),
    (48, Code::Tab),
    (49, Code::Space),
    (50, Code::Backquote),
    (51, Code::Backspace),
    (53, Code::Escape),
    (65, Code::NumpadDecimal),
    (67, Code::NumpadMultiply),
    (69, Code::NumpadAdd),
    (71, Code::NumLock),
    (75, Code::NumpadDivide),
    (76, Code::NumpadEnter),
    (78, Code::NumpadSubtract),
    (81, Code::NumpadEqual),
    (82, Code::Numpad0),
    (83, Code::Numpad1),
    (84, Code::Numpad2),
    (85, Code::Numpad3),
    (86, Code::Numpad4),
    (87, Code::Numpad5),
    (88, Code::Numpad6),
    (89, Code::Numpad7),
    (91, Code::Numpad8),
    (92, Code::Numpad9),
    (122, Code::F1),
    (120, Code::F2),
    (99, Code::F3),
    (118, Code::F4),
    (96, Code::F5),
    (97, Code::F6),
    (98, Code::F7),
    (100, Code::F8),
    (101, Code::F9),
    (109, Code::F10),
    (103, Code::F11),
    (111, Code::F12),
    (105, Code::F13),
    (107, Code::F14),
    (113, Code::F15),
    (106, Code::F16),
    (64, Code::F17),
    (79, Code::F18),
    (80, Code::F19),
    // The Help key position is reported as Insert.
    (114, Code::Insert),
    (115, Code::Home),
    (116, Code::PageUp),
    (117, Code::Delete),
    (119, Code::End),
    (121, Code::PageDown),
    (123, Code::ArrowLeft),
    (124, Code::ArrowRight),
    (125, Code::ArrowDown),
    (126, Code::ArrowUp),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::UsAnsiLayout;
    use crate::keys::codes::{KEY_F19, KEY_HELP, KEY_UP_ARROW};

    #[test]
    fn test_code_table() {
        assert_eq!(code_for_key_code(1), Some(Code::KeyS));
        assert_eq!(code_for_key_code(KEY_UP_ARROW), Some(Code::ArrowUp));
        assert_eq!(code_for_key_code(KEY_F19), Some(Code::F19));
        assert_eq!(code_for_key_code(KEY_HELP), Some(Code::Insert));
        assert_eq!(code_for_key_code(10), None);
    }

    #[test]
    fn test_native_hotkey_modifiers() {
        let combo =
            KeyCombo::from_key_code(1, Modifiers::COMMAND | Modifiers::SHIFT, &UsAnsiLayout).unwrap();
        let native = native_hotkey(&combo).unwrap();
        assert_eq!(native.mods, NativeModifiers::SUPER | NativeModifiers::SHIFT);
        assert_eq!(native.key, Code::KeyS);
    }

    #[test]
    fn test_native_hotkey_rejects_function_and_empty() {
        let combo = KeyCombo::from_key_code(1, Modifiers::FUNCTION, &UsAnsiLayout).unwrap();
        assert_eq!(
            native_hotkey(&combo).unwrap_err(),
            HotKeyError::UnsupportedModifier("Function")
        );
        assert!(matches!(
            native_hotkey(&KeyCombo::empty()),
            Err(HotKeyError::EmptyCombo(_))
        ));
    }
}
