/// Errors from registering global hotkeys.
use thiserror::Error;

/// Why a hotkey could not be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HotKeyError {
    /// The combination has no key.
    #[error("Hotkey '{0}' has no key combination")]
    EmptyCombo(String),

    /// The OS hotkey API cannot express this key.
    #[error("Key code {0} cannot be registered as a global hotkey")]
    UnsupportedKey(u16),

    /// The OS hotkey API cannot express this modifier.
    #[error("Modifier {0} cannot be part of a global hotkey")]
    UnsupportedModifier(&'static str),

    /// The combination is already registered, by this process or another one.
    #[error("Hotkey with native ID {0} is already registered")]
    AlreadyRegistered(u32),

    /// Every hotkey ID is in use.
    #[error("No free hotkey IDs")]
    IdsExhausted,

    /// The OS hotkey API failed.
    #[error("Hotkey backend error: {0}")]
    Backend(String),
}
