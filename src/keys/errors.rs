/// Errors from building or parsing key combinations.
use thiserror::Error;

/// Why a key combination could not be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComboError {
    /// The key code is negative (other than the `-1` sentinel) or too large.
    #[error("Invalid key code {0}")]
    InvalidKeyCode(i64),

    /// A real key code was given without the character it types.
    #[error("Key code {code} has no key equivalent")]
    MissingKeyEquivalent {
        /// The offending key code.
        code: i64,
    },

    /// A modifier name in a shortcut string was not recognized.
    #[error("Unknown modifier '{0}'")]
    UnknownModifier(String),

    /// A key name in a shortcut string was not recognized.
    #[error("Unknown key '{0}'")]
    UnknownKey(String),

    /// The shortcut string had no key part.
    #[error("Shortcut '{0}' has no key")]
    MissingKey(String),

    /// A mapping does not describe a key combination.
    #[error("Mapping does not describe a key combination")]
    MalformedMapping,
}
