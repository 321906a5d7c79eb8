/// Errors surfaced by commands, with their exit codes.
use thiserror::Error;

use crate::hotkey::HotKeyError;
use crate::keys::ComboError;
use crate::validate::MenuSourceError;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A shortcut or key combination on the command line is invalid.
    #[error(transparent)]
    Combo(#[from] ComboError),

    /// A command-line value could not be interpreted.
    #[error("Invalid {what}: '{value}'")]
    InvalidArgument {
        /// Which argument.
        what: &'static str,
        /// The value given.
        value: String,
    },

    /// The menu to check against could not be loaded.
    #[error(transparent)]
    MenuSource(#[from] MenuSourceError),

    /// A hotkey could not be registered.
    #[error(transparent)]
    HotKey(#[from] HotKeyError),

    /// The configuration file could not be loaded.
    #[error("{0:#}")]
    Config(anyhow::Error),

    /// `listen` had nothing to listen for.
    #[error("No hotkeys could be registered")]
    NoHotKeys,

    /// Reading key presses from stdin failed.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// Accessibility permission not granted.
    #[cfg(target_os = "macos")]
    #[error("Accessibility permission not granted")]
    AccessDenied,
}

impl CommandError {
    /// Return the CLI exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Combo(_) | Self::InvalidArgument { .. } => 2,
            #[cfg(target_os = "macos")]
            Self::AccessDenied => 3,
            #[cfg(target_os = "macos")]
            Self::MenuSource(MenuSourceError::AX(ax)) => match ax {
                crate::ax::AXError::NotTrusted => 3,
                crate::ax::AXError::AppNotFound { .. } => 4,
                _ => 1,
            },
            Self::HotKey(_) => 5,
            Self::MenuSource(_) | Self::Config(_) | Self::Io(_) | Self::NoHotKeys => 1,
        }
    }

    /// Machine-readable code for the JSON error envelope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Combo(_) => "invalid_shortcut",
            Self::InvalidArgument { .. } => "invalid_argument",
            #[cfg(target_os = "macos")]
            Self::AccessDenied => "permission_denied",
            #[cfg(target_os = "macos")]
            Self::MenuSource(MenuSourceError::AX(ax)) => match ax {
                crate::ax::AXError::NotTrusted => "permission_denied",
                crate::ax::AXError::AppNotFound { .. } => "app_not_found",
                _ => "ax_error",
            },
            Self::MenuSource(MenuSourceError::Unsupported) => "unsupported_platform",
            Self::MenuSource(_) => "menu_unreadable",
            Self::HotKey(HotKeyError::AlreadyRegistered(_)) => "hotkey_taken",
            Self::HotKey(_) => "hotkey_error",
            Self::Config(_) => "config_error",
            Self::NoHotKeys => "no_hotkeys",
            Self::Io(_) => "io_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CommandError::from(ComboError::UnknownKey("x".into())).exit_code(), 2);
        assert_eq!(CommandError::from(HotKeyError::IdsExhausted).exit_code(), 5);
        assert_eq!(CommandError::from(MenuSourceError::Unsupported).exit_code(), 1);
        assert_eq!(
            CommandError::Config(anyhow::anyhow!("bad")).exit_code(),
            1
        );
    }

    #[test]
    fn test_codes() {
        assert_eq!(
            CommandError::from(HotKeyError::AlreadyRegistered(7)).code(),
            "hotkey_taken"
        );
        assert_eq!(
            CommandError::from(MenuSourceError::Unsupported).code(),
            "unsupported_platform"
        );
    }
}
