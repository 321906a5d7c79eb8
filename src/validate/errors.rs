/// Errors from loading the menus the validator scans.
use std::path::PathBuf;

use thiserror::Error;

/// Why a menu could not be loaded.
#[derive(Debug, Error)]
pub enum MenuSourceError {
    /// The menu file could not be read.
    #[error("Failed to read menu file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The menu file is not a valid menu document.
    #[error("Failed to parse menu file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Reading a live menu bar failed.
    #[cfg(target_os = "macos")]
    #[error("Accessibility API error: {0}")]
    AX(#[from] crate::ax::AXError),

    /// Live menus are only readable on macOS.
    #[error("Reading application menus is only supported on macOS")]
    Unsupported,
}
