/// Errors from the macOS Accessibility API layer.
use thiserror::Error;

/// Typed errors from the AX layer.
#[derive(Debug, Error)]
pub enum AXError {
    /// Accessibility permission not granted.
    #[error("Accessibility permission not granted")]
    NotTrusted,

    /// The element went away (app quit, menu rebuilt).
    #[error("AX element is no longer valid")]
    InvalidElement,

    /// The element does not expose the attribute (e.g., no menu bar).
    #[error("Attribute '{0}' not supported by this element")]
    AttributeUnsupported(String),

    /// The target app did not answer within the messaging timeout.
    #[error("AX API call timed out, app may be unresponsive")]
    Timeout,

    /// Any other non-success AX code.
    #[error("AX API failure (code {code}): {context}")]
    ApiFailure {
        /// Raw `AXError` return code.
        code: i32,
        /// Which call failed.
        context: String,
    },

    /// No running application matched `--app`.
    #[error("No running application matches '{identifier}'")]
    AppNotFound {
        /// The app name, PID string, or bundle ID that was searched.
        identifier: String,
    },
}

/// Map a raw AX return code to `AXError`.
///
/// # Errors
///
/// Returns `Err(AXError)` for any non-success code.
pub fn check_ax_error(code: i32, context: &str) -> Result<(), AXError> {
    use accessibility_sys::{
        kAXErrorAttributeUnsupported, kAXErrorCannotComplete, kAXErrorInvalidUIElement,
        kAXErrorNoValue, kAXErrorSuccess,
    };

    match code {
        c if c == kAXErrorSuccess => Ok(()),
        c if c == kAXErrorInvalidUIElement => Err(AXError::InvalidElement),
        c if c == kAXErrorAttributeUnsupported || c == kAXErrorNoValue => {
            Err(AXError::AttributeUnsupported(context.to_owned()))
        }
        // Busy or hung target.
        c if c == kAXErrorCannotComplete => Err(AXError::Timeout),
        c => Err(AXError::ApiFailure {
            code: c,
            context: context.to_owned(),
        }),
    }
}
