/// Accessibility permission check.
use accessibility_sys::AXIsProcessTrusted;

use super::errors::AXError;

/// Fail with `AXError::NotTrusted` unless this process may use Accessibility.
///
/// # Errors
///
/// Returns `Err(AXError::NotTrusted)` if permission has not been granted.
pub fn ensure_trusted() -> Result<(), AXError> {
    // SAFETY: no arguments, returns a Boolean.
    if unsafe { AXIsProcessTrusted() } {
        Ok(())
    } else {
        Err(AXError::NotTrusted)
    }
}

/// How to grant permission. Reading another app's menu bar needs it; hotkey
/// registration does not.
pub fn permission_instructions() -> &'static str {
    "Reading application menus requires Accessibility permission:\n  \
     1. Open System Settings → Privacy & Security → Accessibility\n  \
     2. Add your terminal application and enable it\n  \
     3. Restart your terminal"
}
