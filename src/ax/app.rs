/// Resolve `--app` to a PID via NSWorkspace.
use objc2_app_kit::NSWorkspace;

use super::errors::AXError;

/// Resolve an app identifier (PID, bundle ID, or name) to a PID.
///
/// An integer is taken as a PID, anything with a `.` as a bundle ID (exact),
/// and the rest as a case-insensitive substring of the localized name.
///
/// # Errors
///
/// Returns `Err(AXError::AppNotFound)` if no running application matches.
pub fn resolve_app_pid(identifier: &str) -> Result<i32, AXError> {
    if let Ok(pid) = identifier.parse::<i32>() {
        return Ok(pid);
    }

    let wanted = identifier.to_lowercase();
    let by_bundle = identifier.contains('.');
    let apps = NSWorkspace::sharedWorkspace().runningApplications();

    apps.iter()
        .find(|app| {
            if by_bundle {
                app.bundleIdentifier()
                    .is_some_and(|bid| bid.to_string() == identifier)
            } else {
                app.localizedName()
                    .is_some_and(|name| name.to_string().to_lowercase().contains(&wanted))
            }
        })
        .map(|app| app.processIdentifier())
        .ok_or_else(|| AXError::AppNotFound {
            identifier: identifier.to_owned(),
        })
}

/// PID of the frontmost application.
///
/// # Errors
///
/// Returns `Err(AXError::AppNotFound)` if there is none.
pub fn frontmost_app_pid() -> Result<i32, AXError> {
    NSWorkspace::sharedWorkspace()
        .frontmostApplication()
        .map(|app| app.processIdentifier())
        .ok_or_else(|| AXError::AppNotFound {
            identifier: "<frontmost>".to_owned(),
        })
}

/// Resolve an optional `--app` value; `None` means the frontmost app.
///
/// # Errors
///
/// Returns `Err(AXError::AppNotFound)` if the app cannot be resolved.
pub fn resolve_target(app: Option<&str>) -> Result<i32, AXError> {
    match app {
        Some(identifier) => resolve_app_pid(identifier),
        None => frontmost_app_pid(),
    }
}
