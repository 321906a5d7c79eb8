/// Shortcut validation: reserved system shortcuts, menus, caller policy.
#[cfg(target_os = "macos")]
pub mod app_menu;
pub mod errors;
pub mod menu;
pub mod reserved;
pub mod validator;

use std::path::Path;

pub use errors::MenuSourceError;
pub use menu::{Menu, MenuItem};
pub use validator::{Conflict, ConflictKind, ScanOptions, Validator};

/// Load a menu document (JSON) from `path`.
///
/// # Errors
///
/// Returns `MenuSourceError` if the file cannot be read or parsed.
pub fn load_menu_file(path: &Path) -> Result<Menu, MenuSourceError> {
    let content = std::fs::read_to_string(path).map_err(|source| MenuSourceError::Read {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| MenuSourceError::Parse {
        path: path.to_owned(),
        source,
    })
}

/// Read the live menu bar of a running application (`None` = frontmost).
///
/// # Errors
///
/// Returns `MenuSourceError` if permission is missing, the app cannot be
/// found, or the platform has no Accessibility API.
#[cfg(target_os = "macos")]
pub fn load_app_menu(app: Option<&str>) -> Result<Menu, MenuSourceError> {
    crate::ax::ensure_trusted()?;
    let pid = crate::ax::resolve_target(app)?;
    Ok(app_menu::read_menu_bar(pid)?)
}

/// Read the live menu bar of a running application (`None` = frontmost).
///
/// # Errors
///
/// Always `MenuSourceError::Unsupported` off macOS.
#[cfg(not(target_os = "macos"))]
pub fn load_app_menu(_app: Option<&str>) -> Result<Menu, MenuSourceError> {
    Err(MenuSourceError::Unsupported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_menu_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.json");
        std::fs::write(
            &path,
            r#"{"title":"","items":[{"title":"File","submenu":{"title":"File","items":[
                {"title":"Save","keyEquivalent":"s","modifierMask":1048576}]}}]}"#,
        )
        .unwrap();
        let menu = load_menu_file(&path).unwrap();
        assert_eq!(menu.len(), 2);
    }

    #[test]
    fn test_load_menu_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            load_menu_file(&missing),
            Err(MenuSourceError::Read { .. })
        ));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(
            load_menu_file(&bad),
            Err(MenuSourceError::Parse { .. })
        ));
    }
}
