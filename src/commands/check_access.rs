/// `check-access` command: verify Accessibility permission is granted.
use crate::ax::{ensure_trusted, permission_instructions};
use crate::cli::{OutputCtx, OutputFormat};

use super::CommandError;

/// Run `hotkeyctl check-access`.
///
/// Reading live menus with `--app` needs this permission; global hotkeys
/// do not.
///
/// # Errors
///
/// Returns `CommandError::AccessDenied` if permission is not granted.
pub fn run(ctx: &OutputCtx) -> Result<(), CommandError> {
    ensure_trusted().map_err(|_| CommandError::AccessDenied)?;

    match ctx.format {
        OutputFormat::Json | OutputFormat::Compact | OutputFormat::Ndjson => {
            println!(r#"{{"ok":true,"message":"Accessibility permission granted"}}"#);
        }
        _ => {
            println!("Accessibility permission granted.");
            println!("{}", permission_instructions());
        }
    }
    Ok(())
}
