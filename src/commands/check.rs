/// `check` command: is a shortcut already taken?
use tracing::debug;

use crate::cli::OutputCtx;
use crate::cli::args::CheckArgs;
use crate::cli::output::write_check;
use crate::config::Config;
use crate::keys::{KeyCombo, UsAnsiLayout};
use crate::types::{CheckOutput, ComboOutput};

use super::{CommandError, build_validator, load_menu};

/// Run `hotkeyctl check`.
///
/// Checks the reserved system shortcuts, then the menu from `--menu` or
/// `--app` when given. A taken shortcut is a normal result, not an error.
///
/// # Errors
///
/// Returns `CommandError` if the shortcut does not parse or the menu cannot
/// be loaded.
pub fn run(args: &CheckArgs, config: &Config, ctx: &OutputCtx) -> Result<(), CommandError> {
    let combo = KeyCombo::parse(&args.shortcut, &UsAnsiLayout)?;
    let menu = load_menu(&args.source, ctx)?;
    if let Some(menu) = &menu {
        debug!(items = menu.len(), "checking against menu");
    }

    let validator = build_validator(config, Some(&args.source));
    let conflict = {
        let _t = ctx.timer("check");
        validator.check(combo.key_code(), combo.modifiers(), menu.as_ref())
    };

    let result = CheckOutput {
        combo: ComboOutput::new(&combo, &validator.renderer()),
        taken: conflict.is_some(),
        conflict,
    };
    write_check(&result, ctx);
    Ok(())
}
