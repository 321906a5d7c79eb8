/// `parse` command: turn human notation into a key combination.
use crate::cli::OutputCtx;
use crate::cli::args::ParseArgs;
use crate::cli::output::write_combo;
use crate::config::Config;
use crate::keys::{KeyCombo, Renderer, UsAnsiLayout};
use crate::types::ComboOutput;

use super::CommandError;

/// Run `hotkeyctl parse`.
///
/// # Errors
///
/// Returns `CommandError::Combo` if the shortcut does not parse.
pub fn run(args: &ParseArgs, config: &Config, ctx: &OutputCtx) -> Result<(), CommandError> {
    let combo = KeyCombo::parse(&args.shortcut, &UsAnsiLayout)?;
    let strings = config.strings();
    let renderer = Renderer::new(&UsAnsiLayout, &strings);
    write_combo(&ComboOutput::new(&combo, &renderer), ctx);
    Ok(())
}
