/// `keys` command: the key code table.
use crate::cli::OutputCtx;
use crate::cli::args::KeysArgs;
use crate::cli::output::{escape_key_equivalent, write_keys};
use crate::config::Config;
use crate::keys::codes::{self, KeyCode};
use crate::keys::{KeyboardLayout, Modifiers, Renderer, UsAnsiLayout};
use crate::types::KeyInfoOutput;

use super::CommandError;

/// Highest virtual key code on Apple keyboards.
const MAX_KEY_CODE: KeyCode = 127;

/// Describe `code`, or `None` if it is neither named nor on the layout.
fn key_info(code: KeyCode, renderer: &Renderer<'_>) -> Option<KeyInfoOutput> {
    let name = codes::name_for_key_code(code)
        .or_else(|| UsAnsiLayout.character(code, Modifiers::empty()))?;
    let special = codes::is_special_key(code);
    Some(KeyInfoOutput {
        key_code: code,
        name,
        glyph: renderer.string_for_key_code(i64::from(code)),
        key_equivalent: codes::menu_key_equivalent_for_special(code)
            .map(|ke| escape_key_equivalent(&ke)),
        special,
        function: codes::is_function_key(code),
    })
}

/// Run `hotkeyctl keys`.
///
/// # Errors
///
/// Infallible; returns `Result` for dispatch symmetry.
pub fn run(args: &KeysArgs, config: &Config, ctx: &OutputCtx) -> Result<(), CommandError> {
    let strings = config.strings();
    let renderer = Renderer::new(&UsAnsiLayout, &strings);
    let keys: Vec<KeyInfoOutput> = (0..=MAX_KEY_CODE)
        .filter_map(|code| key_info(code, &renderer))
        .filter(|k| !args.special || k.special)
        .collect();
    write_keys(&keys, ctx);
    Ok(())
}
