/// `flags` command: decode a modifier mask and show it in every encoding.
use crate::cli::OutputCtx;
use crate::cli::args::FlagsArgs;
use crate::cli::output::write_flags;
use crate::keys::flags::toolkit_to_legacy;
use crate::keys::render::string_for_toolkit_flags;
use crate::types::FlagsOutput;

use super::render::decode;
use super::{CommandError, parse_flags};

/// Run `hotkeyctl flags`.
///
/// # Errors
///
/// Returns `CommandError::InvalidArgument` if the flags do not parse.
pub fn run(args: &FlagsArgs, ctx: &OutputCtx) -> Result<(), CommandError> {
    let modifiers = decode(parse_flags(&args.flags)?, args.from)?;
    let toolkit = modifiers.to_toolkit();
    let result = FlagsOutput {
        modifiers: modifiers.names(),
        glyphs: string_for_toolkit_flags(toolkit),
        toolkit_flags: toolkit,
        legacy_flags: toolkit_to_legacy(toolkit),
    };
    write_flags(&result, ctx);
    Ok(())
}
