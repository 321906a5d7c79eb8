/// `render` command: show a key code and modifier flags as text.
use crate::cli::OutputCtx;
use crate::cli::args::{Encoding, RenderArgs};
use crate::cli::output::write_render;
use crate::config::Config;
use crate::keys::{Modifiers, Renderer, UsAnsiLayout};
use crate::types::RenderOutput;

use super::{CommandError, parse_flags};

/// Decode `flags` in the given encoding.
pub(crate) fn decode(flags: u64, encoding: Encoding) -> Result<Modifiers, CommandError> {
    Ok(match encoding {
        Encoding::Toolkit => Modifiers::from_toolkit(flags),
        Encoding::Legacy => Modifiers::from_legacy(flags),
        Encoding::Ax => Modifiers::from_ax_menu_mask(i64::try_from(flags).map_err(|_| {
            CommandError::InvalidArgument {
                what: "AX modifier mask",
                value: flags.to_string(),
            }
        })?),
    })
}

/// Run `hotkeyctl render`.
///
/// # Errors
///
/// Returns `CommandError::InvalidArgument` if the flags do not parse.
pub fn run(args: &RenderArgs, config: &Config, ctx: &OutputCtx) -> Result<(), CommandError> {
    let flags = parse_flags(&args.flags)?;
    let modifiers = decode(flags, args.encoding)?;

    let strings = config.strings();
    let renderer = Renderer::new(&UsAnsiLayout, &strings);
    let code = args.key_code;
    let (glyphs, readable, characters) = match args.encoding {
        Encoding::Legacy => (
            renderer.string_for_legacy_flags_and_key_code(flags, code),
            renderer.readable_string_for_legacy_flags_and_key_code(flags, code),
            renderer.character_for_key_code_and_legacy_flags(code, flags),
        ),
        Encoding::Toolkit | Encoding::Ax => {
            let toolkit = modifiers.to_toolkit();
            (
                renderer.string_for_toolkit_flags_and_key_code(toolkit, code),
                renderer.readable_string_for_toolkit_flags_and_key_code(toolkit, code),
                renderer.character_for_key_code_and_toolkit_flags(code, toolkit),
            )
        }
    };
    let result = RenderOutput {
        key_code: code,
        glyphs,
        readable,
        characters,
        toolkit_flags: modifiers.to_toolkit(),
        legacy_flags: modifiers.to_legacy(),
    };
    write_render(&result, ctx);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_encodings() {
        assert_eq!(decode(1 << 20, Encoding::Toolkit).unwrap(), Modifiers::COMMAND);
        assert_eq!(decode(1 << 8, Encoding::Legacy).unwrap(), Modifiers::COMMAND);
        assert_eq!(
            decode(0x1, Encoding::Ax).unwrap(),
            Modifiers::COMMAND | Modifiers::SHIFT
        );
        assert!(decode(u64::MAX, Encoding::Ax).is_err());
    }
}
