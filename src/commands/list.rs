/// `list` command: hotkeys from the configuration file.
use crate::cli::OutputCtx;
use crate::cli::args::ListArgs;
use crate::cli::output::write_hotkeys;
use crate::config::Config;
use crate::keys::UsAnsiLayout;
use crate::types::{ComboOutput, HotKeyOutput};

use super::{CommandError, build_validator};

/// Run `hotkeyctl list`.
///
/// Entries whose combination does not parse are listed with an error rather
/// than failing the command.
///
/// # Errors
///
/// Infallible; returns `Result` for dispatch symmetry.
pub fn run(args: &ListArgs, config: &Config, ctx: &OutputCtx) -> Result<(), CommandError> {
    let validator = build_validator(config, None);
    let renderer = validator.renderer();

    let hotkeys: Vec<HotKeyOutput> = config
        .hotkeys
        .iter()
        .map(|entry| {
            let mut out = HotKeyOutput {
                identifier: entry.identifier.clone(),
                name: entry.name().to_owned(),
                combo: None,
                command: entry.command.clone(),
                error: None,
                conflict: None,
            };
            match entry.combo(&UsAnsiLayout) {
                Ok(combo) if combo.is_empty() => out.error = Some("no key combination".to_owned()),
                Ok(combo) => {
                    if args.check {
                        out.conflict = validator.is_taken(combo.key_code(), combo.modifiers());
                    }
                    out.combo = Some(ComboOutput::new(&combo, &renderer));
                }
                Err(e) => out.error = Some(e.to_string()),
            }
            out
        })
        .collect();

    write_hotkeys(&hotkeys, ctx);
    Ok(())
}
