/// Command dispatch: routes `Command` enum variants to their implementations.
#[cfg(target_os = "macos")]
pub mod check_access;
pub mod check;
pub mod errors;
pub mod flags;
pub mod keys;
pub mod list;
pub mod listen;
pub mod parse;
pub mod record;
pub mod render;

pub use errors::CommandError;

use crate::cli::OutputCtx;
use crate::cli::args::{Command, MenuSourceArgs};
use crate::config::Config;
use crate::keys::Modifiers;
use crate::validate::{self, Menu, ScanOptions, Validator};

/// Dispatch a parsed `Command` to its handler.
///
/// # Errors
///
/// Returns `CommandError` on any command failure.
pub fn dispatch(command: &Command, config: &Config, ctx: &OutputCtx) -> Result<(), CommandError> {
    match command {
        Command::Render(args) => render::run(args, config, ctx),
        Command::Flags(args) => flags::run(args, ctx),
        Command::Parse(args) => parse::run(args, config, ctx),
        Command::Check(args) => check::run(args, config, ctx),
        Command::Record(args) => record::run(args, config, ctx),
        Command::Keys(args) => keys::run(args, config, ctx),
        Command::List(args) => list::run(args, config, ctx),
        Command::Listen(args) => listen::run(args, config, ctx),
        #[cfg(target_os = "macos")]
        Command::CheckAccess => check_access::run(ctx),
    }
}

/// Parse a flag mask given as decimal or `0x` hex.
///
/// # Errors
///
/// Returns `CommandError::InvalidArgument` if the value is not a number.
pub fn parse_flags(value: &str) -> Result<u64, CommandError> {
    let trimmed = value.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse(),
    };
    parsed.map_err(|_| CommandError::InvalidArgument {
        what: "modifier flags",
        value: value.to_owned(),
    })
}

/// Parse a modifier list such as `cmd,shift`.
///
/// # Errors
///
/// Returns `CommandError::InvalidArgument` for unknown names.
pub fn parse_modifiers(value: &str) -> Result<Modifiers, CommandError> {
    Modifiers::from_names(value).ok_or_else(|| CommandError::InvalidArgument {
        what: "modifier list",
        value: value.to_owned(),
    })
}

/// Validator configured from the config file and `--skip-*` flags.
pub fn build_validator(config: &Config, source: Option<&MenuSourceArgs>) -> Validator {
    let options = ScanOptions {
        skip_disabled: config.validator.skip_disabled
            || source.is_some_and(|s| s.skip_disabled),
        skip_hidden: config.validator.skip_hidden || source.is_some_and(|s| s.skip_hidden),
    };
    Validator::new()
        .with_options(options)
        .with_strings(config.strings())
}

/// Load the menu named by `--menu` or `--app`, if any.
///
/// # Errors
///
/// Returns `CommandError::MenuSource` if the menu cannot be read.
pub fn load_menu(source: &MenuSourceArgs, ctx: &OutputCtx) -> Result<Option<Menu>, CommandError> {
    if let Some(path) = &source.menu {
        let _t = ctx.timer("load_menu_file");
        return Ok(Some(validate::load_menu_file(path)?));
    }
    if let Some(app) = &source.app {
        let _t = ctx.timer("read_app_menu");
        let target = (app != "front").then_some(app.as_str());
        return Ok(Some(validate::load_app_menu(target)?));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        assert_eq!(parse_flags("1048576").unwrap(), 1 << 20);
        assert_eq!(parse_flags("0x100").unwrap(), 256);
        assert_eq!(parse_flags(" 0X120000 ").unwrap(), 0x12_0000);
        assert!(matches!(
            parse_flags("cmd"),
            Err(CommandError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_parse_modifiers() {
        assert_eq!(
            parse_modifiers("cmd,opt").unwrap(),
            Modifiers::COMMAND | Modifiers::OPTION
        );
        assert!(parse_modifiers("cmd,meh").is_err());
    }

    #[test]
    fn test_build_validator_merges_options() {
        let mut config = Config::default();
        config.validator.skip_hidden = true;
        let source = MenuSourceArgs {
            menu: None,
            app: None,
            skip_disabled: true,
            skip_hidden: false,
        };
        let validator = build_validator(&config, Some(&source));
        assert_eq!(
            validator.options(),
            ScanOptions {
                skip_disabled: true,
                skip_hidden: true
            }
        );
    }
}
