/// CLI argument definitions via clap derive.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// hotkeyctl: render, validate, record and register macOS keyboard shortcuts.
#[derive(Debug, Parser)]
#[command(
    name = "hotkeyctl",
    about = "Render, validate, record and register macOS keyboard shortcuts from the CLI",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output format. Auto-detects: table when TTY, json when piped.
    #[arg(long, global = true, value_name = "FORMAT", default_value = "auto")]
    pub output: OutputFormat,

    /// Shorthand for --output json.
    #[arg(long, global = true, conflicts_with = "output")]
    pub json: bool,

    /// Omit table headers (useful for awk/cut processing).
    #[arg(long, global = true)]
    pub no_header: bool,

    /// Debug logging and timing on stderr.
    #[arg(long, global = true)]
    pub debug: bool,

    /// Configuration file (default: <config dir>/hotkeyctl/hotkeyctl.toml).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Auto-detect: table when stdout is a TTY, json when piped.
    #[default]
    Auto,
    /// JSON array or object (pretty-printed).
    Json,
    /// Compact single-line JSON.
    Compact,
    /// Newline-delimited JSON (one object per line).
    Ndjson,
    /// Aligned table with headers (human-readable).
    Table,
    /// The rendered shortcut only, one per line.
    Plain,
}

/// Modifier flag encodings accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Encoding {
    /// Desktop toolkit (Cocoa) modifier flags.
    #[default]
    Toolkit,
    /// Legacy event-manager (Carbon) modifier flags.
    Legacy,
    /// Accessibility menu-item modifier mask.
    Ax,
}

/// All subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render a key code with modifier flags as glyphs and readable text.
    Render(RenderArgs),
    /// Decode modifier flags and convert between encodings.
    Flags(FlagsArgs),
    /// Parse a shortcut like "cmd+shift+s" into a key combination.
    Parse(ParseArgs),
    /// Check whether a shortcut is already taken.
    Check(CheckArgs),
    /// Feed key presses through a recorder and report what it accepts.
    Record(RecordArgs),
    /// List known key codes with their names and glyphs.
    Keys(KeysArgs),
    /// List hotkeys from the configuration file.
    List(ListArgs),
    /// Register configured hotkeys and report (or run) them when pressed.
    Listen(ListenArgs),
    /// Check if Accessibility permission is granted.
    #[cfg(target_os = "macos")]
    CheckAccess,
}

/// Arguments for `hotkeyctl render`.
#[derive(Debug, Parser)]
pub struct RenderArgs {
    /// Virtual key code (-1 for none).
    #[arg(allow_negative_numbers = true)]
    pub key_code: i64,

    /// Modifier flags, decimal or 0x-prefixed hex.
    #[arg(long, value_name = "FLAGS", default_value = "0")]
    pub flags: String,

    /// Encoding of --flags.
    #[arg(long, value_name = "ENCODING", default_value = "toolkit")]
    pub encoding: Encoding,
}

/// Arguments for `hotkeyctl flags`.
#[derive(Debug, Parser)]
pub struct FlagsArgs {
    /// Modifier flags, decimal or 0x-prefixed hex.
    pub flags: String,

    /// Encoding of the input.
    #[arg(long, value_name = "ENCODING", default_value = "toolkit")]
    pub from: Encoding,
}

/// Arguments for `hotkeyctl parse`.
#[derive(Debug, Parser)]
pub struct ParseArgs {
    /// Shortcut in human notation: "cmd+shift+s", "⌥⌘←", "ctrl+f5".
    pub shortcut: String,
}

/// Where to find the menu to check against.
#[derive(Debug, Args)]
pub struct MenuSourceArgs {
    /// Menu document (JSON) to check against.
    #[arg(long, value_name = "FILE")]
    pub menu: Option<PathBuf>,

    /// Check against a running application's menu bar (macOS).
    /// Name, PID, or bundle ID; "front" for the frontmost app.
    #[arg(long, value_name = "NAME|PID|BUNDLE_ID", conflicts_with = "menu")]
    pub app: Option<String>,

    /// Ignore disabled menu items.
    #[arg(long)]
    pub skip_disabled: bool,

    /// Ignore hidden and alternate menu items.
    #[arg(long)]
    pub skip_hidden: bool,
}

/// Arguments for `hotkeyctl check`.
#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// Shortcut in human notation.
    pub shortcut: String,

    #[command(flatten)]
    pub source: MenuSourceArgs,
}

/// Arguments for `hotkeyctl record`.
#[derive(Debug, Parser)]
pub struct RecordArgs {
    /// Key presses in human notation ("cmd+s", "escape", "delete").
    /// Read from stdin, one per line, when none are given.
    pub presses: Vec<String>,

    /// Modifiers the recorder keeps; others are dropped ("cmd,opt").
    #[arg(long, value_name = "MODIFIERS")]
    pub allowed: Option<String>,

    /// Modifiers every recorded shortcut must include.
    #[arg(long, value_name = "MODIFIERS")]
    pub required: Option<String>,

    /// Accept keys without modifiers.
    #[arg(long)]
    pub allow_bare_keys: bool,

    /// Record a bare Escape instead of cancelling (implies --allow-bare-keys).
    #[arg(long)]
    pub record_escape: bool,

    /// Starting value, as a key-combination mapping (JSON).
    #[arg(long, value_name = "JSON")]
    pub initial: Option<String>,

    #[command(flatten)]
    pub source: MenuSourceArgs,
}

/// Arguments for `hotkeyctl keys`.
#[derive(Debug, Parser)]
pub struct KeysArgs {
    /// Only special keys (function, navigation, editing).
    #[arg(long)]
    pub special: bool,
}

/// Arguments for `hotkeyctl list`.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Also check each hotkey for conflicts.
    #[arg(long)]
    pub check: bool,
}

/// Arguments for `hotkeyctl listen`.
#[derive(Debug, Parser)]
pub struct ListenArgs {
    /// Exit after the first hotkey fires.
    #[arg(long)]
    pub once: bool,

    /// Report presses without running the configured commands.
    #[arg(long)]
    pub no_exec: bool,
}
