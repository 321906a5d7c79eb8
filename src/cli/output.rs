/// Output formatting: JSON, table, plain modes. TTY detection.
use std::io::{IsTerminal, Write};

use comfy_table::{Cell, Table, presets::UTF8_BORDERS_ONLY};
use serde::Serialize;

use super::args::OutputFormat;
use crate::types::{
    CheckOutput, ComboOutput, FireOutput, FlagsOutput, HotKeyOutput, KeyInfoOutput,
    RecordOutput, RegistrationOutput, RenderOutput,
};

/// Resolve the effective output format, handling `--json` flag and TTY auto-detection.
#[must_use]
pub fn resolve_format(fmt: OutputFormat, json_flag: bool) -> OutputFormat {
    if json_flag {
        return OutputFormat::Json;
    }
    if fmt == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        fmt
    }
}

/// Output context passed to all formatters.
pub struct OutputCtx {
    pub format: OutputFormat,
    pub no_header: bool,
    /// When true, print timing spans to stderr.
    pub debug: bool,
}

impl OutputCtx {
    /// Construct from CLI args.
    #[must_use]
    pub fn new(fmt: OutputFormat, json_flag: bool, no_header: bool, debug: bool) -> Self {
        Self {
            format: resolve_format(fmt, json_flag),
            no_header,
            debug,
        }
    }

    /// Start a named debug timer. Prints elapsed on drop only when `--debug` is set.
    #[must_use]
    pub fn timer(&self, label: &'static str) -> DebugTimer {
        DebugTimer::new(label, self.debug)
    }

    fn table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        if !self.no_header {
            table.set_header(headers.iter().map(Cell::new));
        }
        table
    }
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}

/// Print one object in a JSON mode. Returns `false` for non-JSON formats.
fn write_json_object<T: Serialize>(value: &T, ctx: &OutputCtx) -> bool {
    match ctx.format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Compact | OutputFormat::Ndjson => print_compact_json(value),
        _ => return false,
    }
    true
}

/// Print a list in a JSON mode. Returns `false` for non-JSON formats.
fn write_json_list<T: Serialize>(values: &[T], ctx: &OutputCtx) -> bool {
    match ctx.format {
        OutputFormat::Json => print_json(values),
        OutputFormat::Compact => print_compact_json(values),
        OutputFormat::Ndjson => print_ndjson(values),
        _ => return false,
    }
    true
}

/// Two-column FIELD / VALUE table.
fn write_fields(rows: &[(&str, String)], ctx: &OutputCtx) {
    let mut table = ctx.table(&["FIELD", "VALUE"]);
    for (field, value) in rows {
        table.add_row([*field, value.as_str()]);
    }
    println!("{table}");
}

fn combo_rows(combo: &ComboOutput) -> Vec<(&'static str, String)> {
    vec![
        ("shortcut", combo.shortcut.clone()),
        ("readable", combo.readable.clone()),
        ("key code", combo.key_code.to_string()),
        ("key equivalent", escape_key_equivalent(&combo.key_equivalent)),
        ("toolkit flags", format!("{:#x}", combo.toolkit_flags)),
        ("legacy flags", format!("{:#x}", combo.legacy_flags)),
        ("special", yes_no(combo.special).to_owned()),
    ]
}

/// Printable form of a key equivalent: control and private-use characters
/// as `U+XXXX`.
#[must_use]
pub fn escape_key_equivalent(key_equivalent: &str) -> String {
    key_equivalent
        .chars()
        .map(|c| {
            if c.is_control() || ('\u{E000}'..='\u{F8FF}').contains(&c) || c == ' ' {
                format!("U+{:04X}", c as u32)
            } else {
                c.to_string()
            }
        })
        .collect()
}

// --- Single combination ---

/// Write a parsed combination to stdout.
pub fn write_combo(combo: &ComboOutput, ctx: &OutputCtx) {
    if write_json_object(combo, ctx) {
        return;
    }
    match ctx.format {
        OutputFormat::Plain => println!("{}", combo.shortcut),
        _ => write_fields(&combo_rows(combo), ctx),
    }
}

/// Write a `render` result to stdout.
pub fn write_render(result: &RenderOutput, ctx: &OutputCtx) {
    if write_json_object(result, ctx) {
        return;
    }
    match ctx.format {
        OutputFormat::Plain => println!("{}", result.glyphs),
        _ => write_fields(
            &[
                ("glyphs", result.glyphs.clone()),
                ("readable", result.readable.clone()),
                ("characters", escape_key_equivalent(&result.characters)),
                ("key code", result.key_code.to_string()),
                ("toolkit flags", format!("{:#x}", result.toolkit_flags)),
                ("legacy flags", format!("{:#x}", result.legacy_flags)),
            ],
            ctx,
        ),
    }
}

/// Write a `flags` result to stdout.
pub fn write_flags(result: &FlagsOutput, ctx: &OutputCtx) {
    if write_json_object(result, ctx) {
        return;
    }
    match ctx.format {
        OutputFormat::Plain => println!("{}", result.glyphs),
        _ => write_fields(
            &[
                ("modifiers", result.modifiers.join(", ")),
                ("glyphs", result.glyphs.clone()),
                ("toolkit", format!("{:#x}", result.toolkit_flags)),
                ("legacy", format!("{:#x}", result.legacy_flags)),
            ],
            ctx,
        ),
    }
}

// --- Check ---

/// Write a `check` result to stdout.
pub fn write_check(result: &CheckOutput, ctx: &OutputCtx) {
    if write_json_object(result, ctx) {
        return;
    }
    let verdict = result
        .conflict
        .as_ref()
        .map_or_else(|| "available".to_owned(), |c| c.reason.clone());
    match ctx.format {
        OutputFormat::Plain => println!("{}\t{verdict}", result.combo.shortcut),
        _ => {
            let mut rows = vec![
                ("shortcut", result.combo.shortcut.clone()),
                ("taken", yes_no(result.taken).to_owned()),
            ];
            if let Some(conflict) = &result.conflict {
                rows.push(("source", format!("{:?}", conflict.kind).to_lowercase()));
                rows.push(("reason", conflict.reason.clone()));
                if let Some(path) = &conflict.item_path {
                    rows.push(("menu item", path.clone()));
                }
            }
            write_fields(&rows, ctx);
        }
    }
}

// --- Record ---

/// Write a recording session to stdout.
pub fn write_record(result: &RecordOutput, ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Json => print_json(result),
        OutputFormat::Compact => print_compact_json(result),
        OutputFormat::Ndjson => print_ndjson(&result.steps),
        OutputFormat::Plain => {
            if let Some(last) = result.steps.last() {
                println!("{}", last.combo.shortcut);
            }
        }
        OutputFormat::Table | OutputFormat::Auto => {
            let mut table = ctx.table(&["INPUT", "OUTCOME", "VALUE", "REASON"]);
            for step in &result.steps {
                table.add_row([
                    step.input.as_str(),
                    step.outcome,
                    step.combo.shortcut.as_str(),
                    step.reason.as_deref().unwrap_or(""),
                ]);
            }
            println!("{table}");
        }
    }
}

// --- Keys ---

/// Write the key table to stdout.
pub fn write_keys(keys: &[KeyInfoOutput], ctx: &OutputCtx) {
    if write_json_list(keys, ctx) {
        return;
    }
    match ctx.format {
        OutputFormat::Plain => {
            for key in keys {
                println!("{}", key.name);
            }
        }
        _ => {
            let mut table = ctx.table(&["CODE", "NAME", "GLYPH", "KEY EQUIVALENT", "SPECIAL"]);
            for key in keys {
                table.add_row([
                    key.key_code.to_string().as_str(),
                    key.name.as_str(),
                    key.glyph.as_str(),
                    key.key_equivalent.as_deref().unwrap_or(""),
                    if key.function {
                        "function"
                    } else if key.special {
                        "yes"
                    } else {
                        ""
                    },
                ]);
            }
            println!("{table}");
        }
    }
}

// --- Configured hotkeys ---

/// Write configured hotkeys to stdout.
pub fn write_hotkeys(hotkeys: &[HotKeyOutput], ctx: &OutputCtx) {
    if write_json_list(hotkeys, ctx) {
        return;
    }
    match ctx.format {
        OutputFormat::Plain => {
            for hk in hotkeys {
                let shortcut = hk.combo.as_ref().map_or("", |c| c.shortcut.as_str());
                println!("{}\t{shortcut}", hk.identifier);
            }
        }
        _ => {
            let mut table = ctx.table(&["IDENTIFIER", "NAME", "SHORTCUT", "COMMAND", "STATUS"]);
            for hk in hotkeys {
                let status = match (&hk.error, &hk.conflict) {
                    (Some(e), _) => e.clone(),
                    (None, Some(c)) => c.reason.clone(),
                    (None, None) => "ok".to_owned(),
                };
                table.add_row([
                    hk.identifier.as_str(),
                    hk.name.as_str(),
                    hk.combo.as_ref().map_or("", |c| c.shortcut.as_str()),
                    hk.command.as_deref().unwrap_or(""),
                    status.as_str(),
                ]);
            }
            println!("{table}");
        }
    }
}

/// Write `listen` registrations to stdout.
pub fn write_registrations(registrations: &[RegistrationOutput], ctx: &OutputCtx) {
    if write_json_list(registrations, ctx) {
        return;
    }
    match ctx.format {
        OutputFormat::Plain => {
            for r in registrations.iter().filter(|r| r.id.is_some()) {
                println!("{}\t{}", r.identifier, r.shortcut);
            }
        }
        _ => {
            let mut table = ctx.table(&["IDENTIFIER", "SHORTCUT", "ID", "STATUS"]);
            for r in registrations {
                table.add_row([
                    r.identifier.as_str(),
                    r.shortcut.as_str(),
                    r.id.map(|id| id.to_string()).unwrap_or_default().as_str(),
                    r.error.as_deref().unwrap_or("registered"),
                ]);
            }
            println!("{table}");
        }
    }
}

/// Write one hotkey press to stdout, flushing so pipes see it immediately.
pub fn write_fire(fire: &FireOutput, ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Json | OutputFormat::Compact | OutputFormat::Ndjson => {
            print_compact_json(fire);
        }
        OutputFormat::Plain => println!("{}", fire.identifier),
        OutputFormat::Table | OutputFormat::Auto => {
            let status = fire
                .exit_code
                .map(|code| format!(" (exit {code})"))
                .unwrap_or_default();
            println!("{}  {}{status}", fire.shortcut, fire.name);
        }
    }
    let _ = std::io::stdout().flush();
}

// --- Error output ---

/// Write a structured error to stderr.
pub fn write_error(err: &crate::types::ErrorOutput, format: OutputFormat, json_flag: bool) {
    let fmt = resolve_format(format, json_flag);
    let stderr = std::io::stderr();
    let mut out = stderr.lock();
    match fmt {
        OutputFormat::Json | OutputFormat::Compact | OutputFormat::Ndjson => {
            let s = serde_json::to_string_pretty(err).unwrap_or_default();
            let _ = writeln!(out, "{s}");
        }
        _ => {
            let _ = writeln!(out, "Error: {}", err.error.message);
        }
    }
}

// --- Debug timer ---

/// A RAII timer that prints elapsed milliseconds to stderr on drop.
///
/// Created via [`OutputCtx::timer`]. Does nothing when `debug` is false.
pub struct DebugTimer {
    label: &'static str,
    start: std::time::Instant,
    active: bool,
}

impl DebugTimer {
    #[must_use]
    fn new(label: &'static str, active: bool) -> Self {
        Self {
            label,
            start: std::time::Instant::now(),
            active,
        }
    }
}

impl Drop for DebugTimer {
    fn drop(&mut self) {
        if self.active {
            let ms = self.start.elapsed().as_secs_f64() * 1000.0;
            eprintln!("[debug] {}: {ms:.2}ms", self.label);
        }
    }
}

// --- Generic JSON helpers ---

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}

fn print_compact_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}

fn print_ndjson<T: Serialize>(values: &[T]) {
    for v in values {
        match serde_json::to_string(v) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("JSON serialization error: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_format_json_flag_wins() {
        assert_eq!(resolve_format(OutputFormat::Table, true), OutputFormat::Json);
        assert_eq!(resolve_format(OutputFormat::Plain, false), OutputFormat::Plain);
    }

    #[test]
    fn test_escape_key_equivalent() {
        assert_eq!(escape_key_equivalent("s"), "s");
        assert_eq!(escape_key_equivalent("\u{F700}"), "U+F700");
        assert_eq!(escape_key_equivalent("\r"), "U+000D");
        assert_eq!(escape_key_equivalent(" "), "U+0020");
    }
}
