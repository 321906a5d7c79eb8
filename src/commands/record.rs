/// `record` command: run key presses through the headless recorder.
use std::io::BufRead;

use serde_json::{Map, Value};
use tracing::debug;

use crate::cli::OutputCtx;
use crate::cli::args::RecordArgs;
use crate::cli::output::write_record;
use crate::config::Config;
use crate::keys::{KeyCombo, KeyDownOutcome, Recorder, Renderer, UsAnsiLayout};
use crate::types::{ComboOutput, RecordOutput, RecordStepOutput};

use super::{CommandError, build_validator, load_menu, parse_modifiers};

/// Build the recorder `args` describe.
fn build_recorder(args: &RecordArgs, config: &Config, ctx: &OutputCtx) -> Result<Recorder, CommandError> {
    let menu = load_menu(&args.source, ctx)?;
    let mut recorder = Recorder::new()
        .with_validator(build_validator(config, Some(&args.source)), menu)
        .with_strings(config.strings());

    if let Some(allowed) = &args.allowed {
        recorder.set_allowed_modifiers(parse_modifiers(allowed)?);
    }
    if let Some(required) = &args.required {
        recorder.set_required_modifiers(parse_modifiers(required)?);
    }
    recorder.set_allows_bare_keys(args.allow_bare_keys);
    if args.record_escape {
        recorder.set_records_escape_key(true);
    }

    if let Some(initial) = &args.initial {
        let mapping: Map<String, Value> =
            serde_json::from_str(initial).map_err(|_| CommandError::InvalidArgument {
                what: "initial value",
                value: initial.clone(),
            })?;
        recorder.set_object_value(&mapping)?;
    }
    Ok(recorder)
}

/// Key presses from the arguments, or stdin lines when there are none.
fn read_presses(args: &RecordArgs) -> Result<Vec<String>, CommandError> {
    if !args.presses.is_empty() {
        return Ok(args.presses.clone());
    }
    let mut presses = Vec::new();
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            presses.push(line.trim().to_owned());
        }
    }
    Ok(presses)
}

/// Run `hotkeyctl record`.
///
/// # Errors
///
/// Returns `CommandError` for unparseable presses or options, or an
/// unreadable menu.
pub fn run(args: &RecordArgs, config: &Config, ctx: &OutputCtx) -> Result<(), CommandError> {
    let mut recorder = build_recorder(args, config, ctx)?;
    let strings = config.strings();
    let renderer = Renderer::new(&UsAnsiLayout, &strings);

    let mut steps = Vec::new();
    for input in read_presses(args)? {
        let press = KeyCombo::parse(&input, &UsAnsiLayout)?;
        let Some(code) = press.code() else {
            continue;
        };
        let outcome = recorder.handle_key_down(code, press.modifiers());
        debug!(%input, ?outcome, "key press");

        let (outcome, reason) = match outcome {
            KeyDownOutcome::Recorded(_) => ("recorded", None),
            KeyDownOutcome::Cancelled => ("cancelled", None),
            KeyDownOutcome::Cleared => ("cleared", None),
            KeyDownOutcome::Rejected(reason) => ("rejected", Some(reason)),
        };
        steps.push(RecordStepOutput {
            input,
            outcome,
            reason,
            combo: ComboOutput::new(recorder.combo(), &renderer),
        });
    }

    let result = RecordOutput {
        steps,
        value: recorder.object_value(),
    };
    write_record(&result, ctx);
    Ok(())
}
