/// `listen` command: register configured hotkeys and react when they fire.
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyEventReceiver, HotKeyState};
use tracing::{debug, info, warn};

use crate::cli::OutputCtx;
use crate::cli::args::ListenArgs;
use crate::cli::output::{write_fire, write_registrations};
use crate::config::Config;
use crate::hotkey::{GlobalHotKeyBackend, HotKey, HotKeyCenter};
use crate::keys::{Renderer, Strings, UsAnsiLayout};
use crate::types::{FireOutput, RegistrationOutput};

use super::CommandError;

/// How long one wait for a hotkey event lasts.
const POLL: Duration = Duration::from_millis(100);

/// Target of every registered hotkey's action.
struct Listener {
    ctx: OutputCtx,
    strings: Strings,
    exec: bool,
    commands: HashMap<String, String>,
    fired: Cell<u32>,
}

impl Listener {
    fn fire(&self, hotkey: &HotKey) {
        let command = self.commands.get(hotkey.identifier()).cloned();
        let exit_code = match &command {
            Some(cmd) if self.exec => run_shell(cmd),
            _ => None,
        };
        let renderer = Renderer::new(&UsAnsiLayout, &self.strings);
        write_fire(
            &FireOutput {
                identifier: hotkey.identifier().to_owned(),
                name: hotkey.name().to_owned(),
                shortcut: hotkey.combo().string(&renderer),
                command,
                exit_code,
            },
            &self.ctx,
        );
        self.fired.set(self.fired.get() + 1);
    }
}

/// Run `cmd` through `sh -c` and wait for it.
fn run_shell(cmd: &str) -> Option<i32> {
    debug!(%cmd, "running hotkey command");
    match std::process::Command::new("sh").arg("-c").arg(cmd).status() {
        Ok(status) => status.code(),
        Err(e) => {
            warn!(%cmd, error = %e, "failed to run hotkey command");
            None
        }
    }
}

/// Wait up to [`POLL`] for the next hotkey event.
#[cfg(target_os = "macos")]
fn next_event(receiver: &GlobalHotKeyEventReceiver) -> Option<GlobalHotKeyEvent> {
    use core_foundation::runloop::{CFRunLoop, kCFRunLoopDefaultMode};

    if let Ok(event) = receiver.try_recv() {
        return Some(event);
    }
    // Hotkey events are delivered through the main run loop.
    // SAFETY: reading an immutable framework constant.
    let mode = unsafe { kCFRunLoopDefaultMode };
    CFRunLoop::run_in_mode(mode, POLL, true);
    receiver.try_recv().ok()
}

/// Wait up to [`POLL`] for the next hotkey event.
#[cfg(not(target_os = "macos"))]
fn next_event(receiver: &GlobalHotKeyEventReceiver) -> Option<GlobalHotKeyEvent> {
    receiver.recv_timeout(POLL).ok()
}

/// Run `hotkeyctl listen`.
///
/// Registers every configured hotkey, prints the registrations, then reports
/// each press (running its command unless `--no-exec`) until interrupted, or
/// after the first press with `--once`.
///
/// # Errors
///
/// Returns `CommandError` if the hotkey manager cannot start or no hotkey
/// could be registered.
pub fn run(args: &ListenArgs, config: &Config, ctx: &OutputCtx) -> Result<(), CommandError> {
    let strings = config.strings();
    let renderer = Renderer::new(&UsAnsiLayout, &strings);

    let listener = Rc::new(Listener {
        ctx: OutputCtx {
            format: ctx.format,
            no_header: ctx.no_header,
            debug: ctx.debug,
        },
        strings: config.strings(),
        exec: !args.no_exec,
        commands: config
            .hotkeys
            .iter()
            .filter_map(|h| Some((h.identifier.clone(), h.command.clone()?)))
            .collect(),
        fired: Cell::new(0),
    });

    let mut center = HotKeyCenter::new(GlobalHotKeyBackend::new()?);
    let mut registrations = Vec::with_capacity(config.hotkeys.len());
    for entry in &config.hotkeys {
        let mut out = RegistrationOutput {
            identifier: entry.identifier.clone(),
            shortcut: String::new(),
            id: None,
            error: None,
        };
        match entry.combo(&UsAnsiLayout) {
            Ok(combo) => {
                out.shortcut = combo.string(&renderer);
                let hotkey = HotKey::new(&entry.identifier, entry.name(), combo)
                    .with_action(&listener, Listener::fire);
                match center.register(hotkey) {
                    Ok(registration) => out.id = Some(registration.id),
                    Err(e) => {
                        warn!(identifier = %entry.identifier, error = %e, "hotkey not registered");
                        out.error = Some(e.to_string());
                    }
                }
            }
            Err(e) => out.error = Some(e.to_string()),
        }
        registrations.push(out);
    }
    write_registrations(&registrations, ctx);

    if center.is_empty() {
        return Err(CommandError::NoHotKeys);
    }
    info!(count = center.len(), "listening for hotkeys");

    let receiver = GlobalHotKeyEvent::receiver();
    loop {
        let Some(event) = next_event(receiver) else {
            continue;
        };
        if event.state() != HotKeyState::Pressed {
            continue;
        }
        if center.dispatch(event.id()) && args.once {
            break;
        }
    }
    debug!(fired = listener.fired.get(), "listener done");
    Ok(())
}
