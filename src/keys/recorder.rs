/// Headless shortcut recorder: what a recorder control does with a key press.
///
/// The control itself (drawing, focus, event capture) is not modeled; a
/// caller feeds key-down events into [`Recorder::handle_key_down`] and acts on
/// the returned [`KeyDownOutcome`].
use serde_json::{Map, Value};
use tracing::debug;

use crate::validate::{Menu, Validator};

use super::codes::{self, KeyCode};
use super::combo::KeyCombo;
use super::errors::ComboError;
use super::flags::Modifiers;
use super::l10n::{self, Strings};
use super::layout::{KeyboardLayout, UsAnsiLayout};
use super::render::Renderer;

/// Optional delegate hooks. Every hook may be absent.
#[derive(Default)]
pub struct RecorderDelegate {
    /// Return `false` to refuse a modifier set.
    pub are_modifier_flags_valid: Option<Box<dyn Fn(Modifiers) -> bool>>,
    /// Return `Some(reason)` when the combination is taken.
    pub is_taken: Option<Box<dyn Fn(KeyCode, Modifiers) -> Option<String>>>,
    /// Called after the stored combination changes.
    pub combo_did_change: Option<Box<dyn FnMut(&KeyCombo)>>,
}

impl std::fmt::Debug for RecorderDelegate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecorderDelegate")
            .field("are_modifier_flags_valid", &self.are_modifier_flags_valid.is_some())
            .field("is_taken", &self.is_taken.is_some())
            .field("combo_did_change", &self.combo_did_change.is_some())
            .finish()
    }
}

/// Result of feeding one key-down event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyDownOutcome {
    /// The combination was accepted and stored.
    Recorded(KeyCombo),
    /// Recording was abandoned (Escape); the stored combination is unchanged.
    Cancelled,
    /// The stored combination was cleared (Delete).
    Cleared,
    /// The combination was refused; the stored combination is unchanged.
    Rejected(String),
}

/// Recorder state and rules.
pub struct Recorder {
    combo: KeyCombo,
    allowed_modifiers: Modifiers,
    required_modifiers: Modifiers,
    allows_bare_keys: bool,
    records_escape_key: bool,
    delegate: RecorderDelegate,
    validator: Option<Validator>,
    menu: Option<Menu>,
    layout: Box<dyn KeyboardLayout>,
    strings: Strings,
}

impl std::fmt::Debug for Recorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder")
            .field("combo", &self.combo)
            .field("allowed_modifiers", &self.allowed_modifiers)
            .field("required_modifiers", &self.required_modifiers)
            .field("allows_bare_keys", &self.allows_bare_keys)
            .field("records_escape_key", &self.records_escape_key)
            .field("delegate", &self.delegate)
            .field("validator", &self.validator.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Recorder {
    /// All modifiers allowed, none required, bare keys refused.
    #[must_use]
    pub fn new() -> Self {
        Self {
            combo: KeyCombo::empty(),
            allowed_modifiers: Modifiers::all(),
            required_modifiers: Modifiers::empty(),
            allows_bare_keys: false,
            records_escape_key: false,
            delegate: RecorderDelegate::default(),
            validator: None,
            menu: None,
            layout: Box::new(UsAnsiLayout),
            strings: Strings::default(),
        }
    }

    #[must_use]
    pub fn with_delegate(mut self, delegate: RecorderDelegate) -> Self {
        self.delegate = delegate;
        self
    }

    /// Check candidates against `validator`, and `menu` if given.
    #[must_use]
    pub fn with_validator(mut self, validator: Validator, menu: Option<Menu>) -> Self {
        self.validator = Some(validator);
        self.menu = menu;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: impl KeyboardLayout + 'static) -> Self {
        self.layout = Box::new(layout);
        self
    }

    #[must_use]
    pub fn with_strings(mut self, strings: Strings) -> Self {
        self.strings = strings;
        self
    }

    pub fn allowed_modifiers(&self) -> Modifiers {
        self.allowed_modifiers
    }

    pub fn set_allowed_modifiers(&mut self, modifiers: Modifiers) {
        self.allowed_modifiers = modifiers;
    }

    pub fn required_modifiers(&self) -> Modifiers {
        self.required_modifiers
    }

    pub fn set_required_modifiers(&mut self, modifiers: Modifiers) {
        self.required_modifiers = modifiers;
    }

    pub fn allows_bare_keys(&self) -> bool {
        self.allows_bare_keys
    }

    /// Refusing bare keys also stops Escape from being recorded.
    pub fn set_allows_bare_keys(&mut self, allows: bool) {
        self.allows_bare_keys = allows;
        if !allows {
            self.records_escape_key = false;
        }
    }

    pub fn records_escape_key(&self) -> bool {
        self.records_escape_key
    }

    /// Recording a bare Escape implies allowing bare keys.
    pub fn set_records_escape_key(&mut self, records: bool) {
        self.records_escape_key = records;
        if records {
            self.allows_bare_keys = true;
        }
    }

    /// The stored combination.
    pub fn combo(&self) -> &KeyCombo {
        &self.combo
    }

    /// Replace the stored combination and notify the delegate.
    pub fn set_combo(&mut self, combo: KeyCombo) {
        if self.combo == combo {
            return;
        }
        self.combo = combo;
        if let Some(hook) = self.delegate.combo_did_change.as_mut() {
            hook(&self.combo);
        }
    }

    pub fn clear(&mut self) {
        self.set_combo(KeyCombo::empty());
    }

    /// The stored combination in mapping form.
    #[must_use]
    pub fn object_value(&self) -> Map<String, Value> {
        self.combo.to_mapping()
    }

    /// Replace the stored combination from its mapping form.
    ///
    /// # Errors
    ///
    /// Returns `ComboError::MalformedMapping` and keeps the stored value when
    /// the mapping does not describe a combination.
    pub fn set_object_value(&mut self, mapping: &Map<String, Value>) -> Result<(), ComboError> {
        let combo = KeyCombo::from_mapping(mapping).ok_or(ComboError::MalformedMapping)?;
        self.set_combo(combo);
        Ok(())
    }

    fn renderer(&self) -> Renderer<'_> {
        Renderer::new(self.layout.as_ref(), &self.strings)
    }

    fn reject(&self, key: &str, code: KeyCode, modifiers: Modifiers) -> KeyDownOutcome {
        let combo = self
            .renderer()
            .string_for_modifiers_and_key_code(modifiers, i64::from(code));
        let reason = self.strings.format(key, &[("combo", combo.as_str())]);
        debug!(code, ?modifiers, %reason, "rejected");
        KeyDownOutcome::Rejected(reason)
    }

    /// Decide what a key press does.
    ///
    /// Order: mask to allowed modifiers, Escape cancels, Delete clears,
    /// required modifiers, bare keys, delegate modifier check, conflicts.
    pub fn handle_key_down(&mut self, code: KeyCode, modifiers: Modifiers) -> KeyDownOutcome {
        let modifiers = modifiers.intersection(self.allowed_modifiers);
        let bare = modifiers.difference(Modifiers::FUNCTION).is_empty();

        if bare && codes::is_cancel_key(code) {
            if code != codes::KEY_ESCAPE {
                self.clear();
                return KeyDownOutcome::Cleared;
            }
            if !self.records_escape_key {
                debug!("recording cancelled");
                return KeyDownOutcome::Cancelled;
            }
        }

        if !modifiers.contains(self.required_modifiers) {
            return self.reject(l10n::REJECT_REQUIRED, code, modifiers);
        }

        if bare && !self.allows_bare_keys && !codes::is_function_key(code) {
            return self.reject(l10n::REJECT_BARE_KEY, code, modifiers);
        }

        if let Some(valid) = &self.delegate.are_modifier_flags_valid {
            if !valid(modifiers) {
                return self.reject(l10n::REJECT_FLAGS, code, modifiers);
            }
        }

        if let Some(validator) = &self.validator {
            if let Some(conflict) = validator.check(i64::from(code), modifiers, self.menu.as_ref()) {
                debug!(code, ?modifiers, kind = ?conflict.kind, "taken");
                return KeyDownOutcome::Rejected(conflict.reason);
            }
        }
        if let Some(is_taken) = &self.delegate.is_taken {
            if let Some(reason) = is_taken(code, modifiers) {
                debug!(code, ?modifiers, %reason, "taken by delegate");
                return KeyDownOutcome::Rejected(reason);
            }
        }

        match KeyCombo::from_key_code(code, modifiers, self.layout.as_ref()) {
            Ok(combo) => {
                self.set_combo(combo.clone());
                KeyDownOutcome::Recorded(combo)
            }
            Err(e) => KeyDownOutcome::Rejected(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::keys::codes::{KEY_DELETE_LEFT, KEY_ESCAPE, KEY_F5};
    use crate::validate::MenuItem;
    use crate::keys::flags::TOOLKIT_COMMAND;

    const KEY_S: KeyCode = 1;

    #[test]
    fn test_records_with_modifiers() {
        let mut rec = Recorder::new();
        let outcome = rec.handle_key_down(KEY_S, Modifiers::COMMAND);
        let KeyDownOutcome::Recorded(combo) = outcome else {
            panic!("expected Recorded, got {outcome:?}");
        };
        assert_eq!(combo.key_equivalent(), "s");
        assert_eq!(rec.combo(), &combo);
    }

    #[test]
    fn test_flags_masked_to_allowed() {
        let mut rec = Recorder::new();
        rec.set_allowed_modifiers(Modifiers::COMMAND);
        let outcome = rec.handle_key_down(KEY_S, Modifiers::COMMAND | Modifiers::SHIFT);
        assert!(matches!(outcome, KeyDownOutcome::Recorded(_)));
        assert_eq!(rec.combo().modifiers(), Modifiers::COMMAND);
    }

    #[test]
    fn test_escape_cancels_and_keeps_combo() {
        let mut rec = Recorder::new();
        rec.handle_key_down(KEY_S, Modifiers::COMMAND);
        let before = rec.combo().clone();
        assert_eq!(
            rec.handle_key_down(KEY_ESCAPE, Modifiers::empty()),
            KeyDownOutcome::Cancelled
        );
        assert_eq!(rec.combo(), &before);
    }

    #[test]
    fn test_escape_recorded_when_enabled() {
        let mut rec = Recorder::new();
        rec.set_records_escape_key(true);
        assert!(rec.allows_bare_keys());
        let outcome = rec.handle_key_down(KEY_ESCAPE, Modifiers::empty());
        assert!(matches!(outcome, KeyDownOutcome::Recorded(_)));
    }

    #[test]
    fn test_bare_key_setters_are_coupled() {
        let mut rec = Recorder::new();
        rec.set_records_escape_key(true);
        rec.set_allows_bare_keys(false);
        assert!(!rec.records_escape_key());
    }

    #[test]
    fn test_delete_clears() {
        let mut rec = Recorder::new();
        rec.handle_key_down(KEY_S, Modifiers::COMMAND);
        assert_eq!(
            rec.handle_key_down(KEY_DELETE_LEFT, Modifiers::empty()),
            KeyDownOutcome::Cleared
        );
        assert!(rec.combo().is_empty());
    }

    #[test]
    fn test_required_modifiers() {
        let mut rec = Recorder::new();
        rec.set_required_modifiers(Modifiers::COMMAND | Modifiers::OPTION);
        let outcome = rec.handle_key_down(KEY_S, Modifiers::COMMAND);
        assert!(matches!(outcome, KeyDownOutcome::Rejected(ref r) if r.contains("required")));
        let outcome = rec.handle_key_down(KEY_S, Modifiers::COMMAND | Modifiers::OPTION);
        assert!(matches!(outcome, KeyDownOutcome::Recorded(_)));
    }

    #[test]
    fn test_bare_keys() {
        let mut rec = Recorder::new();
        assert!(matches!(
            rec.handle_key_down(KEY_S, Modifiers::empty()),
            KeyDownOutcome::Rejected(_)
        ));
        // Function keys are fine on their own.
        assert!(matches!(
            rec.handle_key_down(KEY_F5, Modifiers::empty()),
            KeyDownOutcome::Recorded(_)
        ));
        rec.set_allows_bare_keys(true);
        assert!(matches!(
            rec.handle_key_down(KEY_S, Modifiers::empty()),
            KeyDownOutcome::Recorded(_)
        ));
    }

    #[test]
    fn test_delegate_hooks() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        let delegate = RecorderDelegate {
            are_modifier_flags_valid: Some(Box::new(|m| !m.contains(Modifiers::CONTROL))),
            is_taken: Some(Box::new(|code, _| (code == 2).then(|| "in use".to_owned()))),
            combo_did_change: Some(Box::new(move |c: &KeyCombo| sink.borrow_mut().push(c.clone()))),
        };
        let mut rec = Recorder::new().with_delegate(delegate);

        assert!(matches!(
            rec.handle_key_down(KEY_S, Modifiers::CONTROL),
            KeyDownOutcome::Rejected(_)
        ));
        assert_eq!(
            rec.handle_key_down(2, Modifiers::COMMAND),
            KeyDownOutcome::Rejected("in use".to_owned())
        );
        assert!(changes.borrow().is_empty());

        rec.handle_key_down(KEY_S, Modifiers::COMMAND);
        assert_eq!(changes.borrow().len(), 1);
        // Same value again: no notification.
        rec.handle_key_down(KEY_S, Modifiers::COMMAND);
        assert_eq!(changes.borrow().len(), 1);
    }

    #[test]
    fn test_validator_conflict() {
        let menu = Menu::new(
            "",
            vec![MenuItem::new("Save").with_shortcut("s", TOOLKIT_COMMAND)],
        );
        let mut rec = Recorder::new().with_validator(Validator::new(), Some(menu));
        let outcome = rec.handle_key_down(KEY_S, Modifiers::COMMAND);
        assert!(matches!(outcome, KeyDownOutcome::Rejected(ref r) if r.contains("Save")));
        assert!(rec.combo().is_empty());
    }

    #[test]
    fn test_object_value() {
        let mut rec = Recorder::new();
        rec.handle_key_down(KEY_S, Modifiers::COMMAND);
        let mapping = rec.object_value();

        let mut other = Recorder::new();
        other.set_object_value(&mapping).unwrap();
        assert_eq!(other.combo(), rec.combo());

        let mut bad = Map::new();
        bad.insert("keyCode".to_owned(), Value::String("s".to_owned()));
        assert_eq!(other.set_object_value(&bad), Err(ComboError::MalformedMapping));
        assert_eq!(other.combo(), rec.combo());
    }
}
