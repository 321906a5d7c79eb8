/// The hotkey registry: owns the backend, the ID space and the hotkeys.
use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, trace, warn};

use super::backend::{HotKeyBackend, NativeId};
use super::errors::HotKeyError;
use super::hotkey::{HotKey, Registration};

/// Registered hotkeys by identifier, with process-unique numeric IDs.
pub struct HotKeyCenter<B: HotKeyBackend> {
    backend: B,
    hotkeys: BTreeMap<String, HotKey>,
    by_native: HashMap<NativeId, String>,
    ids: BTreeSet<u32>,
}

impl<B: HotKeyBackend> std::fmt::Debug for HotKeyCenter<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HotKeyCenter")
            .field("hotkeys", &self.hotkeys)
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

impl<B: HotKeyBackend> HotKeyCenter<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            hotkeys: BTreeMap::new(),
            by_native: HashMap::new(),
            ids: BTreeSet::new(),
        }
    }

    /// Lowest unused ID, starting at 1.
    fn allocate_id(&self) -> Result<u32, HotKeyError> {
        (1..=u32::MAX)
            .find(|id| !self.ids.contains(id))
            .ok_or(HotKeyError::IdsExhausted)
    }

    /// Register `hotkey`, replacing any hotkey with the same identifier.
    ///
    /// # Errors
    ///
    /// Returns `HotKeyError` if the combination is empty or the backend
    /// refuses it. Nothing is kept in that case; a replaced hotkey stays
    /// unregistered.
    pub fn register(&mut self, mut hotkey: HotKey) -> Result<Registration, HotKeyError> {
        if hotkey.combo().is_empty() {
            return Err(HotKeyError::EmptyCombo(hotkey.identifier().to_owned()));
        }
        if self.hotkeys.contains_key(hotkey.identifier()) {
            debug!(identifier = hotkey.identifier(), "replacing hotkey");
            self.unregister(hotkey.identifier());
        }

        let id = self.allocate_id()?;
        let native = self.backend.register(id, hotkey.combo())?;
        let registration = Registration { id, native };
        hotkey.set_registration(Some(registration));

        debug!(identifier = hotkey.identifier(), id, native, "hotkey registered");
        self.ids.insert(id);
        self.by_native
            .insert(native, hotkey.identifier().to_owned());
        self.hotkeys.insert(hotkey.identifier().to_owned(), hotkey);
        Ok(registration)
    }

    /// Unregister and return the hotkey with `identifier`.
    ///
    /// Unknown identifiers are a no-op. A backend failure is logged; the ID is
    /// released regardless.
    pub fn unregister(&mut self, identifier: &str) -> Option<HotKey> {
        let mut hotkey = self.hotkeys.remove(identifier)?;
        if let Some(Registration { id, native }) = hotkey.registration() {
            if let Err(e) = self.backend.unregister(native) {
                warn!(identifier, native, error = %e, "failed to unregister hotkey");
            }
            self.ids.remove(&id);
            self.by_native.remove(&native);
        }
        hotkey.set_registration(None);
        debug!(identifier, "hotkey unregistered");
        Some(hotkey)
    }

    /// Unregister everything.
    pub fn unregister_all(&mut self) {
        let identifiers: Vec<String> = self.hotkeys.keys().cloned().collect();
        for identifier in identifiers {
            self.unregister(&identifier);
        }
    }

    /// Invoke the hotkey the OS reported as `native`. Unknown IDs are ignored.
    ///
    /// Returns whether an action ran.
    pub fn dispatch(&self, native: NativeId) -> bool {
        let Some(hotkey) = self
            .by_native
            .get(&native)
            .and_then(|identifier| self.hotkeys.get(identifier))
        else {
            trace!(native, "event for unknown hotkey");
            return false;
        };
        trace!(identifier = hotkey.identifier(), "hotkey fired");
        hotkey.invoke()
    }

    pub fn get(&self, identifier: &str) -> Option<&HotKey> {
        self.hotkeys.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.hotkeys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hotkeys.is_empty()
    }
}

impl<B: HotKeyBackend> Drop for HotKeyCenter<B> {
    fn drop(&mut self) {
        self.unregister_all();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::keys::{KeyCombo, Modifiers, UsAnsiLayout};

    /// Backend that refuses a combination registered twice, like the OS does.
    #[derive(Default)]
    struct MemoryBackend {
        next_native: NativeId,
        taken: HashMap<NativeId, KeyCombo>,
    }

    impl HotKeyBackend for MemoryBackend {
        fn register(&mut self, _id: u32, combo: &KeyCombo) -> Result<NativeId, HotKeyError> {
            if let Some((native, _)) = self.taken.iter().find(|(_, c)| *c == combo) {
                return Err(HotKeyError::AlreadyRegistered(*native));
            }
            self.next_native += 100;
            self.taken.insert(self.next_native, combo.clone());
            Ok(self.next_native)
        }

        fn unregister(&mut self, native: NativeId) -> Result<(), HotKeyError> {
            self.taken.remove(&native);
            Ok(())
        }
    }

    fn combo(code: u16) -> KeyCombo {
        KeyCombo::from_key_code(code, Modifiers::COMMAND | Modifiers::OPTION, &UsAnsiLayout)
            .unwrap()
    }

    struct Target {
        fired: Cell<u32>,
    }

    impl Target {
        fn fire(&self, _hotkey: &HotKey) {
            self.fired.set(self.fired.get() + 1);
        }
    }

    #[test]
    fn test_lowest_free_ids() {
        let mut center = HotKeyCenter::new(MemoryBackend::default());
        let a = center.register(HotKey::new("a", "A", combo(0))).unwrap();
        let b = center.register(HotKey::new("b", "B", combo(1))).unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        center.unregister("a");
        let c = center.register(HotKey::new("c", "C", combo(2))).unwrap();
        assert_eq!(c.id, 1);
        assert_eq!(center.len(), 2);
    }

    #[test]
    fn test_dispatch_invokes_action() {
        let target = Rc::new(Target { fired: Cell::new(0) });
        let mut center = HotKeyCenter::new(MemoryBackend::default());
        let reg = center
            .register(HotKey::new("a", "A", combo(0)).with_action(&target, Target::fire))
            .unwrap();

        assert!(center.dispatch(reg.native));
        assert!(!center.dispatch(reg.native + 1));
        assert_eq!(target.fired.get(), 1);

        drop(target);
        assert!(!center.dispatch(reg.native));
    }

    #[test]
    fn test_collision_leaves_hotkey_unregistered() {
        let mut center = HotKeyCenter::new(MemoryBackend::default());
        center.register(HotKey::new("a", "A", combo(0))).unwrap();
        let err = center.register(HotKey::new("b", "B", combo(0))).unwrap_err();
        assert!(matches!(err, HotKeyError::AlreadyRegistered(_)));
        assert!(center.get("b").is_none());

        // The failed attempt did not consume an ID.
        let c = center.register(HotKey::new("c", "C", combo(1))).unwrap();
        assert_eq!(c.id, 2);
    }

    #[test]
    fn test_register_same_identifier_replaces() {
        let mut center = HotKeyCenter::new(MemoryBackend::default());
        let first = center.register(HotKey::new("a", "A", combo(0))).unwrap();
        let second = center.register(HotKey::new("a", "A", combo(1))).unwrap();
        assert_eq!(center.len(), 1);
        assert_eq!(second.id, 1);
        assert!(!center.dispatch(first.native));
        assert_eq!(center.get("a").map(|h| h.combo().clone()), Some(combo(1)));
    }

    #[test]
    fn test_unregister_unknown_is_noop() {
        let mut center = HotKeyCenter::new(MemoryBackend::default());
        assert!(center.unregister("missing").is_none());

        center.register(HotKey::new("a", "A", combo(0))).unwrap();
        let hotkey = center.unregister("a").unwrap();
        assert!(!hotkey.is_registered());
        assert!(center.unregister("a").is_none());
        assert!(center.is_empty());
    }

    #[test]
    fn test_empty_combo_refused() {
        let mut center = HotKeyCenter::new(MemoryBackend::default());
        let err = center
            .register(HotKey::new("a", "A", KeyCombo::empty()))
            .unwrap_err();
        assert_eq!(err, HotKeyError::EmptyCombo("a".to_owned()));
    }
}
