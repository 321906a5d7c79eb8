/// A named key combination bound to an action on a weakly-held target.
use std::rc::{Rc, Weak};

use crate::keys::KeyCombo;

use super::backend::NativeId;

type Action = Box<dyn Fn(&HotKey) -> bool>;

/// Where a registered hotkey lives: the registry's ID and the OS handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub id: u32,
    pub native: NativeId,
}

/// A hotkey: identifier, display name, combination and action.
///
/// The action does not keep its target alive. Once the target is dropped,
/// [`HotKey::invoke`] does nothing.
pub struct HotKey {
    identifier: String,
    name: String,
    combo: KeyCombo,
    action: Option<Action>,
    registration: Option<Registration>,
}

impl std::fmt::Debug for HotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HotKey")
            .field("identifier", &self.identifier)
            .field("name", &self.name)
            .field("combo", &self.combo)
            .field("has_action", &self.action.is_some())
            .field("registration", &self.registration)
            .finish()
    }
}

impl HotKey {
    #[must_use]
    pub fn new(identifier: &str, name: &str, combo: KeyCombo) -> Self {
        Self {
            identifier: identifier.to_owned(),
            name: name.to_owned(),
            combo,
            action: None,
            registration: None,
        }
    }

    /// Call `method` on `target` when the hotkey fires, for as long as
    /// `target` is alive.
    #[must_use]
    pub fn with_action<T: 'static>(mut self, target: &Rc<T>, method: fn(&T, &HotKey)) -> Self {
        let target: Weak<T> = Rc::downgrade(target);
        self.action = Some(Box::new(move |hotkey: &HotKey| {
            target.upgrade().is_some_and(|t| {
                method(&t, hotkey);
                true
            })
        }));
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn combo(&self) -> &KeyCombo {
        &self.combo
    }

    pub fn registration(&self) -> Option<Registration> {
        self.registration
    }

    pub fn is_registered(&self) -> bool {
        self.registration.is_some()
    }

    pub(crate) fn set_registration(&mut self, registration: Option<Registration>) {
        self.registration = registration;
    }

    /// Run the action. Returns whether it ran: `false` without an action or
    /// once the target is gone.
    pub fn invoke(&self) -> bool {
        self.action.as_ref().is_some_and(|action| action(self))
    }
}
