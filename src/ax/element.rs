//! Owned `AXUIElementRef` with the attribute reads the menu reader needs.
use accessibility_sys::{
    AXUIElementCopyAttributeValue, AXUIElementCopyMultipleAttributeValues,
    AXUIElementCreateApplication, AXUIElementRef, AXUIElementSetMessagingTimeout,
    kAXChildrenAttribute, kAXEnabledAttribute, kAXErrorSuccess, kAXMenuBarAttribute,
    kAXMenuItemCmdCharAttribute, kAXMenuItemCmdModifiersAttribute,
    kAXMenuItemPrimaryUIElementAttribute, kAXRoleAttribute, kAXTitleAttribute,
};
use core_foundation::{
    array::{CFArray, CFArrayRef},
    base::{CFType, CFTypeID, CFTypeRef, TCFType},
    boolean::CFBoolean,
    number::CFNumber,
    string::{CFString, CFStringRef},
};

use super::errors::{AXError, check_ax_error};

/// Seconds to wait on an unresponsive app before giving up.
const AX_MESSAGING_TIMEOUT_SECS: f32 = 1.0;

/// Owned, reference-counted AX element.
pub struct AXElement {
    inner: CFType,
}

impl std::fmt::Debug for AXElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AXElement").finish_non_exhaustive()
    }
}

// SAFETY: AXUIElementRef is safe to read from any thread.
unsafe impl Send for AXElement {}
unsafe impl Sync for AXElement {}

impl AXElement {
    /// Take ownership of a +1 retained ref.
    ///
    /// # Safety
    ///
    /// `raw` must be a valid, non-null `AXUIElementRef` the caller owns.
    unsafe fn from_create_rule(raw: AXUIElementRef) -> Self {
        Self {
            inner: unsafe { CFType::wrap_under_create_rule(raw as CFTypeRef) },
        }
    }

    /// Retain a borrowed ref (array members).
    ///
    /// # Safety
    ///
    /// `raw` must be a valid, non-null `AXUIElementRef`.
    unsafe fn from_get_rule(raw: AXUIElementRef) -> Self {
        Self {
            inner: unsafe { CFType::wrap_under_get_rule(raw as CFTypeRef) },
        }
    }

    /// Application element for `pid`, with a short messaging timeout.
    pub fn application(pid: i32) -> Self {
        // SAFETY: returns a +1 retained, never-null ref.
        let el = unsafe { Self::from_create_rule(AXUIElementCreateApplication(pid)) };
        // Best effort; the element is valid either way.
        // SAFETY: valid element ref.
        unsafe {
            AXUIElementSetMessagingTimeout(el.as_raw(), AX_MESSAGING_TIMEOUT_SECS);
        }
        el
    }

    fn as_raw(&self) -> AXUIElementRef {
        self.inner.as_CFTypeRef() as AXUIElementRef
    }

    fn copy_attribute(&self, attr: &'static str) -> Result<CFTypeRef, AXError> {
        let attr_cf = CFString::from_static_string(attr);
        let mut value: CFTypeRef = std::ptr::null();
        // SAFETY: valid element, attribute name and out-pointer.
        let code = unsafe {
            AXUIElementCopyAttributeValue(self.as_raw(), attr_cf.as_concrete_TypeRef(), &mut value)
        };
        check_ax_error(code, attr)?;
        Ok(value)
    }

    /// The application's menu bar.
    ///
    /// # Errors
    ///
    /// `AXError::AttributeUnsupported` if the app has no menu bar.
    pub fn menu_bar(&self) -> Result<AXElement, AXError> {
        let value = self.copy_attribute(kAXMenuBarAttribute)?;
        if value.is_null() {
            return Err(AXError::AttributeUnsupported(kAXMenuBarAttribute.to_owned()));
        }
        // SAFETY: the menu bar attribute is an element, returned +1.
        Ok(unsafe { Self::from_create_rule(value as AXUIElementRef) })
    }

    /// Child elements.
    ///
    /// # Errors
    ///
    /// Returns `AXError` if children cannot be fetched.
    pub fn children(&self) -> Result<Vec<AXElement>, AXError> {
        let value = self.copy_attribute(kAXChildrenAttribute)?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        // SAFETY: children is a +1 CFArray of AXUIElementRefs.
        let array = unsafe { CFArray::<CFType>::wrap_under_create_rule(value as CFArrayRef) };
        Ok(array
            .iter()
            // SAFETY: array members are valid element refs; retained here.
            .map(|item| unsafe { Self::from_get_rule(item.as_CFTypeRef() as AXUIElementRef) })
            .collect())
    }

    /// Fetch several attributes in one IPC round-trip.
    ///
    /// The result is parallel to `attrs`; `None` marks an attribute the element
    /// does not have.
    ///
    /// # Errors
    ///
    /// Returns `AXError` when the element itself is bad.
    pub fn batch_attributes(
        &self,
        attrs: &[&'static str],
    ) -> Result<Vec<Option<AttributeValue>>, AXError> {
        let names: Vec<CFString> = attrs.iter().map(|&a| CFString::from_static_string(a)).collect();
        let refs: Vec<CFStringRef> = names.iter().map(|s| s.as_concrete_TypeRef()).collect();
        let attr_array = CFArray::from_copyable(&refs);

        let mut out: CFArrayRef = std::ptr::null();
        // SAFETY: valid element, attribute array and out-pointer. Options 0 =
        // keep going past per-attribute errors.
        let code = unsafe {
            AXUIElementCopyMultipleAttributeValues(
                self.as_raw(),
                attr_array.as_concrete_TypeRef(),
                0,
                &mut out,
            )
        };
        if code != kAXErrorSuccess {
            check_ax_error(code, "AXUIElementCopyMultipleAttributeValues")?;
        }
        if out.is_null() {
            return Ok(vec![None; attrs.len()]);
        }

        // SAFETY: +1 CFArray with one entry per requested attribute.
        let values = unsafe { CFArray::<CFType>::wrap_under_create_rule(out) };
        Ok(values.iter().map(|v| parse_cf_type(&v, v.type_of())).collect())
    }
}

/// A decoded attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    String(String),
    Bool(bool),
    Number(i64),
    /// Some other CF object (an element, for the primary-UI-element attribute).
    Other,
}

fn parse_cf_type(value: &CFType, type_id: CFTypeID) -> Option<AttributeValue> {
    if type_id == CFString::type_id() {
        // SAFETY: type id checked.
        let s = unsafe { CFString::wrap_under_get_rule(value.as_CFTypeRef() as CFStringRef) };
        return Some(AttributeValue::String(s.to_string()));
    }
    if type_id == CFBoolean::type_id() {
        // SAFETY: type id checked.
        let b = unsafe { CFBoolean::wrap_under_get_rule(value.as_CFTypeRef() as *const _) };
        return Some(AttributeValue::Bool(b.into()));
    }
    if type_id == CFNumber::type_id() {
        // SAFETY: type id checked.
        let n = unsafe { CFNumber::wrap_under_get_rule(value.as_CFTypeRef() as *const _) };
        return n.to_i64().map(AttributeValue::Number);
    }
    // SAFETY: plain FFI getter.
    if type_id == unsafe { accessibility_sys::AXValueGetTypeID() } {
        // kAXValueAXErrorType placeholder for a missing attribute.
        return None;
    }
    Some(AttributeValue::Other)
}

/// Virtual key code of a menu item's shortcut (arrows, F-keys, Return...).
pub const MENU_ITEM_CMD_VIRTUAL_KEY_ATTRIBUTE: &str = "AXMenuItemCmdVirtualKey";

/// Attributes fetched per menu item, in `attr_idx` order.
pub const MENU_ITEM_ATTRS: &[&str] = &[
    kAXTitleAttribute,
    kAXEnabledAttribute,
    kAXMenuItemCmdCharAttribute,
    kAXMenuItemCmdModifiersAttribute,
    kAXRoleAttribute,
    kAXMenuItemPrimaryUIElementAttribute,
    MENU_ITEM_CMD_VIRTUAL_KEY_ATTRIBUTE,
];

/// Indices into `MENU_ITEM_ATTRS`.
pub mod attr_idx {
    pub const TITLE: usize = 0;
    pub const ENABLED: usize = 1;
    pub const CMD_CHAR: usize = 2;
    pub const CMD_MODIFIERS: usize = 3;
    pub const ROLE: usize = 4;
    /// Present when the item is an Option-key alternate.
    pub const PRIMARY_UI_ELEMENT: usize = 5;
    pub const CMD_VIRTUAL_KEY: usize = 6;
}
