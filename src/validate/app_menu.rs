/// Read a running application's menu bar into a [`Menu`] via Accessibility.
///
/// Top-level menu bar items are walked in parallel with `std::thread::scope`;
/// each thread recurses into its submenus.
use tracing::{debug, trace};

use crate::ax::{AXElement, AXError, AttributeValue, MENU_ITEM_ATTRS, attr_idx};
use crate::keys::Modifiers;

use super::menu::{Menu, MenuItem, ax_key_equivalent};

/// Build the full menu of the application with `pid`.
///
/// # Errors
///
/// Returns `AXError` if the app has no menu bar or AX access fails.
pub fn read_menu_bar(pid: i32) -> Result<Menu, AXError> {
    let app = AXElement::application(pid);
    let top_level = app.menu_bar()?.children()?;
    debug!(pid, count = top_level.len(), "reading menu bar");

    let mut items: Vec<Option<MenuItem>> = vec![None; top_level.len()];
    std::thread::scope(|s| {
        let handles: Vec<_> = top_level
            .into_iter()
            .enumerate()
            .map(|(i, element)| s.spawn(move || (i, walk_element(&element))))
            .collect();
        for handle in handles {
            if let Ok((i, Ok(item))) = handle.join() {
                items[i] = Some(item);
            }
        }
    });

    Ok(Menu::new("", items.into_iter().flatten().collect()))
}

/// Read one menu item and its submenu.
fn walk_element(element: &AXElement) -> Result<MenuItem, AXError> {
    let attrs = element.batch_attributes(MENU_ITEM_ATTRS)?;

    let title = extract_string(&attrs, attr_idx::TITLE).unwrap_or_default();
    let enabled = extract_bool(&attrs, attr_idx::ENABLED).unwrap_or(true);
    let key_equivalent = ax_key_equivalent(
        extract_string(&attrs, attr_idx::CMD_CHAR).as_deref(),
        extract_number(&attrs, attr_idx::CMD_VIRTUAL_KEY),
    );
    let cmd_mods = extract_number(&attrs, attr_idx::CMD_MODIFIERS).unwrap_or(0);
    let role = extract_string(&attrs, attr_idx::ROLE).unwrap_or_default();
    let alternate = attrs
        .get(attr_idx::PRIMARY_UI_ELEMENT)
        .is_some_and(Option::is_some);

    let mut item = MenuItem::new(&title);
    item.enabled = enabled;
    item.alternate = alternate;
    if let Some(key_equivalent) = key_equivalent {
        item.key_equivalent = key_equivalent;
        item.modifier_mask = Modifiers::from_ax_menu_mask(cmd_mods).to_toolkit();
    }
    trace!(%title, %role, key = %item.key_equivalent, "menu item");

    let children = collect_children(element);
    if !children.is_empty() {
        item.submenu = Some(Menu::new(&title, children));
    }
    Ok(item)
}

/// Child items of an element.
///
/// `AXMenu` containers are transparent: their children are lifted into the
/// parent, since the AX tree nests `AXMenuBarItem → AXMenu → AXMenuItem`.
/// Separators are dropped.
fn collect_children(element: &AXElement) -> Vec<MenuItem> {
    let Ok(children) = element.children() else {
        return Vec::new();
    };

    let mut items = Vec::with_capacity(children.len());
    for child in children {
        let role = child
            .batch_attributes(&[accessibility_sys::kAXRoleAttribute])
            .ok()
            .and_then(|a| extract_string(&a, 0));
        match role.as_deref() {
            Some("AXMenu") => items.extend(collect_children(&child)),
            Some("AXSeparator") => {}
            _ => {
                if let Ok(item) = walk_element(&child) {
                    if !item.title.is_empty() {
                        items.push(item);
                    }
                }
            }
        }
    }
    items
}

fn extract_string(attrs: &[Option<AttributeValue>], idx: usize) -> Option<String> {
    match attrs.get(idx)?.as_ref()? {
        AttributeValue::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn extract_bool(attrs: &[Option<AttributeValue>], idx: usize) -> Option<bool> {
    match attrs.get(idx)?.as_ref()? {
        AttributeValue::Bool(b) => Some(*b),
        _ => None,
    }
}

fn extract_number(attrs: &[Option<AttributeValue>], idx: usize) -> Option<i64> {
    match attrs.get(idx)?.as_ref()? {
        AttributeValue::Number(n) => Some(*n),
        _ => None,
    }
}
