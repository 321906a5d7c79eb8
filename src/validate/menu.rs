/// Menu model read by the validator.
///
/// Mirrors what the toolkit's menu system exposes per item: a key-equivalent
/// string, a modifier mask in the toolkit encoding, enabled/hidden state and an
/// optional submenu. Menus arrive from a JSON file or, on macOS, from a
/// running application's menu bar.
use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::keys::{KeyCombo, Modifiers, codes};

/// Path separator used in full item paths (`File::Save As…`).
pub const PATH_SEP: &str = "::";

/// Escape literal `::` in a menu title so it won't be confused with [`PATH_SEP`].
#[must_use]
pub fn escape_title(title: &str) -> Cow<'_, str> {
    if title.contains(PATH_SEP) {
        Cow::Owned(title.replace("::", "\\::"))
    } else {
        Cow::Borrowed(title)
    }
}

/// Key equivalent from the Accessibility shortcut attributes of a menu item.
///
/// Special keys (arrows, F-keys, Return, Delete) are identified by their
/// virtual key code and stored as their menu key-equivalent character. Other
/// keys use the reported character, lower-cased: AX reports letters upper-case
/// and carries Shift in the mask. A lone space is kept.
#[must_use]
pub fn ax_key_equivalent(cmd_char: Option<&str>, virtual_key: Option<i64>) -> Option<String> {
    let special = virtual_key
        .and_then(codes::key_code_from_raw)
        .and_then(codes::menu_key_equivalent_for_special);
    if special.is_some() {
        return special;
    }
    let raw = cmd_char?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return raw.contains(' ').then(|| " ".to_owned());
    }
    Some(trimmed.to_lowercase())
}

/// A menu: a title and its items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    /// Menu title (empty for a menu bar).
    #[serde(default)]
    pub title: String,
    /// Items in display order.
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// A single menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Display title (e.g., "Save As…").
    pub title: String,
    /// Key equivalent; empty when the item has no shortcut.
    /// An upper-case letter implies Shift.
    #[serde(default)]
    pub key_equivalent: String,
    /// Modifier mask in the toolkit encoding.
    #[serde(default)]
    pub modifier_mask: u64,
    /// Whether the item is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Whether the item is hidden.
    #[serde(default)]
    pub hidden: bool,
    /// Whether the item is an Option-key alternate of the item above it.
    #[serde(default)]
    pub alternate: bool,
    /// Nested submenu, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submenu: Option<Menu>,
}

fn default_enabled() -> bool {
    true
}

impl MenuItem {
    /// A plain enabled item with no shortcut.
    #[must_use]
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_owned(),
            key_equivalent: String::new(),
            modifier_mask: 0,
            enabled: true,
            hidden: false,
            alternate: false,
            submenu: None,
        }
    }

    /// Builder: set the key equivalent and toolkit modifier mask.
    #[must_use]
    pub fn with_shortcut(mut self, key_equivalent: &str, modifier_mask: u64) -> Self {
        self.key_equivalent = key_equivalent.to_owned();
        self.modifier_mask = modifier_mask;
        self
    }

    /// Builder: attach a submenu.
    #[must_use]
    pub fn with_submenu(mut self, submenu: Menu) -> Self {
        self.submenu = Some(submenu);
        self
    }

    /// Set this item's key equivalent and modifier mask from a key combination.
    ///
    /// The empty combination clears the shortcut.
    pub fn configure_with_key_combo(&mut self, combo: &KeyCombo) {
        self.key_equivalent = combo.key_equivalent().to_owned();
        self.modifier_mask = if combo.is_empty() {
            0
        } else {
            combo.toolkit_flags()
        };
    }

    /// Normalized shortcut: lower-cased key equivalent and canonical modifiers,
    /// with Shift added for an upper-case letter. `None` without a key equivalent.
    #[must_use]
    pub fn shortcut(&self) -> Option<(String, Modifiers)> {
        if self.key_equivalent.is_empty() {
            return None;
        }
        let mut modifiers = Modifiers::from_toolkit(self.modifier_mask);
        let lower = self.key_equivalent.to_lowercase();
        if lower != self.key_equivalent {
            modifiers |= Modifiers::SHIFT;
        }
        Some((lower, modifiers))
    }
}

/// A flat representation of a menu item (no children).
#[derive(Debug, Clone)]
pub struct FlatItem<'a> {
    /// Full path from root (e.g., "File::Save As…").
    pub path: String,
    /// The item itself.
    pub item: &'a MenuItem,
}

impl Menu {
    /// A titled menu with items.
    #[must_use]
    pub fn new(title: &str, items: Vec<MenuItem>) -> Self {
        Self {
            title: title.to_owned(),
            items,
        }
    }

    /// Flatten into a list of items with full path notation, depth-first and
    /// parent before children. An item `keep` refuses is dropped together
    /// with its submenu.
    #[must_use]
    pub fn flatten_where(&self, keep: &dyn Fn(&MenuItem) -> bool) -> Vec<FlatItem<'_>> {
        let mut out = Vec::new();
        flatten_into(self, "", keep, &mut out);
        out
    }

    /// Number of items, submenus included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items
            .iter()
            .map(|i| 1 + i.submenu.as_ref().map_or(0, Menu::len))
            .sum()
    }

    /// Whether the menu has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn flatten_into<'a>(
    menu: &'a Menu,
    parent: &str,
    keep: &dyn Fn(&MenuItem) -> bool,
    out: &mut Vec<FlatItem<'a>>,
) {
    for item in menu.items.iter().filter(|i| keep(i)) {
        let escaped = escape_title(&item.title);
        let path = if parent.is_empty() {
            escaped.into_owned()
        } else {
            format!("{parent}{PATH_SEP}{escaped}")
        };
        out.push(FlatItem {
            path: path.clone(),
            item,
        });
        if let Some(sub) = &item.submenu {
            flatten_into(sub, &path, keep, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::flags::{TOOLKIT_COMMAND, TOOLKIT_SHIFT};
    use crate::keys::layout::UsAnsiLayout;

    fn file_menu() -> Menu {
        Menu::new(
            "",
            vec![MenuItem::new("File").with_submenu(Menu::new(
                "File",
                vec![
                    MenuItem::new("New").with_shortcut("n", TOOLKIT_COMMAND),
                    MenuItem::new("Export").with_submenu(Menu::new(
                        "Export",
                        vec![MenuItem::new("As PDF::Print")],
                    )),
                ],
            ))],
        )
    }

    #[test]
    fn test_flatten_nested() {
        let menu = file_menu();
        let flat = menu.flatten_where(&|_| true);
        let paths: Vec<&str> = flat.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            ["File", "File::New", "File::Export", "File::Export::As PDF\\::Print"]
        );
        assert_eq!(menu.len(), 4);
    }

    #[test]
    fn test_flatten_where_drops_subtree() {
        let menu = file_menu();
        let flat = menu.flatten_where(&|item| item.title != "Export");
        let paths: Vec<&str> = flat.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, ["File", "File::New"]);
    }

    #[test]
    fn test_shortcut_normalization() {
        let item = MenuItem::new("Save As…").with_shortcut("S", TOOLKIT_COMMAND);
        assert_eq!(
            item.shortcut(),
            Some(("s".to_owned(), Modifiers::COMMAND | Modifiers::SHIFT))
        );
        let item = MenuItem::new("Save").with_shortcut("s", TOOLKIT_COMMAND);
        assert_eq!(item.shortcut(), Some(("s".to_owned(), Modifiers::COMMAND)));
        assert_eq!(MenuItem::new("About").shortcut(), None);
    }

    #[test]
    fn test_configure_with_key_combo() {
        let combo = KeyCombo::parse("cmd+shift+e", &UsAnsiLayout).unwrap();
        let mut item = MenuItem::new("Export");
        item.configure_with_key_combo(&combo);
        assert_eq!(item.key_equivalent, "e");
        assert_eq!(item.modifier_mask, TOOLKIT_COMMAND | TOOLKIT_SHIFT);

        item.configure_with_key_combo(&KeyCombo::empty());
        assert_eq!(item.key_equivalent, "");
        assert_eq!(item.modifier_mask, 0);
    }

    #[test]
    fn test_ax_key_equivalent() {
        use crate::keys::codes::{KEY_F5, KEY_UP_ARROW};

        assert_eq!(ax_key_equivalent(Some("S"), None).as_deref(), Some("s"));
        assert_eq!(ax_key_equivalent(Some("S"), Some(1)).as_deref(), Some("s"));
        assert_eq!(
            ax_key_equivalent(None, Some(i64::from(KEY_UP_ARROW))).as_deref(),
            Some("\u{F700}")
        );
        assert_eq!(
            ax_key_equivalent(Some(""), Some(i64::from(KEY_F5))).as_deref(),
            Some("\u{F708}")
        );
        assert_eq!(ax_key_equivalent(None, Some(51)).as_deref(), Some("\u{8}"));
        assert_eq!(ax_key_equivalent(Some(" "), None).as_deref(), Some(" "));
        assert_eq!(ax_key_equivalent(Some(""), None), None);
        assert_eq!(ax_key_equivalent(None, None), None);
    }

    #[test]
    fn test_json_defaults() {
        let menu: Menu = serde_json::from_str(
            r#"{"items":[{"title":"Save","keyEquivalent":"s","modifierMask":1048576}]}"#,
        )
        .unwrap();
        let item = &menu.items[0];
        assert!(item.enabled);
        assert!(!item.hidden);
        assert_eq!(item.modifier_mask, TOOLKIT_COMMAND);
    }
}
