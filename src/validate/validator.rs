/// Decide whether a candidate key combination is already taken.
///
/// Policy, in order:
/// 1. Caller-supplied policy callback, if any.
/// 2. OS-reserved global shortcuts.
/// 3. Key equivalents of a supplied menu and its submenus.
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::keys::codes::{self, KeyCode};
use crate::keys::l10n::{self, Strings};
use crate::keys::layout::{KeyboardLayout, UsAnsiLayout};
use crate::keys::render::Renderer;
use crate::keys::Modifiers;

use super::menu::{Menu, MenuItem};
use super::reserved::find_reserved;

/// Caller policy: return `Some(reason)` when the combination is taken.
pub type PolicyFn = dyn Fn(i64, Modifiers) -> Option<String>;

/// Which menu items the menu scan ignores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Exclude disabled items (and their submenus).
    pub skip_disabled: bool,
    /// Exclude hidden and alternate items (and their submenus).
    pub skip_hidden: bool,
}

/// Where a conflict came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    Policy,
    System,
    Menu,
}

/// A taken combination and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    /// Human-readable reason, already localized.
    pub reason: String,
    /// Full path of the conflicting menu item, for menu conflicts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_path: Option<String>,
}

/// Shortcut validator.
pub struct Validator {
    policy: Option<Box<PolicyFn>>,
    options: ScanOptions,
    layout: Box<dyn KeyboardLayout>,
    strings: Strings,
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("has_policy", &self.policy.is_some())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// No policy, scan everything, US ANSI layout, English strings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            policy: None,
            options: ScanOptions::default(),
            layout: Box::new(UsAnsiLayout),
            strings: Strings::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: impl Fn(i64, Modifiers) -> Option<String> + 'static) -> Self {
        self.policy = Some(Box::new(policy));
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
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

    pub fn options(&self) -> ScanOptions {
        self.options
    }

    /// Renderer over this validator's layout and strings.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        Renderer::new(self.layout.as_ref(), &self.strings)
    }

    /// Run the whole policy: callback, reserved table, then `menu` if given.
    #[must_use]
    pub fn check(&self, code: i64, modifiers: Modifiers, menu: Option<&Menu>) -> Option<Conflict> {
        self.is_taken(code, modifiers)
            .or_else(|| menu.and_then(|m| self.is_taken_in_menu(code, modifiers, m)))
    }

    /// Check the policy callback and the OS-reserved table.
    #[must_use]
    pub fn is_taken(&self, code: i64, modifiers: Modifiers) -> Option<Conflict> {
        if let Some(policy) = &self.policy {
            if let Some(reason) = policy(code, modifiers) {
                debug!(code, ?modifiers, %reason, "taken by policy");
                return Some(Conflict {
                    kind: ConflictKind::Policy,
                    reason,
                    item_path: None,
                });
            }
        }

        let key_code = codes::key_code_from_raw(code)?;
        let hit = find_reserved(key_code, modifiers)?;
        debug!(code, ?modifiers, function = hit.function, "taken by system");
        let combo = self.combo_string(code, modifiers);
        Some(Conflict {
            kind: ConflictKind::System,
            reason: self.strings.format(
                l10n::CONFLICT_SYSTEM,
                &[("combo", combo.as_str()), ("function", hit.function)],
            ),
            item_path: None,
        })
    }

    /// Check the key equivalents of `menu` and, recursively, its submenus.
    ///
    /// Items without a key equivalent never match, and a candidate without a
    /// key code never matches anything. Special keys compare by key code; other
    /// keys compare by the character they type, so `?` with Command is taken by
    /// Shift-Command-/.
    #[must_use]
    pub fn is_taken_in_menu(&self, code: i64, modifiers: Modifiers, menu: &Menu) -> Option<Conflict> {
        let key_code = codes::key_code_from_raw(code)?;
        let press = Press::new(key_code, modifiers, self.layout.as_ref());
        let options = self.options;
        let hit = menu
            .flatten_where(&|item| {
                let disabled = options.skip_disabled && !item.enabled;
                let hidden = options.skip_hidden && (item.hidden || item.alternate);
                !(disabled || hidden)
            })
            .into_iter()
            .find(|flat| {
                trace!(path = %flat.path, key_equivalent = %flat.item.key_equivalent, "compare");
                press.matches(flat.item)
            })?;
        debug!(code, ?modifiers, path = %hit.path, "taken by menu item");
        let combo = self.combo_string(code, modifiers);
        Some(Conflict {
            kind: ConflictKind::Menu,
            reason: self.strings.format(
                l10n::CONFLICT_MENU,
                &[("combo", combo.as_str()), ("title", hit.item.title.as_str())],
            ),
            item_path: Some(hit.path),
        })
    }

    fn combo_string(&self, code: i64, modifiers: Modifiers) -> String {
        self.renderer().string_for_modifiers_and_key_code(modifiers, code)
    }
}

/// A key press as a menu would see it.
struct Press {
    code: KeyCode,
    wanted: Modifiers,
    special: bool,
    unshifted: Option<String>,
    shifted: Option<String>,
}

impl Press {
    fn new(code: KeyCode, modifiers: Modifiers, layout: &dyn KeyboardLayout) -> Self {
        let unshifted = layout
            .character(code, Modifiers::empty())
            .map(|s| s.to_lowercase());
        // Letters shift to their own upper case, which menus already fold.
        let shifted = layout
            .character(code, Modifiers::SHIFT)
            .filter(|s| Some(s.to_lowercase()) != unshifted);
        Self {
            code,
            wanted: modifiers.difference(Modifiers::FUNCTION),
            special: codes::menu_key_equivalent_for_special(code).is_some(),
            unshifted,
            shifted,
        }
    }

    fn matches(&self, item: &MenuItem) -> bool {
        let Some((key_equivalent, mods)) = item.shortcut() else {
            return false;
        };
        let mods = mods.difference(Modifiers::FUNCTION);
        if let Some(special) = codes::special_for_menu_key_equivalent(&key_equivalent) {
            return special == self.code && mods == self.wanted;
        }
        if self.special {
            return false;
        }
        if self.unshifted.as_deref() == Some(key_equivalent.as_str()) && mods == self.wanted {
            return true;
        }
        // The item's character is the shifted one; Shift is implied by it.
        self.wanted.contains(Modifiers::SHIFT)
            && self.shifted.as_deref() == Some(key_equivalent.as_str())
            && mods == self.wanted.difference(Modifiers::SHIFT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::codes::{KEY_F1, KEY_UP_ARROW, NO_CODE};
    use crate::keys::flags::{TOOLKIT_COMMAND, TOOLKIT_FUNCTION, TOOLKIT_OPTION, TOOLKIT_SHIFT};

    const KEY_S: i64 = 1;
    const KEY_3: i64 = 20;

    fn app_menu() -> Menu {
        Menu::new(
            "",
            vec![
                MenuItem::new("File").with_submenu(Menu::new(
                    "File",
                    vec![
                        MenuItem::new("Save").with_shortcut("s", TOOLKIT_COMMAND),
                        MenuItem::new("Print…").with_shortcut("p", TOOLKIT_COMMAND),
                    ],
                )),
                MenuItem::new("View").with_submenu(Menu::new(
                    "View",
                    vec![
                        MenuItem::new("Scroll Up")
                            .with_shortcut("\u{F700}", TOOLKIT_OPTION | TOOLKIT_FUNCTION),
                        MenuItem::new("Separator"),
                    ],
                )),
            ],
        )
    }

    /// Swaps the A and Q keys, as an AZERTY board does.
    struct SwappedAq;

    impl KeyboardLayout for SwappedAq {
        fn character(&self, code: KeyCode, _modifiers: Modifiers) -> Option<String> {
            match code {
                0 => Some("q".to_owned()),
                12 => Some("a".to_owned()),
                _ => None,
            }
        }

        fn key_code_for_char(&self, ch: char) -> Option<(KeyCode, Modifiers)> {
            match ch {
                'q' => Some((0, Modifiers::empty())),
                'a' => Some((12, Modifiers::empty())),
                _ => None,
            }
        }
    }

    #[test]
    fn test_custom_layout_renders_reasons() {
        let v = Validator::new().with_layout(SwappedAq);
        assert_eq!(v.renderer().string_for_key_code(12), "A");
        assert_eq!(v.renderer().string_for_key_code(0), "Q");
    }

    #[test]
    fn test_menu_conflict_names_item() {
        let v = Validator::new();
        let hit = v.check(KEY_S, Modifiers::COMMAND, Some(&app_menu())).unwrap();
        assert_eq!(hit.kind, ConflictKind::Menu);
        assert!(hit.reason.contains("\"Save\""));
        assert!(hit.reason.contains("⌘S"));
        assert_eq!(hit.item_path.as_deref(), Some("File::Save"));
    }

    #[test]
    fn test_menu_requires_exact_modifiers() {
        let v = Validator::new();
        assert!(
            v.check(KEY_S, Modifiers::COMMAND | Modifiers::SHIFT, Some(&app_menu()))
                .is_none()
        );
    }

    #[test]
    fn test_uppercase_key_equivalent_implies_shift() {
        let menu = Menu::new(
            "",
            vec![MenuItem::new("Save As…").with_shortcut("S", TOOLKIT_COMMAND)],
        );
        let v = Validator::new();
        assert!(v.is_taken_in_menu(KEY_S, Modifiers::COMMAND, &menu).is_none());
        assert!(
            v.is_taken_in_menu(KEY_S, Modifiers::COMMAND | Modifiers::SHIFT, &menu)
                .is_some()
        );
        let explicit = Menu::new(
            "",
            vec![MenuItem::new("Save As…").with_shortcut("s", TOOLKIT_COMMAND | TOOLKIT_SHIFT)],
        );
        assert!(
            v.is_taken_in_menu(KEY_S, Modifiers::COMMAND | Modifiers::SHIFT, &explicit)
                .is_some()
        );
    }

    #[test]
    fn test_special_key_in_menu() {
        let v = Validator::new();
        let hit = v
            .is_taken_in_menu(i64::from(KEY_UP_ARROW), Modifiers::OPTION, &app_menu())
            .unwrap();
        assert_eq!(hit.item_path.as_deref(), Some("View::Scroll Up"));
    }

    #[test]
    fn test_shifted_symbol_key_equivalent() {
        let menu = Menu::new(
            "",
            vec![
                MenuItem::new("Show Help").with_shortcut("?", TOOLKIT_COMMAND),
                MenuItem::new("Zoom In").with_shortcut("+", TOOLKIT_COMMAND),
            ],
        );
        let v = Validator::new();
        let hit = v
            .is_taken_in_menu(44, Modifiers::COMMAND | Modifiers::SHIFT, &menu)
            .unwrap();
        assert_eq!(hit.item_path.as_deref(), Some("Show Help"));
        assert!(v.is_taken_in_menu(44, Modifiers::COMMAND, &menu).is_none());

        let hit = v
            .is_taken_in_menu(24, Modifiers::COMMAND | Modifiers::SHIFT, &menu)
            .unwrap();
        assert_eq!(hit.item_path.as_deref(), Some("Zoom In"));
        assert!(v.is_taken_in_menu(24, Modifiers::COMMAND, &menu).is_none());
        // Keypad plus types "+" without Shift.
        assert!(v.is_taken_in_menu(69, Modifiers::COMMAND, &menu).is_some());
    }

    #[test]
    fn test_delete_key_equivalent_aliases() {
        let v = Validator::new();
        for key_equivalent in ["\u{7f}", "\u{8}"] {
            let menu = Menu::new(
                "",
                vec![MenuItem::new("Move to Trash").with_shortcut(key_equivalent, TOOLKIT_COMMAND)],
            );
            let hit = v.is_taken_in_menu(51, Modifiers::COMMAND, &menu);
            assert_eq!(
                hit.and_then(|c| c.item_path).as_deref(),
                Some("Move to Trash"),
                "key equivalent {key_equivalent:?}"
            );
            assert!(v.is_taken_in_menu(51, Modifiers::empty(), &menu).is_none());
        }
    }

    #[test]
    fn test_skipped_item_hides_its_submenu() {
        let mut disabled = MenuItem::new("Edit").with_submenu(Menu::new(
            "Edit",
            vec![MenuItem::new("Copy").with_shortcut("c", TOOLKIT_COMMAND)],
        ));
        disabled.enabled = false;
        let menu = Menu::new("", vec![disabled]);
        assert!(Validator::new().is_taken_in_menu(8, Modifiers::COMMAND, &menu).is_some());
        let strict = Validator::new().with_options(ScanOptions {
            skip_disabled: true,
            skip_hidden: false,
        });
        assert!(strict.is_taken_in_menu(8, Modifiers::COMMAND, &menu).is_none());
    }

    #[test]
    fn test_no_code_never_matches() {
        let v = Validator::new();
        assert!(v.check(NO_CODE, Modifiers::empty(), Some(&app_menu())).is_none());
        assert!(v.check(NO_CODE, Modifiers::COMMAND, Some(&app_menu())).is_none());
    }

    #[test]
    fn test_reserved_without_menu_or_policy() {
        let v = Validator::new();
        let hit = v.check(KEY_3, Modifiers::SHIFT | Modifiers::COMMAND, None).unwrap();
        assert_eq!(hit.kind, ConflictKind::System);
        assert!(hit.reason.contains("Save picture of screen as a file"));
        assert!(hit.reason.contains("⇧⌘3"));
    }

    #[test]
    fn test_policy_runs_first() {
        let v = Validator::new().with_policy(|code, mods| {
            (code == KEY_3 && mods.contains(Modifiers::COMMAND)).then(|| "mine".to_owned())
        });
        let hit = v.check(KEY_3, Modifiers::SHIFT | Modifiers::COMMAND, None).unwrap();
        assert_eq!(hit.kind, ConflictKind::Policy);
        assert_eq!(hit.reason, "mine");

        // Policy says free: fall through to the reserved table.
        let hit = v.check(i64::from(KEY_F1), Modifiers::empty(), None);
        assert!(hit.is_none());
    }

    #[test]
    fn test_skip_disabled_and_hidden() {
        let mut disabled = MenuItem::new("Save").with_shortcut("s", TOOLKIT_COMMAND);
        disabled.enabled = false;
        let mut hidden = MenuItem::new("Print").with_shortcut("p", TOOLKIT_COMMAND);
        hidden.hidden = true;
        let mut alternate = MenuItem::new("Close All").with_shortcut("w", TOOLKIT_COMMAND);
        alternate.alternate = true;
        let menu = Menu::new("", vec![disabled, hidden, alternate]);

        let scan_all = Validator::new();
        assert!(scan_all.is_taken_in_menu(KEY_S, Modifiers::COMMAND, &menu).is_some());
        assert!(scan_all.is_taken_in_menu(35, Modifiers::COMMAND, &menu).is_some());

        let strict = Validator::new().with_options(ScanOptions {
            skip_disabled: true,
            skip_hidden: true,
        });
        assert!(strict.is_taken_in_menu(KEY_S, Modifiers::COMMAND, &menu).is_none());
        assert!(strict.is_taken_in_menu(35, Modifiers::COMMAND, &menu).is_none());
        assert!(strict.is_taken_in_menu(13, Modifiers::COMMAND, &menu).is_none());
    }

    #[test]
    fn test_localized_reason() {
        let overrides: std::collections::HashMap<String, String> = [(
            l10n::CONFLICT_MENU.to_owned(),
            "{combo} belegt durch {title}".to_owned(),
        )]
        .into();
        let v = Validator::new().with_strings(Strings::with_overrides(&overrides));
        let hit = v.check(KEY_S, Modifiers::COMMAND, Some(&app_menu())).unwrap();
        assert_eq!(hit.reason, "⌘S belegt durch Save");
    }
}
