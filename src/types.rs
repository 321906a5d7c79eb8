/// Shared serializable output types for all commands.
///
/// These types are what gets written to stdout, either as JSON or rendered
/// as a table. They are decoupled from the `KeyCombo` / `Conflict` types.
use serde::Serialize;
use serde_json::{Map, Value};

use crate::commands::CommandError;
use crate::keys::{KeyCombo, Renderer};
use crate::validate::Conflict;

/// A key combination, rendered.
#[derive(Debug, Clone, Serialize)]
pub struct ComboOutput {
    /// Glyph form (e.g., "⇧⌘S").
    pub shortcut: String,
    /// Spelled-out form (e.g., "Shift + Command + S").
    pub readable: String,
    /// Virtual key code, -1 for none.
    pub key_code: i64,
    /// Key equivalent as the menu system stores it.
    pub key_equivalent: String,
    /// Modifier flags, desktop toolkit encoding.
    pub toolkit_flags: u64,
    /// Modifier flags, legacy event-manager encoding.
    pub legacy_flags: u64,
    /// Whether the key is a special (non-character) key.
    pub special: bool,
    /// The persisted mapping form.
    pub mapping: Map<String, Value>,
}

impl ComboOutput {
    #[must_use]
    pub fn new(combo: &KeyCombo, renderer: &Renderer<'_>) -> Self {
        Self {
            shortcut: combo.string(renderer),
            readable: renderer
                .readable_string_for_modifiers_and_key_code(combo.modifiers(), combo.key_code()),
            key_code: combo.key_code(),
            key_equivalent: combo.key_equivalent().to_owned(),
            toolkit_flags: combo.toolkit_flags(),
            legacy_flags: combo.legacy_flags(),
            special: KeyCombo::is_special_or_function_key(combo.key_code()),
            mapping: combo.to_mapping(),
        }
    }
}

/// Output of `render`.
#[derive(Debug, Clone, Serialize)]
pub struct RenderOutput {
    pub key_code: i64,
    /// Glyph form, modifiers then key.
    pub glyphs: String,
    /// Spelled-out form.
    pub readable: String,
    /// Character the key types with these modifiers on the current layout.
    pub characters: String,
    pub toolkit_flags: u64,
    pub legacy_flags: u64,
}

/// Output of `flags`.
#[derive(Debug, Clone, Serialize)]
pub struct FlagsOutput {
    /// Modifier names in rendering order.
    pub modifiers: Vec<&'static str>,
    /// Glyph form.
    pub glyphs: String,
    pub toolkit_flags: u64,
    pub legacy_flags: u64,
}

/// Output of `check`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutput {
    pub combo: ComboOutput,
    pub taken: bool,
    /// Why the combination is taken.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<Conflict>,
}

/// One key press fed to `record`.
#[derive(Debug, Clone, Serialize)]
pub struct RecordStepOutput {
    /// The press as given.
    pub input: String,
    /// `recorded`, `cancelled`, `cleared` or `rejected`.
    pub outcome: &'static str,
    /// Why the press was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// The stored combination after this press.
    pub combo: ComboOutput,
}

/// Output of `record`.
#[derive(Debug, Clone, Serialize)]
pub struct RecordOutput {
    pub steps: Vec<RecordStepOutput>,
    /// The final stored value, mapping form.
    pub value: Map<String, Value>,
}

/// A row of `keys`.
#[derive(Debug, Clone, Serialize)]
pub struct KeyInfoOutput {
    pub key_code: u16,
    /// Name accepted by `parse`.
    pub name: String,
    /// Rendering of the key alone.
    pub glyph: String,
    /// Menu key equivalent as `U+XXXX`, for special keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_equivalent: Option<String>,
    pub special: bool,
    pub function: bool,
}

/// A configured hotkey in `list`.
#[derive(Debug, Clone, Serialize)]
pub struct HotKeyOutput {
    pub identifier: String,
    pub name: String,
    /// The rendered combination, if it is valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combo: Option<ComboOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Why the entry cannot be used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Conflict found with `--check`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<Conflict>,
}

/// A hotkey registered by `listen`.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationOutput {
    pub identifier: String,
    pub shortcut: String,
    /// Registry ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    /// Why registration failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A hotkey press reported by `listen`.
#[derive(Debug, Clone, Serialize)]
pub struct FireOutput {
    pub identifier: String,
    pub name: String,
    pub shortcut: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Exit code of the command, when it was run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

/// A structured error envelope for JSON error output.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
    /// Always `false`.
    pub ok: bool,
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail in the JSON error envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (snake_case).
    pub code: &'static str,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorOutput {
    /// Construct from a `CommandError`.
    #[must_use]
    pub fn from_command_error(err: &CommandError) -> Self {
        Self {
            ok: false,
            error: ErrorDetail {
                code: err.code(),
                message: err.to_string(),
            },
        }
    }
}
