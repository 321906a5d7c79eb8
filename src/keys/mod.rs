/// Key codes, modifier encodings, rendering and the key combination type.
pub mod codes;
pub mod combo;
pub mod errors;
pub mod flags;
pub mod l10n;
pub mod layout;
pub mod recorder;
pub mod render;

pub use codes::{KeyCode, NO_CODE};
pub use combo::KeyCombo;
pub use errors::ComboError;
pub use flags::Modifiers;
pub use l10n::Strings;
pub use layout::{KeyboardLayout, UsAnsiLayout};
pub use recorder::{KeyDownOutcome, Recorder, RecorderDelegate};
pub use render::Renderer;
