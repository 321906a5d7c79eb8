/// Global hotkeys: the wrapper, the OS backend seam and the registry.
pub mod backend;
pub mod center;
pub mod errors;
#[allow(clippy::module_inception)]
pub mod hotkey;

pub use backend::{GlobalHotKeyBackend, HotKeyBackend, NativeId};
pub use center::HotKeyCenter;
pub use errors::HotKeyError;
pub use hotkey::{HotKey, Registration};
