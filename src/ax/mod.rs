/// macOS Accessibility layer: read live menu bars of running applications.
pub mod app;
pub mod element;
pub mod errors;
pub mod permissions;

pub use app::resolve_target;
pub use element::{AXElement, AttributeValue, MENU_ITEM_ATTRS, attr_idx};
pub use errors::AXError;
pub use permissions::{ensure_trusted, permission_instructions};
