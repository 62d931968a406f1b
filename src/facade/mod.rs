//! Thin wrappers that translate script-friendly calls into host calls
//!
//! - [`ScApp`] - properties, messages and menu commands
//! - [`ScConst`] - named constants, key and color helpers
//! - [`ScPane`] - editor and output pane operations

mod app;
mod constants;
mod pane;

pub use app::{MENU_COMMANDS, ScApp};
pub use constants::{STOP_EVENT_PROPAGATION, ScConst};
pub use pane::{FindOptions, NOT_GETTERS, NOT_SETTERS, PANE_METHODS, PaneCall, PaneMethodTable, ScPane};
