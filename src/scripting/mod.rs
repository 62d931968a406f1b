//! Scripting module - Rhai runtime bound to the editor host
//!
//! All editor functions are exposed under the `scite` namespace:
//! - `scite::app::*` - properties, messages, menu commands
//! - `scite::constants::*` - named constants, key and color helpers
//! - `scite::editor::*` - main editing pane
//! - `scite::output::*` - output pane

mod api;
mod engine;

pub use engine::ScriptEngine;

pub(crate) use api::from_host_value;
