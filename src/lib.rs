//! Rhai scripting bridge for a SciTE-style editor
//!
//! Scripts reach the editor through the `scite` namespace (application
//! commands, constants, and the editor and output panes). Custom commands
//! configured with `customcommand.<id>.*` properties are registered at
//! startup and their command modules receive editor events.

pub mod config;
pub mod error;
pub mod events;
pub mod extension;
pub mod facade;
pub mod host;
pub mod registration;
pub mod runtime;
pub mod scripting;

pub use error::{ConfigError, DispatchError, ExtensionError, HostError};
pub use extension::ScriptExtension;
pub use runtime::ExtensionRuntime;
