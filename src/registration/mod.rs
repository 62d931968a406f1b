//! Startup registration of custom commands
//!
//! Reads `customcommand.<id>.*` properties, subscribes command modules to
//! their callback events and publishes each command in the tools menu.

mod custom_command;
mod scanner;

pub use custom_command::CustomCommand;
pub use scanner::{RegisteredCommand, command_ids, scan};
