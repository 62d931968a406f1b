//! Event delivery to command modules
//!
//! Custom commands subscribe to editor events by name (`OnSave`, `OnChar`, ...).
//! The dispatcher loads each subscriber's module on first use and calls the
//! function named after the event.

mod dispatch;
mod event;
mod modules;
mod subscribers;

pub use dispatch::{Dispatcher, Propagation, SubscriberOutcome};
pub use event::Event;
pub use modules::{ModuleCache, ModuleHandle, ScriptModule};
pub use subscribers::{Subscriber, SubscriberTable};
