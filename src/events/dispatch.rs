use std::path::Path;

use rhai::Dynamic;
use tracing::{debug, error};

use super::modules::ModuleCache;
use super::subscribers::{Subscriber, SubscriberTable};
use crate::error::DispatchError;
use crate::facade::{STOP_EVENT_PROPAGATION, ScApp};
use crate::host::HostValue;
use crate::scripting::{ScriptEngine, from_host_value};

/// Whether the host should keep handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

impl Propagation {
    pub fn is_stop(self) -> bool {
        self == Propagation::Stop
    }
}

/// Result of calling one subscriber
#[derive(Debug)]
pub enum SubscriberOutcome {
    Returned(Dynamic),
    Failed(DispatchError),
}

impl SubscriberOutcome {
    fn stops_propagation(&self) -> bool {
        match self {
            SubscriberOutcome::Returned(value) => value
                .clone()
                .into_string()
                .is_ok_and(|s| s == STOP_EVENT_PROPAGATION),
            SubscriberOutcome::Failed(_) => false,
        }
    }
}

/// Delivers events to subscribed command modules
pub struct Dispatcher {
    subscribers: SubscriberTable,
    modules: ModuleCache,
    entry_file: String,
}

impl Dispatcher {
    pub fn new(subscribers: SubscriberTable, entry_file: impl Into<String>) -> Self {
        Self {
            subscribers,
            modules: ModuleCache::new(),
            entry_file: entry_file.into(),
        }
    }

    pub fn subscribers(&self) -> &SubscriberTable {
        &self.subscribers
    }

    pub fn subscribers_mut(&mut self) -> &mut SubscriberTable {
        &mut self.subscribers
    }

    pub fn modules(&self) -> &ModuleCache {
        &self.modules
    }

    /// Call `event_name` on every subscriber in registration order.
    ///
    /// A failing subscriber is reported and skipped. Dispatch halts as soon as
    /// a subscriber returns the stop sentinel.
    pub fn dispatch(
        &self,
        engine: &ScriptEngine,
        app: &ScApp,
        event_name: &str,
        args: &[HostValue],
    ) -> Propagation {
        // Callbacks may dispatch again through the host
        let subscribers = self.subscribers.subscribers(event_name).to_vec();
        if subscribers.is_empty() {
            return Propagation::Continue;
        }

        let base_dir = app.scite_directory();
        let base_dir = Path::new(&base_dir);
        for subscriber in &subscribers {
            let outcome = self.call_subscriber(engine, base_dir, subscriber, event_name, args);
            match &outcome {
                SubscriberOutcome::Failed(err) => {
                    error!(event = event_name, command = %subscriber.command, "{err}");
                    app.trace(&format!("{err}\n"));
                }
                SubscriberOutcome::Returned(_) if outcome.stops_propagation() => {
                    debug!(event = event_name, command = %subscriber.command, "propagation stopped");
                    return Propagation::Stop;
                }
                SubscriberOutcome::Returned(_) => {}
            }
        }
        Propagation::Continue
    }

    fn call_subscriber(
        &self,
        engine: &ScriptEngine,
        base_dir: &Path,
        subscriber: &Subscriber,
        event_name: &str,
        args: &[HostValue],
    ) -> SubscriberOutcome {
        let resolved = self.modules.resolve(
            engine,
            base_dir,
            &self.entry_file,
            &subscriber.command,
            &subscriber.path,
        );
        let module = match resolved {
            Ok(module) => module,
            Err(err) => return SubscriberOutcome::Failed(err),
        };

        let Ok(mut module) = module.try_borrow_mut() else {
            return SubscriberOutcome::Failed(DispatchError::ModuleBusy {
                command: subscriber.command.clone(),
            });
        };

        let args = args.iter().cloned().map(from_host_value).collect();
        match module.call(engine, event_name, args) {
            Ok(value) => SubscriberOutcome::Returned(value),
            Err(err) => SubscriberOutcome::Failed(err),
        }
    }
}
