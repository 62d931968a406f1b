use std::path::{Path, PathBuf};
use std::sync::Arc;

use rhai::Dynamic;

use crate::config::Settings;
use crate::error::{ConfigError, DispatchError, ExtensionError};
use crate::events::{Dispatcher, ModuleHandle, Propagation, SubscriberTable};
use crate::facade::ScApp;
use crate::host::{Host, HostValue};
use crate::registration::{self, RegisteredCommand};
use crate::scripting::ScriptEngine;

/// Everything the extension owns once started: the script engine, the
/// subscriber table with its module cache, and the registered commands.
pub struct ExtensionRuntime {
    app: ScApp,
    settings: Settings,
    engine: ScriptEngine,
    dispatcher: Dispatcher,
    commands: Vec<RegisteredCommand>,
}

impl ExtensionRuntime {
    pub fn new(host: Arc<dyn Host>, settings: Settings) -> Self {
        let engine = ScriptEngine::new(host.clone(), &settings);
        let dispatcher = Dispatcher::new(SubscriberTable::new(), settings.entry_file.clone());
        Self {
            app: ScApp::new(host),
            settings,
            engine,
            dispatcher,
            commands: Vec::new(),
        }
    }

    /// Run the custom command scan.
    ///
    /// On error, registrations made before the failing command are kept.
    pub fn scan(&mut self) -> Result<&[RegisteredCommand], ConfigError> {
        self.commands.clear();
        registration::scan(
            &self.app,
            &self.settings,
            self.dispatcher.subscribers_mut(),
            &mut self.commands,
        )?;
        Ok(&self.commands)
    }

    pub fn dispatch(&self, event_name: &str, args: &[HostValue]) -> Propagation {
        self.dispatcher
            .dispatch(&self.engine, &self.app, event_name, args)
    }

    pub fn eval(&self, script: &str) -> Result<Dynamic, ExtensionError> {
        self.engine.eval(script)
    }

    pub fn run_file(&self, path: &Path) -> Result<(), ExtensionError> {
        self.engine.run_file(path)
    }

    /// Load (or fetch) the module a command lives in
    pub fn resolve_module(
        &self,
        command: &str,
        path: &str,
    ) -> Result<ModuleHandle, DispatchError> {
        self.dispatcher.modules().resolve(
            &self.engine,
            &self.modules_dir(),
            &self.settings.entry_file,
            command,
            path,
        )
    }

    /// Base directory command module paths are relative to
    pub fn modules_dir(&self) -> PathBuf {
        PathBuf::from(self.app.scite_directory())
    }

    pub fn subscribers(&self) -> &SubscriberTable {
        self.dispatcher.subscribers()
    }

    pub fn commands(&self) -> &[RegisteredCommand] {
        &self.commands
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn app(&self) -> &ScApp {
        &self.app
    }
}
