use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::ExtensionError;
use crate::events::Event;
use crate::facade::ScApp;
use crate::host::Host;
use crate::runtime::ExtensionRuntime;

/// The host-facing side of the extension.
///
/// The host calls `initialise` once, then forwards editor notifications to
/// `on_event`, tool commands to `on_execute` and opened files to `load`.
pub struct ScriptExtension {
    host: Arc<dyn Host>,
    settings: Settings,
    runtime: Option<ExtensionRuntime>,
}

impl ScriptExtension {
    pub fn new(host: Arc<dyn Host>) -> Self {
        let settings = Settings::from_host(&ScApp::new(host.clone()));
        Self {
            host,
            settings,
            runtime: None,
        }
    }

    /// Start the runtime unless loading is delayed until first use.
    ///
    /// A configuration error is reported to the output pane and returned;
    /// commands registered before it stay active.
    pub fn initialise(&mut self) -> Result<(), ExtensionError> {
        if self.settings.delay_load {
            debug!("delaying script runtime until first use");
            return Ok(());
        }
        self.start()?;
        self.on_event(&Event::Start);
        Ok(())
    }

    fn start(&mut self) -> Result<&ExtensionRuntime, ExtensionError> {
        let runtime = match self.runtime.take() {
            Some(runtime) => runtime,
            None => {
                let mut runtime =
                    ExtensionRuntime::new(self.host.clone(), self.settings.clone());
                let scanned = runtime.scan().map(<[_]>::len);
                match scanned {
                    Ok(count) => info!(commands = count, "script runtime started"),
                    Err(err) => {
                        warn!(command = err.command(), "{err}");
                        self.host.trace(&format!("{err}\n"));
                        self.runtime = Some(runtime);
                        return Err(err.into());
                    }
                }
                runtime
            }
        };
        Ok(&*self.runtime.insert(runtime))
    }

    pub fn finalise(&mut self) {
        self.runtime = None;
    }

    pub fn is_initialised(&self) -> bool {
        self.runtime.is_some()
    }

    /// Deliver an editor notification. Returns `true` when a command module
    /// stopped propagation.
    pub fn on_event(&self, event: &Event) -> bool {
        match &self.runtime {
            Some(runtime) => runtime.dispatch(event.name(), &event.args()).is_stop(),
            None => false,
        }
    }

    /// Run `rhai:<code>` tool commands. Anything else is left to the host.
    pub fn on_execute(&mut self, command: &str) -> bool {
        let Some(script) = command.strip_prefix(self.settings.execute_prefix.as_str()) else {
            return false;
        };
        let result = self.start().and_then(|runtime| runtime.eval(script));
        if let Err(err) = result {
            self.host.trace(&format!("{err}\n"));
        }
        true
    }

    /// Run `.rhai` files the editor opens. Never claims the file.
    pub fn load(&mut self, path: &Path) -> bool {
        if path.extension().is_none_or(|ext| ext != "rhai") {
            return false;
        }
        let result = self.start().and_then(|runtime| runtime.run_file(path));
        if let Err(err) = result {
            self.host.trace(&format!("{err}\n"));
        }
        false
    }

    pub fn runtime(&self) -> Option<&ExtensionRuntime> {
        self.runtime.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemoryHost, Pane};
    use std::fs;

    fn host_in(dir: &Path, props: &[(&str, &str)]) -> Arc<MemoryHost> {
        let host = Arc::new(MemoryHost::with_properties(props.iter().copied()));
        host.set_property("SciteDefaultHome", dir.to_str().unwrap());
        host
    }

    fn write_module(dir: &Path, path: &str, source: &str) {
        let module_dir = dir.join(path);
        fs::create_dir_all(&module_dir).unwrap();
        fs::write(module_dir.join("init.rhai"), source).unwrap();
    }

    const GREETER: &[(&str, &str)] = &[
        ("customcommandsregister.user", "greeter|"),
        ("customcommand.greeter.name", "Greet"),
        ("customcommand.greeter.filetypes", "*"),
        ("customcommand.greeter.action", "rhai:greet()"),
        ("customcommand.greeter.path", "greeter"),
        ("customcommand.greeter.callbacks", "OnStart|OnKey"),
    ];

    #[test]
    fn initialise_scans_and_fires_on_start() {
        let dir = tempfile::tempdir().unwrap();
        write_module(
            dir.path(),
            "greeter",
            r#"fn OnStart() { scite::app::Trace("started\n"); }"#,
        );
        let host = host_in(dir.path(), GREETER);
        let mut extension = ScriptExtension::new(host.clone());
        extension.initialise().unwrap();

        assert!(extension.is_initialised());
        assert_eq!(host.pane_text(Pane::Output), "started\n");
        assert_eq!(host.property("command.name.11.*"), "Greet");
    }

    #[test]
    fn delay_load_skips_startup() {
        let dir = tempfile::tempdir().unwrap();
        let mut props = GREETER.to_vec();
        props.push(("ext.rhai.delayload", "1"));
        let host = host_in(dir.path(), &props);
        let mut extension = ScriptExtension::new(host.clone());
        extension.initialise().unwrap();

        assert!(!extension.is_initialised());
        assert!(host.raw_property("command.name.11.*").is_none());
        assert!(!extension.on_event(&Event::Start));
    }

    #[test]
    fn key_event_can_stop_propagation() {
        let dir = tempfile::tempdir().unwrap();
        write_module(
            dir.path(),
            "greeter",
            r#"
            fn OnKey(keyval, shift, ctrl, alt) {
                if ctrl == 1 && keyval == 75 {
                    return scite::constants::StopEventPropagation();
                }
            }
            "#,
        );
        let host = host_in(dir.path(), GREETER);
        let mut extension = ScriptExtension::new(host.clone());
        extension.initialise().unwrap();

        let ctrl_k = Event::Key {
            keyval: 75,
            modifiers: 2,
        };
        let plain_k = Event::Key {
            keyval: 75,
            modifiers: 0,
        };
        assert!(extension.on_event(&ctrl_k));
        assert!(!extension.on_event(&plain_k));
    }

    #[test]
    fn scan_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let host = host_in(
            dir.path(),
            &[("customcommandsregister.user", "nameless")],
        );
        let mut extension = ScriptExtension::new(host.clone());
        let err = extension.initialise().unwrap_err();

        assert!(matches!(err, ExtensionError::Config(_)));
        assert_eq!(
            host.pane_text(Pane::Output),
            "command nameless needs a name\n"
        );
        assert!(extension.is_initialised());
    }

    #[test]
    fn execute_handles_prefixed_commands_only() {
        let dir = tempfile::tempdir().unwrap();
        let host = host_in(dir.path(), &[]);
        let mut extension = ScriptExtension::new(host.clone());

        assert!(extension.on_execute(r#"rhai:scite::app::SetProperty("ran", "yes")"#));
        assert_eq!(host.property("ran"), "yes");
        assert!(!extension.on_execute("python:print(1)"));
    }

    #[test]
    fn execute_errors_go_to_output() {
        let dir = tempfile::tempdir().unwrap();
        let host = host_in(dir.path(), &[]);
        let mut extension = ScriptExtension::new(host.clone());

        assert!(extension.on_execute("rhai:nope()"));
        assert!(host.pane_text(Pane::Output).contains("script error"));
    }

    #[test]
    fn load_runs_rhai_files() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("setup.rhai");
        fs::write(&script, r#"scite::app::SetProperty("loaded", 1);"#).unwrap();
        let other = dir.path().join("notes.txt");
        fs::write(&other, "plain text").unwrap();

        let host = host_in(dir.path(), &[]);
        let mut extension = ScriptExtension::new(host.clone());

        assert!(!extension.load(&script));
        assert_eq!(host.property("loaded"), "1");
        assert!(!extension.load(&other));
        assert_eq!(host.pane_text(Pane::Output), "");
    }

    #[test]
    fn finalise_drops_the_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let host = host_in(dir.path(), &[]);
        let mut extension = ScriptExtension::new(host);
        extension.initialise().unwrap();
        assert!(extension.runtime().is_some());
        extension.finalise();
        assert!(!extension.is_initialised());
    }
}
