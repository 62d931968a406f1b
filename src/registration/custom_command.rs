use crate::error::ConfigError;
use crate::facade::ScApp;

/// A custom command as configured through `customcommand.<id>.*` properties
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomCommand {
    pub id: String,
    pub name: String,
    pub filetypes: String,
    pub action: String,
    pub shortcut: Option<String>,
    pub mode: Option<String>,
    pub path: Option<String>,
    pub callbacks: Vec<String>,
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

impl CustomCommand {
    pub fn property_key(id: &str, field: &str) -> String {
        format!("customcommand.{id}.{field}")
    }

    fn read(app: &ScApp, id: &str, field: &str) -> String {
        app.get_property(&Self::property_key(id, field))
    }

    /// Module path and callback event names.
    ///
    /// Callbacks are split on `|`. A path is required as soon as the
    /// callbacks property holds anything at all.
    pub fn read_callbacks(
        app: &ScApp,
        id: &str,
    ) -> Result<(Option<String>, Vec<String>), ConfigError> {
        let path = non_empty(Self::read(app, id, "path"));
        let raw = Self::read(app, id, "callbacks");
        if raw.is_empty() {
            return Ok((path, Vec::new()));
        }
        if path.is_none() {
            return Err(ConfigError::MissingPath {
                command: id.to_string(),
            });
        }
        let callbacks = raw
            .split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Ok((path, callbacks))
    }

    /// Callback names must be `On*` events
    pub fn check_event_name(id: &str, event: &str) -> Result<(), ConfigError> {
        if event.starts_with("On") {
            Ok(())
        } else {
            Err(ConfigError::InvalidEventName {
                command: id.to_string(),
                event: event.to_string(),
            })
        }
    }

    /// The menu fields; `name`, `filetypes` and `action` are required
    pub fn read_menu_fields(
        app: &ScApp,
        id: &str,
        path: Option<String>,
        callbacks: Vec<String>,
    ) -> Result<Self, ConfigError> {
        let command = || id.to_string();
        let name = non_empty(Self::read(app, id, "name"))
            .ok_or_else(|| ConfigError::MissingName { command: command() })?;
        let filetypes = non_empty(Self::read(app, id, "filetypes"))
            .ok_or_else(|| ConfigError::MissingFiletypes { command: command() })?;
        let action = non_empty(Self::read(app, id, "action"))
            .ok_or_else(|| ConfigError::MissingAction { command: command() })?;

        Ok(Self {
            id: id.to_string(),
            name,
            filetypes,
            action,
            shortcut: non_empty(Self::read(app, id, "shortcut")),
            mode: non_empty(Self::read(app, id, "mode")),
            path,
            callbacks,
        })
    }

    /// Publish the command in tools menu slot `slot`.
    ///
    /// Values are `$(customcommand.<id>.<field>)` references so the host
    /// expands them on use.
    pub fn materialize(&self, app: &ScApp, slot: u32) {
        let t = &self.filetypes;
        let reference = |field: &str| format!("$({})", Self::property_key(&self.id, field));
        app.set_property(&format!("command.name.{slot}.{t}"), &reference("name"));
        app.set_property(&format!("command.shortcut.{slot}.{t}"), &reference("shortcut"));
        app.set_property(&format!("command.{slot}.{t}"), &reference("action"));
        app.set_property(&format!("command.mode.{slot}.{t}"), &reference("mode"));
    }
}
