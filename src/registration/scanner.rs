use std::collections::HashSet;

use tracing::{debug, info};

use super::custom_command::CustomCommand;
use crate::config::Settings;
use crate::error::ConfigError;
use crate::events::{Subscriber, SubscriberTable};
use crate::facade::ScApp;

/// A custom command placed in a tools menu slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredCommand {
    pub slot: u32,
    pub command: CustomCommand,
}

/// Identifiers listed by the `customcommandsregister.*` properties.
///
/// The host concatenates every matching property value; identifiers are
/// separated by `|`.
pub fn command_ids(app: &ScApp, settings: &Settings) -> Vec<String> {
    app.set_property(
        &settings.temp_property,
        &format!("$(star *{})", settings.register_prefix),
    );
    app.get_property(&settings.temp_property)
        .split('|')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Register every configured custom command.
///
/// Event callbacks go into `subscribers` and each command gets the next tools
/// menu slot, appended to `registered`. The first configuration error stops
/// the scan; commands scanned before it stay registered.
pub fn scan(
    app: &ScApp,
    settings: &Settings,
    subscribers: &mut SubscriberTable,
    registered: &mut Vec<RegisteredCommand>,
) -> Result<(), ConfigError> {
    let mut shortcuts = HashSet::new();
    let mut slot = settings.first_command_slot;

    for id in command_ids(app, settings) {
        let (path, callbacks) = CustomCommand::read_callbacks(app, &id)?;
        if let Some(path) = &path {
            for event in &callbacks {
                CustomCommand::check_event_name(&id, event)?;
                app.enable_notification(event, true);
                subscribers.register(event, Subscriber::new(&id, path));
                debug!(command = %id, event = %event, "registered callback");
            }
        }

        let command = CustomCommand::read_menu_fields(app, &id, path, callbacks)?;
        if let Some(shortcut) = &command.shortcut {
            if !shortcuts.insert(shortcut.to_lowercase()) {
                return Err(ConfigError::DuplicateShortcut {
                    command: id,
                    shortcut: shortcut.clone(),
                });
            }
        }

        command.materialize(app, slot);
        debug!(command = %id, slot, "registered custom command");
        registered.push(RegisteredCommand { slot, command });
        slot += 1;
    }

    info!(commands = registered.len(), "custom command scan complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use std::sync::Arc;

    type Scanned = (
        Arc<MemoryHost>,
        ScApp,
        SubscriberTable,
        Result<Vec<RegisteredCommand>, ConfigError>,
    );

    fn scan_all(
        app: &ScApp,
        table: &mut SubscriberTable,
    ) -> Result<Vec<RegisteredCommand>, ConfigError> {
        let mut registered = Vec::new();
        scan(app, &Settings::default(), table, &mut registered)?;
        Ok(registered)
    }

    fn scan_props(props: &[(&str, &str)]) -> Scanned {
        let host = Arc::new(MemoryHost::with_properties(props.iter().copied()));
        let app = ScApp::new(host.clone());
        let mut table = SubscriberTable::new();
        let result = scan_all(&app, &mut table);
        (host, app, table, result)
    }

    fn command(id: &str, extra: &[(&'static str, &'static str)]) -> Vec<(String, String)> {
        let mut props = vec![
            (format!("customcommand.{id}.name"), format!("Command {id}")),
            (format!("customcommand.{id}.filetypes"), "*".to_string()),
            (format!("customcommand.{id}.action"), format!("rhai:{id}()")),
        ];
        for (field, value) in extra {
            props.push((format!("customcommand.{id}.{field}"), value.to_string()));
        }
        props
    }

    fn as_refs(props: &[(String, String)]) -> Vec<(&str, &str)> {
        props.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn ids_come_from_the_register_properties() {
        let host = Arc::new(MemoryHost::with_properties([
            ("customcommandsregister.a", "alpha|"),
            ("customcommandsregister.b", " beta || gamma|"),
            ("unrelated", "zeta|"),
        ]));
        let app = ScApp::new(host);
        assert_eq!(
            command_ids(&app, &Settings::default()),
            vec!["alpha", "beta", "gamma"]
        );
    }

    #[test]
    fn no_register_properties_registers_nothing() {
        let (_host, _app, table, result) = scan_props(&[]);
        assert_eq!(result.unwrap(), Vec::new());
        assert!(table.is_empty());
    }

    #[test]
    fn assigns_slots_and_subscribes_callbacks() {
        let mut props = vec![("customcommandsregister.x".to_string(), "a|b|".to_string())];
        props.extend(command("a", &[]));
        props.extend(command(
            "b",
            &[("path", "cmds/b"), ("callbacks", "OnSave | OnOpen")],
        ));
        let (host, app, table, result) = scan_props(&as_refs(&props));

        let registered = result.unwrap();
        let slots: Vec<_> = registered
            .iter()
            .map(|r| (r.slot, r.command.id.as_str()))
            .collect();
        assert_eq!(slots, vec![(11, "a"), (12, "b")]);

        assert_eq!(
            table.subscribers("OnSave"),
            &[Subscriber::new("b", "cmds/b")]
        );
        assert_eq!(
            table.subscribers("OnOpen"),
            &[Subscriber::new("b", "cmds/b")]
        );
        assert!(!table.is_subscribed("OnSave", "a"));
        assert!(host.notification_enabled("OnSave"));
        assert!(host.notification_enabled("OnOpen"));

        assert_eq!(app.get_property("command.name.11.*"), "Command a");
        assert_eq!(app.get_property("command.12.*"), "rhai:b()");
    }

    #[test]
    fn duplicate_shortcut_is_fatal_and_ignores_case() {
        let mut props = vec![("customcommandsregister.x".to_string(), "a|b".to_string())];
        props.extend(command("a", &[("shortcut", "Ctrl+K")]));
        props.extend(command("b", &[("shortcut", "ctrl+k")]));
        let (host, _app, _table, result) = scan_props(&as_refs(&props));

        assert_eq!(
            result.unwrap_err(),
            ConfigError::DuplicateShortcut {
                command: "b".into(),
                shortcut: "ctrl+k".into()
            }
        );
        assert!(host.raw_property("command.name.11.*").is_some());
        assert!(host.raw_property("command.name.12.*").is_none());
        assert!(host.raw_property("command.shortcut.12.*").is_none());
    }

    #[test]
    fn missing_action_stops_the_scan() {
        let mut props = vec![("customcommandsregister.x".to_string(), "a|b|c".to_string())];
        props.extend(command("a", &[]));
        props.push(("customcommand.b.name".into(), "B".into()));
        props.push(("customcommand.b.filetypes".into(), "*".into()));
        props.extend(command("c", &[]));
        let (host, _app, _table, result) = scan_props(&as_refs(&props));

        let err = result.unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingAction {
                command: "b".into()
            }
        );
        assert_eq!(err.command(), "b");
        assert!(host.raw_property("command.11.*").is_some());
        assert!(host.raw_property("command.12.*").is_none());
        assert!(host.raw_property("command.13.*").is_none());
    }

    #[test]
    fn callbacks_register_before_menu_fields_are_checked() {
        let props = [
            ("customcommandsregister.x", "lonely"),
            ("customcommand.lonely.path", "p"),
            ("customcommand.lonely.callbacks", "OnClose"),
        ];
        let (_host, _app, table, result) = scan_props(&props);
        assert!(matches!(result, Err(ConfigError::MissingName { .. })));
        assert!(table.is_subscribed("OnClose", "lonely"));
    }

    #[test]
    fn bad_event_name_is_fatal() {
        let mut props = vec![("customcommandsregister.x".to_string(), "a".to_string())];
        props.extend(command("a", &[("path", "p"), ("callbacks", "OnSave|Saved")]));
        let (host, _app, table, result) = scan_props(&as_refs(&props));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::InvalidEventName {
                command: "a".into(),
                event: "Saved".into()
            }
        );
        // Callbacks before the bad name stay registered
        assert!(table.is_subscribed("OnSave", "a"));
        assert!(host.notification_enabled("OnSave"));
        assert!(!host.notification_enabled("Saved"));
        assert!(host.raw_property("command.11.*").is_none());
    }

    #[test]
    fn empty_shortcuts_never_collide() {
        let mut props = vec![("customcommandsregister.x".to_string(), "a|b".to_string())];
        props.extend(command("a", &[]));
        props.extend(command("b", &[]));
        let (_host, _app, _table, result) = scan_props(&as_refs(&props));
        assert_eq!(result.unwrap().len(), 2);
    }
}
