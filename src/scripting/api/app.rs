//! scite::app - properties, messages and menu commands
//!
//! Usage in Rhai:
//! ```rhai
//! scite::app::Trace("hello\n");
//! let file = scite::app::GetFileName();
//! scite::app::SetProperty("tabsize", 4);
//! scite::app::CmdSaveAll();
//! ```

use rhai::{Dynamic, EvalAltResult};

use super::host_err;
use crate::facade::{MENU_COMMANDS, ScApp};

/// Create the app module
pub fn create_module(app: ScApp) -> rhai::Module {
    let mut module = rhai::Module::new();

    // Trace(text)
    {
        let app = app.clone();
        module.set_native_fn("Trace", move |text: &str| -> Result<(), Box<EvalAltResult>> {
            app.trace(text);
            Ok(())
        });
    }

    // MsgBox(text)
    {
        let app = app.clone();
        module.set_native_fn("MsgBox", move |text: &str| -> Result<(), Box<EvalAltResult>> {
            app.msg_box(text);
            Ok(())
        });
    }

    // OpenFile(path)
    {
        let app = app.clone();
        module.set_native_fn("OpenFile", move |path: &str| -> Result<(), Box<EvalAltResult>> {
            app.open_file(path).map_err(host_err)
        });
    }

    // GetProperty(key) -> String
    {
        let app = app.clone();
        module.set_native_fn(
            "GetProperty",
            move |key: &str| -> Result<String, Box<EvalAltResult>> { Ok(app.get_property(key)) },
        );
    }

    // SetProperty(key, value)
    {
        let app = app.clone();
        module.set_native_fn(
            "SetProperty",
            move |key: &str, value: Dynamic| -> Result<(), Box<EvalAltResult>> {
                app.set_property(key, &value.to_string());
                Ok(())
            },
        );
    }

    // UnsetProperty(key)
    {
        let app = app.clone();
        module.set_native_fn("UnsetProperty", move |key: &str| -> Result<(), Box<EvalAltResult>> {
            app.unset_property(key);
            Ok(())
        });
    }

    // UpdateStatusBar(), UpdateStatusBar(slow)
    {
        let app1 = app.clone();
        module.set_native_fn("UpdateStatusBar", move || -> Result<(), Box<EvalAltResult>> {
            app1.update_status_bar(false);
            Ok(())
        });
        let app2 = app.clone();
        module.set_native_fn(
            "UpdateStatusBar",
            move |slow: bool| -> Result<(), Box<EvalAltResult>> {
                app2.update_status_bar(slow);
                Ok(())
            },
        );
    }

    // EnableNotification(event), EnableNotification(event, enabled)
    {
        let app1 = app.clone();
        module.set_native_fn(
            "EnableNotification",
            move |event: &str| -> Result<(), Box<EvalAltResult>> {
                app1.enable_notification(event, true);
                Ok(())
            },
        );
        let app2 = app.clone();
        module.set_native_fn(
            "EnableNotification",
            move |event: &str, enabled: bool| -> Result<(), Box<EvalAltResult>> {
                app2.enable_notification(event, enabled);
                Ok(())
            },
        );
    }

    // Property shortcuts: GetFilePath() -> String, ...
    let getters: [(&str, fn(&ScApp) -> String); 6] = [
        ("GetFilePath", ScApp::file_path),
        ("GetFileName", ScApp::file_name),
        ("GetLanguage", ScApp::language),
        ("GetCurrentWord", ScApp::current_word),
        ("GetSciteDirectory", ScApp::scite_directory),
        ("GetSciteUserDirectory", ScApp::scite_user_directory),
    ];
    for (name, getter) in getters {
        let app = app.clone();
        module.set_native_fn(name, move || -> Result<String, Box<EvalAltResult>> {
            Ok(getter(&app))
        });
    }

    // User strip
    {
        let app = app.clone();
        module.set_native_fn(
            "UserStripShow",
            move |description: &str| -> Result<(), Box<EvalAltResult>> {
                app.user_strip_show(description);
                Ok(())
            },
        );
    }
    {
        let app = app.clone();
        module.set_native_fn(
            "UserStripSet",
            move |control: i64, value: &str| -> Result<(), Box<EvalAltResult>> {
                app.user_strip_set(control, value);
                Ok(())
            },
        );
    }
    {
        let app = app.clone();
        module.set_native_fn(
            "UserStripSetList",
            move |control: i64, value: &str| -> Result<(), Box<EvalAltResult>> {
                app.user_strip_set_list(control, value);
                Ok(())
            },
        );
    }
    {
        let app = app.clone();
        module.set_native_fn(
            "UserStripGetValue",
            move |control: i64| -> Result<Dynamic, Box<EvalAltResult>> {
                Ok(app
                    .user_strip_value(control)
                    .map(Dynamic::from)
                    .unwrap_or(Dynamic::UNIT))
            },
        );
    }

    // Menu commands: CmdQuit(), CmdSaveAll(), ...
    for &name in MENU_COMMANDS {
        let app = app.clone();
        module.set_native_fn(
            format!("Cmd{name}"),
            move || -> Result<(), Box<EvalAltResult>> { app.command(name).map_err(host_err) },
        );
    }

    module
}
