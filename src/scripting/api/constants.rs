//! scite::constants - named constants, key and color helpers
//!
//! Usage in Rhai:
//! ```rhai
//! let flags = scite::constants::Get("SCFIND_WHOLEWORD");
//! let key = scite::constants::MakeKeymod(75, false, true, false);
//! let red = scite::constants::MakeColor(255, 0, 0);
//! return scite::constants::StopEventPropagation();
//! ```

use rhai::{Array, Dynamic, EvalAltResult};

use super::host_err;
use crate::facade::{STOP_EVENT_PROPAGATION, ScConst};

/// Create the constants module
pub fn create_module(consts: ScConst) -> rhai::Module {
    let mut module = rhai::Module::new();

    module.set_var("STOP_EVENT_PROPAGATION", STOP_EVENT_PROPAGATION.to_string());

    // Get(name) -> i64
    {
        let consts = consts.clone();
        module.set_native_fn("Get", move |name: &str| -> Result<i64, Box<EvalAltResult>> {
            consts.get(name).map_err(host_err)
        });
    }

    // MakeKeymod(keycode, shift?, ctrl?, alt?) -> i64
    {
        let c = consts.clone();
        module.set_native_fn(
            "MakeKeymod",
            move |keycode: i64| -> Result<i64, Box<EvalAltResult>> {
                c.make_keymod(keycode, false, false, false).map_err(host_err)
            },
        );
        let c = consts.clone();
        module.set_native_fn(
            "MakeKeymod",
            move |keycode: i64, shift: bool| -> Result<i64, Box<EvalAltResult>> {
                c.make_keymod(keycode, shift, false, false).map_err(host_err)
            },
        );
        let c = consts.clone();
        module.set_native_fn(
            "MakeKeymod",
            move |keycode: i64, shift: bool, ctrl: bool| -> Result<i64, Box<EvalAltResult>> {
                c.make_keymod(keycode, shift, ctrl, false).map_err(host_err)
            },
        );
        let c = consts.clone();
        module.set_native_fn(
            "MakeKeymod",
            move |keycode: i64,
                  shift: bool,
                  ctrl: bool,
                  alt: bool|
                  -> Result<i64, Box<EvalAltResult>> {
                c.make_keymod(keycode, shift, ctrl, alt).map_err(host_err)
            },
        );
    }

    // MakeColor(red, green, blue) -> i64
    module.set_native_fn(
        "MakeColor",
        |red: i64, green: i64, blue: i64| -> Result<i64, Box<EvalAltResult>> {
            ScConst::make_color(red, green, blue).map_err(host_err)
        },
    );

    // GetColor(value) -> [red, green, blue]
    module.set_native_fn("GetColor", |value: i64| -> Result<Array, Box<EvalAltResult>> {
        let (red, green, blue) = ScConst::get_color(value);
        Ok(vec![
            Dynamic::from(red),
            Dynamic::from(green),
            Dynamic::from(blue),
        ])
    });

    // StopEventPropagation() -> String
    module.set_native_fn(
        "StopEventPropagation",
        || -> Result<String, Box<EvalAltResult>> {
            Ok(ScConst::stop_event_propagation().to_string())
        },
    );

    module
}
