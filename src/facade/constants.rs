use std::sync::Arc;

use crate::error::HostError;
use crate::host::Host;

/// Return value that stops an event from reaching later subscribers.
pub const STOP_EVENT_PROPAGATION: &str = "StopEventPropagation";

/// Named constants and the numeric helpers built on them
#[derive(Clone)]
pub struct ScConst {
    host: Arc<dyn Host>,
}

impl ScConst {
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self { host }
    }

    pub fn get(&self, name: &str) -> Result<i64, HostError> {
        if name.is_empty() || name.starts_with('_') {
            return Err(HostError::UnknownConstant(name.to_string()));
        }
        self.host.constant(name)
    }

    /// Key code with modifier bits in the high word, as key bindings expect.
    pub fn make_keymod(
        &self,
        keycode: i64,
        shift: bool,
        ctrl: bool,
        alt: bool,
    ) -> Result<i64, HostError> {
        let mut modifiers = 0;
        if shift {
            modifiers |= self.get("SCMOD_SHIFT")?;
        }
        if ctrl {
            modifiers |= self.get("SCMOD_CTRL")?;
        }
        if alt {
            modifiers |= self.get("SCMOD_ALT")?;
        }
        Ok((keycode & 0xffff) | (modifiers << 16))
    }

    pub fn make_color(red: i64, green: i64, blue: i64) -> Result<i64, HostError> {
        for (component, value) in [("red", red), ("green", green), ("blue", blue)] {
            if !(0..=255).contains(&value) {
                return Err(HostError::ColorOutOfRange { component, value });
            }
        }
        Ok(red + (green << 8) + (blue << 16))
    }

    pub fn get_color(value: i64) -> (i64, i64, i64) {
        (value & 0xff, (value & 0xff00) >> 8, (value & 0xff_0000) >> 16)
    }

    pub fn stop_event_propagation() -> &'static str {
        STOP_EVENT_PROPAGATION
    }
}
