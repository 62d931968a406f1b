//! The native editor seen from the scripting side
//!
//! Everything the bridge does is forwarded through [`Host`]. A real editor
//! implements it over its own engine; [`MemoryHost`] is a small in-process
//! implementation used by tests and the demo binary.

mod buffer;
mod memory;
mod value;

pub use memory::MemoryHost;
pub use value::HostValue;

use crate::error::HostError;

/// Property holding the editor's installation directory.
pub const SCITE_DIRECTORY_PROPERTY: &str = "SciteDefaultHome";
/// Property holding the user's settings directory.
pub const SCITE_USER_DIRECTORY_PROPERTY: &str = "SciteUserHome";

/// One of the two editor surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Editor,
    Output,
}

impl Pane {
    pub fn index(self) -> i64 {
        match self {
            Pane::Editor => 0,
            Pane::Output => 1,
        }
    }

    pub fn from_index(index: i64) -> Result<Self, HostError> {
        match index {
            0 => Ok(Pane::Editor),
            1 => Ok(Pane::Output),
            other => Err(HostError::InvalidPane(other)),
        }
    }
}

/// Call surface of the native editor.
///
/// Methods take `&self`; implementations own their interior mutability so a
/// script callback can call back into the host while the host is notifying
/// the extension.
pub trait Host: Send + Sync {
    /// Write text to the output pane.
    fn trace(&self, text: &str);
    fn message_box(&self, text: &str);
    fn open_file(&self, path: &str) -> Result<(), HostError>;

    /// Read a property with `$(...)` references expanded.
    fn property(&self, key: &str) -> String;
    fn set_property(&self, key: &str, value: &str);
    fn unset_property(&self, key: &str);

    fn update_status_bar(&self, update_slow_data: bool);

    /// Turn native delivery of a named notification on or off.
    fn enable_notification(&self, event_name: &str, enabled: bool);

    /// Run a menu command by its friendly name (`Quit`, `SaveAll`, ...).
    fn menu_command(&self, name: &str) -> Result<(), HostError>;

    /// Look up a named interface constant (`SCFIND_WHOLEWORD`, ...).
    fn constant(&self, name: &str) -> Result<i64, HostError>;

    fn user_strip_show(&self, _description: &str) {}
    fn user_strip_set(&self, _control: i64, _value: &str) {}
    fn user_strip_set_list(&self, _control: i64, _value: &str) {}
    fn user_strip_value(&self, _control: i64) -> Option<String> {
        None
    }

    fn pane_append(&self, pane: Pane, text: &str);
    fn pane_insert(&self, pane: Pane, pos: i64, text: &str);
    fn pane_remove(&self, pane: Pane, start: i64, end: i64);
    fn pane_text_range(&self, pane: Pane, start: i64, end: i64) -> Result<String, HostError>;

    /// Search `[start, end)` for `text`; `end == -1` means the end of the document.
    fn pane_find_text(
        &self,
        pane: Pane,
        text: &str,
        flags: i64,
        start: i64,
        end: i64,
    ) -> Result<Option<(i64, i64)>, HostError>;

    /// Property query, `GetX(param)`.
    fn pane_get(
        &self,
        pane: Pane,
        property: &str,
        param: Option<HostValue>,
    ) -> Result<HostValue, HostError>;

    /// Property change, `SetX(value)` or `SetX(index, value)`.
    fn pane_set(
        &self,
        pane: Pane,
        property: &str,
        value: HostValue,
        extra: Option<HostValue>,
    ) -> Result<(), HostError>;

    /// Direct editor function call with positional arguments.
    fn pane_call(
        &self,
        pane: Pane,
        function: &str,
        args: &[HostValue],
    ) -> Result<HostValue, HostError>;
}
