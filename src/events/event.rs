use serde::{Deserialize, Serialize};

use crate::host::HostValue;

// Modifier bits as the editor reports them with key events
const SCMOD_SHIFT: i64 = 1;
const SCMOD_CTRL: i64 = 2;
const SCMOD_ALT: i64 = 4;

/// Editor lifecycle notifications delivered to command modules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Start,
    Open { file: String },
    SwitchFile { file: String },
    BeforeSave { file: String },
    Save { file: String },
    SavePointReached,
    SavePointLeft,
    DoubleClick,
    MarginClick,
    Close { file: String },
    Char { ch: char },
    Key { keyval: i64, modifiers: i64 },
    UserListSelection { list_type: i64, selection: String },
    UserStrip { control: i64, event_type: i64 },
}

impl Event {
    /// Name of the callback function subscribers implement
    pub fn name(&self) -> &'static str {
        match self {
            Event::Start => "OnStart",
            Event::Open { .. } => "OnOpen",
            Event::SwitchFile { .. } => "OnSwitchFile",
            Event::BeforeSave { .. } => "OnBeforeSave",
            Event::Save { .. } => "OnSave",
            Event::SavePointReached => "OnSavePointReached",
            Event::SavePointLeft => "OnSavePointLeft",
            Event::DoubleClick => "OnDoubleClick",
            Event::MarginClick => "OnMarginClick",
            Event::Close { .. } => "OnClose",
            Event::Char { .. } => "OnChar",
            Event::Key { .. } => "OnKey",
            Event::UserListSelection { .. } => "OnUserListSelection",
            Event::UserStrip { .. } => "OnUserStrip",
        }
    }

    /// Positional callback arguments
    pub fn args(&self) -> Vec<HostValue> {
        match self {
            Event::Start
            | Event::SavePointReached
            | Event::SavePointLeft
            | Event::DoubleClick
            | Event::MarginClick => Vec::new(),
            Event::Open { file }
            | Event::SwitchFile { file }
            | Event::BeforeSave { file }
            | Event::Save { file }
            | Event::Close { file } => vec![HostValue::Str(file.clone())],
            Event::Char { ch } => vec![HostValue::Int(*ch as i64)],
            Event::Key { keyval, modifiers } => vec![
                HostValue::Int(*keyval),
                HostValue::Int(i64::from(modifiers & SCMOD_SHIFT != 0)),
                HostValue::Int(i64::from(modifiers & SCMOD_CTRL != 0)),
                HostValue::Int(i64::from(modifiers & SCMOD_ALT != 0)),
            ],
            Event::UserListSelection {
                list_type,
                selection,
            } => vec![HostValue::Int(*list_type), HostValue::Str(selection.clone())],
            Event::UserStrip {
                control,
                event_type,
            } => vec![HostValue::Int(*control), HostValue::Int(*event_type)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_carry_on_prefix() {
        let events = [
            Event::Start,
            Event::Save { file: "a".into() },
            Event::Key {
                keyval: 1,
                modifiers: 0,
            },
        ];
        assert!(events.iter().all(|e| e.name().starts_with("On")));
    }

    #[test]
    fn key_modifiers_split_into_flags() {
        let event = Event::Key {
            keyval: 65,
            modifiers: SCMOD_SHIFT | SCMOD_ALT,
        };
        assert_eq!(
            event.args(),
            vec![
                HostValue::Int(65),
                HostValue::Int(1),
                HostValue::Int(0),
                HostValue::Int(1)
            ]
        );
    }

    #[test]
    fn file_events_pass_the_file_name() {
        let event = Event::Open {
            file: "/tmp/x.rs".into(),
        };
        assert_eq!(event.args(), vec![HostValue::Str("/tmp/x.rs".into())]);
    }

    #[test]
    fn char_is_passed_as_code() {
        assert_eq!(Event::Char { ch: 'a' }.args(), vec![HostValue::Int(97)]);
    }

    #[test]
    fn deserializes_tagged_json() {
        let events: Vec<Event> = serde_json::from_str(
            r#"[{"event": "start"}, {"event": "save", "file": "a.txt"}]"#,
        )
        .unwrap();
        assert_eq!(
            events,
            vec![Event::Start, Event::Save { file: "a.txt".into() }]
        );
    }
}
