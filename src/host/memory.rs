use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use super::buffer::PaneBuffer;
use super::{Host, HostValue, Pane};
use crate::error::HostError;

/// Nested `$(...)` references deeper than this are left unexpanded.
const MAX_EXPANSION_DEPTH: usize = 32;

/// Interface constants known to the in-memory host
const CONSTANTS: &[(&str, i64)] = &[
    ("SCFIND_MATCHCASE", 4),
    ("SCFIND_POSIX", 0x0040_0000),
    ("SCFIND_REGEXP", 0x0020_0000),
    ("SCFIND_WHOLEWORD", 2),
    ("SCFIND_WORDSTART", 0x0010_0000),
    ("SCMOD_ALT", 4),
    ("SCMOD_CTRL", 2),
    ("SCMOD_META", 16),
    ("SCMOD_NORM", 0),
    ("SCMOD_SHIFT", 1),
    ("SCMOD_SUPER", 8),
    ("SC_EOL_CR", 1),
    ("SC_EOL_CRLF", 0),
    ("SC_EOL_LF", 2),
];

#[derive(Default)]
struct State {
    properties: BTreeMap<String, String>,
    panes: [PaneBuffer; 2],
    notifications: BTreeSet<String>,
    menu_commands: Vec<String>,
    message_boxes: Vec<String>,
    opened_files: Vec<String>,
    user_strip: BTreeMap<i64, String>,
    clipboard: Option<String>,
    status_bar_updates: usize,
}

impl State {
    fn pane(&self, pane: Pane) -> &PaneBuffer {
        &self.panes[pane.index() as usize]
    }

    fn pane_mut(&mut self, pane: Pane) -> &mut PaneBuffer {
        &mut self.panes[pane.index() as usize]
    }
}

/// An editor host kept entirely in memory.
///
/// Properties follow the editor's expansion rules: `$(key)` is replaced by
/// the expanded value of `key` and `$(star *prefix)` by the concatenated
/// values of every key starting with `prefix`, in key order. `trace` writes
/// to the output pane.
#[derive(Default)]
pub struct MemoryHost {
    state: RwLock<State>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a host from `(key, value)` pairs
    pub fn with_properties<K, V>(properties: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let host = Self::new();
        {
            let mut state = host.write();
            for (key, value) in properties {
                state.properties.insert(key.into(), value.into());
            }
        }
        host
    }

    /// Load `key=value` lines. `#` starts a comment line and a trailing
    /// backslash continues the value on the next line.
    pub fn load_properties(&self, source: &str) {
        let mut state = self.write();
        let mut lines = source.lines();
        while let Some(line) = lines.next() {
            let mut line = line.trim_start().to_string();
            while line.ends_with('\\') {
                line.pop();
                match lines.next() {
                    Some(next) => line.push_str(next.trim_start()),
                    None => break,
                }
            }
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                state
                    .properties
                    .insert(key.trim().to_string(), value.to_string());
            }
        }
    }

    /// Unexpanded value, as stored.
    pub fn raw_property(&self, key: &str) -> Option<String> {
        self.read().properties.get(key).cloned()
    }

    pub fn pane_text(&self, pane: Pane) -> String {
        self.read().pane(pane).text()
    }

    pub fn set_pane_text(&self, pane: Pane, text: &str) {
        self.write().pane_mut(pane).set_text(text);
    }

    pub fn caret(&self, pane: Pane) -> usize {
        self.read().pane(pane).caret()
    }

    pub fn set_caret(&self, pane: Pane, pos: i64) {
        self.write().pane_mut(pane).set_caret(pos);
    }

    pub fn notification_enabled(&self, event_name: &str) -> bool {
        self.read().notifications.contains(event_name)
    }

    pub fn menu_commands(&self) -> Vec<String> {
        self.read().menu_commands.clone()
    }

    pub fn message_boxes(&self) -> Vec<String> {
        self.read().message_boxes.clone()
    }

    pub fn opened_files(&self) -> Vec<String> {
        self.read().opened_files.clone()
    }

    pub fn clipboard(&self) -> Option<String> {
        self.read().clipboard.clone()
    }

    pub fn status_bar_updates(&self) -> usize {
        self.read().status_bar_updates
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn expand(properties: &BTreeMap<String, String>, value: &str, depth: usize) -> String {
    if depth >= MAX_EXPANSION_DEPTH {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("$(") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(close) = after.find(')') else {
            out.push_str(&rest[start..]);
            return out;
        };
        out.push_str(&lookup(properties, &after[..close], depth));
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

fn lookup(properties: &BTreeMap<String, String>, reference: &str, depth: usize) -> String {
    if let Some(prefix) = reference.strip_prefix("star *") {
        return properties
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(_, value)| expand(properties, value, depth + 1))
            .collect();
    }
    properties
        .get(reference)
        .map(|value| expand(properties, value, depth + 1))
        .unwrap_or_default()
}

fn string_arg(call: &str, args: &[HostValue], index: usize) -> Result<String, HostError> {
    match args.get(index) {
        Some(HostValue::Str(s)) => Ok(s.clone()),
        _ => Err(HostError::InvalidArgument {
            call: call.to_string(),
            reason: format!("argument {} must be a string", index + 1),
        }),
    }
}

fn int_arg(call: &str, args: &[HostValue], index: usize) -> Result<i64, HostError> {
    args.get(index)
        .and_then(HostValue::as_int)
        .ok_or_else(|| HostError::InvalidArgument {
            call: call.to_string(),
            reason: format!("argument {} must be a number", index + 1),
        })
}

fn indexed_key(property: &str, index: &HostValue) -> String {
    match index {
        HostValue::Str(s) => format!("{property}.{s}"),
        other => format!("{property}.{}", other.as_int().unwrap_or_default()),
    }
}

impl Host for MemoryHost {
    fn trace(&self, text: &str) {
        self.write().pane_mut(Pane::Output).append(text);
    }

    fn message_box(&self, text: &str) {
        self.write().message_boxes.push(text.to_string());
    }

    fn open_file(&self, path: &str) -> Result<(), HostError> {
        if path.is_empty() {
            return Err(HostError::InvalidArgument {
                call: "OpenFile".to_string(),
                reason: "empty path".to_string(),
            });
        }
        self.write().opened_files.push(path.to_string());
        Ok(())
    }

    fn property(&self, key: &str) -> String {
        let state = self.read();
        state
            .properties
            .get(key)
            .map(|value| expand(&state.properties, value, 0))
            .unwrap_or_default()
    }

    fn set_property(&self, key: &str, value: &str) {
        self.write()
            .properties
            .insert(key.to_string(), value.to_string());
    }

    fn unset_property(&self, key: &str) {
        self.write().properties.remove(key);
    }

    fn update_status_bar(&self, _update_slow_data: bool) {
        self.write().status_bar_updates += 1;
    }

    fn enable_notification(&self, event_name: &str, enabled: bool) {
        let mut state = self.write();
        if enabled {
            state.notifications.insert(event_name.to_string());
        } else {
            state.notifications.remove(event_name);
        }
    }

    fn menu_command(&self, name: &str) -> Result<(), HostError> {
        debug!(name, "menu command");
        self.write().menu_commands.push(name.to_string());
        Ok(())
    }

    fn constant(&self, name: &str) -> Result<i64, HostError> {
        CONSTANTS
            .binary_search_by(|(candidate, _)| (*candidate).cmp(name))
            .map(|idx| CONSTANTS[idx].1)
            .map_err(|_| HostError::UnknownConstant(name.to_string()))
    }

    fn user_strip_show(&self, description: &str) {
        if description.is_empty() {
            self.write().user_strip.clear();
        }
    }

    fn user_strip_set(&self, control: i64, value: &str) {
        self.write().user_strip.insert(control, value.to_string());
    }

    fn user_strip_set_list(&self, control: i64, value: &str) {
        self.write().user_strip.insert(control, value.to_string());
    }

    fn user_strip_value(&self, control: i64) -> Option<String> {
        self.read().user_strip.get(&control).cloned()
    }

    fn pane_append(&self, pane: Pane, text: &str) {
        self.write().pane_mut(pane).append(text);
    }

    fn pane_insert(&self, pane: Pane, pos: i64, text: &str) {
        self.write().pane_mut(pane).insert(pos, text);
    }

    fn pane_remove(&self, pane: Pane, start: i64, end: i64) {
        self.write().pane_mut(pane).remove(start, end);
    }

    fn pane_text_range(&self, pane: Pane, start: i64, end: i64) -> Result<String, HostError> {
        Ok(self.read().pane(pane).range(start, end))
    }

    fn pane_find_text(
        &self,
        pane: Pane,
        text: &str,
        flags: i64,
        start: i64,
        end: i64,
    ) -> Result<Option<(i64, i64)>, HostError> {
        let regexp = self.constant("SCFIND_REGEXP")?;
        if flags & regexp != 0 {
            return Err(HostError::InvalidArgument {
                call: "FindText".to_string(),
                reason: "regular expressions are not supported".to_string(),
            });
        }
        let match_case = flags & self.constant("SCFIND_MATCHCASE")? != 0;
        let whole_word = flags & self.constant("SCFIND_WHOLEWORD")? != 0;
        let found = self
            .read()
            .pane(pane)
            .find(text, start, end, match_case, whole_word);
        Ok(found.map(|(a, b)| (a as i64, b as i64)))
    }

    fn pane_get(
        &self,
        pane: Pane,
        property: &str,
        param: Option<HostValue>,
    ) -> Result<HostValue, HostError> {
        let state = self.read();
        let buffer = state.pane(pane);
        let value = match property {
            "Length" | "TextLength" => HostValue::Int(buffer.len() as i64),
            "CurrentPos" | "Anchor" => HostValue::Int(buffer.caret() as i64),
            "LineCount" => HostValue::Int(buffer.line_count() as i64),
            "Modify" => HostValue::Bool(!buffer.save_point),
            "CharAt" => {
                let pos = param.as_ref().and_then(HostValue::as_int).unwrap_or(-1);
                HostValue::Int(buffer.char_at(pos).map(|c| c as i64).unwrap_or(0))
            }
            _ => {
                let key = match &param {
                    Some(index) if !index.is_none() => indexed_key(property, index),
                    _ => property.to_string(),
                };
                buffer
                    .properties
                    .get(&key)
                    .cloned()
                    .ok_or_else(|| HostError::UnknownProperty(property.to_string()))?
            }
        };
        Ok(value)
    }

    fn pane_set(
        &self,
        pane: Pane,
        property: &str,
        value: HostValue,
        extra: Option<HostValue>,
    ) -> Result<(), HostError> {
        let mut state = self.write();
        let buffer = state.pane_mut(pane);
        match (property, extra) {
            ("CurrentPos" | "Anchor", None) => {
                let pos = value.as_int().ok_or_else(|| HostError::InvalidArgument {
                    call: format!("Set{property}"),
                    reason: "position must be a number".to_string(),
                })?;
                buffer.set_caret(pos);
            }
            (_, Some(extra)) if !extra.is_none() => {
                buffer
                    .properties
                    .insert(indexed_key(property, &value), extra);
            }
            _ => {
                buffer.properties.insert(property.to_string(), value);
            }
        }
        Ok(())
    }

    fn pane_call(
        &self,
        pane: Pane,
        function: &str,
        args: &[HostValue],
    ) -> Result<HostValue, HostError> {
        let mut state = self.write();
        let value = match function {
            "GotoPos" => {
                let pos = int_arg(function, args, 0)?;
                state.pane_mut(pane).set_caret(pos);
                HostValue::None
            }
            "DocumentStart" => {
                state.pane_mut(pane).set_caret(0);
                HostValue::None
            }
            "DocumentEnd" => {
                let buffer = state.pane_mut(pane);
                let end = buffer.len() as i64;
                buffer.set_caret(end);
                HostValue::None
            }
            "LineFromPosition" => {
                let pos = int_arg(function, args, 0)?;
                HostValue::Int(state.pane(pane).line_from_position(pos) as i64)
            }
            "PositionFromLine" => {
                let line = int_arg(function, args, 0)?.max(0) as usize;
                HostValue::Int(
                    state
                        .pane(pane)
                        .position_from_line(line)
                        .map(|pos| pos as i64)
                        .unwrap_or(-1),
                )
            }
            "GetLine" => {
                let line = int_arg(function, args, 0)?.max(0) as usize;
                HostValue::Str(state.pane(pane).line(line).unwrap_or_default())
            }
            "GetText" => HostValue::Str(state.pane(pane).text()),
            "GetTextRange" => {
                let start = int_arg(function, args, 0)?;
                let end = int_arg(function, args, 1)?;
                HostValue::Str(state.pane(pane).range(start, end))
            }
            "SetText" => {
                let text = string_arg(function, args, 1)?;
                state.pane_mut(pane).set_text(&text);
                HostValue::None
            }
            "ReplaceSel" => {
                let text = string_arg(function, args, 1)?;
                state.pane_mut(pane).insert(-1, &text);
                HostValue::None
            }
            "AppendText" => {
                let text = string_arg(function, args, 1)?;
                state.pane_mut(pane).append(&text);
                HostValue::None
            }
            "ClearAll" => {
                state.pane_mut(pane).set_text("");
                HostValue::None
            }
            "CopyText" => {
                state.clipboard = Some(string_arg(function, args, 1)?);
                HostValue::None
            }
            "SetLexerLanguage" => {
                let language = string_arg(function, args, 1)?;
                state
                    .pane_mut(pane)
                    .properties
                    .insert("LexerLanguage".to_string(), HostValue::Str(language));
                HostValue::None
            }
            "GetLexerLanguage" => state
                .pane(pane)
                .properties
                .get("LexerLanguage")
                .cloned()
                .unwrap_or_else(|| HostValue::Str(String::new())),
            "SetSavePoint" => {
                state.pane_mut(pane).save_point = true;
                HostValue::None
            }
            "LineDuplicate" => {
                let buffer = state.pane_mut(pane);
                let line = buffer.line_from_position(buffer.caret() as i64);
                let text = buffer.line(line).unwrap_or_default();
                let start = buffer.position_from_line(line).unwrap_or_default() as i64;
                if text.ends_with('\n') {
                    buffer.insert(start, &text);
                } else {
                    let end = start + text.chars().count() as i64;
                    buffer.insert(end, &format!("\n{text}"));
                }
                HostValue::None
            }
            _ => return Err(HostError::UnknownFunction(function.to_string())),
        };
        Ok(value)
    }
}
