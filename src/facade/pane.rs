//! Per-pane editor calls and the method-name table behind them
//!
//! Script-visible pane methods follow a naming convention:
//! - `GetX(param?)` queries property `X`
//! - `SetX(value, extra?)` changes property `X`
//! - `CmdX(args...)` calls editor function `X`
//!
//! A few editor functions look like getters or setters but take positional
//! arguments; they are listed in [`NOT_GETTERS`] and [`NOT_SETTERS`] and are
//! routed as direct calls under their full name.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use crate::error::HostError;
use crate::facade::ScConst;
use crate::host::{Host, HostValue, Pane};

/// `Get...` names that are editor functions, not property queries
pub const NOT_GETTERS: &[&str] = &[
    "GetCurLine",
    "GetHotspotActiveBack",
    "GetHotspotActiveFore",
    "GetLastChild",
    "GetLexerLanguage",
    "GetLine",
    "GetLineSelEndPosition",
    "GetLineSelStartPosition",
    "GetProperty",
    "GetPropertyExpanded",
    "GetSelText",
    "GetStyledText",
    "GetTag",
    "GetText",
    "GetTextRange",
];

/// `Set...` names that are editor functions, not property changes
pub const NOT_SETTERS: &[&str] = &[
    "SetCharsDefault",
    "SetFoldFlags",
    "SetFoldMarginColour",
    "SetFoldMarginHiColour",
    "SetHotspotActiveBack",
    "SetHotspotActiveFore",
    "SetLengthForEncode",
    "SetLexerLanguage",
    "SetSavePoint",
    "SetSel",
    "SetSelBack",
    "SetSelFore",
    "SetSelection",
    "SetStyling",
    "SetStylingEx",
    "SetText",
    "SetVisiblePolicy",
    "SetWhitespaceBack",
    "SetWhitespaceFore",
    "SetXCaretPolicy",
    "SetYCaretPolicy",
];

/// Pane methods exposed to scripts. The call table is generated from this list.
pub const PANE_METHODS: &[&str] = &[
    // property queries
    "GetAnchor",
    "GetCharAt",
    "GetCodePage",
    "GetColumn",
    "GetCurrentPos",
    "GetEOLMode",
    "GetFirstVisibleLine",
    "GetIndent",
    "GetLength",
    "GetLexer",
    "GetLineCount",
    "GetLineEndPosition",
    "GetLineIndentation",
    "GetModify",
    "GetOvertype",
    "GetReadOnly",
    "GetSelectionEnd",
    "GetSelectionStart",
    "GetStyleAt",
    "GetTabWidth",
    "GetTextLength",
    "GetUseTabs",
    "GetViewWS",
    "GetWrapMode",
    "GetZoom",
    // getter-shaped functions
    "GetHotspotActiveBack",
    "GetHotspotActiveFore",
    "GetLastChild",
    "GetLexerLanguage",
    "GetLine",
    "GetLineSelEndPosition",
    "GetLineSelStartPosition",
    "GetProperty",
    "GetPropertyExpanded",
    "GetSelText",
    "GetStyledText",
    "GetTag",
    "GetText",
    "GetTextRange",
    // property changes
    "SetAnchor",
    "SetCodePage",
    "SetCurrentPos",
    "SetEOLMode",
    "SetFirstVisibleLine",
    "SetIndent",
    "SetLexer",
    "SetLineIndentation",
    "SetOvertype",
    "SetReadOnly",
    "SetSelectionEnd",
    "SetSelectionStart",
    "SetTabWidth",
    "SetUseTabs",
    "SetViewWS",
    "SetWrapMode",
    "SetZoom",
    // setter-shaped functions
    "SetCharsDefault",
    "SetFoldFlags",
    "SetFoldMarginColour",
    "SetFoldMarginHiColour",
    "SetHotspotActiveBack",
    "SetHotspotActiveFore",
    "SetLengthForEncode",
    "SetSavePoint",
    "SetSel",
    "SetSelBack",
    "SetSelFore",
    "SetSelection",
    "SetStyling",
    "SetStylingEx",
    "SetVisiblePolicy",
    "SetWhitespaceBack",
    "SetWhitespaceFore",
    "SetXCaretPolicy",
    "SetYCaretPolicy",
    // commands
    "CmdAddText",
    "CmdAppendText",
    "CmdBackTab",
    "CmdBeginUndoAction",
    "CmdCancel",
    "CmdCharLeft",
    "CmdCharRight",
    "CmdClearAll",
    "CmdCopy",
    "CmdCut",
    "CmdDeleteBack",
    "CmdDocumentEnd",
    "CmdDocumentStart",
    "CmdEmptyUndoBuffer",
    "CmdEndUndoAction",
    "CmdGotoLine",
    "CmdGotoPos",
    "CmdHome",
    "CmdInsertText",
    "CmdLineCopy",
    "CmdLineCut",
    "CmdLineDelete",
    "CmdLineDown",
    "CmdLineDuplicate",
    "CmdLineEnd",
    "CmdLineFromPosition",
    "CmdLineTranspose",
    "CmdLineUp",
    "CmdLowerCase",
    "CmdMarkerAdd",
    "CmdMarkerDelete",
    "CmdMarkerDeleteAll",
    "CmdNewLine",
    "CmdPaste",
    "CmdPositionFromLine",
    "CmdRedo",
    "CmdScrollCaret",
    "CmdSearchAnchor",
    "CmdSearchNext",
    "CmdSearchPrev",
    "CmdSelectAll",
    "CmdTab",
    "CmdUndo",
    "CmdUpperCase",
    "CmdWordLeft",
    "CmdWordRight",
];

/// How a pane method reaches the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaneCall {
    Get(String),
    Set(String),
    Function(String),
}

impl PaneCall {
    /// Classify a method name by its prefix and the exclusion lists.
    pub fn classify(method: &str) -> Option<Self> {
        if let Some(property) = method.strip_prefix("Get") {
            if NOT_GETTERS.contains(&method) {
                Some(PaneCall::Function(method.to_string()))
            } else {
                Some(PaneCall::Get(property.to_string()))
            }
        } else if let Some(property) = method.strip_prefix("Set") {
            if NOT_SETTERS.contains(&method) {
                Some(PaneCall::Function(method.to_string()))
            } else {
                Some(PaneCall::Set(property.to_string()))
            }
        } else {
            method
                .strip_prefix("Cmd")
                .map(|function| PaneCall::Function(function.to_string()))
        }
    }
}

/// Method name to call mapping, built once from a declared name list
#[derive(Debug, Default)]
pub struct PaneMethodTable {
    calls: BTreeMap<String, PaneCall>,
}

static PANE_METHOD_TABLE: LazyLock<PaneMethodTable> =
    LazyLock::new(|| PaneMethodTable::from_names(PANE_METHODS));

impl PaneMethodTable {
    pub fn from_names(names: &[&str]) -> Self {
        let calls = names
            .iter()
            .filter_map(|name| PaneCall::classify(name).map(|call| (name.to_string(), call)))
            .collect();
        Self { calls }
    }

    /// The table for [`PANE_METHODS`].
    pub fn global() -> &'static PaneMethodTable {
        &PANE_METHOD_TABLE
    }

    pub fn get(&self, method: &str) -> Option<&PaneCall> {
        self.calls.get(method)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PaneCall)> {
        self.calls.iter().map(|(name, call)| (name.as_str(), call))
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

/// Search options for [`ScPane::find_text`]
#[derive(Debug, Clone, Copy)]
pub struct FindOptions {
    pub start: i64,
    pub end: i64,
    pub whole_word: bool,
    pub match_case: bool,
    pub regexp: bool,
    pub flags: i64,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            start: 0,
            end: -1,
            whole_word: false,
            match_case: false,
            regexp: false,
            flags: 0,
        }
    }
}

/// One editor surface: the main buffer or the output pane
#[derive(Clone)]
pub struct ScPane {
    pane: Pane,
    host: Arc<dyn Host>,
}

impl ScPane {
    pub fn new(host: Arc<dyn Host>, pane: Pane) -> Self {
        Self { pane, host }
    }

    pub fn pane(&self) -> Pane {
        self.pane
    }

    /// Call a method from the pane method table with positional arguments.
    pub fn invoke(&self, method: &str, args: &[HostValue]) -> Result<HostValue, HostError> {
        let call = PaneMethodTable::global()
            .get(method)
            .ok_or_else(|| HostError::UnknownMethod(method.to_string()))?;
        self.dispatch(method, call, args)
    }

    fn dispatch(
        &self,
        method: &str,
        call: &PaneCall,
        args: &[HostValue],
    ) -> Result<HostValue, HostError> {
        match call {
            PaneCall::Get(property) => {
                if args.len() > 1 {
                    return Err(too_many_args(method, 1));
                }
                self.host
                    .pane_get(self.pane, property, args.first().cloned())
            }
            PaneCall::Set(property) => {
                let (value, extra) = match args {
                    [value] => (value.clone(), None),
                    [value, extra] => (value.clone(), Some(extra.clone())),
                    [] => {
                        return Err(HostError::InvalidArgument {
                            call: method.to_string(),
                            reason: "a value is required".to_string(),
                        });
                    }
                    _ => return Err(too_many_args(method, 2)),
                };
                self.host
                    .pane_set(self.pane, property, value, extra)
                    .map(|()| HostValue::None)
            }
            PaneCall::Function(function) => self.host.pane_call(self.pane, function, args),
        }
    }

    pub fn append(&self, text: &str) {
        self.host.pane_append(self.pane, text);
    }

    pub fn insert_text(&self, text: &str, pos: i64) {
        self.host.pane_insert(self.pane, pos, text);
    }

    pub fn remove(&self, start: i64, end: i64) {
        self.host.pane_remove(self.pane, start, end);
    }

    pub fn text_range(&self, start: i64, end: i64) -> Result<String, HostError> {
        self.host.pane_text_range(self.pane, start, end)
    }

    pub fn find_text(
        &self,
        text: &str,
        options: FindOptions,
    ) -> Result<Option<(i64, i64)>, HostError> {
        let consts = ScConst::new(self.host.clone());
        let mut flags = options.flags;
        if options.whole_word {
            flags |= consts.get("SCFIND_WHOLEWORD")?;
        }
        if options.match_case {
            flags |= consts.get("SCFIND_MATCHCASE")?;
        }
        if options.regexp {
            flags |= consts.get("SCFIND_REGEXP")?;
        }
        self.host
            .pane_find_text(self.pane, text, flags, options.start, options.end)
    }

    pub fn current_pos(&self) -> Result<i64, HostError> {
        self.int_property("CurrentPos")
    }

    pub fn length(&self) -> Result<i64, HostError> {
        self.int_property("Length")
    }

    /// Insert at `pos` (the caret when `None`) and move the caret past the text.
    pub fn write(&self, text: &str, pos: Option<i64>) -> Result<(), HostError> {
        let pos = match pos {
            Some(pos) if pos >= 0 => pos,
            _ => self.current_pos()?,
        };
        self.host.pane_insert(self.pane, pos, text);
        let end = pos + text.chars().count() as i64;
        self.host
            .pane_call(self.pane, "GotoPos", &[HostValue::Int(end)])
            .map(drop)
    }

    pub fn all_text(&self) -> Result<String, HostError> {
        let length = self.length()?;
        self.text_range(0, length)
    }

    pub fn cur_line(&self) -> Result<String, HostError> {
        let pos = self.current_pos()?;
        let line = self
            .host
            .pane_call(self.pane, "LineFromPosition", &[HostValue::Int(pos)])?;
        let text = self.host.pane_call(self.pane, "GetLine", &[line])?;
        Ok(text.as_str().unwrap_or_default().to_string())
    }

    pub fn copy_text(&self, text: &str) -> Result<(), HostError> {
        let len = text.chars().count() as i64;
        self.host
            .pane_call(self.pane, "CopyText", &[HostValue::Int(len), text.into()])
            .map(drop)
    }

    pub fn set_text(&self, text: &str) -> Result<(), HostError> {
        self.string_function("SetText", text)
    }

    pub fn auto_c_stops(&self, chars: &str) -> Result<(), HostError> {
        self.string_function("AutoCStops", chars)
    }

    pub fn auto_c_select(&self, text: &str) -> Result<(), HostError> {
        self.string_function("AutoCSelect", text)
    }

    pub fn replace_sel(&self, text: &str) -> Result<(), HostError> {
        self.string_function("ReplaceSel", text)
    }

    pub fn set_lexer_language(&self, language: &str) -> Result<(), HostError> {
        self.string_function("SetLexerLanguage", language)
    }

    pub fn load_lexer_library(&self, path: &str) -> Result<(), HostError> {
        self.string_function("LoadLexerLibrary", path)
    }

    fn string_function(&self, function: &str, text: &str) -> Result<(), HostError> {
        self.host
            .pane_call(self.pane, function, &[HostValue::None, text.into()])
            .map(drop)
    }

    fn int_property(&self, property: &str) -> Result<i64, HostError> {
        let value = self.host.pane_get(self.pane, property, None)?;
        value.as_int().ok_or_else(|| HostError::InvalidArgument {
            call: format!("Get{property}"),
            reason: format!("expected a number, got {value:?}"),
        })
    }
}

fn too_many_args(method: &str, max: usize) -> HostError {
    HostError::InvalidArgument {
        call: method.to_string(),
        reason: format!("takes at most {max} arguments"),
    }
}
