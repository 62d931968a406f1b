use std::sync::Arc;

use tracing::debug;

use crate::error::HostError;
use crate::host::{Host, SCITE_DIRECTORY_PROPERTY, SCITE_USER_DIRECTORY_PROPERTY};

/// Friendly names of the editor's menu commands, reachable as `Cmd<Name>`.
///
/// Must stay sorted (byte order); lookups binary search it.
pub const MENU_COMMANDS: &[&str] = &[
    "Abbrev",
    "About",
    "Activate",
    "AllowAccess",
    "BlockComment",
    "BookmarkClearAll",
    "BookmarkNext",
    "BookmarkNextSelect",
    "BookmarkPrev",
    "BookmarkPrevSelect",
    "BookmarkToggle",
    "BoxComment",
    "Buffer",
    "BufferSep",
    "Build",
    "Clean",
    "Clear",
    "ClearOutput",
    "Close",
    "CloseAll",
    "Compile",
    "Complete",
    "CompleteWord",
    "Copy",
    "CopyAsRtf",
    "CopyPath",
    "Cut",
    "DirectionDown",
    "DirectionUp",
    "Duplicate",
    "EncodingDefault",
    "EncodingUCookie",
    "EncodingUcs2be",
    "EncodingUcs2le",
    "EncodingUtf8",
    "EnterSelection",
    "EolConvert",
    "EolCr",
    "EolCrlf",
    "EolLf",
    "Expand",
    "ExpandEnsureChildrenVisible",
    "Filer",
    "Find",
    "FindInFiles",
    "FindNext",
    "FindNextBack",
    "FindNextBackSel",
    "FindNextSel",
    "FinishedExecute",
    "FoldMargin",
    "FullScreen",
    "Go",
    "Goto",
    "Help",
    "HelpScite",
    "Import",
    "IncrementalSearch",
    "InsAbbrev",
    "Join",
    "Language",
    "LineNumberMargin",
    "LoadSession",
    "LowerCase",
    "MacroList",
    "MacroPlay",
    "MacroRecord",
    "MacroSep",
    "MacroStopRecord",
    "MatchBrace",
    "MatchCase",
    "MonoFont",
    "MoveTabLeft",
    "MoveTabRight",
    "MruFile",
    "MruSep",
    "MruSub",
    "New",
    "NextFile",
    "NextFileStack",
    "NextMatchPpc",
    "NextMsg",
    "OnTop",
    "Open",
    "OpenAbbrevProperties",
    "OpenDirectoryProperties",
    "OpenFilesHere",
    "OpenGlobalProperties",
    "OpenLocalProperties",
    "OpenLuaExternalfile",
    "OpenSelected",
    "OpenUserProperties",
    "Paste",
    "PasteAndDown",
    "PrevFile",
    "PrevFileStack",
    "PrevMatchPpc",
    "PrevMsg",
    "Print",
    "PrintSetup",
    "Quit",
    "ReadOnly",
    "Redo",
    "Regexp",
    "Replace",
    "Revert",
    "RunWin",
    "Save",
    "SaveACopy",
    "SaveAll",
    "SaveAs",
    "SaveAsHtml",
    "SaveAsPdf",
    "SaveAsRtf",
    "SaveAsTex",
    "SaveAsXml",
    "SaveSession",
    "SelMargin",
    "SelectAll",
    "SelectToBrace",
    "SelectToNextMatchPpc",
    "SelectToPrevMatchPpc",
    "SelectionAddEach",
    "SelectionAddNext",
    "SelectionForFind",
    "ShowCalltip",
    "Split",
    "SplitVertical",
    "SrcWin",
    "StatusWin",
    "StopExecute",
    "StreamComment",
    "SwitchPane",
    "TabSize",
    "TabWin",
    "ToggleFoldAll",
    "ToggleFoldRecursive",
    "ToggleOutput",
    "ToggleParameters",
    "ToolWin",
    "Tools",
    "Undo",
    "Unslash",
    "UpperCase",
    "ViewEol",
    "ViewGuides",
    "ViewSpace",
    "ViewStatusBar",
    "ViewTabBar",
    "ViewToolbar",
    "WholeWord",
    "Wrap",
    "WrapAround",
    "WrapOutput",
];

/// Application-level calls: properties, messages, menu commands
#[derive(Clone)]
pub struct ScApp {
    host: Arc<dyn Host>,
}

impl ScApp {
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self { host }
    }

    pub fn trace(&self, text: &str) {
        self.host.trace(text);
    }

    pub fn msg_box(&self, text: &str) {
        self.host.message_box(text);
    }

    pub fn open_file(&self, path: &str) -> Result<(), HostError> {
        self.host.open_file(path)
    }

    pub fn get_property(&self, key: &str) -> String {
        self.host.property(key)
    }

    pub fn set_property(&self, key: &str, value: &str) {
        debug!(key, value, "setting property");
        self.host.set_property(key, value);
    }

    pub fn unset_property(&self, key: &str) {
        self.host.unset_property(key);
    }

    pub fn update_status_bar(&self, update_slow_data: bool) {
        self.host.update_status_bar(update_slow_data);
    }

    pub fn enable_notification(&self, event_name: &str, enabled: bool) {
        self.host.enable_notification(event_name, enabled);
    }

    pub fn file_path(&self) -> String {
        self.get_property("FilePath")
    }

    pub fn file_name(&self) -> String {
        self.get_property("FileNameExt")
    }

    pub fn language(&self) -> String {
        self.get_property("Language")
    }

    pub fn current_word(&self) -> String {
        self.get_property("CurrentWord")
    }

    pub fn scite_directory(&self) -> String {
        self.get_property(SCITE_DIRECTORY_PROPERTY)
    }

    pub fn scite_user_directory(&self) -> String {
        self.get_property(SCITE_USER_DIRECTORY_PROPERTY)
    }

    /// Run the menu command with the given friendly name (`Quit` for `CmdQuit`).
    pub fn command(&self, name: &str) -> Result<(), HostError> {
        if MENU_COMMANDS.binary_search(&name).is_err() {
            return Err(HostError::UnknownCommand(name.to_string()));
        }
        self.host.menu_command(name)
    }

    pub fn user_strip_show(&self, description: &str) {
        self.host.user_strip_show(description);
    }

    pub fn user_strip_set(&self, control: i64, value: &str) {
        self.host.user_strip_set(control, value);
    }

    pub fn user_strip_set_list(&self, control: i64, value: &str) {
        self.host.user_strip_set_list(control, value);
    }

    pub fn user_strip_value(&self, control: i64) -> Option<String> {
        self.host.user_strip_value(control)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemoryHost, Pane};

    fn app() -> (Arc<MemoryHost>, ScApp) {
        let host = Arc::new(MemoryHost::with_properties([
            ("FileNameExt", "notes.txt"),
            ("SciteDefaultHome", "/opt/scite"),
        ]));
        let app = ScApp::new(host.clone());
        (host, app)
    }

    #[test]
    fn menu_commands_are_sorted() {
        assert!(MENU_COMMANDS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn command_runs_known_names() {
        let (host, app) = app();
        app.command("SaveAll").unwrap();
        assert_eq!(host.menu_commands(), vec!["SaveAll".to_string()]);
    }

    #[test]
    fn command_rejects_unknown_names() {
        let (host, app) = app();
        assert_eq!(
            app.command("Explode"),
            Err(HostError::UnknownCommand("Explode".to_string()))
        );
        assert!(host.menu_commands().is_empty());
    }

    #[test]
    fn convenience_getters_read_properties() {
        let (_host, app) = app();
        assert_eq!(app.file_name(), "notes.txt");
        assert_eq!(app.scite_directory(), "/opt/scite");
        assert_eq!(app.language(), "");
    }

    #[test]
    fn properties_set_and_unset() {
        let (host, app) = app();
        app.set_property("x", "1");
        assert_eq!(host.property("x"), "1");
        app.unset_property("x");
        assert_eq!(app.get_property("x"), "");
    }

    #[test]
    fn trace_reaches_output() {
        let (host, app) = app();
        app.trace("hi");
        assert_eq!(host.pane_text(Pane::Output), "hi");
    }

    #[test]
    fn user_strip_values() {
        let (_host, app) = app();
        app.user_strip_set(3, "abc");
        assert_eq!(app.user_strip_value(3).as_deref(), Some("abc"));
        assert_eq!(app.user_strip_value(4), None);
    }
}
