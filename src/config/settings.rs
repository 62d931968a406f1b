use std::path::PathBuf;

use crate::facade::ScApp;

/// Extension settings, read from host properties at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    // Loading
    pub delay_load: bool,
    pub entry_file: String,

    // Script limits
    pub max_operations: u64,
    pub max_expr_depth: usize,

    // Custom commands
    pub register_prefix: String,
    pub first_command_slot: u32,
    pub temp_property: String,

    // Inline execution, e.g. `rhai:scite::app::Trace("hi")`
    pub execute_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delay_load: false,
            entry_file: "init.rhai".to_string(),

            max_operations: 100_000,
            max_expr_depth: 64,

            register_prefix: "customcommandsregister.".to_string(),
            // 1-10 show up with numbers in the tools menu
            first_command_slot: 11,
            temp_property: "RhaiExtension.Temp".to_string(),

            execute_prefix: "rhai:".to_string(),
        }
    }
}

impl Settings {
    /// Defaults overridden by the `ext.rhai.*` host properties.
    pub fn from_host(app: &ScApp) -> Self {
        let mut settings = Self::default();

        let delay_load = app.get_property("ext.rhai.delayload");
        settings.delay_load = !delay_load.is_empty() && !delay_load.starts_with('0');

        if let Ok(n) = app.get_property("ext.rhai.maxoperations").trim().parse() {
            settings.max_operations = n;
        }
        if let Ok(n) = app.get_property("ext.rhai.maxexprdepth").trim().parse() {
            settings.max_expr_depth = n;
        }

        settings
    }

    /// Get the user config directory
    /// Uses ~/.config/scite-rhai/ on all platforms for consistency
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("scite-rhai"))
    }

    /// Get the default user properties file path
    pub fn user_properties_file() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("user.properties"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use std::sync::Arc;

    fn app_with(props: &[(&str, &str)]) -> ScApp {
        ScApp::new(Arc::new(MemoryHost::with_properties(props.iter().copied())))
    }

    #[test]
    fn defaults_without_properties() {
        let settings = Settings::from_host(&app_with(&[]));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.first_command_slot, 11);
        assert_eq!(settings.entry_file, "init.rhai");
    }

    #[test]
    fn delay_load_follows_first_character() {
        assert!(Settings::from_host(&app_with(&[("ext.rhai.delayload", "1")])).delay_load);
        assert!(!Settings::from_host(&app_with(&[("ext.rhai.delayload", "0")])).delay_load);
    }

    #[test]
    fn limits_are_overridable() {
        let settings = Settings::from_host(&app_with(&[
            ("ext.rhai.maxoperations", "500"),
            ("ext.rhai.maxexprdepth", "nope"),
        ]));
        assert_eq!(settings.max_operations, 500);
        assert_eq!(settings.max_expr_depth, 64);
    }
}
