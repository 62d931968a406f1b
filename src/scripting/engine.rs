//! The Rhai scripting engine for the editor bridge
//!
//! Provides the `scite` namespace with all editor APIs:
//! - `scite::app::*` - properties, messages, menu commands
//! - `scite::constants::*` - named constants and helpers
//! - `scite::editor::*` - the main editing pane
//! - `scite::output::*` - the output pane

use std::path::Path;
use std::sync::Arc;

use rhai::{AST, Dynamic, Engine, Scope};

use super::api;
use crate::config::Settings;
use crate::error::ExtensionError;
use crate::facade::{ScApp, ScConst, ScPane};
use crate::host::{Host, Pane};

/// The scripting engine shared by inline code and command modules
pub struct ScriptEngine {
    engine: Engine,
}

impl ScriptEngine {
    pub fn new(host: Arc<dyn Host>, settings: &Settings) -> Self {
        Self {
            engine: Self::create_engine(host, settings),
        }
    }

    /// Create the Rhai engine with the `scite` namespace
    fn create_engine(host: Arc<dyn Host>, settings: &Settings) -> Engine {
        let mut engine = Engine::new();

        // Safety limits
        engine.set_max_expr_depths(settings.max_expr_depth, settings.max_expr_depth);
        engine.set_max_operations(settings.max_operations);

        let mut scite_module = rhai::Module::new();
        scite_module.set_sub_module("app", api::app::create_module(ScApp::new(host.clone())));
        scite_module.set_sub_module(
            "constants",
            api::constants::create_module(ScConst::new(host.clone())),
        );
        scite_module.set_sub_module(
            "editor",
            api::pane::create_module(ScPane::new(host.clone(), Pane::Editor)),
        );
        scite_module.set_sub_module(
            "output",
            api::pane::create_module(ScPane::new(host.clone(), Pane::Output)),
        );

        // Register `scite` as a static module (accessible as scite::*)
        engine.register_static_module("scite", scite_module.into());

        // Script output goes to the output pane
        {
            let host = host.clone();
            engine.on_print(move |text| host.trace(&format!("{text}\n")));
        }
        engine.on_debug(move |text, source, pos| match source {
            Some(source) => host.trace(&format!("{source} @ {pos:?} | {text}\n")),
            None => host.trace(&format!("{pos:?} | {text}\n")),
        });

        engine
    }

    /// Evaluate a script string
    pub fn eval(&self, script: &str) -> Result<Dynamic, ExtensionError> {
        self.engine
            .eval::<Dynamic>(script)
            .map_err(|e| ExtensionError::Script(e.to_string()))
    }

    /// Load and run a script file
    pub fn run_file(&self, path: &Path) -> Result<(), ExtensionError> {
        let content = std::fs::read_to_string(path).map_err(|source| ExtensionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let ast = self
            .engine
            .compile(&content)
            .map_err(|e| ExtensionError::Script(format!("{}: {e}", path.display())))?;
        self.engine
            .run_ast(&ast)
            .map_err(|e| ExtensionError::Script(format!("{}: {e}", path.display())))
    }

    /// Compile a command module's entry file
    pub fn compile_file(&self, path: &Path) -> Result<AST, String> {
        self.engine
            .compile_file(path.to_path_buf())
            .map_err(|e| e.to_string())
    }

    /// Run top-level statements into a persistent scope
    pub fn run_with_scope(&self, scope: &mut Scope<'static>, ast: &AST) -> Result<(), String> {
        self.engine
            .run_ast_with_scope(scope, ast)
            .map_err(|e| e.to_string())
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}
