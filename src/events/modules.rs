use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::rc::Rc;

use rhai::{AST, CallFnOptions, Dynamic, Map, Scope};
use tracing::debug;

use crate::error::DispatchError;
use crate::scripting::ScriptEngine;

/// A loaded command module.
///
/// The entry file runs once at load. Every callback is then called with the
/// module's state map bound as `this`, so `this.count += 1` survives between
/// events.
pub struct ScriptModule {
    command: String,
    ast: AST,
    scope: Scope<'static>,
    state: Dynamic,
}

impl ScriptModule {
    /// Compile the entry file and run its top-level statements
    pub fn load(
        engine: &ScriptEngine,
        command: &str,
        entry: &Path,
    ) -> Result<Self, DispatchError> {
        let load_err = |message: String| DispatchError::Load {
            command: command.to_string(),
            path: entry.to_path_buf(),
            message,
        };

        let ast = engine.compile_file(entry).map_err(load_err)?;
        let mut scope = Scope::new();
        engine.run_with_scope(&mut scope, &ast).map_err(load_err)?;

        debug!(command, entry = %entry.display(), "loaded command module");

        Ok(Self {
            command: command.to_string(),
            ast,
            scope,
            state: Dynamic::from_map(Map::new()),
        })
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.ast.iter_functions().any(|f| f.name == name)
    }

    /// Call a function defined by the module with exactly `args`.
    ///
    /// A function declared with a different parameter count fails as a script
    /// error.
    pub fn call(
        &mut self,
        engine: &ScriptEngine,
        name: &str,
        args: Vec<Dynamic>,
    ) -> Result<Dynamic, DispatchError> {
        if !self.has_function(name) {
            return Err(DispatchError::MissingFunction {
                command: self.command.clone(),
                event: name.to_string(),
            });
        }

        let options = CallFnOptions::new()
            .eval_ast(false)
            .rewind_scope(true)
            .bind_this_ptr(&mut self.state);

        engine
            .engine()
            .call_fn_with_options::<Dynamic>(options, &mut self.scope, &self.ast, name, args)
            .map_err(|e| DispatchError::Script {
                command: self.command.clone(),
                event: name.to_string(),
                message: e.to_string(),
            })
    }
}

/// Handle to a cached module, shared between dispatches
pub type ModuleHandle = Rc<RefCell<ScriptModule>>;

/// Module path to loaded module. Each module is loaded at most once.
///
/// No borrow of the cache is held while a module's top-level statements run,
/// so they may dispatch events again.
#[derive(Default)]
pub struct ModuleCache {
    modules: RefCell<HashMap<String, ModuleHandle>>,
    loading: RefCell<HashSet<String>>,
}

impl ModuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached module for `path`, loading `<base_dir>/<path>/<entry_file>`
    /// on first use.
    ///
    /// A module asked for again while it is still loading is busy.
    pub fn resolve(
        &self,
        engine: &ScriptEngine,
        base_dir: &Path,
        entry_file: &str,
        command: &str,
        path: &str,
    ) -> Result<ModuleHandle, DispatchError> {
        let busy = || DispatchError::ModuleBusy {
            command: command.to_string(),
        };

        if let Some(module) = self.get(path) {
            return Ok(module);
        }

        let entry = base_dir.join(path).join(entry_file);
        if !entry.is_file() {
            return Err(DispatchError::ModuleNotFound {
                command: command.to_string(),
                expected: entry,
            });
        }

        if !self
            .loading
            .try_borrow_mut()
            .map_err(|_| busy())?
            .insert(path.to_string())
        {
            return Err(busy());
        }
        let loaded = ScriptModule::load(engine, command, &entry);
        if let Ok(mut loading) = self.loading.try_borrow_mut() {
            loading.remove(path);
        }
        let module = Rc::new(RefCell::new(loaded?));

        let mut modules = self.modules.try_borrow_mut().map_err(|_| busy())?;
        Ok(Rc::clone(modules.entry(path.to_string()).or_insert(module)))
    }

    pub fn get(&self, path: &str) -> Option<ModuleHandle> {
        self.modules.try_borrow().ok()?.get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.modules.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::host::{MemoryHost, Pane};
    use std::fs;
    use std::sync::Arc;

    fn write_module(dir: &Path, path: &str, source: &str) {
        let module_dir = dir.join(path);
        fs::create_dir_all(&module_dir).unwrap();
        fs::write(module_dir.join("init.rhai"), source).unwrap();
    }

    fn engine() -> (Arc<MemoryHost>, ScriptEngine) {
        let host = Arc::new(MemoryHost::new());
        let engine = ScriptEngine::new(host.clone(), &Settings::default());
        (host, engine)
    }

    #[test]
    fn resolve_caches_by_path() {
        let dir = tempfile::tempdir().unwrap();
        write_module(dir.path(), "cmd/a", "fn OnOpen(file) {}");
        let (_host, engine) = engine();
        let cache = ModuleCache::new();

        let first = cache
            .resolve(&engine, dir.path(), "init.rhai", "a", "cmd/a")
            .unwrap();
        let second = cache
            .resolve(&engine, dir.path(), "init.rhai", "other", "cmd/a")
            .unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(first.borrow().command(), "a");
    }

    #[test]
    fn resolve_reports_missing_entry_file() {
        let dir = tempfile::tempdir().unwrap();
        let (_host, engine) = engine();
        let cache = ModuleCache::new();

        let err = cache
            .resolve(&engine, dir.path(), "init.rhai", "ghost", "nowhere")
            .err()
            .unwrap();
        assert_eq!(
            err,
            DispatchError::ModuleNotFound {
                command: "ghost".into(),
                expected: dir.path().join("nowhere").join("init.rhai"),
            }
        );
        assert!(cache.is_empty());
    }

    #[test]
    fn top_level_statements_run_once() {
        let dir = tempfile::tempdir().unwrap();
        write_module(
            dir.path(),
            "m",
            r#"scite::app::Trace("loaded\n"); fn OnSave(file) {}"#,
        );
        let (host, engine) = engine();
        let cache = ModuleCache::new();
        for _ in 0..3 {
            cache
                .resolve(&engine, dir.path(), "init.rhai", "m", "m")
                .unwrap();
        }
        assert_eq!(host.pane_text(Pane::Output), "loaded\n");
    }

    #[test]
    fn syntax_error_is_a_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        write_module(dir.path(), "bad", "fn OnOpen( {");
        let (_host, engine) = engine();
        let cache = ModuleCache::new();
        let err = cache
            .resolve(&engine, dir.path(), "init.rhai", "bad", "bad")
            .err()
            .unwrap();
        assert!(matches!(err, DispatchError::Load { .. }));
    }

    #[test]
    fn state_persists_between_calls() {
        let dir = tempfile::tempdir().unwrap();
        write_module(
            dir.path(),
            "counter",
            r#"
            fn OnSave(file) {
                if this.count == () { this.count = 0; }
                this.count += 1;
                this.count
            }
            "#,
        );
        let (_host, engine) = engine();
        let cache = ModuleCache::new();
        let module = cache
            .resolve(&engine, dir.path(), "init.rhai", "counter", "counter")
            .unwrap();

        let args = || vec![Dynamic::from("a.txt".to_string())];
        module.borrow_mut().call(&engine, "OnSave", args()).unwrap();
        let count = module.borrow_mut().call(&engine, "OnSave", args()).unwrap();
        assert_eq!(count.as_int(), Ok(2));
    }

    #[test]
    fn parameter_count_mismatch_is_a_script_error() {
        let dir = tempfile::tempdir().unwrap();
        write_module(dir.path(), "keys", "fn OnKey(keyval) { keyval }");
        let (_host, engine) = engine();
        let cache = ModuleCache::new();
        let module = cache
            .resolve(&engine, dir.path(), "init.rhai", "keys", "keys")
            .unwrap();
        let mut module = module.borrow_mut();

        let key = module
            .call(&engine, "OnKey", vec![Dynamic::from(65_i64)])
            .unwrap();
        assert_eq!(key.as_int(), Ok(65));

        let err = module
            .call(
                &engine,
                "OnKey",
                vec![Dynamic::from(65_i64), Dynamic::from(0_i64)],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Script { ref command, ref event, .. }
                if command == "keys" && event == "OnKey"
        ));
    }

    #[test]
    fn missing_function_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        write_module(dir.path(), "m", "fn OnOpen(file) {}");
        let (_host, engine) = engine();
        let cache = ModuleCache::new();
        let module = cache
            .resolve(&engine, dir.path(), "init.rhai", "m", "m")
            .unwrap();
        assert!(module.borrow().has_function("OnOpen"));
        let err = module
            .borrow_mut()
            .call(&engine, "OnClose", Vec::new())
            .unwrap_err();
        assert_eq!(
            err,
            DispatchError::MissingFunction {
                command: "m".into(),
                event: "OnClose".into()
            }
        );
    }
}
