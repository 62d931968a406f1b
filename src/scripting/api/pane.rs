//! scite::editor and scite::output - pane operations
//!
//! Usage in Rhai:
//! ```rhai
//! let n = scite::editor::GetLength();
//! scite::editor::SetUseTabs(false);
//! scite::editor::CmdLineDuplicate();
//! scite::output::Append("done\n");
//! let hit = scite::editor::FindText("needle", #{ whole_word: true });
//! ```
//!
//! `Get`/`Set`/`Cmd` functions are generated from the pane method table;
//! the rest are helpers with fixed signatures.

use rhai::{Array, Dynamic, EvalAltResult, Map};

use super::{from_host_value, host_err, to_host_values};
use crate::error::HostError;
use crate::facade::{FindOptions, PaneCall, PaneMethodTable, ScPane};

/// Create a pane module bound to one editor surface
pub fn create_module(pane: ScPane) -> rhai::Module {
    let mut module = rhai::Module::new();

    register_table_methods(&mut module, &pane);
    register_helpers(&mut module, &pane);

    module
}

/// Register every table method with the arities its call kind accepts:
/// getters take an optional parameter, setters a value and an optional
/// second value, functions up to two positional arguments.
fn register_table_methods(module: &mut rhai::Module, pane: &ScPane) {
    for (method, call) in PaneMethodTable::global().iter() {
        let arities: &[usize] = match call {
            PaneCall::Get(_) => &[0, 1],
            PaneCall::Set(_) => &[1, 2],
            PaneCall::Function(_) => &[0, 1, 2],
        };
        for &arity in arities {
            register_arity(module, pane, method, arity);
        }
    }
}

fn register_arity(module: &mut rhai::Module, pane: &ScPane, method: &'static str, arity: usize) {
    let pane = pane.clone();
    let invoke = move |args: Vec<Dynamic>| -> Result<Dynamic, Box<EvalAltResult>> {
        let args = to_host_values(args)?;
        pane.invoke(method, &args)
            .map(from_host_value)
            .map_err(host_err)
    };
    match arity {
        0 => {
            module.set_native_fn(method, move || invoke(Vec::new()));
        }
        1 => {
            module.set_native_fn(method, move |a: Dynamic| invoke(vec![a]));
        }
        _ => {
            module.set_native_fn(method, move |a: Dynamic, b: Dynamic| invoke(vec![a, b]));
        }
    }
}

fn find_result(found: Option<(i64, i64)>) -> Dynamic {
    match found {
        Some((start, end)) => {
            let range: Array = vec![Dynamic::from(start), Dynamic::from(end)];
            Dynamic::from(range)
        }
        None => Dynamic::UNIT,
    }
}

fn find_options(map: &Map) -> Result<FindOptions, Box<EvalAltResult>> {
    let mut options = FindOptions::default();
    for (key, value) in map {
        let invalid = || -> Box<EvalAltResult> {
            format!("FindText option '{key}' has the wrong type ({})", value.type_name()).into()
        };
        match key.as_str() {
            "start" => options.start = value.as_int().map_err(|_| invalid())?,
            "end" => options.end = value.as_int().map_err(|_| invalid())?,
            "flags" => options.flags = value.as_int().map_err(|_| invalid())?,
            "whole_word" => options.whole_word = value.as_bool().map_err(|_| invalid())?,
            "match_case" => options.match_case = value.as_bool().map_err(|_| invalid())?,
            "regexp" => options.regexp = value.as_bool().map_err(|_| invalid())?,
            other => return Err(format!("unknown FindText option '{other}'").into()),
        }
    }
    Ok(options)
}

fn register_helpers(module: &mut rhai::Module, pane: &ScPane) {
    // Append(text)
    {
        let pane = pane.clone();
        module.set_native_fn("Append", move |text: &str| -> Result<(), Box<EvalAltResult>> {
            pane.append(text);
            Ok(())
        });
    }

    // InsertText(text, pos)
    {
        let pane = pane.clone();
        module.set_native_fn(
            "InsertText",
            move |text: &str, pos: i64| -> Result<(), Box<EvalAltResult>> {
                pane.insert_text(text, pos);
                Ok(())
            },
        );
    }

    // Remove(start, end)
    {
        let pane = pane.clone();
        module.set_native_fn(
            "Remove",
            move |start: i64, end: i64| -> Result<(), Box<EvalAltResult>> {
                pane.remove(start, end);
                Ok(())
            },
        );
    }

    // Textrange(start, end) -> String
    {
        let pane = pane.clone();
        module.set_native_fn(
            "Textrange",
            move |start: i64, end: i64| -> Result<String, Box<EvalAltResult>> {
                pane.text_range(start, end).map_err(host_err)
            },
        );
    }

    // FindText(text), FindText(text, start, end), FindText(text, start, end, flags),
    // FindText(text, #{ ... }) -> [start, end] or ()
    {
        let p = pane.clone();
        module.set_native_fn(
            "FindText",
            move |text: &str| -> Result<Dynamic, Box<EvalAltResult>> {
                p.find_text(text, FindOptions::default())
                    .map(find_result)
                    .map_err(host_err)
            },
        );
        let p = pane.clone();
        module.set_native_fn(
            "FindText",
            move |text: &str, start: i64, end: i64| -> Result<Dynamic, Box<EvalAltResult>> {
                let options = FindOptions {
                    start,
                    end,
                    ..FindOptions::default()
                };
                p.find_text(text, options).map(find_result).map_err(host_err)
            },
        );
        let p = pane.clone();
        module.set_native_fn(
            "FindText",
            move |text: &str,
                  start: i64,
                  end: i64,
                  flags: i64|
                  -> Result<Dynamic, Box<EvalAltResult>> {
                let options = FindOptions {
                    start,
                    end,
                    flags,
                    ..FindOptions::default()
                };
                p.find_text(text, options).map(find_result).map_err(host_err)
            },
        );
        let p = pane.clone();
        module.set_native_fn(
            "FindText",
            move |text: &str, options: Map| -> Result<Dynamic, Box<EvalAltResult>> {
                let options = find_options(&options)?;
                p.find_text(text, options).map(find_result).map_err(host_err)
            },
        );
    }

    // Write(text), Write(text, pos)
    {
        let p = pane.clone();
        module.set_native_fn("Write", move |text: &str| -> Result<(), Box<EvalAltResult>> {
            p.write(text, None).map_err(host_err)
        });
        let p = pane.clone();
        module.set_native_fn(
            "Write",
            move |text: &str, pos: i64| -> Result<(), Box<EvalAltResult>> {
                p.write(text, Some(pos)).map_err(host_err)
            },
        );
    }

    // GetAllText() -> String
    {
        let pane = pane.clone();
        module.set_native_fn("GetAllText", move || -> Result<String, Box<EvalAltResult>> {
            pane.all_text().map_err(host_err)
        });
    }

    // GetCurLine() -> String
    {
        let pane = pane.clone();
        module.set_native_fn("GetCurLine", move || -> Result<String, Box<EvalAltResult>> {
            pane.cur_line().map_err(host_err)
        });
    }

    // String-argument editor functions
    let string_functions: [(&str, fn(&ScPane, &str) -> Result<(), HostError>); 7] = [
        ("CopyText", ScPane::copy_text),
        ("SetText", ScPane::set_text),
        ("AutoCStops", ScPane::auto_c_stops),
        ("AutoCSelect", ScPane::auto_c_select),
        ("ReplaceSel", ScPane::replace_sel),
        ("SetLexerLanguage", ScPane::set_lexer_language),
        ("LoadLexerLibrary", ScPane::load_lexer_library),
    ];
    for (name, function) in string_functions {
        let pane = pane.clone();
        module.set_native_fn(name, move |text: &str| -> Result<(), Box<EvalAltResult>> {
            function(&pane, text).map_err(host_err)
        });
    }
}
