//! API modules for the `scite` namespace
//!
//! Each submodule provides functions under `scite::<module>::*`

pub mod app;
pub mod constants;
pub mod pane;

use rhai::{Dynamic, EvalAltResult};

use crate::error::HostError;
use crate::host::HostValue;

/// Convert a script value into a host argument
pub(crate) fn to_host_value(value: Dynamic) -> Result<HostValue, Box<EvalAltResult>> {
    if value.is_unit() {
        return Ok(HostValue::None);
    }
    if let Ok(b) = value.as_bool() {
        return Ok(HostValue::Bool(b));
    }
    if let Ok(n) = value.as_int() {
        return Ok(HostValue::Int(n));
    }
    if let Ok(c) = value.as_char() {
        return Ok(HostValue::Str(c.to_string()));
    }
    if value.is_string() {
        return value
            .into_string()
            .map(HostValue::Str)
            .map_err(|t| format!("expected a string, got {t}").into());
    }
    Err(format!("cannot pass a value of type {} to the editor", value.type_name()).into())
}

pub(crate) fn to_host_values(args: Vec<Dynamic>) -> Result<Vec<HostValue>, Box<EvalAltResult>> {
    args.into_iter().map(to_host_value).collect()
}

/// Convert a host result into a script value
pub(crate) fn from_host_value(value: HostValue) -> Dynamic {
    match value {
        HostValue::None => Dynamic::UNIT,
        HostValue::Bool(b) => Dynamic::from(b),
        HostValue::Int(n) => Dynamic::from(n),
        HostValue::Str(s) => Dynamic::from(s),
    }
}

pub(crate) fn host_err(err: HostError) -> Box<EvalAltResult> {
    err.to_string().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_script_values() {
        assert_eq!(to_host_value(Dynamic::UNIT).unwrap(), HostValue::None);
        assert_eq!(to_host_value(Dynamic::from(true)).unwrap(), HostValue::Bool(true));
        assert_eq!(to_host_value(Dynamic::from(7_i64)).unwrap(), HostValue::Int(7));
        assert_eq!(
            to_host_value(Dynamic::from("x".to_string())).unwrap(),
            HostValue::Str("x".to_string())
        );
        assert_eq!(
            to_host_value(Dynamic::from('c')).unwrap(),
            HostValue::Str("c".to_string())
        );
    }

    #[test]
    fn rejects_arrays() {
        assert!(to_host_value(Dynamic::from(rhai::Array::new())).is_err());
    }

    #[test]
    fn converts_host_values() {
        assert!(from_host_value(HostValue::None).is_unit());
        assert_eq!(from_host_value(HostValue::Int(3)).as_int(), Ok(3));
        assert_eq!(
            from_host_value(HostValue::Str("s".into())).into_string().unwrap(),
            "s"
        );
    }
}
