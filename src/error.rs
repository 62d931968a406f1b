use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the host or by the facade while forwarding a call to it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("invalid pane {0}, must be 0 or 1")]
    InvalidPane(i64),

    #[error("could not find constant {0}")]
    UnknownConstant(String),

    #[error("could not find command {0}")]
    UnknownCommand(String),

    #[error("pane has no method {0}")]
    UnknownMethod(String),

    #[error("pane has no property {0}")]
    UnknownProperty(String),

    #[error("pane has no function {0}")]
    UnknownFunction(String),

    #[error("{component} must be between 0 and 255, got {value}")]
    ColorOutOfRange { component: &'static str, value: i64 },

    #[error("invalid argument for {call}: {reason}")]
    InvalidArgument { call: String, reason: String },
}

/// Fatal errors found while scanning custom command configuration.
///
/// Any of these aborts the registration scan; commands scanned before the
/// failing one stay registered.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("command {command} needs a path in order to have callbacks")]
    MissingPath { command: String },

    #[error("command {command} registered callback {event}, event names must start with 'On'")]
    InvalidEventName { command: String, event: String },

    #[error("command {command} needs a name")]
    MissingName { command: String },

    #[error("command {command} needs filetypes to be defined")]
    MissingFiletypes { command: String },

    #[error("command {command} needs an action to be defined")]
    MissingAction { command: String },

    #[error("command {command}, the shortcut {shortcut} was apparently already registered")]
    DuplicateShortcut { command: String, shortcut: String },
}

impl ConfigError {
    /// The custom command identifier the error is about.
    pub fn command(&self) -> &str {
        match self {
            ConfigError::MissingPath { command }
            | ConfigError::InvalidEventName { command, .. }
            | ConfigError::MissingName { command }
            | ConfigError::MissingFiletypes { command }
            | ConfigError::MissingAction { command }
            | ConfigError::DuplicateShortcut { command, .. } => command,
        }
    }
}

/// Failure of a single subscriber during event dispatch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("command {command} could not find a file at {}", expected.display())]
    ModuleNotFound { command: String, expected: PathBuf },

    #[error("command {command} failed to load {}: {message}", path.display())]
    Load {
        command: String,
        path: PathBuf,
        message: String,
    },

    #[error("command {command} registered for event {event} but we could not find function of this name")]
    MissingFunction { command: String, event: String },

    #[error("command {command} is already handling an event")]
    ModuleBusy { command: String },

    #[error("command {command} failed in {event}: {message}")]
    Script {
        command: String,
        event: String,
        message: String,
    },
}

/// Errors surfaced by the extension entry points.
#[derive(Debug, Error)]
pub enum ExtensionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("script error: {0}")]
    Script(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
