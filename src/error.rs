//! Error types shared by the selector, the settings store and the command layer.

use std::path::PathBuf;

use thiserror::Error;

/// Failures reading or writing the settings store.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file {path} is not valid: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Failures loading the user config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config file {path}: `command` must name at least a program")]
    EmptyCommand { path: PathBuf },

    #[error("config file {path}: invalid value for `{key}`: {value}")]
    InvalidValue {
        path: PathBuf,
        key: &'static str,
        value: String,
    },
}

#[derive(Debug, Error)]
pub enum SelectorError {
    /// Requested position is outside the candidate list.
    #[error("{index} is out of wallpaper bounds (0..{len})")]
    OutOfBounds { index: i64, len: usize },

    /// The current index no longer points into the candidate list.
    #[error("Malformed settings. Index {index} could not be found!")]
    MalformedIndex { index: usize, len: usize },

    #[error("no wallpaper named '{0}'")]
    NotFound(String),

    #[error("no wallpapers found in {}", .0.display())]
    EmptySource(PathBuf),

    #[error("wallpaper directory {} does not exist", .0.display())]
    MissingSource(PathBuf),

    #[error("failed to scan wallpaper directory: {0}")]
    Scan(#[from] walkdir::Error),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl SelectorError {
    /// Whether the command layer should report this and carry on rather than
    /// fail the process.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::OutOfBounds { .. } | Self::MalformedIndex { .. } | Self::NotFound(_)
        )
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("'{0}' is an invalid command.")]
    InvalidCommand(String),

    #[error("Invalid number of arguments!")]
    InvalidArity,

    #[error("Invalid argument '{value}', expected {expected}.")]
    InvalidArgument {
        value: String,
        expected: &'static str,
    },

    #[error(transparent)]
    Selector(#[from] SelectorError),
}

impl CommandError {
    /// Recoverable errors are printed and the process exits normally.
    pub fn is_recoverable(&self) -> bool {
        match self {
            CommandError::Selector(err) => err.is_recoverable(),
            _ => true,
        }
    }
}
