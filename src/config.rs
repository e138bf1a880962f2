use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::ConfigError;
use crate::selector::StepWrap;

pub struct Config {
    pub wallpaper_dir: PathBuf,
    pub settings_file: PathBuf,
    pub recursive: bool,
    pub use_settings: bool,
    pub wrap: StepWrap,
    /// Painter program followed by its leading arguments; the wallpaper path
    /// is appended at call time.
    pub command: Vec<String>,
}

/// `~/wallpapers/pictures`, relative to the resolved home directory.
pub const DEFAULT_WALLPAPER_DIR: &str = "~/wallpapers/pictures";
pub const DEFAULT_COMMAND: [&str; 2] = ["feh", "--bg-fill"];

impl Config {
    /// Loads `$XDG_CONFIG_HOME/wallrot/config.toml`, falling back to
    /// `~/.config/wallrot`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_dir())
    }

    pub fn load_from(dir: &Path) -> Result<Self, ConfigError> {
        let config_file = dir.join("config.toml");

        // Defaults
        let mut cfg = Config {
            wallpaper_dir: expand_home(DEFAULT_WALLPAPER_DIR),
            settings_file: dir.join("settings.toml"),
            recursive: true,
            use_settings: true,
            wrap: StepWrap::default(),
            command: DEFAULT_COMMAND.iter().map(|s| s.to_string()).collect(),
        };

        if !config_file.exists() {
            return Ok(cfg);
        }

        let contents = fs::read_to_string(&config_file).map_err(|source| ConfigError::Read {
            path: config_file.clone(),
            source,
        })?;
        let value: toml::Value =
            toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: config_file.clone(),
                source,
            })?;

        if let Some(path_str) = value.get("wallpaper_dir").and_then(|v| v.as_str()) {
            cfg.wallpaper_dir = expand_home(path_str);
        }

        if let Some(v) = value.get("recursive").and_then(|v| v.as_bool()) {
            cfg.recursive = v;
        }

        if let Some(v) = value.get("use_settings").and_then(|v| v.as_bool()) {
            cfg.use_settings = v;
        }

        if let Some(v) = value.get("wrap").and_then(|v| v.as_str()) {
            cfg.wrap = StepWrap::from_str(v).map_err(|_| ConfigError::InvalidValue {
                path: config_file.clone(),
                key: "wrap",
                value: v.to_string(),
            })?;
        }

        if let Some(v) = value.get("command").and_then(|v| v.as_array()) {
            let parts: Vec<String> = v
                .iter()
                .filter_map(|part| part.as_str().map(str::to_string))
                .collect();
            if parts.len() != v.len() {
                return Err(ConfigError::InvalidValue {
                    path: config_file,
                    key: "command",
                    value: format!("{v:?}"),
                });
            }
            if parts.is_empty() {
                return Err(ConfigError::EmptyCommand { path: config_file });
            }
            cfg.command = parts;
        }

        Ok(cfg)
    }
}

/// XDG config path for this tool.
pub fn config_dir() -> PathBuf {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"));

    xdg_config.join("wallrot")
}

/// Expands a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        return home_dir();
    }
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(path),
    }
}

fn home_dir() -> PathBuf {
    // No home directory: resolve relative to the working directory.
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}
