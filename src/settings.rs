use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::SettingsError;

// ------------------------
// Settings store
// ------------------------

/// Written verbatim the first time the store is bootstrapped.
pub const SETTINGS_TEMPLATE: &str = "\
[wallpaper]
index = 0
wallpapers = \"~/pictures/\"
";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub wallpaper: WallpaperSettings,
    /// The whole file as read. Sections and keys this tool does not model
    /// are written back untouched.
    document: toml::Table,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WallpaperSettings {
    /// Last selected position. Signed so a hand-edited negative value is
    /// reported as malformed instead of failing to parse.
    pub index: i64,
    pub wallpapers: String,
}

impl Default for WallpaperSettings {
    fn default() -> Self {
        WallpaperSettings {
            index: 0,
            wallpapers: "~/pictures/".to_string(),
        }
    }
}

#[derive(Deserialize)]
struct SettingsFile {
    wallpaper: WallpaperSettings,
}

impl Settings {
    fn parse(data: &str) -> Result<Self, toml::de::Error> {
        let SettingsFile { wallpaper } = toml::from_str(data)?;
        let document = toml::from_str(data)?;
        Ok(Settings {
            wallpaper,
            document,
        })
    }

    /// The document as read, with the `[wallpaper]` keys replaced by the
    /// in-memory values.
    fn to_document(&self) -> toml::Table {
        let mut document = self.document.clone();
        let section = document
            .entry("wallpaper")
            .or_insert(toml::Value::Table(toml::Table::new()));
        if !section.is_table() {
            *section = toml::Value::Table(toml::Table::new());
        }
        if let toml::Value::Table(section) = section {
            section.insert(
                "index".to_string(),
                toml::Value::Integer(self.wallpaper.index),
            );
            section.insert(
                "wallpapers".to_string(),
                toml::Value::String(self.wallpaper.wallpapers.clone()),
            );
        }
        document
    }
}

/// Handle to the on-disk settings file. Passing one to the selector enables
/// persistence.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SettingsStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the settings file from the template if it is missing. Returns
    /// whether a file was written.
    pub fn ensure_exists(&self) -> Result<bool, SettingsError> {
        if self.path.exists() {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        fs::write(&self.path, SETTINGS_TEMPLATE).map_err(|source| self.io_error(source))?;
        debug!(path = %self.path.display(), "created settings file from template");

        Ok(true)
    }

    pub fn read(&self) -> Result<Settings, SettingsError> {
        let data = fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;
        Settings::parse(&data).map_err(|source| SettingsError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Rewrites the whole file from `settings`.
    pub fn write(&self, settings: &Settings) -> Result<(), SettingsError> {
        let data = toml::to_string(&settings.to_document())?;
        fs::write(&self.path, data).map_err(|source| self.io_error(source))?;
        debug!(
            path = %self.path.display(),
            index = settings.wallpaper.index,
            "wrote settings"
        );
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> SettingsError {
        SettingsError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
