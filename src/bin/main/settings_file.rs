use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use pacer_core::settings::{DEFAULT_WPM, ParagraphMode, PersistedSettings, SettingsStore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SETTINGS_DIR: &str = ".config/pacer";
const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Error)]
pub(super) enum SettingsFileError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to encode settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// On-disk shape. Both keys are optional so hand-edited files can set just one.
#[derive(Debug, Default, Deserialize, Serialize)]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    wpm: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    paragraph_mode: Option<String>,
}

impl SettingsFile {
    fn resolve(self) -> PersistedSettings {
        let paragraph_mode = match self.paragraph_mode.as_deref() {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("settings: unknown paragraph_mode {raw:?}, using default");
                ParagraphMode::default()
            }),
            None => ParagraphMode::default(),
        };

        PersistedSettings::new(self.wpm.unwrap_or(DEFAULT_WPM), paragraph_mode)
    }
}

impl From<&PersistedSettings> for SettingsFile {
    fn from(settings: &PersistedSettings) -> Self {
        Self {
            wpm: Some(settings.wpm),
            paragraph_mode: Some(settings.paragraph_mode.as_str().to_owned()),
        }
    }
}

/// TOML file store for reader settings.
pub(super) struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    pub(super) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.config/pacer/settings.toml`, or `None` without a home directory.
    pub(super) fn default_path() -> Option<PathBuf> {
        env::var_os("HOME")
            .or_else(|| env::var_os("USERPROFILE"))
            .filter(|home| !home.is_empty())
            .map(|home| PathBuf::from(home).join(SETTINGS_DIR).join(SETTINGS_FILE))
    }

    pub(super) fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> SettingsFileError {
        SettingsFileError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SettingsStore for TomlSettingsStore {
    type Error = SettingsFileError;

    fn load(&mut self) -> Result<Option<PersistedSettings>, Self::Error> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("settings: no file at {}", self.path.display());
                return Ok(None);
            }
            Err(err) => return Err(self.io_error(err)),
        };

        let file: SettingsFile =
            toml::from_str(&raw).map_err(|source| SettingsFileError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(Some(file.resolve()))
    }

    fn save(&mut self, settings: &PersistedSettings) -> Result<(), Self::Error> {
        let encoded = toml::to_string(&SettingsFile::from(settings))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }

        // Write next to the target and rename so a crash never leaves half a file.
        let staging = self.path.with_extension("toml.tmp");
        fs::write(&staging, encoded).map_err(|err| self.io_error(err))?;
        fs::rename(&staging, &self.path).map_err(|err| self.io_error(err))?;
        debug!("settings: wrote {}", self.path.display());
        Ok(())
    }
}
