// Settings loaded from ~/.config/liftboard/config.toml (or an explicit path)

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use liftboard_io::TextEncoding;
use liftboard_records::{DivisionGrouping, SearchMode};

#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    Read { path: String, message: String },
    /// TOML syntax error or a value of the wrong shape.
    Parse { path: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read config {path}: {message}"),
            Self::Parse { path, message } => write!(f, "invalid config {path}: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where the records come from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataSettings {
    /// Records CSV used when no path is given on the command line.
    pub csv: Option<PathBuf>,
    /// Optional branding image for HTML output.
    pub logo: Option<PathBuf>,
    pub encoding: TextEncoding,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuerySettings {
    pub division_grouping: DivisionGrouping,
    pub search_mode: SearchMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySettings {
    pub title: String,
    /// Show a prompt instead of results until at least one filter is chosen.
    pub require_filter: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            title: "WRPF UK Records Database".to_string(),
            require_filter: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub data: DataSettings,
    pub query: QuerySettings,
    pub display: DisplaySettings,
}

impl Settings {
    /// Default settings file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("liftboard")
            .join("config.toml")
    }

    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        toml::from_str(input).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// Load a specific file. Relative data paths resolve against its directory.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let mut settings: Settings = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(base) = path.parent() {
            settings.resolve_paths(base);
        }
        Ok(settings)
    }

    /// Load `explicit` if given (it must exist), else the default file if it
    /// exists, else built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn resolve_paths(&mut self, base: &Path) {
        for path in [&mut self.data.csv, &mut self.data.logo].into_iter().flatten() {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
