use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::LevelFilter;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::location::IP_LOOKUP_URL;
use crate::openweather::BASE_URL;

const CONFIG_DIR_NAME: &str = "wxdash";
const CONFIG_FILE_NAME: &str = "config.toml";
pub const CONFIG_ENV: &str = "WXDASH_CONFIG";
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeatherMap API key
    pub api_key: Option<String>,

    /// Shown on start-up when no city or coordinates are given
    pub default_city: String,

    pub base_url: String,

    pub geolocation: GeolocationConfig,

    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    /// `false` refuses every location request
    pub enabled: bool,

    /// ip-api compatible lookup endpoint
    pub url: String,

    /// Fixed position; used instead of the lookup when both are set
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,

    /// Defaults to `<cache dir>/wxdash/wxdash.log`
    pub file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            default_city: "stockholm".to_string(),
            base_url: BASE_URL.to_string(),
            geolocation: GeolocationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: IP_LOOKUP_URL.to_string(),
            latitude: None,
            longitude: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.level).map_err(|_| ConfigError::LogLevel(self.level.clone()))
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

impl Config {
    /// Reads the config file. An explicitly named file (argument or
    /// `WXDASH_CONFIG`) must exist; a missing default file means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        match explicit {
            Some(path) => Self::read(&path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::read(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    /// `--api-key` beats `OPENWEATHER_API_KEY`, which beats the file.
    pub fn api_key(&self, cli: Option<&str>) -> Result<String, ConfigError> {
        let env = std::env::var(API_KEY_ENV).ok();
        pick_api_key(cli, env.as_deref(), self.api_key.as_deref()).ok_or_else(|| {
            let location = default_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| CONFIG_FILE_NAME.to_string());
            ConfigError::MissingApiKey(location)
        })
    }
}

fn pick_api_key(cli: Option<&str>, env: Option<&str>, file: Option<&str>) -> Option<String> {
    [cli, env, file]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|key| !key.is_empty())
        .map(str::to_string)
}
