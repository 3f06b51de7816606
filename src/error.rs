use std::path::PathBuf;

use thiserror::Error;

/// Any weather-provider failure other than "not found". Never leaves the
/// retrieval layer: it is logged and the lookup degrades to `Unavailable`.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network request failed for {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Provider answered {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Could not decode provider response from {url}")]
    Document {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse config file '{0}'")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("No OpenWeatherMap API key: set `api_key` in {0}, OPENWEATHER_API_KEY or --api-key")]
    MissingApiKey(String),

    #[error("Invalid log level '{0}'")]
    LogLevel(String),
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to determine log directory")]
    NoLogDir,

    #[error("Failed to open log file '{0}'")]
    File(PathBuf, #[source] std::io::Error),

    #[error(transparent)]
    Config(#[from] log4rs::config::runtime::ConfigErrors),

    #[error(transparent)]
    SetLogger(#[from] log::SetLoggerError),
}
