use std::path::{Path, PathBuf};

use log::LevelFilter;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::error::LoggingError;

const LOG_DIR_NAME: &str = "wxdash";
const LOG_FILE_NAME: &str = "wxdash.log";
const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l:<5} {M} - {m}{n}";

pub fn default_log_file() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(LOG_DIR_NAME).join(LOG_FILE_NAME))
}

fn file_config(level: LevelFilter, path: &Path) -> Result<Config, LoggingError> {
    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(path)
        .map_err(|e| LoggingError::File(path.to_path_buf(), e))?;

    Ok(Config::builder()
        .appender(Appender::builder().build("file", Box::new(file)))
        .build(Root::builder().appender("file").build(level))?)
}

/// Sends all logging to a file; the terminal belongs to the dashboard.
/// Returns the file in use.
pub fn init(level: LevelFilter, file: Option<&Path>) -> Result<PathBuf, LoggingError> {
    let path = match file {
        Some(path) => path.to_path_buf(),
        None => default_log_file().ok_or(LoggingError::NoLogDir)?,
    };
    log4rs::init_config(file_config(level, &path)?)?;
    Ok(path)
}
