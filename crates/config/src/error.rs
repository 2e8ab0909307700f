use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("unsupported config format: .{0}")]
    UnsupportedFormat(String),
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("REQUEST_TIMEOUT_SECS must be at least 1")]
    ZeroTimeout,
    #[error("PLUGIN_URLS is not set; configure at least one plugin to watch")]
    MissingPlugins,
}

pub type Result<T> = std::result::Result<T, ConfigError>;
