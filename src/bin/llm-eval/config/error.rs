use std::io;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config IO error: {0}")]
    Io(#[from] io::Error),
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("missing home directory for config paths")]
    MissingHome,
    #[error("invalid delay: {0}")]
    InvalidDelay(f64),
    #[error("invalid timeout: {0}s, must be at least 1")]
    InvalidTimeout(u64),
}
