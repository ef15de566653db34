use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    // IO
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parsing
    #[error("failed to parse TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    // Environment overrides
    #[error("invalid port '{value}' in {var}")]
    InvalidPort { var: String, value: String },

    // Validation
    #[error("invalid listen address '{addr}'")]
    InvalidListen { addr: String },

    #[error("server.threads must be at least 1")]
    InvalidThreads,

    #[error("mail sender address must not be empty")]
    MissingSender,
}

impl ConfigError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}
