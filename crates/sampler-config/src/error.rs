use std::path::PathBuf;

use thiserror::Error;

use sampler_core::FileReport;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file is missing: {path}: {source}")]
    Missing {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Invalid(FileReport),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
