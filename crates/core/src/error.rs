//! Error types for the NLP pipeline, backends and configuration

use std::path::PathBuf;
use thiserror::Error;

use crate::types::CommandKind;

/// Failures inside the text pipeline or while loading its models
#[derive(Debug, Error)]
pub enum NlpError {
    #[error("input too long: {len} characters (limit {max})")]
    InputTooLong { len: usize, max: usize },

    #[error("failed to read model file {path}: {source}")]
    ModelRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model file {path}: {source}")]
    ModelParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Failures surfaced by a backend while serving a command
#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    Nlp(#[from] NlpError),

    #[error("command {0} is not served by this backend")]
    Unsupported(CommandKind),
}

/// Failures while loading the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
