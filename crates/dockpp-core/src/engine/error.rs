use crate::core::io::config_doc::ConfigError;
use crate::core::io::log_record::LogRecordError;
use crate::core::models::request::RequestError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which input of a run a path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRole {
    Antibody,
    Antigen,
    InferenceScript,
}

impl fmt::Display for InputRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputRole::Antibody => "antibody structure",
            InputRole::Antigen => "antigen structure",
            InputRole::InferenceScript => "inference script",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("File not found for {role}: {}", path.display())]
    MissingInput { role: InputRole, path: PathBuf },

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to {context}: {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },

    #[error("Failed to write manifest '{}': {source}", path.display())]
    Manifest { path: PathBuf, source: csv::Error },

    #[error("Failed to launch inference process '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    LogRecord(#[from] LogRecordError),
}

impl EngineError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
