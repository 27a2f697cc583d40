use dockpp::core::models::request::RequestError;
use dockpp::engine::error::EngineError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Install root error: {0}")]
    Home(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
