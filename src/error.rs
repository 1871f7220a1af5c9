use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    ConfigValidation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("opinion sheet error: {0}")]
    Input(String),

    #[error("compression error: {0}")]
    Compression(String),

    #[error("summarizer error: {0}")]
    Summarizer(String),

    #[error("prompt error: {0}")]
    Prompt(String),

    #[error("output error: {0}")]
    Output(String),
}

pub type Result<T> = std::result::Result<T, Error>;
