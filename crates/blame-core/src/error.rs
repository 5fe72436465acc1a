use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("No caller frame at index {index} (trace produced {len} frames)")]
    MissingFrame { index: usize, len: usize },

    #[error("Console has no callable member `{0}`")]
    NotCallable(String),

    #[error("Middleware stage failed: {0}")]
    Stage(String),
}

pub type Result<T, E = BlameError> = std::result::Result<T, E>;
