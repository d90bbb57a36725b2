use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("missing required context key: {0}")]
    MissingContext(&'static str),

    #[error("invalid context: {0}")]
    InvalidContext(String),

    #[error("invalid file mode: {0}")]
    InvalidMode(String),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
