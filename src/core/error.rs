use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("expected a `{expected}` mapping, found `{found}`")]
    KindMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("child index {index} out of range for {len} children")]
    IndexOutOfRange { index: usize, len: usize },
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::MalformedInput(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
