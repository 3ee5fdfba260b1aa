use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("index {index} out of range for layout of {len} boxes")]
    IndexOutOfRange { index: usize, len: usize },

    /// Header and footer margins leave no content band.
    #[error("content band has non-positive height {height}")]
    DegenerateRegion { height: i64 },
}

pub type Result<T> = std::result::Result<T, LayoutError>;
